//! TaleWeave - branching story generator entry point.
//!
//! Reads a story request from a JSON file, builds the scene graph against
//! the configured LLM, fans out background generation, and writes the
//! exported Ren'Py script plus assets to the output directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taleweave_engine::infrastructure::comfyui::ComfyUIClient;
use taleweave_engine::infrastructure::export::{save_story, RenpyExporter};
use taleweave_engine::infrastructure::ollama::OllamaClient;
use taleweave_engine::infrastructure::ports::{ImageGenPort, LlmPort};
use taleweave_engine::infrastructure::resilient_llm::{ResilientLlmClient, RetryConfig};
use taleweave_engine::use_cases::{AssetFanOut, StoryBuilder, StoryRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taleweave=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let request_path = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("Usage: taleweave <request.json> [output-dir]"))?;
    let output_dir = args
        .next()
        .map(PathBuf::from)
        .or_else(|| std::env::var("STORY_OUTPUT_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("story-out"));

    let request_json = std::fs::read_to_string(&request_path)?;
    let request: StoryRequest = serde_json::from_str(&request_json)?;

    let image_timeout_secs: u64 = std::env::var("STORY_IMAGE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(120);

    tracing::info!("Starting TaleWeave");

    // Create infrastructure clients
    let ollama_client = Arc::new(OllamaClient::from_env());
    let retry_config = RetryConfig::default();
    tracing::info!(
        max_retries = retry_config.max_retries,
        base_delay_ms = retry_config.base_delay_ms,
        "LLM client configured with retry"
    );
    let llm: Arc<dyn LlmPort> = Arc::new(ResilientLlmClient::new(ollama_client, retry_config));
    let image_gen: Arc<dyn ImageGenPort> = Arc::new(ComfyUIClient::from_env());

    match image_gen.check_health().await {
        Ok(true) => tracing::info!("Image backend is healthy"),
        _ => tracing::warn!("Image backend unreachable; scenes may keep empty backgrounds"),
    }

    // Build -> fan-out -> export -> save
    let builder = StoryBuilder::new(llm);
    let mut graph = builder.build(request).await?;

    let fanout = AssetFanOut::with_timeout(image_gen, Duration::from_secs(image_timeout_secs));
    let filled = fanout.execute(&mut graph).await;
    tracing::info!(filled, scenes = graph.scenes().len(), "Backgrounds generated");

    let script = RenpyExporter::new(&graph).export();
    save_story(&graph, &script, &output_dir)?;

    tracing::info!(path = %output_dir.display(), "Story exported");
    Ok(())
}
