//! End-to-end pipeline test: build -> fan-out -> export -> save, against
//! scripted collaborator stubs.

use std::sync::Arc;

use async_trait::async_trait;

use taleweave_domain::Character;
use taleweave_engine::infrastructure::export::{save_story, RenpyExporter};
use taleweave_engine::infrastructure::ports::{
    ImageGenError, ImageGenPort, ImageRequest, ImageResult, LlmError, LlmPort,
};
use taleweave_engine::use_cases::{AssetFanOut, StoryBuilder, StoryRequest};

/// Scripted text collaborator: the root offers two choices, terminal scenes
/// offer one each, so the finished tree is root + two endings.
struct ScriptedLlm;

#[async_trait]
impl LlmPort for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if prompt.starts_with("Write the choices") {
            if prompt.contains("between 2 and 3") {
                Ok("Search the cliffs\nQuestion the villagers".to_string())
            } else {
                Ok("See it through".to_string())
            }
        } else if prompt.starts_with("Write the narrative") {
            Ok("The lamp is dark. The village waits.".to_string())
        } else if prompt.starts_with("Summarize") {
            Ok("a dark lighthouse over a stormy sea".to_string())
        } else {
            Ok("The keeper's fate is finally known.".to_string())
        }
    }
}

/// Image collaborator that returns the prompt bytes as the "image".
struct EchoImageGen;

#[async_trait]
impl ImageGenPort for EchoImageGen {
    async fn generate(&self, request: ImageRequest) -> Result<ImageResult, ImageGenError> {
        Ok(ImageResult {
            image_data: request.prompt.into_bytes(),
            format: "png".to_string(),
        })
    }

    async fn check_health(&self) -> Result<bool, ImageGenError> {
        Ok(true)
    }
}

fn request() -> StoryRequest {
    StoryRequest {
        characters: vec![Character::new("Mira", "a restless cartographer").unwrap()],
        premise: "a lighthouse keeper vanishes".into(),
        context: "a storm-wracked island".into(),
        max_depth: 2,
    }
}

#[tokio::test]
async fn full_pipeline_produces_a_complete_story_package() {
    let builder = StoryBuilder::new(Arc::new(ScriptedLlm));
    let mut graph = builder.build(request()).await.unwrap();
    assert_eq!(graph.scenes().len(), 3);

    let filled = AssetFanOut::new(Arc::new(EchoImageGen))
        .execute(&mut graph)
        .await;
    assert_eq!(filled, 3);

    let script = RenpyExporter::new(&graph).export();

    // Exactly one label per scene, resolved through the choice-path keys.
    assert_eq!(script.matches("label scene_1:").count(), 1);
    assert_eq!(script.matches("label scene_2_c1_0:").count(), 1);
    assert_eq!(script.matches("label scene_3_c1_1:").count(), 1);
    // Terminal scenes offer one option each, so a single ending label.
    assert_eq!(script.matches("label end_1:").count(), 1);
    assert!(!script.contains("label end_2:"));

    let dir = tempfile::tempdir().unwrap();
    save_story(&graph, &script, dir.path()).unwrap();

    assert!(dir.path().join("script.rpy").exists());
    assert!(dir.path().join("story.json").exists());
    assert!(dir.path().join("images/scenes/scene1.png").exists());
    assert!(dir.path().join("images/scenes/scene3.png").exists());
}

#[tokio::test]
async fn repeated_export_of_the_same_graph_is_byte_identical() {
    let builder = StoryBuilder::new(Arc::new(ScriptedLlm));
    let mut graph = builder.build(request()).await.unwrap();
    AssetFanOut::new(Arc::new(EchoImageGen))
        .execute(&mut graph)
        .await;

    let first = RenpyExporter::new(&graph).export();
    let second = RenpyExporter::new(&graph).export();
    assert_eq!(first, second);
}

/// A failing text collaborator at the very first scene leaves nothing
/// behind: the build errors and no graph is produced.
struct BrokenLlm;

#[async_trait]
impl LlmPort for BrokenLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::RequestFailed("connection refused".into()))
    }
}

#[tokio::test]
async fn collaborator_failure_fails_the_whole_build() {
    let builder = StoryBuilder::new(Arc::new(BrokenLlm));
    assert!(builder.build(request()).await.is_err());
}
