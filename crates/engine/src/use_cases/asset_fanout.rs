//! Asset fan-out use case - fills in scene backgrounds concurrently.
//!
//! The one concurrent phase of a build: every scene's image request is
//! submitted before any is awaited, and the phase completes at the join of
//! all of them. Each task writes to a distinct scene, so the write-back
//! after the join needs no locking.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use taleweave_domain::{SceneId, StoryGraph};

use crate::infrastructure::ports::{ImageGenPort, ImageRequest};

/// Default per-request timeout for a single background generation.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Generates one background image per scene, best-effort.
///
/// A failed or timed-out request leaves that scene with an empty background
/// and a warning in the log; it never aborts the batch. Text generation is
/// fatal when it fails, images are not.
pub struct AssetFanOut {
    image_gen: Arc<dyn ImageGenPort>,
    request_timeout: Duration,
}

impl AssetFanOut {
    pub fn new(image_gen: Arc<dyn ImageGenPort>) -> Self {
        Self {
            image_gen,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(image_gen: Arc<dyn ImageGenPort>, request_timeout: Duration) -> Self {
        Self {
            image_gen,
            request_timeout,
        }
    }

    /// Fill in `background_image` for every scene in the graph.
    ///
    /// Returns the number of scenes that received a non-empty image.
    pub async fn execute(&self, graph: &mut StoryGraph) -> usize {
        let mut tasks: JoinSet<(SceneId, Vec<u8>)> = JoinSet::new();

        for scene in graph.scenes() {
            let image_gen = Arc::clone(&self.image_gen);
            let scene_id = scene.id();
            let prompt = scene.background_prompt().to_string();
            let timeout = self.request_timeout;

            tasks.spawn(async move {
                let request = ImageRequest::background(prompt);
                match tokio::time::timeout(timeout, image_gen.generate(request)).await {
                    Ok(Ok(result)) => (scene_id, result.image_data),
                    Ok(Err(e)) => {
                        tracing::warn!(scene_id = %scene_id, error = %e, "Background generation failed, scene keeps an empty image");
                        (scene_id, Vec::new())
                    }
                    Err(_) => {
                        tracing::warn!(scene_id = %scene_id, timeout_secs = timeout.as_secs(), "Background generation timed out, scene keeps an empty image");
                        (scene_id, Vec::new())
                    }
                }
            });
        }

        let mut filled = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((scene_id, image_data)) => {
                    if !image_data.is_empty() {
                        filled += 1;
                    }
                    if let Some(scene) = graph.scene_mut(scene_id) {
                        scene.set_background_image(image_data);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Background generation task panicked");
                }
            }
        }

        tracing::info!(
            filled,
            total = graph.scenes().len(),
            "Background fan-out complete"
        );
        filled
    }
}
