//! External collaborator port traits (LLM, image generation).

use async_trait::async_trait;

use super::error::{ImageGenError, LlmError};

/// Text-completion collaborator.
///
/// A single blocking request/response contract: one prompt in, one
/// completion out. The engine never assumes completions are idempotent or
/// retryable; callers wanting resilience wrap the port (see
/// `ResilientLlmClient`).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Request for a single generated image.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
}

impl ImageRequest {
    /// A widescreen scene background from a prompt, with the default
    /// negative prompt.
    pub fn background(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: "bad quality, blurry, ugly, text, watermark".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageResult {
    pub image_data: Vec<u8>,
    pub format: String,
}

/// Image-generation collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenPort: Send + Sync {
    async fn generate(&self, request: ImageRequest) -> Result<ImageResult, ImageGenError>;
    async fn check_health(&self) -> Result<bool, ImageGenError>;
}
