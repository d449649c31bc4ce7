//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Ports exist for:
//! - LLM calls (could swap Ollama -> Claude/OpenAI)
//! - Image generation (could swap ComfyUI -> other)

mod error;
mod external;

pub use error::{ImageGenError, LlmError};
pub use external::{ImageGenPort, ImageRequest, ImageResult, LlmPort};

#[cfg(test)]
pub use external::{MockImageGenPort, MockLlmPort};
