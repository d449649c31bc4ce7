//! Export of a completed story graph: Ren'Py script emission and on-disk
//! packaging of the script plus its image assets.

mod package;
mod renpy;

pub use package::save_story;
pub use renpy::RenpyExporter;

/// Errors raised while persisting an exported story.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write story files: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
}
