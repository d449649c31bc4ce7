pub mod choice_path;
pub mod entities;
pub mod error;
pub mod ids;

pub use choice_path::{choice_path_key, scene_label};
pub use entities::{Character, Scene, StoryGraph};
pub use error::DomainError;
pub use ids::{SceneId, SceneIdAllocator};
