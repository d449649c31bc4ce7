pub mod asset_fanout;
pub mod build_story;

pub use asset_fanout::AssetFanOut;
pub use build_story::{StoryBuilder, StoryError, StoryRequest};
