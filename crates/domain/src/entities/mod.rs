mod character;
mod scene;
mod story_graph;

pub use character::Character;
pub use scene::Scene;
pub use story_graph::StoryGraph;
