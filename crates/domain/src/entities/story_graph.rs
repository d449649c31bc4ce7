//! Story graph - the complete scene tree for one build session.

use serde::{Deserialize, Serialize};

use crate::entities::{Character, Scene};
use crate::ids::SceneId;

/// The complete scene set for one story, in creation order.
///
/// Owned exclusively by the build session that created it: the builder
/// appends scenes, the fan-out phase fills in background images, and the
/// exporter reads it. Scene order is creation order (breadth-first), which
/// the exporter relies on for deterministic output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryGraph {
    characters: Vec<Character>,
    general_context: String,
    max_depth: u32,
    scenes: Vec<Scene>,
}

impl StoryGraph {
    pub fn new(characters: Vec<Character>, general_context: impl Into<String>, max_depth: u32) -> Self {
        Self {
            characters,
            general_context: general_context.into(),
            max_depth,
            scenes: Vec::new(),
        }
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn general_context(&self) -> &str {
        &self.general_context
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut [Scene] {
        &mut self.scenes
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id() == id)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id() == id)
    }

    pub fn scenes_at_depth(&self, depth: u32) -> impl Iterator<Item = &Scene> {
        self.scenes.iter().filter(move |s| s.depth() == depth)
    }

    pub fn push_scene(&mut self, scene: Scene) {
        self.scenes.push(scene);
    }

    /// The scene reached by picking `choice_index` at `parent_id`, if any.
    ///
    /// Successors are identified structurally: a scene `t` follows choice
    /// `i` of scene `s` iff `t.previous_choices[s.id] == i`.
    pub fn successor(&self, parent_id: SceneId, choice_index: usize) -> Option<SceneId> {
        self.scenes
            .iter()
            .find(|t| t.previous_choices().get(&parent_id) == Some(&choice_index))
            .map(|t| t.id())
    }

    /// Recompute `next_scene_ids` for every scene from the structural
    /// parent/child relation. A missing successor is an expected terminal
    /// condition at `max_depth`, recorded as `None`.
    pub fn link_scenes(&mut self) {
        let links: Vec<Vec<Option<SceneId>>> = self
            .scenes
            .iter()
            .map(|scene| {
                (0..scene.options().len())
                    .map(|choice_index| self.successor(scene.id(), choice_index))
                    .collect()
            })
            .collect();

        for (scene, next_ids) in self.scenes.iter_mut().zip(links) {
            scene.set_next_scene_ids(next_ids);
        }
    }
}
