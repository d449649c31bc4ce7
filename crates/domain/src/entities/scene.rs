//! Scene entity - one node of the branching narrative tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::choice_path::scene_label;
use crate::entities::Character;
use crate::ids::SceneId;

/// One node of the narrative tree.
///
/// A scene's position in the tree is fully described by `previous_choices`:
/// the option index chosen at each ancestor on the path from the root. The
/// builder guarantees the map of a child is exactly its parent's map plus one
/// entry keyed by the parent's id, so no two scenes ever share a map (the
/// tree never remerges).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    id: SceneId,
    /// 1-based tree level; root scenes are depth 1.
    depth: u32,
    /// Characters present, copied by value at creation to avoid aliasing
    /// across scenes.
    characters: Vec<Character>,
    narrative: String,
    /// 1-4 choices offered to the reader. Never empty.
    options: Vec<String>,
    /// Ancestor scene id -> option index chosen there. Scene identity.
    previous_choices: BTreeMap<SceneId, usize>,
    /// Parallel to `options`; `None` means the choice leads to an ending.
    next_scene_ids: Vec<Option<SceneId>>,
    background_prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    background_image: Vec<u8>,
    /// One closing narration per option, populated only on terminal scenes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ending_tales: Vec<String>,
}

impl Scene {
    pub fn new(
        id: SceneId,
        depth: u32,
        characters: Vec<Character>,
        narrative: String,
        options: Vec<String>,
        previous_choices: BTreeMap<SceneId, usize>,
    ) -> Self {
        Self {
            id,
            depth,
            characters,
            narrative,
            options,
            previous_choices,
            next_scene_ids: Vec::new(),
            background_prompt: String::new(),
            background_image: Vec::new(),
            ending_tales: Vec::new(),
        }
    }

    // Read-only accessors

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn previous_choices(&self) -> &BTreeMap<SceneId, usize> {
        &self.previous_choices
    }

    pub fn next_scene_ids(&self) -> &[Option<SceneId>] {
        &self.next_scene_ids
    }

    pub fn background_prompt(&self) -> &str {
        &self.background_prompt
    }

    pub fn background_image(&self) -> &[u8] {
        &self.background_image
    }

    pub fn ending_tales(&self) -> &[String] {
        &self.ending_tales
    }

    pub fn is_root(&self) -> bool {
        self.previous_choices.is_empty()
    }

    /// Script label derived from the choice-path key.
    pub fn label(&self) -> String {
        scene_label(self.id, &self.previous_choices)
    }

    /// The `previous_choices` map a child reached through `choice_index`
    /// must carry: this scene's map plus one entry keyed by this scene's id.
    pub fn child_choices(&self, choice_index: usize) -> BTreeMap<SceneId, usize> {
        let mut choices = self.previous_choices.clone();
        choices.insert(self.id, choice_index);
        choices
    }

    // Builder methods

    pub fn with_background_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.background_prompt = prompt.into();
        self
    }

    pub fn with_ending_tales(mut self, tales: Vec<String>) -> Self {
        self.ending_tales = tales;
        self
    }

    // Mutators used by the linking and fan-out phases

    pub fn set_next_scene_ids(&mut self, next_scene_ids: Vec<Option<SceneId>>) {
        self.next_scene_ids = next_scene_ids;
    }

    pub fn set_background_image(&mut self, image: Vec<u8>) {
        self.background_image = image;
    }
}
