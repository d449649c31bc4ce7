//! Character entity - a named member of the story's cast.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A character appearing in the story.
///
/// The description is free text fed into generation prompts. The portrait is
/// optional image bytes; when present it is written alongside the exported
/// script under `images/characters/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    portrait: Vec<u8>,
}

impl Character {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("Character name cannot be empty"));
        }
        Ok(Self {
            name,
            description: description.into(),
            portrait: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn portrait(&self) -> &[u8] {
        &self.portrait
    }

    /// Lowercased, underscore-separated name used for script identifiers
    /// and asset file names.
    pub fn safe_name(&self) -> String {
        self.name.to_lowercase().replace(' ', "_")
    }

    pub fn with_portrait(mut self, portrait: Vec<u8>) -> Self {
        self.portrait = portrait;
        self
    }
}
