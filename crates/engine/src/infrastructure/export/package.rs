//! On-disk packaging of a finished story.
//!
//! Writes the directory layout the exported script references:
//!
//! ```text
//! <base>/script.rpy
//! <base>/story.json
//! <base>/images/characters/<safe-name>.png
//! <base>/images/scenes/scene<id>.png
//! ```

use std::fs;
use std::path::Path;

use taleweave_domain::StoryGraph;

use super::ExportError;

/// Write the script, the graph serialization, and all non-empty image
/// assets under `base_dir`.
pub fn save_story(graph: &StoryGraph, script: &str, base_dir: &Path) -> Result<(), ExportError> {
    let characters_dir = base_dir.join("images").join("characters");
    let scenes_dir = base_dir.join("images").join("scenes");
    fs::create_dir_all(&characters_dir)?;
    fs::create_dir_all(&scenes_dir)?;

    for character in graph.characters() {
        if !character.portrait().is_empty() {
            let path = characters_dir.join(format!("{}.png", character.safe_name()));
            fs::write(&path, character.portrait())?;
        }
    }

    for scene in graph.scenes() {
        if !scene.background_image().is_empty() {
            let path = scenes_dir.join(format!("scene{}.png", scene.id()));
            fs::write(&path, scene.background_image())?;
        }
    }

    fs::write(base_dir.join("script.rpy"), script)?;

    let json = serde_json::to_string_pretty(graph)
        .map_err(|e| ExportError::Serialization(e.to_string()))?;
    fs::write(base_dir.join("story.json"), json)?;

    tracing::info!(path = %base_dir.display(), scenes = graph.scenes().len(), "Story saved");
    Ok(())
}
