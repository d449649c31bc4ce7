//! Choice-path keys - canonical identity for a scene's position in the tree.
//!
//! A scene is identified by the choices that led to it: a map from ancestor
//! scene id to the option index picked there. Two scenes are the same node of
//! the decision space iff those maps are equal, and the exporter derives its
//! jump labels from the same key.

use std::collections::BTreeMap;

use crate::ids::SceneId;

/// Canonical textual key for a `previous_choices` map.
///
/// Entries are concatenated in ascending ancestor-id order as
/// `c<ancestorId>_<choiceIndex>`, joined by underscores. An empty map yields
/// the empty string. The `BTreeMap` representation makes the ordering
/// independent of insertion order, which matters because the builder
/// constructs these maps via copy-then-insert.
pub fn choice_path_key(previous_choices: &BTreeMap<SceneId, usize>) -> String {
    previous_choices
        .iter()
        .map(|(ancestor_id, choice_index)| format!("c{}_{}", ancestor_id, choice_index))
        .collect::<Vec<_>>()
        .join("_")
}

/// Script label for a scene: `scene_<id>` for the root (empty map),
/// `scene_<id>_<key>` for everything else.
pub fn scene_label(id: SceneId, previous_choices: &BTreeMap<SceneId, usize>) -> String {
    let key = choice_path_key(previous_choices);
    if key.is_empty() {
        format!("scene_{}", id)
    } else {
        format!("scene_{}_{}", id, key)
    }
}
