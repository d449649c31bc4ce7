//! Ren'Py script exporter.
//!
//! Walks a completed story graph and emits a self-contained label/jump
//! script: character and image declarations, one labeled block per scene
//! with its narrative and choice menu, and one ending label per terminal
//! choice position. Output is byte-for-byte deterministic for a fixed
//! graph: scenes and options are iterated in stored order, and ancestor
//! maps iterate sorted by scene id.

use taleweave_domain::{scene_label, Scene, StoryGraph};

/// Exports a story graph to Ren'Py script text.
pub struct RenpyExporter<'a> {
    graph: &'a StoryGraph,
}

impl<'a> RenpyExporter<'a> {
    pub fn new(graph: &'a StoryGraph) -> Self {
        Self { graph }
    }

    pub fn export(&self) -> String {
        let mut out = String::new();
        self.write_character_definitions(&mut out);
        self.write_image_definitions(&mut out);
        self.write_story(&mut out);
        self.write_endings(&mut out);
        out
    }

    fn write_character_definitions(&self, out: &mut String) {
        out.push_str("# Character definitions\n");
        out.push_str("init python:\n");
        out.push_str("    narrator = Character(None, kind=nvl)\n");
        for character in self.graph.characters() {
            out.push_str(&format!(
                "    {} = Character(\"{}\", kind=adv)\n",
                character.safe_name(),
                escape_text(character.name())
            ));
        }
        out.push('\n');
    }

    fn write_image_definitions(&self, out: &mut String) {
        out.push_str("# Image definitions\n");
        for character in self.graph.characters() {
            let safe_name = character.safe_name();
            out.push_str(&format!(
                "image {} = \"images/characters/{}.png\"\n",
                safe_name, safe_name
            ));
        }
        for scene in self.graph.scenes() {
            out.push_str(&format!(
                "image scene{} = \"images/scenes/scene{}.png\"\n",
                scene.id(),
                scene.id()
            ));
        }
        out.push('\n');
    }

    fn write_story(&self, out: &mut String) {
        out.push_str("# The story starts here\n");
        out.push_str("init python:\n");
        out.push_str("    previous_choices = {}\n");
        out.push('\n');
        out.push_str("label start:\n");
        out.push_str("    $ previous_choices = {}\n");
        out.push('\n');

        for scene in self.graph.scenes() {
            self.write_scene(out, scene);
        }
    }

    fn write_scene(&self, out: &mut String, scene: &Scene) {
        out.push_str(&format!("    # Scene {}\n", scene.id()));
        out.push_str(&format!("label {}:\n", scene.label()));

        // Bookkeeping reads of the run-time choice history. Jump targets are
        // resolved statically below; these just mirror the path for the
        // runtime.
        if !scene.previous_choices().is_empty() {
            out.push_str("    # Check previous choices context\n");
            for ancestor_id in scene.previous_choices().keys() {
                out.push_str(&format!(
                    "    $ choice_{} = previous_choices.get({}, -1)\n",
                    ancestor_id, ancestor_id
                ));
            }
        }

        out.push_str(&format!("    scene scene{}\n", scene.id()));
        out.push_str("    with fade\n");
        out.push('\n');

        self.write_narrative(out, scene);
        self.write_choices(out, scene);
    }

    fn write_narrative(&self, out: &mut String, scene: &Scene) {
        for unit in split_sentences(scene.narrative()) {
            out.push_str(&format!("    narrator \"{}\"\n", escape_text(&unit)));
            out.push_str("    nvl clear\n");
        }
        out.push('\n');
    }

    fn write_choices(&self, out: &mut String, scene: &Scene) {
        let is_deepest = scene.depth() == self.graph.max_depth();

        if !scene.options().is_empty() {
            out.push_str("    menu:\n");
            for (i, option) in scene.options().iter().enumerate() {
                out.push_str(&format!("        \"{}\":\n", escape_text(option)));

                let successor = scene
                    .next_scene_ids()
                    .get(i)
                    .copied()
                    .flatten()
                    .and_then(|id| self.graph.scene(id));

                match successor {
                    Some(next) => {
                        out.push_str(&format!(
                            "            $ previous_choices[{}] = {}\n",
                            scene.id(),
                            i
                        ));
                        out.push_str(&format!(
                            "            jump {}\n",
                            scene_label(next.id(), next.previous_choices())
                        ));
                    }
                    None if is_deepest => {
                        // Terminal choice: narrate its ending tale, then jump
                        // to the shared positional ending.
                        if let Some(tale) = scene.ending_tales().get(i) {
                            out.push_str(&format!(
                                "            narrator \"{}\"\n",
                                escape_text(tale)
                            ));
                        }
                        out.push_str(&format!("            jump end_{}\n", i + 1));
                    }
                    None => {
                        out.push_str(&format!(
                            "            jump scene_{}_default\n",
                            scene.id().value() + 1
                        ));
                    }
                }
            }
            out.push('\n');
        } else if !is_deepest {
            out.push_str(&format!(
                "    jump scene_{}_default\n",
                scene.id().value() + 1
            ));
            out.push('\n');
        } else {
            out.push_str("    jump end_1\n");
            out.push('\n');
        }
    }

    fn write_endings(&self, out: &mut String) {
        for n in 1..=self.ending_count() {
            out.push_str(&format!("label end_{}:\n", n));
            out.push_str(&format!(
                "    narrator \"You reached the end of your journey through choice {}.\"\n",
                n
            ));
            out.push_str("    return\n");
            out.push('\n');
        }
    }

    /// One ending per distinct terminal choice position: the widest option
    /// count observed on the deepest scenes, at least 1.
    fn ending_count(&self) -> usize {
        self.graph
            .scenes_at_depth(self.graph.max_depth())
            .map(|scene| scene.options().len())
            .max()
            .unwrap_or(1)
            .max(1)
    }
}

/// Escape text for a Ren'Py double-quoted string: backslashes and quotes are
/// escaped, newlines flatten to spaces, and square brackets are doubled so
/// they are not treated as interpolation markers.
fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "")
        .replace('\n', " ")
        .replace('[', "[[")
        .replace(']', "]]")
}

/// Split narrative text into sentence-level display units: a unit ends at
/// sentence-ending punctuation followed by whitespace (or end of text).
fn split_sentences(text: &str) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_none_or(|next| next.is_whitespace()) {
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
            let unit = current.trim();
            if !unit.is_empty() {
                units.push(unit.to_string());
            }
            current.clear();
        }
    }

    let unit = current.trim();
    if !unit.is_empty() {
        units.push(unit.to_string());
    }
    units
}
