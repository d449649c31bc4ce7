//! Build story use case - grows the full branching scene tree.
//!
//! Construction is strictly sequential: one outstanding LLM request at a
//! time, in depth-then-sibling order. Background images are filled in later
//! by the fan-out phase; everything here is text.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use taleweave_domain::{
    Character, DomainError, Scene, SceneIdAllocator, StoryGraph,
};

use crate::infrastructure::ports::{LlmError, LlmPort};
use crate::prompts::{self, IMAGE_PROMPT_MAX_CHARS};

/// Option inserted when the collaborator returns no usable choices.
pub const FALLBACK_OPTION: &str = "Continue.";

/// Narrative inserted when the collaborator returns blank prose.
pub const FALLBACK_NARRATIVE: &str = "The story continues.";

/// Ending narration inserted when the collaborator returns a blank tale.
pub const FALLBACK_ENDING: &str = "And so the tale comes to an end.";

/// Most choices a single scene may offer.
const MAX_OPTIONS: usize = 4;

/// Request to build one story.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    pub characters: Vec<Character>,
    /// The premise of the story.
    pub premise: String,
    /// Additional context appended to the premise.
    #[serde(default)]
    pub context: String,
    /// Tree depth; terminal scenes sit at this level.
    pub max_depth: u32,
}

impl StoryRequest {
    fn general_context(&self) -> String {
        if self.context.is_empty() {
            self.premise.clone()
        } else {
            format!("{} with context: {}", self.premise, self.context)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("A story needs at least one character")]
    NoCharacters,
    #[error("Story depth must be at least 1")]
    InvalidDepth,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Grows the scene tree breadth-first to the requested depth.
///
/// LLM failures during options, narrative, or ending generation are fatal to
/// the whole build; a scene cannot exist without them. Failures during the
/// image-prompt summary degrade to an empty prompt instead.
pub struct StoryBuilder {
    llm: Arc<dyn LlmPort>,
}

impl StoryBuilder {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    pub async fn build(&self, request: StoryRequest) -> Result<StoryGraph, StoryError> {
        if request.characters.is_empty() {
            return Err(StoryError::NoCharacters);
        }
        if request.max_depth == 0 {
            return Err(StoryError::InvalidDepth);
        }

        let max_depth = request.max_depth;
        let general_context = request.general_context();
        tracing::info!(
            characters = request.characters.len(),
            max_depth,
            "Building story graph"
        );

        let mut allocator = SceneIdAllocator::new();
        let mut graph = StoryGraph::new(request.characters, general_context, max_depth);

        let root = self
            .create_scene(&graph, &mut allocator, 1, BTreeMap::new())
            .await?;
        graph.push_scene(root);

        for depth in 2..=max_depth {
            // Snapshot the child identity maps before mutating the graph.
            let child_maps: Vec<_> = graph
                .scenes_at_depth(depth - 1)
                .flat_map(|parent| {
                    (0..parent.options().len()).map(move |i| parent.child_choices(i))
                })
                .collect();

            for previous_choices in child_maps {
                let scene = self
                    .create_scene(&graph, &mut allocator, depth, previous_choices)
                    .await?;
                graph.push_scene(scene);
            }
        }

        graph.link_scenes();
        tracing::info!(scenes = graph.scenes().len(), "Story graph complete");
        Ok(graph)
    }

    async fn create_scene(
        &self,
        graph: &StoryGraph,
        allocator: &mut SceneIdAllocator,
        depth: u32,
        previous_choices: BTreeMap<taleweave_domain::SceneId, usize>,
    ) -> Result<Scene, StoryError> {
        let context_summary = context_summary(graph, &previous_choices);
        let is_terminal = depth == graph.max_depth();

        // Terminal scenes get the wider branching range; every option there
        // becomes an ending.
        let max_options = if is_terminal { 4 } else { 3 };
        let options_raw = self
            .llm
            .complete(&prompts::options_prompt(
                graph.characters(),
                &context_summary,
                2,
                max_options,
            ))
            .await?;
        let options = parse_options(&options_raw);

        let narrative_raw = self
            .llm
            .complete(&prompts::narrative_prompt(
                graph.characters(),
                &context_summary,
                &options,
            ))
            .await?;
        let narrative = non_blank_or(&narrative_raw, FALLBACK_NARRATIVE);

        // Image-prompt summarization is best-effort; the scene proceeds with
        // an empty prompt and the fan-out phase copes.
        let background_prompt = match self
            .llm
            .complete(&prompts::image_summary_prompt(&narrative))
            .await
        {
            Ok(summary) => truncate_chars(summary.trim(), IMAGE_PROMPT_MAX_CHARS),
            Err(e) => {
                tracing::warn!(depth, error = %e, "Image prompt summary failed, continuing without one");
                String::new()
            }
        };

        let mut ending_tales = Vec::new();
        if is_terminal {
            for option in &options {
                let tale_raw = self
                    .llm
                    .complete(&prompts::ending_tale_prompt(&context_summary, option))
                    .await?;
                ending_tales.push(non_blank_or(&tale_raw, FALLBACK_ENDING));
            }
        }

        let id = allocator.allocate();
        tracing::debug!(scene_id = %id, depth, options = options.len(), "Scene created");

        Ok(Scene::new(
            id,
            depth,
            graph.characters().to_vec(),
            narrative,
            options,
            previous_choices,
        )
        .with_background_prompt(background_prompt)
        .with_ending_tales(ending_tales))
    }
}

/// The premise plus, for each ancestor in path order, the choice made there.
fn context_summary(
    graph: &StoryGraph,
    previous_choices: &BTreeMap<taleweave_domain::SceneId, usize>,
) -> String {
    let mut summary = graph.general_context().to_string();
    for (ancestor_id, choice_index) in previous_choices {
        if let Some(choice) = graph
            .scene(*ancestor_id)
            .and_then(|scene| scene.options().get(*choice_index))
        {
            summary.push_str(&format!(" Then the reader chose: {}.", choice));
        }
    }
    summary
}

/// Newline-delimited choices: trimmed, blanks dropped, capped at 4, with a
/// single fallback option if nothing usable remains.
fn parse_options(raw: &str) -> Vec<String> {
    let options: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_OPTIONS)
        .map(str::to_string)
        .collect();

    if options.is_empty() {
        vec![FALLBACK_OPTION.to_string()]
    } else {
        options
    }
}

fn non_blank_or(raw: &str, fallback: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockLlmPort;
    use taleweave_domain::SceneId;

    fn cast() -> Vec<Character> {
        vec![Character::new("Mira", "a restless cartographer").unwrap()]
    }

    fn request(max_depth: u32) -> StoryRequest {
        StoryRequest {
            characters: cast(),
            premise: "a lighthouse keeper vanishes".into(),
            context: "a storm-wracked island".into(),
            max_depth,
        }
    }

    /// Scripted collaborator for the depth-2 scenario: the root offers two
    /// choices, terminal scenes offer one each.
    fn scripted_llm() -> MockLlmPort {
        let mut llm = MockLlmPort::new();
        llm.expect_complete().returning(|prompt| {
            if prompt.starts_with("Write the choices") {
                if prompt.contains("between 2 and 3") {
                    Ok("Search the cliffs\nQuestion the villagers".to_string())
                } else {
                    Ok("See it through".to_string())
                }
            } else if prompt.starts_with("Write the narrative") {
                Ok("The lamp is dark. The village waits.".to_string())
            } else if prompt.starts_with("Summarize") {
                Ok("a dark lighthouse over a stormy sea".to_string())
            } else {
                Ok("The keeper's fate is finally known.".to_string())
            }
        });
        llm
    }

    #[tokio::test]
    async fn depth_two_round_trip_builds_three_scenes() {
        let builder = StoryBuilder::new(Arc::new(scripted_llm()));
        let graph = builder.build(request(2)).await.unwrap();

        assert_eq!(graph.scenes().len(), 3);

        let root = graph.scene(SceneId::from_raw(1)).unwrap();
        assert_eq!(root.depth(), 1);
        assert!(root.is_root());
        assert_eq!(root.options().len(), 2);
        assert_eq!(
            root.next_scene_ids(),
            &[Some(SceneId::from_raw(2)), Some(SceneId::from_raw(3))]
        );

        // Each depth-2 scene carries exactly {rootId: i} as its identity.
        for (id, expected_choice) in [(2, 0usize), (3, 1usize)] {
            let scene = graph.scene(SceneId::from_raw(id)).unwrap();
            assert_eq!(scene.depth(), 2);
            assert_eq!(scene.previous_choices().len(), 1);
            assert_eq!(
                scene.previous_choices().get(&SceneId::from_raw(1)),
                Some(&expected_choice)
            );
            assert_eq!(scene.options().len(), 1);
            assert_eq!(scene.next_scene_ids(), &[None]);
            assert_eq!(scene.ending_tales().len(), 1);
        }
    }

    #[tokio::test]
    async fn non_terminal_scenes_have_no_ending_tales() {
        let builder = StoryBuilder::new(Arc::new(scripted_llm()));
        let graph = builder.build(request(2)).await.unwrap();

        assert!(graph
            .scene(SceneId::from_raw(1))
            .unwrap()
            .ending_tales()
            .is_empty());
    }

    #[tokio::test]
    async fn narrative_failure_is_fatal() {
        let mut llm = MockLlmPort::new();
        llm.expect_complete().returning(|prompt| {
            if prompt.starts_with("Write the narrative") {
                Err(LlmError::RequestFailed("connection refused".into()))
            } else {
                Ok("Search the cliffs\nQuestion the villagers".to_string())
            }
        });

        let builder = StoryBuilder::new(Arc::new(llm));
        let result = builder.build(request(2)).await;

        assert!(matches!(result, Err(StoryError::Llm(_))));
    }

    #[tokio::test]
    async fn image_summary_failure_degrades_to_empty_prompt() {
        let mut llm = MockLlmPort::new();
        llm.expect_complete().returning(|prompt| {
            if prompt.starts_with("Summarize") {
                Err(LlmError::RequestFailed("timeout".into()))
            } else if prompt.starts_with("Write the choices") {
                Ok("Press on".to_string())
            } else {
                Ok("A quiet scene.".to_string())
            }
        });

        let builder = StoryBuilder::new(Arc::new(llm));
        let graph = builder.build(request(1)).await.unwrap();

        let root = graph.scenes().first().unwrap();
        assert_eq!(root.background_prompt(), "");
        assert_eq!(root.narrative(), "A quiet scene.");
    }

    #[tokio::test]
    async fn blank_options_fall_back_to_continue_sentinel() {
        let mut llm = MockLlmPort::new();
        llm.expect_complete().returning(|prompt| {
            if prompt.starts_with("Write the choices") {
                Ok("\n   \n".to_string())
            } else {
                Ok("A quiet scene.".to_string())
            }
        });

        let builder = StoryBuilder::new(Arc::new(llm));
        let graph = builder.build(request(1)).await.unwrap();

        assert_eq!(graph.scenes()[0].options(), &[FALLBACK_OPTION.to_string()]);
    }

    #[tokio::test]
    async fn zero_characters_is_a_fatal_precondition() {
        let builder = StoryBuilder::new(Arc::new(MockLlmPort::new()));
        let result = builder
            .build(StoryRequest {
                characters: Vec::new(),
                premise: "anything".into(),
                context: String::new(),
                max_depth: 2,
            })
            .await;

        assert!(matches!(result, Err(StoryError::NoCharacters)));
    }

    #[test]
    fn parse_options_trims_drops_blanks_and_caps_at_four() {
        let parsed = parse_options("  one \n\n two\nthree\nfour\nfive\n");
        assert_eq!(parsed, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let truncated = truncate_chars("héllo wörld", 7);
        assert_eq!(truncated, "héllo w");
    }
}
