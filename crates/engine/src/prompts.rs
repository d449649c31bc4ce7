//! Prompt templates for the story-building LLM calls.
//!
//! Each builder step has one template function. Keeping them here (rather
//! than inline in the builder) keeps the wording reviewable in one place and
//! lets tests match on stable prefixes.

use taleweave_domain::Character;

/// Maximum length of a generated image prompt, in characters.
pub const IMAGE_PROMPT_MAX_CHARS: usize = 200;

fn cast_line(characters: &[Character]) -> String {
    characters
        .iter()
        .map(|c| {
            if c.description().is_empty() {
                c.name().to_string()
            } else {
                format!("{} ({})", c.name(), c.description())
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ask for the reader's choices in the current scene, newline-delimited.
pub fn options_prompt(
    characters: &[Character],
    context_summary: &str,
    min_options: usize,
    max_options: usize,
) -> String {
    format!(
        "Write the choices offered to the reader in the current scene.\n\
         Characters: {}.\n\
         Story so far: {}\n\
         Offer between {} and {} choices, one per line, with no numbering \
         and no commentary.",
        cast_line(characters),
        context_summary,
        min_options,
        max_options
    )
}

/// Ask for the scene's narrative, consistent with the already-decided choices.
pub fn narrative_prompt(
    characters: &[Character],
    context_summary: &str,
    options: &[String],
) -> String {
    format!(
        "Write the narrative for the current scene of an interactive story.\n\
         Characters: {}.\n\
         Story so far: {}\n\
         At the end of the scene the reader will choose between: {}.\n\
         Write two or three short paragraphs of prose leading naturally into \
         those choices. Do not list the choices themselves.",
        cast_line(characters),
        context_summary,
        options.join(" / ")
    )
}

/// Ask for a short visual description of the scene for the image generator.
pub fn image_summary_prompt(narrative: &str) -> String {
    format!(
        "Summarize the following scene as a visual description of at most \
         {} characters, suitable for an image generator. Reply with the \
         description only.\n\n{}",
        IMAGE_PROMPT_MAX_CHARS, narrative
    )
}

/// Ask for one closing sentence for a terminal choice.
pub fn ending_tale_prompt(context_summary: &str, option: &str) -> String {
    format!(
        "Write a single closing sentence for an interactive story that ends \
         when the reader chooses \"{}\".\n\
         Story so far: {}",
        option, context_summary
    )
}
