//! Prompt assembly.
//!
//! Every function here is pure: same inputs, same text. User-supplied and
//! generated text is embedded as a JSON string literal so quotes and
//! newlines cannot break the surrounding instructions.

use panelcraft_core::ContinuationContext;

fn quoted(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// World, characters and conflict for a new story.
///
/// `ideas` and `names` are inspiration seeds the model may weave in.
pub fn foundation_prompt(premise: &str, ideas: &[&str], names: &[&str]) -> String {
    format!(
        r#"You are a world-builder preparing the groundwork for a new illustrated story.

Read the premise and the inspiration seeds below, then lay out the world, its cast and the conflict that will carry the plot.

Requirements:
* Build the world around the premise; borrow from the idea seeds where they fit.
* Give every character a motivation that ties back to the central conflict.
* Prefer concrete, visual details over abstractions.
* Name characters and places using the name seeds.

Premise:
{premise}

Idea seeds:
{ideas}

Name seeds:
{names}

Answer in three sections.

1. World: era and technology, one named country, how magic (if any) works and what limits it, and one important town.
2. Characters: appearance, core motivation and manner for each.
3. Conflict: the central threat in one sentence, followed by a few smaller conflicts facing the protagonist.
"#,
        premise = quoted(premise),
        ideas = quoted(&ideas.join("; ")),
        names = quoted(&names.join(", ")),
    )
}

/// Outline of the opening section.
pub fn outline_start_prompt(premise: &str, foundation: &str) -> String {
    format!(
        r#"You are a story editor planning the opening of a story.

The opening must hook the reader, introduce the protagonist and set the central conflict in motion.
Stay in a close third-person perspective. Reuse characters from the foundation instead of inventing new named ones.

Premise:
{premise}

Foundation:
{foundation}

Write the opening outline as 10 bullet points.
"#,
        premise = quoted(premise),
        foundation = quoted(foundation),
    )
}

/// Prose for the opening section, written from its outline.
pub fn story_start_prompt(outline: &str, foundation: &str) -> String {
    format!(
        r#"You are a novelist writing the opening of a story strictly from the outline below.

Show events through action, dialogue and sensory detail. Establish the mood in the first paragraph.
Stay in a close third-person perspective and control the pacing to build suspense.

Outline:
{outline}

Foundation:
{foundation}

Write the opening in about 4000 words.
"#,
        outline = quoted(outline),
        foundation = quoted(foundation),
    )
}

/// Outline of the next section of a story in progress.
pub fn outline_continuation_prompt(context: &ContinuationContext) -> String {
    format!(
        r#"You are a story editor planning the next section of a story in progress.

The next events must follow believably from what already happened, raise the stakes, test the protagonist and stay consistent with the world.

Foundation:
{foundation}

Outline history:
{history}

Most recent panels (the last line is where the story currently stands):
{recent}

Write the next outline as 10 bullet points that pick up right after the most recent panels.
"#,
        foundation = quoted(context.foundation()),
        history = quoted(context.history()),
        recent = quoted(context.recent_story()),
    )
}

/// Prose for the next section, written from its outline.
pub fn story_continuation_prompt(context: &ContinuationContext, outline: &str) -> String {
    format!(
        r#"You are a novelist continuing a story exactly where it stopped.

Your first sentence follows directly from the last recent panel, with no recap.
Keep the established voice, tone and characterization. Follow the new outline.

Foundation:
{foundation}

Outline history:
{history}

Most recent panels:
{recent}

New outline:
{outline}

Continue the story in about 4000 words.
"#,
        foundation = quoted(context.foundation()),
        history = quoted(context.history()),
        recent = quoted(context.recent_story()),
        outline = quoted(outline),
    )
}

/// Break prose into comic panels, answered as a JSON array of beats.
pub fn beat_extraction_prompt(history: &str, story: &str, foundation: &str) -> String {
    format!(
        r#"You turn narrative prose into a panel-by-panel comic script.

Walk through the story text in order and split it into small, sequential panels.
Each panel has a caption (narration or a thought, about 30 words) and a depiction:
a detailed English prompt for an image model covering people, clothing, setting, lighting, weather, composition and mood.
Use the foundation for character appearance and the outline history to pick the important moments.

Outline history:
{history}

Foundation:
{foundation}

Story text:
{story}

Answer with a JSON array of objects with "caption" and "depiction" fields.
"#,
        history = quoted(history),
        foundation = quoted(foundation),
        story = quoted(story),
    )
}

/// Image prompt: the style prefix immediately followed by the depiction.
///
/// # Examples
///
/// ```
/// use panelcraft_narrative::image_prompt;
///
/// assert_eq!(
///     image_prompt("Ink wash, muted colors. ", "a red boat at sunset"),
///     "Ink wash, muted colors. a red boat at sunset"
/// );
/// ```
pub fn image_prompt(style: &str, depiction: &str) -> String {
    format!("{}{}", style, depiction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premise_is_escaped() {
        let prompt = foundation_prompt("a \"quiet\" keeper\nalone", &["tides"], &["Ada"]);
        assert!(prompt.contains(r#""a \"quiet\" keeper\nalone""#));
        assert!(prompt.contains("\"tides\""));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let context = ContinuationContext::new("world", "outline one", "The lamp went dark.");
        assert_eq!(
            story_continuation_prompt(&context, "next"),
            story_continuation_prompt(&context, "next")
        );
        assert!(outline_continuation_prompt(&context).contains("The lamp went dark."));
    }

    #[test]
    fn test_image_prompt_has_no_separator() {
        assert_eq!(image_prompt("", "a harbor"), "a harbor");
        assert_eq!(image_prompt("noir,", "a harbor"), "noir,a harbor");
    }
}
