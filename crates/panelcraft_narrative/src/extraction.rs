//! Utilities for extracting structured data from model responses.
//!
//! Responses often wrap JSON in markdown code fences or surround it with
//! explanatory text. These helpers find the document before parsing it.

use panelcraft_core::StoryBeat;
use panelcraft_error::{JsonError, PanelcraftResult};
use serde::Deserialize;

/// Extract JSON from a response that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. Markdown code blocks: ```json ... ```
/// 2. Balanced brackets or braces, whichever opens first
///
/// # Errors
///
/// Returns an error if no JSON is found in the response.
///
/// # Examples
///
/// ```
/// use panelcraft_narrative::extract_json;
///
/// let response = "Here are the panels:\n```json\n[{\"caption\": \"Dawn.\"}]\n```";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('['));
/// ```
pub fn extract_json(response: &str) -> PanelcraftResult<String> {
    if let Some(json) = extract_from_code_block(response, "json") {
        return Ok(json);
    }

    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');

    let order = match (bracket_pos, brace_pos) {
        (Some(b), Some(c)) if b < c => [('[', ']'), ('{', '}')],
        (Some(_), None) => [('[', ']'), ('[', ']')],
        _ => [('{', '}'), ('[', ']')],
    };

    for (open, close) in order {
        if let Some(json) = extract_balanced(response, open, close) {
            return Ok(json);
        }
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in model response"
    );

    Err(JsonError::new(format!(
        "No JSON found in response (length: {})",
        response.len()
    ))
    .into())
}

fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{}", language);

    if let Some(start) = response.find(&pattern) {
        let content_start = start + pattern.len();
        return Some(match response[content_start..].find("```") {
            Some(end) => response[content_start..content_start + end].trim().to_string(),
            // Truncated response: take everything after the fence
            None => response[content_start..].trim().to_string(),
        });
    }

    let start = response.find("```")?;
    let content_start = start + 3;
    let skip_to = response[content_start..]
        .find('\n')
        .map(|n| content_start + n + 1)
        .unwrap_or(content_start);

    Some(match response[skip_to..].find("```") {
        Some(end) => response[skip_to..skip_to + end].trim().to_string(),
        None => response[skip_to..].trim().to_string(),
    })
}

fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse JSON into a specific type.
///
/// # Errors
///
/// Returns an error if the JSON string cannot be parsed into type `T`.
pub fn parse_json<T>(json_str: &str) -> PanelcraftResult<T>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json_str).map_err(|e| {
        let preview = json_str.chars().take(100).collect::<String>();

        tracing::error!(
            error = %e,
            json_preview = %preview,
            "JSON parsing failed"
        );

        JsonError::new(format!("Failed to parse JSON: {} (JSON: {}...)", e, preview)).into()
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BeatsPayload {
    List(Vec<StoryBeat>),
    Wrapped {
        #[serde(alias = "events", alias = "beats")]
        story_beats: Vec<StoryBeat>,
    },
}

/// Parse story beats from a model response.
///
/// Accepts a bare array of beats or an object carrying them under
/// `story_beats`, `events` or `beats`, with or without surrounding prose.
///
/// # Examples
///
/// ```
/// use panelcraft_narrative::parse_beats;
///
/// let beats = parse_beats(r#"{"events": [{"caption": "Dawn.", "depiction": "a harbor at dawn"}]}"#).unwrap();
/// assert_eq!(beats[0].depiction, "a harbor at dawn");
/// ```
pub fn parse_beats(response: &str) -> PanelcraftResult<Vec<StoryBeat>> {
    let json = extract_json(response)?;
    let payload: BeatsPayload = parse_json(&json)?;
    Ok(match payload {
        BeatsPayload::List(beats) => beats,
        BeatsPayload::Wrapped { story_beats } => story_beats,
    })
}
