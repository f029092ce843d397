//! Story beats, story parts and the requests that produce them.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One comic panel: a caption and the scene description used to illustrate it.
///
/// # Examples
///
/// ```
/// use panelcraft_core::StoryBeat;
///
/// let beat = StoryBeat::new("The lamp flickers.", "a lighthouse at night, storm clouds");
/// assert_eq!(beat.caption, "The lamp flickers.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryBeat {
    /// Narrator box or thought bubble text
    pub caption: String,
    /// Scene description; doubles as the image cache key
    pub depiction: String,
}

impl StoryBeat {
    /// Create a beat from caption and depiction text.
    pub fn new(caption: impl Into<String>, depiction: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            depiction: depiction.into(),
        }
    }
}

/// The structured result of one continuation request.
///
/// Serialized with the field names the generation proxy speaks: `story` for
/// the narrative prose and `story_beats` for the beats (`events` is accepted
/// when reading).
///
/// # Examples
///
/// ```
/// use panelcraft_core::StoryPart;
///
/// let part: StoryPart = serde_json::from_str(r#"{
///     "foundation": "A drowned coast.",
///     "outline": "1. The keeper wakes.",
///     "story": "The keeper woke to silence.",
///     "story_beats": [{"caption": "Silence.", "depiction": "an empty lamp room"}]
/// }"#).unwrap();
///
/// assert_eq!(part.foundation().as_deref(), Some("A drowned coast."));
/// assert_eq!(part.beats().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct StoryPart {
    /// World, character and conflict bootstrap text (first part only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    foundation: Option<String>,
    /// Plot outline this part was written from
    #[serde(default)]
    outline: String,
    /// Prose the beats were extracted from
    #[serde(rename = "story", alias = "narrative", default)]
    narrative: String,
    /// Panels in reading order
    #[serde(rename = "story_beats", alias = "events", alias = "beats", default)]
    beats: Vec<StoryBeat>,
}

impl StoryPart {
    /// Assemble a story part.
    pub fn new(
        foundation: Option<String>,
        outline: impl Into<String>,
        narrative: impl Into<String>,
        beats: Vec<StoryBeat>,
    ) -> Self {
        Self {
            foundation,
            outline: outline.into(),
            narrative: narrative.into(),
            beats,
        }
    }

    /// Split into the part's context and its beats.
    pub fn into_beats(self) -> (Option<String>, String, String, Vec<StoryBeat>) {
        (self.foundation, self.outline, self.narrative, self.beats)
    }
}

/// Story context threaded into a continuation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ContinuationContext {
    /// Foundation produced by the first part
    foundation: String,
    /// Outlines of every part that still has surviving beats
    history: String,
    /// Captions of the most recent part's surviving beats
    recent_story: String,
}

impl ContinuationContext {
    /// Create a continuation context.
    pub fn new(
        foundation: impl Into<String>,
        history: impl Into<String>,
        recent_story: impl Into<String>,
    ) -> Self {
        Self {
            foundation: foundation.into(),
            history: history.into(),
            recent_story: recent_story.into(),
        }
    }
}

/// What the continuation fetcher is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StoryRequest {
    /// Bootstrap a new story from a free-form premise
    #[display("start")]
    Start {
        /// The reader's premise
        premise: String,
    },
    /// Continue an existing story
    #[display("continue")]
    Continue(ContinuationContext),
}
