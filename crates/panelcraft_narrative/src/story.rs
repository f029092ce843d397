//! The orchestrator's beat sequence and the part records behind it.

use derive_getters::Getters;
use panelcraft_core::{ContinuationContext, StoryBeat, StoryPart, StoryRequest};

/// A beat as stored by the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TimelineBeat {
    /// Caption and depiction
    beat: StoryBeat,
    /// Index of the part record that produced this beat
    part: usize,
    /// 1-based position within that part
    sequence_number: usize,
}

/// What is kept of each merged story part.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PartRecord {
    /// Outline the part was written from
    outline: String,
    /// Prose the beats were extracted from
    narrative: String,
}

/// Ordered beats plus the context needed to ask for more.
///
/// Beats are only ever removed from the tail, so every surviving part record
/// still owns at least one surviving beat.
#[derive(Debug, Default, Clone)]
pub struct StoryTimeline {
    beats: Vec<TimelineBeat>,
    parts: Vec<PartRecord>,
    foundation: Option<String>,
}

impl StoryTimeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of beats.
    pub fn len(&self) -> usize {
        self.beats.len()
    }

    /// True when no beats exist.
    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    /// Beat at `index`.
    pub fn get(&self, index: usize) -> Option<&TimelineBeat> {
        self.beats.get(index)
    }

    /// All beats in reading order.
    pub fn beats(&self) -> &[TimelineBeat] {
        &self.beats
    }

    /// Part records, indexed by [`TimelineBeat::part`].
    pub fn parts(&self) -> &[PartRecord] {
        &self.parts
    }

    /// Cached foundation of the first part.
    pub fn foundation(&self) -> Option<&str> {
        self.foundation.as_deref()
    }

    /// Append a story part's beats, stamping part index and sequence numbers.
    ///
    /// Caches the foundation when the part carries one. A part without beats
    /// leaves the timeline untouched. Returns the number of beats appended.
    pub fn append_part(&mut self, part: StoryPart) -> usize {
        let (foundation, outline, narrative, beats) = part.into_beats();
        if beats.is_empty() {
            return 0;
        }

        if let Some(foundation) = foundation.filter(|f| !f.trim().is_empty()) {
            self.foundation = Some(foundation);
        }

        let part = self.parts.len();
        self.parts.push(PartRecord { outline, narrative });

        let appended = beats.len();
        self.beats
            .extend(beats.into_iter().enumerate().map(|(i, beat)| TimelineBeat {
                beat,
                part,
                sequence_number: i + 1,
            }));
        appended
    }

    /// Keep beats `0..=index`, dropping everything after.
    ///
    /// Part records left without beats are dropped with them.
    pub fn truncate_after(&mut self, index: usize) {
        self.beats.truncate(index + 1);
        let surviving_parts = self.beats.last().map(|b| b.part + 1).unwrap_or(0);
        self.parts.truncate(surviving_parts);
    }

    /// Overwrite the caption at `index`. Returns false if there is no such beat.
    pub fn set_caption(&mut self, index: usize, caption: &str) -> bool {
        match self.beats.get_mut(index) {
            Some(entry) => {
                entry.beat.caption = caption.to_string();
                true
            }
            None => false,
        }
    }

    /// Drop beats, part records and the cached foundation.
    pub fn clear(&mut self) {
        self.beats.clear();
        self.parts.clear();
        self.foundation = None;
    }

    /// Captions of every surviving beat of the most recent part, one per line.
    pub fn recent_story(&self) -> String {
        let Some(last) = self.beats.last() else {
            return String::new();
        };
        let first = self.beats.len() - last.sequence_number;
        self.beats[first..]
            .iter()
            .map(|b| b.beat.caption.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Outlines of every surviving part, in order.
    pub fn history(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.outline.as_str())
            .filter(|o| !o.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// The request that extends this timeline.
    ///
    /// Start semantics with `premise` when empty, continue semantics otherwise.
    pub fn next_request(&self, premise: &str) -> StoryRequest {
        if self.is_empty() {
            StoryRequest::Start {
                premise: premise.to_string(),
            }
        } else {
            StoryRequest::Continue(ContinuationContext::new(
                self.foundation.clone().unwrap_or_default(),
                self.history(),
                self.recent_story(),
            ))
        }
    }
}
