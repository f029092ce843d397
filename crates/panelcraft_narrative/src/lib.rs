//! Story generation and look-ahead orchestration for Panelcraft.
//!
//! This crate turns generation adapters into an endless comic:
//!
//! - **Prompt assembly** ([`foundation_prompt`], [`image_prompt`], ...): pure templating
//! - **Story pipeline** ([`StoryPipeline`]): foundation, outline, prose and
//!   beat extraction stages against one text generator
//! - **Fetchers** ([`ContinuationFetcher`], [`ImageFetcher`]): the pipeline or
//!   image adapters with a proxy fallback
//! - **Orchestrator** ([`LookAheadOrchestrator`]): cursor, beats, image cache,
//!   branching and prefetch horizons

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod continuation;
mod extraction;
mod images;
mod orchestrator;
mod pipeline;
mod prompts;
mod schema;
mod seeds;
mod story;

pub use continuation::ContinuationFetcher;
pub use extraction::{extract_json, parse_beats, parse_json};
pub use images::ImageFetcher;
pub use orchestrator::{LookAheadOrchestrator, Panel, prefetch_window};
pub use pipeline::{SEED_COUNT, StoryPipeline};
pub use prompts::{
    beat_extraction_prompt, foundation_prompt, image_prompt, outline_continuation_prompt,
    outline_start_prompt, story_continuation_prompt, story_start_prompt,
};
pub use schema::{beats_schema, story_part_schema};
pub use seeds::Seeds;
pub use story::{PartRecord, StoryTimeline, TimelineBeat};
