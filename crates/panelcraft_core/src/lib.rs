//! Core data structures for the Panelcraft comic generator.
//!
//! This crate holds the types every other Panelcraft crate speaks:
//! - [`StoryBeat`] and [`StoryPart`], the story model
//! - [`StoryRequest`], what a continuation fetch is asked to produce
//! - [`ServiceSelection`] and [`GenerationSettings`], the reader's provider choices
//! - [`ComicConfig`], the layered configuration
//! - proxy wire bodies shared by the proxy client and server

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod image;
mod selection;
mod story;
mod telemetry;
mod wire;

pub use config::{
    ComicConfig, EndpointConfig, FallbackConfig, HorizonConfig, HorizonConfigBuilder,
    ImageConfig, ProxyConfig,
};
pub use image::GeneratedImage;
pub use selection::{GenerationSettings, ServiceSelection};
pub use story::{ContinuationContext, StoryBeat, StoryPart, StoryRequest};
pub use telemetry::init_console_tracing;
pub use wire::{
    ErrorBody, ImageRequestBody, ImageResponseBody, ImagesRequestBody, ImagesResponseBody,
    StoryContinuationBody, StoryPromptBody, StoryStartBody,
};
