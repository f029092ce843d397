//! Panelcraft - endless AI-written comics.
//!
//! A reader advances one panel at a time while Panelcraft writes the story
//! ahead of them and paints the next few panels in the background. Editing a
//! caption branches the story from that panel.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use panelcraft::{
//!     ComicConfig, ContinuationFetcher, GenerationSettings, ImageFetcher,
//!     LookAheadOrchestrator, ServiceSelection,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ComicConfig::load()?;
//!     let orchestrator = LookAheadOrchestrator::new(
//!         Arc::new(ContinuationFetcher::from_config(&config)),
//!         Arc::new(ImageFetcher::from_config(&config)),
//!         *config.horizons(),
//!     );
//!     let settings = GenerationSettings::new(
//!         ServiceSelection::new("Google AI Studio", "gemini-2.5-flash", ""),
//!         ServiceSelection::new("TensorOpera", "Flux/Dev", ""),
//!         "Watercolor comic panel. ",
//!     );
//!
//!     let panel = orchestrator.advance(&settings, "a lighthouse keeper").await?;
//!     println!("{}", panel.beat().caption);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `panelcraft_core` - story, selection, configuration and wire types
//! - `panelcraft_error` - error types
//! - `panelcraft_interface` - generator and fetcher traits
//! - `panelcraft_models` - Gemini, TensorOpera, Together AI and proxy clients
//! - `panelcraft_cache` - per-depiction image cache
//! - `panelcraft_narrative` - story pipeline, fetchers and the orchestrator
//! - `panelcraft_server` - the generation proxy (`panelcraft-proxy` binary)
//!
//! This crate re-exports the reader-facing parts.

mod render;

pub use panelcraft_cache::{CacheSummary, ImageCache, ImageState};
pub use panelcraft_core::*;
pub use panelcraft_error::*;
pub use panelcraft_interface::*;
pub use panelcraft_models::{ProviderRegistry, ProxyClient, ServiceKind};
pub use panelcraft_narrative::{
    ContinuationFetcher, ImageFetcher, LookAheadOrchestrator, Panel, StoryPipeline,
    prefetch_window,
};
pub use render::{decode_image, image_extension, panel_file_name, status_line};
