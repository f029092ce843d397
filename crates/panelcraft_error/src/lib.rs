//! Error types for the Panelcraft comic generator.
//!
//! This crate provides the foundation error types used throughout the Panelcraft workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use panelcraft_error::{GenerationError, GenerationErrorKind, PanelcraftResult};
//!
//! fn next_panel() -> PanelcraftResult<String> {
//!     Err(GenerationError::new(GenerationErrorKind::EmptyGenerationResult))?
//! }
//!
//! let err = next_panel().unwrap_err();
//! assert_eq!(
//!     err.generation_kind(),
//!     Some(&GenerationErrorKind::EmptyGenerationResult)
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod json;
mod provider;
mod server;

pub use config::ConfigError;
pub use error::{PanelcraftError, PanelcraftErrorKind, PanelcraftResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use json::JsonError;
pub use provider::{ProviderError, ProviderErrorKind};
pub use server::{ServerError, ServerErrorKind};
