//! Trait seams between the Panelcraft orchestrator and its generation backends.
//!
//! Two layers of traits live here:
//! - [`TextGenerator`] and [`ImageGenerator`] are implemented once per
//!   backend family (the generation adapters)
//! - [`StorySource`] and [`ImageSource`] are what the look-ahead orchestrator
//!   calls; the fetchers implement them by combining adapters with the proxy
//!   fallback, and tests implement them with scripted mocks

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{ImageGenerator, ImageSource, StorySource, TextGenerator};
