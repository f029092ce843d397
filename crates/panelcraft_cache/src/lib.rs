//! Image cache keyed by scene description.
//!
//! The look-ahead orchestrator uses this cache to deduplicate image requests:
//! a depiction is claimed (Absent to Pending) before its fetch is issued, so
//! two panels that share a depiction, or two overlapping prefetch passes,
//! produce a single request.

#![warn(missing_docs)]

mod cache;

pub use cache::{CacheSummary, ImageCache, ImageState};
