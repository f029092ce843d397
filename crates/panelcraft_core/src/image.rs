//! Image generation results.

use serde::{Deserialize, Serialize};

/// What an image backend handed back.
///
/// Some backends return the picture inline, others return a URL that has to
/// be downloaded before it is usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratedImage {
    /// Inline base64 payload
    Base64(String),
    /// Remote location of the generated file
    Url(String),
}
