//! JSON bodies spoken between the fallback client and the generation proxy.

use serde::{Deserialize, Serialize};

/// `POST /api/generate_story_start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryStartBody {
    /// Service identifier
    pub service: String,
    /// Client credential or pool token
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// The reader's premise
    pub user_input: String,
}

/// `POST /api/generate_story_continuation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryContinuationBody {
    /// Service identifier
    pub service: String,
    /// Client credential or pool token
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Foundation of the first part
    pub foundation: String,
    /// Outlines of the surviving parts
    pub history: String,
    /// Captions of the most recent part
    pub recent_story: String,
}

/// `POST /api/generate_story`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPromptBody {
    /// Service identifier
    pub service: String,
    /// Client credential or pool token
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Complete prompt for a single JSON-mode call
    pub prompt: String,
}

/// `POST /api/generate_image`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequestBody {
    /// Service identifier
    pub service: String,
    /// Client credential or pool token
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Styled image prompt
    pub prompt: String,
}

/// Image endpoint response.
///
/// # Examples
///
/// ```
/// use panelcraft_core::ImageResponseBody;
///
/// let body: ImageResponseBody = serde_json::from_str(r#"{"url": "https://cdn/x.png"}"#).unwrap();
/// assert_eq!(body, ImageResponseBody::Url { url: "https://cdn/x.png".into() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageResponseBody {
    /// Inline base64 payload
    Image {
        /// Base64 image data
        image: String,
    },
    /// Location to download from
    Url {
        /// Remote image URL
        url: String,
    },
}

/// `POST /api/generate_images`
///
/// Service and model default to the pooled TensorOpera Flux model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesRequestBody {
    /// Service identifier
    #[serde(default = "default_batch_service")]
    pub service: String,
    /// Client credential or pool token
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    /// Model identifier
    #[serde(default = "default_batch_model")]
    pub model: String,
    /// Styled image prompts, answered in order
    pub depictions: Vec<String>,
}

fn default_batch_service() -> String {
    "TensorOpera".to_string()
}

fn default_batch_model() -> String {
    "Flux/Dev".to_string()
}

/// Batch image response, one entry per depiction in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesResponseBody {
    /// Generated images
    pub images: Vec<ImageResponseBody>,
}

/// Error body returned by every proxy route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}
