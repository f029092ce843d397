//! Trait definitions for generation backends and fetchers.

use async_trait::async_trait;
use panelcraft_core::{GeneratedImage, ServiceSelection, StoryPart, StoryRequest};
use panelcraft_error::PanelcraftResult;

/// A text generation backend bound to one model and credential.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate free-form text for a prompt.
    async fn generate_text(&self, prompt: &str) -> PanelcraftResult<String>;

    /// Generate a JSON document constrained by a response schema.
    ///
    /// Returns the raw response text. Backends without a native JSON mode may
    /// ignore the schema, so callers should extract the document before parsing.
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> PanelcraftResult<String>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.5-flash").
    fn model_name(&self) -> &str;
}

/// An image generation backend bound to one model and credential.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image for a fully styled prompt.
    async fn generate_image(&self, prompt: &str) -> PanelcraftResult<GeneratedImage>;

    /// Provider name (e.g., "tensoropera").
    fn provider_name(&self) -> &'static str;

    /// Model identifier.
    fn model_name(&self) -> &str;
}

/// Produces story parts for the orchestrator.
#[async_trait]
pub trait StorySource: Send + Sync {
    /// Fetch the next story part for a start or continuation request.
    async fn fetch_story(
        &self,
        selection: &ServiceSelection,
        request: &StoryRequest,
    ) -> PanelcraftResult<StoryPart>;
}

/// Produces base64 image payloads for the orchestrator.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch an image for a styled prompt, returned as base64.
    ///
    /// Implementations never return a URL; remote results are downloaded first.
    async fn fetch_image(
        &self,
        selection: &ServiceSelection,
        prompt: &str,
    ) -> PanelcraftResult<String>;
}
