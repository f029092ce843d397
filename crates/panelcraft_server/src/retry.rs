//! Text generator that retries failed stages with the pooled fallback model.

use async_trait::async_trait;
use panelcraft_error::{PanelcraftError, PanelcraftResult};
use panelcraft_interface::TextGenerator;
use panelcraft_models::{GenerationMetrics, classify_error};
use tracing::warn;

/// Wraps the requested generator with an optional second attempt.
///
/// Every call that fails on the requested model is retried once on the
/// fallback generator, which runs the configured fallback model with the
/// pooled credential.
pub struct ModelFallbackGenerator {
    primary: Box<dyn TextGenerator>,
    fallback: Option<Box<dyn TextGenerator>>,
}

impl ModelFallbackGenerator {
    /// Create a generator; `fallback` of None disables the retry.
    pub fn new(primary: Box<dyn TextGenerator>, fallback: Option<Box<dyn TextGenerator>>) -> Self {
        Self { primary, fallback }
    }

    fn fallback_for(
        &self,
        error: &PanelcraftError,
    ) -> Option<&dyn TextGenerator> {
        let fallback = self.fallback.as_deref()?;
        warn!(
            error = %error,
            model = self.primary.model_name(),
            fallback_model = fallback.model_name(),
            "Text stage failed, retrying with fallback model"
        );
        GenerationMetrics::get().record_fallback("proxy_text", classify_error(error));
        Some(fallback)
    }
}

#[async_trait]
impl TextGenerator for ModelFallbackGenerator {
    async fn generate_text(&self, prompt: &str) -> PanelcraftResult<String> {
        match self.primary.generate_text(prompt).await {
            Ok(text) => Ok(text),
            Err(e) => match self.fallback_for(&e) {
                Some(fallback) => fallback.generate_text(prompt).await,
                None => Err(e),
            },
        }
    }

    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> PanelcraftResult<String> {
        match self.primary.generate_json(prompt, schema).await {
            Ok(text) => Ok(text),
            Err(e) => match self.fallback_for(&e) {
                Some(fallback) => fallback.generate_json(prompt, schema).await,
                None => Err(e),
            },
        }
    }

    fn provider_name(&self) -> &'static str {
        self.primary.provider_name()
    }

    fn model_name(&self) -> &str {
        self.primary.model_name()
    }
}
