//! Service name resolution and adapter construction.

use crate::{GeminiClient, TensorOperaClient, TogetherAiClient};
use derive_getters::Getters;
use panelcraft_core::{ComicConfig, EndpointConfig, ImageConfig, ServiceSelection};
use panelcraft_error::{PanelcraftResult, ProviderError, ProviderErrorKind};
use panelcraft_interface::{ImageGenerator, TextGenerator};
use reqwest::Client;
use std::str::FromStr;
use tracing::debug;

/// Backend families the adapters cover.
///
/// Parses the display names the presentation layer sends, plus short aliases.
///
/// # Examples
///
/// ```
/// use panelcraft_models::ServiceKind;
///
/// let kind: ServiceKind = "Google AI Studio".parse().unwrap();
/// assert_eq!(kind, ServiceKind::GoogleAiStudio);
/// assert_eq!(kind.to_string(), "Google AI Studio");
/// assert!("Midjourney".parse::<ServiceKind>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ServiceKind {
    /// Gemini text, JSON and image generation
    #[strum(to_string = "Google AI Studio", serialize = "gemini")]
    GoogleAiStudio,
    /// TensorOpera image generation
    #[strum(to_string = "TensorOpera", serialize = "tensoropera")]
    TensorOpera,
    /// Together AI image generation
    #[strum(to_string = "Together AI", serialize = "together")]
    TogetherAi,
}

impl ServiceKind {
    /// True when the service can write story text.
    pub fn supports_text(&self) -> bool {
        matches!(self, ServiceKind::GoogleAiStudio)
    }

    /// Environment variable holding the pooled credential for this service.
    pub fn pooled_key_var(&self) -> &'static str {
        match self {
            ServiceKind::GoogleAiStudio => "GEMINI_API_KEY",
            ServiceKind::TensorOpera => "TENSOR_OPERA_API_KEY",
            ServiceKind::TogetherAi => "TOGETHER_AI_API_KEY",
        }
    }

    /// Resolve a service identifier.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedService` for names no adapter exists for.
    pub fn resolve(service: &str) -> PanelcraftResult<Self> {
        ServiceKind::from_str(service.trim()).map_err(|_| {
            ProviderError::new(ProviderErrorKind::UnsupportedService(service.to_string())).into()
        })
    }
}

/// Builds adapters for a service selection.
///
/// One registry shares a single HTTP connection pool across every adapter it
/// builds.
#[derive(Debug, Clone, Getters)]
pub struct ProviderRegistry {
    client: Client,
    endpoints: EndpointConfig,
    image: ImageConfig,
}

impl ProviderRegistry {
    /// Create a registry with its own HTTP client.
    pub fn new(endpoints: EndpointConfig, image: ImageConfig) -> Self {
        Self::with_client(Client::new(), endpoints, image)
    }

    /// Create a registry around an existing HTTP client.
    pub fn with_client(client: Client, endpoints: EndpointConfig, image: ImageConfig) -> Self {
        Self {
            client,
            endpoints,
            image,
        }
    }

    /// Create a registry from loaded configuration.
    pub fn from_config(config: &ComicConfig) -> Self {
        Self::new(config.endpoints().clone(), *config.image())
    }

    /// Build a text generator for the selection.
    ///
    /// # Errors
    ///
    /// - `UnsupportedService` when the service is unknown or cannot write text
    /// - `MissingCredential` when the selection carries no credential
    pub fn text_generator(
        &self,
        selection: &ServiceSelection,
    ) -> PanelcraftResult<Box<dyn TextGenerator>> {
        let kind = ServiceKind::resolve(selection.service())?;
        debug!(service = %kind, model = %selection.model(), "Building text generator");
        match kind {
            ServiceKind::GoogleAiStudio => Ok(Box::new(GeminiClient::new(
                self.client.clone(),
                self.endpoints.gemini(),
                selection.model(),
                selection.credential(),
            )?)),
            other => Err(ProviderError::new(ProviderErrorKind::UnsupportedService(format!(
                "{} does not generate text",
                other
            )))
            .into()),
        }
    }

    /// Build an image generator for the selection.
    ///
    /// # Errors
    ///
    /// - `UnsupportedService` when the service is unknown
    /// - `MissingCredential` when the selection carries no credential
    pub fn image_generator(
        &self,
        selection: &ServiceSelection,
    ) -> PanelcraftResult<Box<dyn ImageGenerator>> {
        let kind = ServiceKind::resolve(selection.service())?;
        debug!(service = %kind, model = %selection.model(), "Building image generator");
        let generator: Box<dyn ImageGenerator> = match kind {
            ServiceKind::GoogleAiStudio => Box::new(GeminiClient::new(
                self.client.clone(),
                self.endpoints.gemini(),
                selection.model(),
                selection.credential(),
            )?),
            ServiceKind::TensorOpera => Box::new(TensorOperaClient::new(
                self.client.clone(),
                self.endpoints.tensor_opera(),
                selection.model(),
                selection.credential(),
                self.image,
            )?),
            ServiceKind::TogetherAi => Box::new(TogetherAiClient::new(
                self.client.clone(),
                self.endpoints.together_ai(),
                selection.model(),
                selection.credential(),
                self.image,
            )?),
        };
        Ok(generator)
    }
}
