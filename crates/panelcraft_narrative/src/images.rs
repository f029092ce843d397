//! Image fetcher with proxy fallback.

use async_trait::async_trait;
use panelcraft_core::{ComicConfig, FallbackConfig, ImageRequestBody, ServiceSelection};
use panelcraft_error::{GenerationError, GenerationErrorKind, PanelcraftResult, ProviderErrorKind};
use panelcraft_interface::ImageSource;
use panelcraft_models::{
    GenerationMetrics, ProviderRegistry, ProxyClient, classify_error, into_base64,
};
use tracing::{debug, instrument, warn};

/// Fetches base64 images from the selected service, falling back to the proxy.
///
/// URL results from either path are downloaded before returning, so callers
/// only ever see base64 payloads.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    registry: ProviderRegistry,
    proxy: ProxyClient,
    fallback: FallbackConfig,
}

impl ImageFetcher {
    /// Create a fetcher from its parts.
    pub fn new(registry: ProviderRegistry, proxy: ProxyClient, fallback: FallbackConfig) -> Self {
        Self {
            registry,
            proxy,
            fallback,
        }
    }

    /// Create a fetcher from loaded configuration.
    pub fn from_config(config: &ComicConfig) -> Self {
        let registry = ProviderRegistry::from_config(config);
        let proxy = ProxyClient::new(registry.client().clone(), config.fallback().proxy_url());
        Self::new(registry, proxy, config.fallback().clone())
    }

    async fn primary(&self, selection: &ServiceSelection, prompt: &str) -> PanelcraftResult<String> {
        let generator = self.registry.image_generator(selection)?;
        let image = generator.generate_image(prompt).await?;
        into_base64(self.registry.client(), image).await
    }
}

#[async_trait]
impl ImageSource for ImageFetcher {
    #[instrument(skip(self, selection, prompt), fields(service = %selection.service(), model = %selection.model()))]
    async fn fetch_image(
        &self,
        selection: &ServiceSelection,
        prompt: &str,
    ) -> PanelcraftResult<String> {
        let primary = match self.primary(selection, prompt).await {
            Ok(payload) => {
                debug!(bytes = payload.len(), "Primary image fetch succeeded");
                return Ok(payload);
            }
            Err(e) if e.is_unsupported_provider() => {
                return Err(GenerationError::new(GenerationErrorKind::UnsupportedProvider(
                    selection.service().clone(),
                ))
                .into());
            }
            Err(e) => e,
        };

        warn!(error = %primary, "Primary image fetch failed, using proxy");
        GenerationMetrics::get().record_fallback("image", classify_error(&primary));

        let body = ImageRequestBody {
            service: self.fallback.image_service().clone(),
            api_key: self.fallback.pool_token().clone(),
            model: self.fallback.image_model().clone(),
            prompt: prompt.to_string(),
        };

        self.proxy.generate_image(&body).await.map_err(|fallback| {
            // The proxy produced an image but it never reached us.
            let undelivered = match (fallback.generation_kind(), fallback.provider_kind()) {
                (Some(GenerationErrorKind::ImageDeliveryFailure(reason)), _) => Some(reason),
                (_, Some(ProviderErrorKind::Download(reason))) => Some(reason),
                _ => None,
            };
            let kind = match undelivered {
                Some(reason) => GenerationErrorKind::ImageDeliveryFailure(format!(
                    "{} (primary: {})",
                    reason, primary
                )),
                None => GenerationErrorKind::UpstreamGenerationFailure {
                    primary: primary.to_string(),
                    fallback: fallback.to_string(),
                },
            };
            GenerationError::new(kind).into()
        })
    }
}
