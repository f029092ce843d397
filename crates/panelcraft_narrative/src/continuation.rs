//! Story continuation fetcher with proxy fallback.

use crate::pipeline::StoryPipeline;
use async_trait::async_trait;
use panelcraft_core::{
    ComicConfig, FallbackConfig, ServiceSelection, StoryContinuationBody, StoryPart,
    StoryRequest, StoryStartBody,
};
use panelcraft_error::{GenerationError, GenerationErrorKind, PanelcraftResult};
use panelcraft_interface::StorySource;
use panelcraft_models::{GenerationMetrics, ProviderRegistry, ProxyClient, classify_error};
use tracing::{debug, instrument, warn};

/// Fetches story parts from the selected service, falling back to the proxy.
///
/// The primary path runs the multi-stage pipeline against the user-selected
/// provider. Any primary failure other than an unsupported service retries
/// once through the proxy with the configured low-cost service and the pool
/// token.
#[derive(Debug, Clone)]
pub struct ContinuationFetcher {
    registry: ProviderRegistry,
    proxy: ProxyClient,
    fallback: FallbackConfig,
}

impl ContinuationFetcher {
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

    async fn primary(
        &self,
        selection: &ServiceSelection,
        request: &StoryRequest,
    ) -> PanelcraftResult<StoryPart> {
        let generator = self.registry.text_generator(selection)?;
        StoryPipeline::new(generator.as_ref()).run(request).await
    }

    async fn via_proxy(&self, request: &StoryRequest) -> PanelcraftResult<StoryPart> {
        match request {
            StoryRequest::Start { premise } => {
                self.proxy
                    .generate_story_start(&StoryStartBody {
                        service: self.fallback.text_service().clone(),
                        api_key: self.fallback.pool_token().clone(),
                        model: self.fallback.text_model().clone(),
                        user_input: premise.clone(),
                    })
                    .await
            }
            StoryRequest::Continue(context) => {
                self.proxy
                    .generate_story_continuation(&StoryContinuationBody {
                        service: self.fallback.text_service().clone(),
                        api_key: self.fallback.pool_token().clone(),
                        model: self.fallback.text_model().clone(),
                        foundation: context.foundation().clone(),
                        history: context.history().clone(),
                        recent_story: context.recent_story().clone(),
                    })
                    .await
            }
        }
    }
}

#[async_trait]
impl StorySource for ContinuationFetcher {
    #[instrument(
        skip(self, selection, request),
        fields(service = %selection.service(), model = %selection.model(), request = %request)
    )]
    async fn fetch_story(
        &self,
        selection: &ServiceSelection,
        request: &StoryRequest,
    ) -> PanelcraftResult<StoryPart> {
        let primary = match self.primary(selection, request).await {
            Ok(part) => {
                debug!(beats = part.beats().len(), "Primary story fetch succeeded");
                return Ok(part);
            }
            Err(e) if e.is_unsupported_provider() => {
                warn!(error = %e, "Unsupported text service, not falling back");
                return Err(GenerationError::new(GenerationErrorKind::UnsupportedProvider(
                    selection.service().clone(),
                ))
                .into());
            }
            Err(e) => e,
        };

        warn!(error = %primary, proxy = %self.proxy.base_url(), "Primary story fetch failed, using proxy");
        GenerationMetrics::get().record_fallback("text", classify_error(&primary));

        self.via_proxy(request).await.map_err(|fallback| {
            GenerationError::new(GenerationErrorKind::UpstreamGenerationFailure {
                primary: primary.to_string(),
                fallback: fallback.to_string(),
            })
            .into()
        })
    }
}
