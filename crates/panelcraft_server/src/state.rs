//! Shared proxy state: adapters, pooled credentials and the fallback model.

use crate::{ModelFallbackGenerator, PooledCredentials};
use panelcraft_core::{ComicConfig, ServiceSelection};
use panelcraft_error::{GenerationError, GenerationErrorKind, PanelcraftResult};
use panelcraft_interface::{ImageGenerator, TextGenerator};
use panelcraft_models::{ProviderRegistry, ServiceKind};
use std::sync::Arc;
use tracing::debug;

/// State handed to every route.
#[derive(Debug, Clone)]
pub struct ProxyState {
    registry: ProviderRegistry,
    credentials: Arc<PooledCredentials>,
    fallback_text_model: String,
}

impl ProxyState {
    /// Create state from its parts.
    pub fn new(
        registry: ProviderRegistry,
        credentials: PooledCredentials,
        fallback_text_model: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            credentials: Arc::new(credentials),
            fallback_text_model: fallback_text_model.into(),
        }
    }

    /// Build state from configuration, reading pooled keys from the environment.
    pub fn from_config(config: &ComicConfig) -> Self {
        Self::new(
            ProviderRegistry::from_config(config),
            PooledCredentials::from_env(config.fallback().pool_token()),
            config.proxy().fallback_text_model(),
        )
    }

    fn resolve(service: &str) -> PanelcraftResult<ServiceKind> {
        ServiceKind::resolve(service).map_err(|_| {
            GenerationError::new(GenerationErrorKind::UnsupportedProvider(service.to_string()))
                .into()
        })
    }

    /// Text generator for a request, with the pooled fallback model attached.
    pub fn text_generator(
        &self,
        service: &str,
        model: &str,
        api_key: &str,
    ) -> PanelcraftResult<ModelFallbackGenerator> {
        let kind = Self::resolve(service)?;
        if !kind.supports_text() {
            return Err(GenerationError::new(GenerationErrorKind::UnsupportedProvider(
                service.to_string(),
            ))
            .into());
        }
        let credential = self.credentials.resolve(kind, api_key)?;
        let primary = self
            .registry
            .text_generator(&ServiceSelection::new(service, model, &credential))?;

        let fallback: Option<Box<dyn TextGenerator>> = match self.credentials.pooled(kind) {
            Some(pooled) if model != self.fallback_text_model || credential != pooled => {
                let selection = ServiceSelection::new(service, &self.fallback_text_model, pooled);
                Some(self.registry.text_generator(&selection)?)
            }
            _ => None,
        };
        debug!(service = %kind, model, retry = fallback.is_some(), "Text generator ready");

        Ok(ModelFallbackGenerator::new(primary, fallback))
    }

    /// Image generator for a request.
    pub fn image_generator(
        &self,
        service: &str,
        model: &str,
        api_key: &str,
    ) -> PanelcraftResult<Box<dyn ImageGenerator>> {
        let kind = Self::resolve(service)?;
        let credential = self.credentials.resolve(kind, api_key)?;
        self.registry
            .image_generator(&ServiceSelection::new(service, model, credential))
    }
}
