//! Together AI image generation adapter.

use crate::http::{check_status, decode_error, request_error};
use crate::metrics::GenerationMetrics;
use async_trait::async_trait;
use panelcraft_core::{GeneratedImage, ImageConfig};
use panelcraft_error::{PanelcraftResult, ProviderError, ProviderErrorKind};
use panelcraft_interface::ImageGenerator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

const PROVIDER: &str = "together";

/// Together AI client bound to one model and API key.
///
/// Together answers with a URL to the rendered file; callers download it.
#[derive(Clone)]
pub struct TogetherAiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    image: ImageConfig,
}

impl TogetherAiClient {
    /// Creates a Together AI client.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` if the API key is blank.
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        image: ImageConfig,
    ) -> PanelcraftResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::MissingCredential {
                provider: "Together AI".to_string(),
            })
            .into());
        }
        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            image,
        })
    }

    async fn send(&self, prompt: &str) -> PanelcraftResult<GeneratedImage> {
        let url = format!(
            "{}/v1/images/generations",
            self.base_url.trim_end_matches('/')
        );
        let body = ImagesRequest {
            model: &self.model,
            prompt,
            width: *self.image.width(),
            height: *self.image.height(),
            steps: *self.image.steps(),
            n: 1,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;
        let response = check_status(PROVIDER, response).await?;

        let parsed: ImagesResponse = response
            .json()
            .await
            .map_err(|e| decode_error("Together AI response", e))?;

        let first = parsed.data.into_iter().next().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::ResponseShape(
                "Together AI returned no images".to_string(),
            ))
        })?;

        match (first.b64_json, first.url) {
            (Some(payload), _) if !payload.is_empty() => Ok(GeneratedImage::Base64(payload)),
            (_, Some(url)) if !url.is_empty() => Ok(GeneratedImage::Url(url)),
            _ => Err(ProviderError::new(ProviderErrorKind::ResponseShape(
                "Together AI image carried neither url nor b64_json".to_string(),
            ))
            .into()),
        }
    }
}

#[async_trait]
impl ImageGenerator for TogetherAiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate_image(&self, prompt: &str) -> PanelcraftResult<GeneratedImage> {
        debug!("Requesting Together AI image");
        let start = Instant::now();
        let result = self.send(prompt).await;
        GenerationMetrics::get().observe(PROVIDER, &self.model, start, &result);
        result
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    width: u32,
    height: u32,
    steps: u32,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}
