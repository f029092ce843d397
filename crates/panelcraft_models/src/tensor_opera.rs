//! TensorOpera text-to-image adapter.

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

const PROVIDER: &str = "tensoropera";

/// TensorOpera client bound to one model and API key.
#[derive(Clone)]
pub struct TensorOperaClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    image: ImageConfig,
}

impl TensorOperaClient {
    /// Creates a TensorOpera client.
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
                provider: "TensorOpera".to_string(),
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

    async fn send(&self, prompt: &str) -> PanelcraftResult<String> {
        let url = format!(
            "{}/inference/api/v1/text2Image",
            self.base_url.trim_end_matches('/')
        );
        let body = TextToImageRequest {
            prompt,
            model: &self.model,
            width: *self.image.width(),
            height: *self.image.height(),
            steps: *self.image.steps(),
            guidance_scale: *self.image.guidance(),
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

        let parsed: TextToImageResponse = response
            .json()
            .await
            .map_err(|e| decode_error("TensorOpera response", e))?;
        parsed.into_payload()
    }
}

#[async_trait]
impl ImageGenerator for TensorOperaClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate_image(&self, prompt: &str) -> PanelcraftResult<GeneratedImage> {
        debug!("Requesting TensorOpera image");
        let start = Instant::now();
        let result = self.send(prompt).await;
        GenerationMetrics::get().observe(PROVIDER, &self.model, start, &result);
        result.map(GeneratedImage::Base64)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct TextToImageRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    width: u32,
    height: u32,
    steps: u32,
    guidance_scale: f32,
}

#[derive(Debug, Deserialize)]
struct TextToImageResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<TextToImageData>,
}

#[derive(Debug, Deserialize)]
struct TextToImageData {
    #[serde(default)]
    b64_json: Option<String>,
}

impl TextToImageResponse {
    fn into_payload(self) -> PanelcraftResult<String> {
        if self.code != "SUCCESS" {
            return Err(ProviderError::new(ProviderErrorKind::ResponseShape(format!(
                "TensorOpera returned code {:?}: {}",
                self.code,
                self.message.unwrap_or_default()
            )))
            .into());
        }
        self.data
            .and_then(|d| d.b64_json)
            .filter(|payload| !payload.is_empty())
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::ResponseShape(
                    "TensorOpera response carried no b64_json".to_string(),
                ))
                .into()
            })
    }
}
