//! Google AI Studio (Gemini) REST adapter.

use crate::http::{check_status, decode_error, request_error};
use crate::metrics::GenerationMetrics;
use async_trait::async_trait;
use panelcraft_core::GeneratedImage;
use panelcraft_error::{PanelcraftResult, ProviderError, ProviderErrorKind};
use panelcraft_interface::{ImageGenerator, TextGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

const PROVIDER: &str = "gemini";
const IMAGE_PROMPT_PREFIX: &str = "Generate an image for prompt:\n";

/// Gemini client bound to one model and API key.
///
/// Speaks `POST {base}/v1beta/models/{model}:generateContent?key={key}` for
/// plain text, schema-constrained JSON and inline image generation.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Creates a Gemini client.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` if the API key is blank.
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> PanelcraftResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::MissingCredential {
                provider: "Google AI Studio".to_string(),
            })
            .into());
        }
        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn send(&self, request: &GeminiRequest<'_>) -> PanelcraftResult<GeminiResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(request_error)?;

        let response = check_status(PROVIDER, response).await?;

        response
            .json()
            .await
            .map_err(|e| decode_error("Gemini response", e))
    }

    async fn generate(&self, request: GeminiRequest<'_>) -> PanelcraftResult<String> {
        let start = Instant::now();
        let result = self.send(&request).await.and_then(GeminiResponse::into_text);
        GenerationMetrics::get().observe(PROVIDER, &self.model, start, &result);
        result
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate_text(&self, prompt: &str) -> PanelcraftResult<String> {
        debug!("Requesting Gemini text");
        self.generate(GeminiRequest::new(prompt.to_string(), None))
            .await
    }

    #[instrument(skip(self, prompt, schema), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> PanelcraftResult<String> {
        debug!("Requesting Gemini JSON");
        let config = GenerationConfig {
            response_mime_type: Some("application/json"),
            response_schema: Some(schema),
            response_modalities: None,
        };
        self.generate(GeminiRequest::new(prompt.to_string(), Some(config)))
            .await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate_image(&self, prompt: &str) -> PanelcraftResult<GeneratedImage> {
        debug!("Requesting Gemini image");
        let config = GenerationConfig {
            response_mime_type: None,
            response_schema: None,
            response_modalities: Some(vec!["TEXT", "IMAGE"]),
        };
        let request = GeminiRequest::new(format!("{}{}", IMAGE_PROMPT_PREFIX, prompt), Some(config));

        let start = Instant::now();
        let result = self
            .send(&request)
            .await
            .and_then(GeminiResponse::into_inline_image);
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
struct GeminiRequest<'a> {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

impl<'a> GeminiRequest<'a> {
    fn new(text: String, generation_config: Option<GenerationConfig<'a>>) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text }],
            }],
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

impl GeminiResponse {
    fn parts(self) -> Vec<ResponsePart> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default()
    }

    fn into_text(self) -> PanelcraftResult<String> {
        let text: String = self.parts().into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::ResponseShape(
                "Gemini response contained no text".to_string(),
            ))
            .into());
        }
        Ok(text)
    }

    fn into_inline_image(self) -> PanelcraftResult<String> {
        self.parts()
            .into_iter()
            .filter_map(|p| p.inline_data)
            .map(|d| d.data)
            .find(|data| !data.is_empty())
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::ResponseShape(
                    "Image data not found in Gemini response".to_string(),
                ))
                .into()
            })
    }
}
