//! Client for the Panelcraft generation proxy.

use crate::download::download_base64;
use crate::http::{check_status, decode_error, request_error};
use crate::metrics::GenerationMetrics;
use panelcraft_core::{
    ImageRequestBody, ImageResponseBody, StoryContinuationBody, StoryPart, StoryPromptBody,
    StoryStartBody,
};
use panelcraft_error::{GenerationError, GenerationErrorKind, PanelcraftResult};
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Instant;
use tracing::{debug, instrument};

const PROVIDER: &str = "proxy";

/// HTTP client for the proxy routes used on the fallback path.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    /// Create a proxy client for a base URL such as `http://127.0.0.1:3000`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, R>(&self, route: &str, model: &str, body: &B) -> PanelcraftResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), route);
        debug!(url = %url, "Calling generation proxy");

        let start = Instant::now();
        let result: PanelcraftResult<R> = async {
            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(request_error)?;
            let response = check_status(PROVIDER, response).await?;
            response
                .json::<R>()
                .await
                .map_err(|e| decode_error(&format!("proxy response from {}", route), e))
        }
        .await;
        GenerationMetrics::get().observe(PROVIDER, model, start, &result);
        result
    }

    /// `POST /api/generate_story_start`
    #[instrument(skip(self, body), fields(service = %body.service, model = %body.model))]
    pub async fn generate_story_start(&self, body: &StoryStartBody) -> PanelcraftResult<StoryPart> {
        self.post("/api/generate_story_start", &body.model, body)
            .await
    }

    /// `POST /api/generate_story_continuation`
    #[instrument(skip(self, body), fields(service = %body.service, model = %body.model))]
    pub async fn generate_story_continuation(
        &self,
        body: &StoryContinuationBody,
    ) -> PanelcraftResult<StoryPart> {
        self.post("/api/generate_story_continuation", &body.model, body)
            .await
    }

    /// `POST /api/generate_story`
    #[instrument(skip(self, body), fields(service = %body.service, model = %body.model))]
    pub async fn generate_story(&self, body: &StoryPromptBody) -> PanelcraftResult<StoryPart> {
        self.post("/api/generate_story", &body.model, body).await
    }

    /// `POST /api/generate_image`, resolved to a base64 payload.
    ///
    /// `{image}` responses are returned as-is and `{url}` responses are
    /// downloaded. Any other shape is an `ImageDeliveryFailure`.
    #[instrument(skip(self, body), fields(service = %body.service, model = %body.model))]
    pub async fn generate_image(&self, body: &ImageRequestBody) -> PanelcraftResult<String> {
        let value: serde_json::Value = self
            .post("/api/generate_image", &body.model, body)
            .await?;

        match serde_json::from_value::<ImageResponseBody>(value.clone()) {
            Ok(ImageResponseBody::Image { image }) if !image.is_empty() => Ok(image),
            Ok(ImageResponseBody::Url { url }) if !url.is_empty() => {
                download_base64(&self.client, &url).await
            }
            _ => Err(GenerationError::new(GenerationErrorKind::ImageDeliveryFailure(format!(
                "unexpected proxy image response: {}",
                describe_shape(&value)
            )))
            .into()),
        }
    }
}

fn describe_shape(value: &serde_json::Value) -> String {
    match value.as_object() {
        Some(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        None => format!("non-object JSON ({})", value),
    }
}
