//! HTTP routes of the generation proxy.

use crate::ProxyState;
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use panelcraft_core::{
    ContinuationContext, ErrorBody, GeneratedImage, ImageRequestBody, ImageResponseBody,
    ImagesRequestBody, ImagesResponseBody, StoryContinuationBody, StoryPart, StoryPromptBody,
    StoryRequest, StoryStartBody,
};
use panelcraft_error::{
    GenerationErrorKind, PanelcraftError, PanelcraftErrorKind, ProviderErrorKind, ServerError,
    ServerErrorKind,
};
use futures::future::try_join_all;
use panelcraft_narrative::StoryPipeline;
use serde_json::json;
use tracing::{error, instrument, warn};

/// Creates the proxy router.
pub fn create_router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/generate_story_start", post(generate_story_start))
        .route(
            "/api/generate_story_continuation",
            post(generate_story_continuation),
        )
        .route("/api/generate_story", post(generate_story))
        .route("/api/generate_image", post(generate_image))
        .route("/api/generate_images", post(generate_images))
        .with_state(state)
}

/// Route failure rendered as `{error}`.
///
/// Client mistakes (bad body, unknown service, no credential anywhere) are
/// 400; everything that failed upstream is 502.
#[derive(Debug)]
pub struct ApiError(PanelcraftError);

impl ApiError {
    /// Status code the error is answered with.
    pub fn status(&self) -> StatusCode {
        let client_error = match self.0.kind() {
            PanelcraftErrorKind::Generation(e) => matches!(
                e.kind,
                GenerationErrorKind::UnsupportedProvider(_)
                    | GenerationErrorKind::CredentialMissing(_)
            ),
            PanelcraftErrorKind::Provider(e) => matches!(
                e.kind,
                ProviderErrorKind::UnsupportedService(_)
                    | ProviderErrorKind::MissingCredential { .. }
            ),
            PanelcraftErrorKind::Server(e) => {
                matches!(e.kind, ServerErrorKind::InvalidRequest(_))
            }
            _ => false,
        };
        if client_error {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::BAD_GATEWAY
        }
    }
}

impl From<PanelcraftError> for ApiError {
    fn from(err: PanelcraftError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ServerError::new(ServerErrorKind::InvalidRequest(rejection.body_text())).into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Proxy request failed upstream");
        } else {
            warn!(status = status.as_u16(), error = %self.0, "Proxy request rejected");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

#[instrument(skip_all)]
async fn generate_story_start(
    State(state): State<ProxyState>,
    body: Result<Json<StoryStartBody>, JsonRejection>,
) -> Result<Json<StoryPart>, ApiError> {
    let Json(body) = body?;
    let generator = state.text_generator(&body.service, &body.model, &body.api_key)?;
    let request = StoryRequest::Start {
        premise: body.user_input,
    };
    let part = StoryPipeline::new(&generator).run(&request).await?;
    Ok(Json(part))
}

#[instrument(skip_all)]
async fn generate_story_continuation(
    State(state): State<ProxyState>,
    body: Result<Json<StoryContinuationBody>, JsonRejection>,
) -> Result<Json<StoryPart>, ApiError> {
    let Json(body) = body?;
    let generator = state.text_generator(&body.service, &body.model, &body.api_key)?;
    let context = ContinuationContext::new(body.foundation, body.history, body.recent_story);
    let part = StoryPipeline::new(&generator)
        .continue_story(&context)
        .await?;
    Ok(Json(part))
}

#[instrument(skip_all)]
async fn generate_story(
    State(state): State<ProxyState>,
    body: Result<Json<StoryPromptBody>, JsonRejection>,
) -> Result<Json<StoryPart>, ApiError> {
    let Json(body) = body?;
    let generator = state.text_generator(&body.service, &body.model, &body.api_key)?;
    let part = StoryPipeline::new(&generator)
        .single_shot(&body.prompt)
        .await?;
    Ok(Json(part))
}

#[instrument(skip_all)]
async fn generate_image(
    State(state): State<ProxyState>,
    body: Result<Json<ImageRequestBody>, JsonRejection>,
) -> Result<Json<ImageResponseBody>, ApiError> {
    let Json(body) = body?;
    let generator = state.image_generator(&body.service, &body.model, &body.api_key)?;
    let image = generator.generate_image(&body.prompt).await?;
    Ok(Json(image_body(image)))
}

/// All depictions are generated concurrently; the first failure fails the batch.
#[instrument(skip_all)]
async fn generate_images(
    State(state): State<ProxyState>,
    body: Result<Json<ImagesRequestBody>, JsonRejection>,
) -> Result<Json<ImagesResponseBody>, ApiError> {
    let Json(body) = body?;
    if body.depictions.is_empty() {
        return Err(ApiError(
            ServerError::new(ServerErrorKind::InvalidRequest(
                "depictions must be a non-empty array".to_string(),
            ))
            .into(),
        ));
    }
    let generator = state.image_generator(&body.service, &body.model, &body.api_key)?;
    let images = try_join_all(
        body.depictions
            .iter()
            .map(|depiction| generator.generate_image(depiction)),
    )
    .await?;
    Ok(Json(ImagesResponseBody {
        images: images.into_iter().map(image_body).collect(),
    }))
}

fn image_body(image: GeneratedImage) -> ImageResponseBody {
    match image {
        GeneratedImage::Base64(image) => ImageResponseBody::Image { image },
        GeneratedImage::Url(url) => ImageResponseBody::Url { url },
    }
}
