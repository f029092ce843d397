//! Shared response handling for the HTTP adapters.

use panelcraft_error::{PanelcraftError, PanelcraftResult, ProviderError, ProviderErrorKind};
use reqwest::Response;
use tracing::warn;

const MAX_ERROR_BODY: usize = 500;

/// Turn a transport failure into an adapter error.
///
/// The URL is stripped; Gemini carries its key in the query string.
pub(crate) fn request_error(e: reqwest::Error) -> PanelcraftError {
    ProviderError::new(ProviderErrorKind::Request(e.without_url().to_string())).into()
}

/// Turn a body decoding failure into a `ResponseShape` error, URL stripped.
pub(crate) fn decode_error(what: &str, e: reqwest::Error) -> PanelcraftError {
    ProviderError::new(ProviderErrorKind::ResponseShape(format!(
        "Failed to parse {}: {}",
        what,
        e.without_url()
    )))
    .into()
}

/// Pass successful responses through; turn anything else into
/// `ProviderErrorKind::HttpError`.
///
/// The message is taken from `{"error": {"message": ..}}`, `{"error": ".."}`
/// or `{"message": ..}` bodies when present, otherwise from the raw body.
pub(crate) async fn check_status(provider: &str, response: Response) -> PanelcraftResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    warn!(provider, status = status.as_u16(), message = %message, "Provider returned an error");

    Err(ProviderError::new(ProviderErrorKind::HttpError {
        status_code: status.as_u16(),
        message,
    })
    .into())
}

fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            value.pointer("/error/message"),
            value.get("error"),
            value.get("message"),
        ];
        if let Some(text) = candidates.into_iter().flatten().find_map(|v| v.as_str()) {
            return text.to_string();
        }
    }
    body.chars().take(MAX_ERROR_BODY).collect()
}
