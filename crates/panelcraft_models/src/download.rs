//! Turning generated images into base64 payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use panelcraft_core::GeneratedImage;
use panelcraft_error::{PanelcraftResult, ProviderError, ProviderErrorKind};
use reqwest::Client;
use tracing::{debug, instrument};

/// Download a remote image and return its bytes base64-encoded.
///
/// # Errors
///
/// Returns a `Download` error on transport failure, a non-success status
/// or an empty body.
#[instrument(skip(client))]
pub async fn download_base64(client: &Client, url: &str) -> PanelcraftResult<String> {
    let response = client.get(url).send().await.map_err(|e| {
        ProviderError::new(ProviderErrorKind::Download(format!("{}: {}", url, e.without_url())))
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::new(ProviderErrorKind::Download(format!(
            "{} answered HTTP {}",
            url,
            status.as_u16()
        )))
        .into());
    }

    let bytes = response.bytes().await.map_err(|e| {
        ProviderError::new(ProviderErrorKind::Download(format!("{}: {}", url, e.without_url())))
    })?;
    if bytes.is_empty() {
        return Err(ProviderError::new(ProviderErrorKind::Download(format!(
            "{} returned an empty body",
            url
        )))
        .into());
    }

    debug!(bytes = bytes.len(), "Downloaded image");
    Ok(STANDARD.encode(&bytes))
}

/// Resolve a generated image to a base64 payload, downloading URLs.
pub async fn into_base64(client: &Client, image: GeneratedImage) -> PanelcraftResult<String> {
    match image {
        GeneratedImage::Base64(payload) => Ok(payload),
        GeneratedImage::Url(url) => download_base64(client, &url).await,
    }
}
