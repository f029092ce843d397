//! TensorOpera and Together AI adapter tests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use panelcraft_core::{GeneratedImage, ImageConfig};
use panelcraft_error::ProviderErrorKind;
use panelcraft_interface::ImageGenerator;
use panelcraft_models::{TensorOperaClient, TogetherAiClient, into_base64};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_tensor_opera_success() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference/api/v1/text2Image"))
        .and(header("authorization", "Bearer to-key"))
        .and(body_partial_json(json!({
            "model": "Flux/Dev",
            "width": 512,
            "height": 512,
            "steps": 15
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "SUCCESS",
            "data": {"b64_json": "Ym9hdA=="}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TensorOperaClient::new(
        reqwest::Client::new(),
        server.uri(),
        "Flux/Dev",
        "to-key",
        ImageConfig::default(),
    )?;
    let image = client.generate_image("a red boat at sunset").await?;

    assert_eq!(image, GeneratedImage::Base64("Ym9hdA==".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_tensor_opera_failure_code() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/inference/api/v1/text2Image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "FAILURE",
            "message": "NSFW content detected"
        })))
        .mount(&server)
        .await;

    let client = TensorOperaClient::new(
        reqwest::Client::new(),
        server.uri(),
        "Flux/Dev",
        "to-key",
        ImageConfig::default(),
    )?;
    let err = client.generate_image("prompt").await.unwrap_err();

    assert!(matches!(
        err.provider_kind(),
        Some(ProviderErrorKind::ResponseShape(msg)) if msg.contains("NSFW")
    ));
    Ok(())
}

#[tokio::test]
async fn test_together_returns_url_then_downloads() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let file_url = format!("{}/files/panel.png", server.uri());

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(body_partial_json(json!({"n": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"url": file_url}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/panel.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = TogetherAiClient::new(
        reqwest::Client::new(),
        server.uri(),
        "black-forest-labs/FLUX.1-schnell-Free",
        "tg-key",
        ImageConfig::default(),
    )?;
    let image = client.generate_image("a harbor at dawn").await?;
    assert_eq!(image, GeneratedImage::Url(file_url.clone()));

    let payload = into_base64(&reqwest::Client::new(), image).await?;
    assert_eq!(payload, STANDARD.encode(b"png-bytes"));
    Ok(())
}

#[tokio::test]
async fn test_download_failure_is_reported() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/files/missing.png", server.uri());
    let err = into_base64(&reqwest::Client::new(), GeneratedImage::Url(url))
        .await
        .unwrap_err();

    assert!(matches!(
        err.provider_kind(),
        Some(ProviderErrorKind::Download(_))
    ));
    Ok(())
}
