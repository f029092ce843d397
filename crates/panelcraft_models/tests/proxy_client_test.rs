//! Proxy client tests against a mock proxy.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use panelcraft_core::{ImageRequestBody, StoryContinuationBody, StoryStartBody};
use panelcraft_error::{GenerationErrorKind, ProviderErrorKind};
use panelcraft_models::ProxyClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn image_body() -> ImageRequestBody {
    ImageRequestBody {
        service: "TensorOpera".into(),
        api_key: "pool".into(),
        model: "Flux/Dev".into(),
        prompt: "comic style, a red boat at sunset".into(),
    }
}

#[tokio::test]
async fn test_story_start_parses_story_part() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate_story_start"))
        .and(body_partial_json(json!({
            "apiKey": "pool",
            "user_input": "a lighthouse keeper"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foundation": "A drowned coast.",
            "outline": "1. The lamp fails.",
            "story": "The lamp failed at midnight.",
            "story_beats": [
                {"caption": "Midnight.", "depiction": "a dark lamp room"}
            ]
        })))
        .mount(&server)
        .await;

    let proxy = ProxyClient::new(reqwest::Client::new(), server.uri());
    let part = proxy
        .generate_story_start(&StoryStartBody {
            service: "Google AI Studio".into(),
            api_key: "pool".into(),
            model: "gemini-2.5-flash".into(),
            user_input: "a lighthouse keeper".into(),
        })
        .await?;

    assert_eq!(part.foundation().as_deref(), Some("A drowned coast."));
    assert_eq!(part.beats()[0].caption, "Midnight.");
    Ok(())
}

#[tokio::test]
async fn test_upstream_error_body_is_surfaced() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate_story_continuation"))
        .respond_with(
            ResponseTemplate::new(502).set_body_json(json!({"error": "quota exhausted"})),
        )
        .mount(&server)
        .await;

    let proxy = ProxyClient::new(reqwest::Client::new(), server.uri());
    let err = proxy
        .generate_story_continuation(&StoryContinuationBody {
            service: "Google AI Studio".into(),
            api_key: String::new(),
            model: "gemini-2.5-flash".into(),
            foundation: "f".into(),
            history: "h".into(),
            recent_story: "r".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.provider_kind(),
        Some(ProviderErrorKind::HttpError { status_code: 502, message }) if message == "quota exhausted"
    ));
    Ok(())
}

#[tokio::test]
async fn test_inline_image_is_returned() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate_image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"image": "aW5saW5l"})))
        .mount(&server)
        .await;

    let proxy = ProxyClient::new(reqwest::Client::new(), server.uri());
    assert_eq!(proxy.generate_image(&image_body()).await?, "aW5saW5l");
    Ok(())
}

#[tokio::test]
async fn test_url_image_is_downloaded() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate_image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": format!("{}/cdn/boat.png", server.uri())
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cdn/boat.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"boat".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let proxy = ProxyClient::new(reqwest::Client::new(), server.uri());
    let payload = proxy.generate_image(&image_body()).await?;

    assert_eq!(payload, STANDARD.encode(b"boat"));
    assert!(!payload.starts_with("http"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_image_shape_is_delivery_failure() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate_image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"images": []})))
        .mount(&server)
        .await;

    let proxy = ProxyClient::new(reqwest::Client::new(), server.uri());
    let err = proxy.generate_image(&image_body()).await.unwrap_err();

    assert!(matches!(
        err.generation_kind(),
        Some(GenerationErrorKind::ImageDeliveryFailure(msg)) if msg.contains("images")
    ));
    Ok(())
}
