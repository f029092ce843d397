//! Turning cached image states into something a terminal reader can show.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use panelcraft_cache::ImageState;
use panelcraft_error::{GenerationError, GenerationErrorKind, PanelcraftResult};

/// Decode a base64 image payload.
///
/// # Errors
///
/// `ImageDeliveryFailure` when the payload is not valid base64.
pub fn decode_image(payload: &str) -> PanelcraftResult<Vec<u8>> {
    STANDARD.decode(payload.trim()).map_err(|e| {
        GenerationError::new(GenerationErrorKind::ImageDeliveryFailure(format!(
            "payload is not base64: {}",
            e
        )))
        .into()
    })
}

/// File extension for decoded image bytes, from their magic number.
pub fn image_extension(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "png",
        [0xff, 0xd8, 0xff, ..] => "jpg",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
        [b'G', b'I', b'F', b'8', ..] => "gif",
        _ => "img",
    }
}

/// File name for a panel's image, e.g. `panel-0007.png`.
pub fn panel_file_name(index: usize, bytes: &[u8]) -> String {
    format!("panel-{:04}.{}", index, image_extension(bytes))
}

/// One-line description of an image state.
pub fn status_line(state: Option<&ImageState>) -> String {
    match state {
        None => "image: not requested".to_string(),
        Some(ImageState::Pending) => "image: still generating".to_string(),
        Some(ImageState::Ready(payload)) => format!("image: ready ({} base64 chars)", payload.len()),
        Some(ImageState::Failed(reason)) => format!("image failed: {} (r to retry)", reason),
    }
}
