use base64::Engine as _;

use crate::errors::{TarsError, TarsResult};

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff";

/// Mime type of an already-encoded screenshot, from its magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(PNG_MAGIC) {
        Some("image/png")
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some("image/jpeg")
    } else {
        None
    }
}

/// Wrap encoded image bytes as a `data:` URL for an `image_url` content part.
pub fn to_data_url(bytes: &[u8]) -> TarsResult<String> {
    if bytes.is_empty() {
        return Err(TarsError::Image("screenshot is empty".into()));
    }
    let mime = sniff_mime(bytes).ok_or_else(|| {
        TarsError::Image("screenshot is neither PNG nor JPEG".into())
    })?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}
