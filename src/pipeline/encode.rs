//! Image encoding: rendered PNG file → base64 for the request body.
//!
//! Vision APIs accept images as base64 data-URIs embedded in the JSON
//! request. The converter already writes PNG — lossless, so the rendered
//! digits stay crisp for the model — and this stage only reads the bytes
//! and wraps them.

use crate::error::DrawError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use tracing::debug;

/// Read a rendered page image and base64-encode it.
pub async fn encode_image(image_path: &Path, draw_number: u32) -> Result<String, DrawError> {
    let bytes = tokio::fs::read(image_path)
        .await
        .map_err(|e| DrawError::Io {
            draw_number,
            path: image_path.to_path_buf(),
            source: e,
        })?;

    let b64 = STANDARD.encode(&bytes);
    debug!("Encoded image → {} bytes base64", b64.len());
    Ok(b64)
}

/// Wrap a base64 payload as the `data:` URI the chat-completions image
/// attachment expects.
pub fn data_uri(b64: &str) -> String {
    format!("data:image/png;base64,{b64}")
}
