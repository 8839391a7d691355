//! `data:` URL encoding for inline image storage

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::BatchError;
use crate::Result;

/// Decoded payload of a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Encode bytes as `data:<mime>;base64,<payload>`.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    let mime_type = if mime_type.is_empty() {
        "application/octet-stream"
    } else {
        mime_type
    };
    format!("data:{};base64,{}", mime_type, BASE64.encode(bytes))
}

/// Decode a base64 `data:` URL. Non-base64 (percent-encoded) payloads are
/// not produced by this crate and are rejected.
pub fn decode(data_url: &str) -> Result<DataUrl> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| BatchError::InvalidDataUrl("missing data: scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| BatchError::InvalidDataUrl("missing payload separator".to_string()))?;

    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| BatchError::InvalidDataUrl("payload is not base64".to_string()))?;

    let bytes = BASE64
        .decode(payload)
        .map_err(|e| BatchError::InvalidDataUrl(e.to_string()))?;

    Ok(DataUrl {
        mime_type: mime_type.to_string(),
        bytes,
    })
}
