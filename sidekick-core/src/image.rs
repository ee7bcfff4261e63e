//! Inline image attachments for model prompts.

use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// An image encoded for inline delivery to the model, one per request at most.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    /// MIME type of the image (e.g. "image/png").
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub base64_data: String,
}

impl ImageData {
    pub fn new(mime_type: impl Into<String>, base64_data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64_data: base64_data.into(),
        }
    }

    /// Read and encode an image file, detecting the MIME type from the
    /// extension first and the magic bytes as a fallback.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read image file {}", path.display()))?;
        let mime_type = detect_mime_type_from_extension(path)
            .unwrap_or_else(|| detect_mime_type_from_data(&bytes));
        Ok(Self {
            mime_type,
            base64_data: base64::engine::general_purpose::STANDARD.encode(&bytes),
        })
    }

    /// Render as a `data:` URL for preview surfaces.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

/// Detect the MIME type from a file extension, for the formats the attach
/// dialog accepts.
pub fn detect_mime_type_from_extension(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    let mime = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => return None,
    };
    Some(mime.to_string())
}

/// Detect the MIME type from magic bytes, defaulting to an opaque type when
/// nothing matches.
pub fn detect_mime_type_from_data(data: &[u8]) -> String {
    // JPEG: FF D8
    if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 {
        return "image/jpeg".to_string();
    }

    if data.len() >= 8 {
        if data[..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
            return "image/png".to_string();
        }
        if &data[..4] == b"GIF8" {
            return "image/gif".to_string();
        }
        if &data[..4] == b"RIFF" && data.len() >= 12 && &data[8..12] == b"WEBP" {
            return "image/webp".to_string();
        }
    }

    "application/octet-stream".to_string()
}
