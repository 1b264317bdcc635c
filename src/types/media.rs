//! Media inputs and remote media handles.

use base64::Engine;
use serde::{Deserialize, Serialize};

/// An image already encoded for transport: base64 payload plus MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    /// Base64 (standard alphabet) image bytes.
    #[serde(rename = "imageBytes")]
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl EncodedImage {
    /// Wrap an existing base64 payload.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Encode raw image bytes, sniffing the MIME type from magic numbers.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mime_type = crate::utils::mime::guess_mime_from_bytes(bytes)
            .unwrap_or_else(|| "image/png".to_string());
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type,
        }
    }
}

/// A reference image with an optional free-text description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub image: EncodedImage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ReferenceImage {
    pub fn new(image: EncodedImage) -> Self {
        Self { image, label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label as given, unless it is missing or blank.
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.trim().is_empty())
    }
}

/// Opaque handle to a video that lives on the remote service.
///
/// A handle produced by one job can be fed into the next job as its source
/// video without re-uploading any bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoHandle {
    pub uri: String,
    #[serde(rename = "mimeType", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl VideoHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: None,
        }
    }

    /// Whether the handle points anywhere.
    pub fn has_locator(&self) -> bool {
        !self.uri.trim().is_empty()
    }
}
