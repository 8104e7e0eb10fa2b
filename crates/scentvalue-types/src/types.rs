//! Value types shared between the capture, vision and application layers

use serde::{Deserialize, Serialize};

/// A still image ready for transmission to the AI service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Base64 payload without any `data:` scheme prefix
    pub base64: String,
    /// MIME type of the decoded payload
    pub mime_type: String,
}

impl EncodedImage {
    pub fn jpeg(base64: String) -> Self {
        Self {
            base64,
            mime_type: "image/jpeg".to_string(),
        }
    }

    /// Split a data URL (`data:image/png;base64,....`) into payload and MIME type.
    ///
    /// Returns `None` when the string is not a base64 data URL.
    pub fn from_data_url(data_url: &str) -> Option<Self> {
        let rest = data_url.trim().strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        if payload.is_empty() {
            return None;
        }
        let mime_type = if mime_type.is_empty() {
            "image/jpeg"
        } else {
            mime_type
        };
        Some(Self {
            base64: payload.to_string(),
            mime_type: mime_type.to_string(),
        })
    }
}

/// One line recognized on a batch document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub name: String,
    /// Gross weight in grams
    pub weight: f64,
}
