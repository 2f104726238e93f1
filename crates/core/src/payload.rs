//! Request and response value objects.
//!
//! These are the value objects that flow through the engine: the caller
//! assembles a [`MessagePayload`], the executor shapes it into a
//! [`ModelRequest`] for the current profile, and the transport returns a
//! [`ModelResponse`].

use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// A single image attached to a request, base64-encoded with its media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// MIME type (e.g. "image/png").
    pub media_type: String,

    /// Base64-encoded image bytes.
    pub data: String,
}

impl ImageAttachment {
    /// Encode raw image bytes into an attachment.
    pub fn from_bytes(media_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            media_type: media_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// A `data:` URL suitable for OpenAI-compatible image parts.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// The caller-facing payload: prompt text plus ordered screenshots.
///
/// Image order is meaningful — earliest-submitted images are assumed most
/// relevant (primary problem screenshot before supplementary ones), and
/// the shaper keeps a prefix when it must truncate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePayload {
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageAttachment>,
}

impl MessagePayload {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(text: impl Into<String>, images: Vec<ImageAttachment>) -> Self {
        Self {
            text: text.into(),
            images,
        }
    }
}

/// One fully-shaped provider call, ready for the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The model to use.
    pub model: String,

    /// Prompt text.
    pub text: String,

    /// Shaped image list (already within the profile's ceiling).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageAttachment>,

    /// Current output-token budget (may shrink across retries).
    pub max_output_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Sampling top-k.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Sampling top-p.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated text.
    pub text: String,

    /// Which model actually responded (may differ from requested).
    pub model: String,

    /// Token usage statistics, when the provider reports them.
    pub usage: Option<Usage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_encodes_bytes() {
        let att = ImageAttachment::from_bytes("image/png", b"hello");
        assert_eq!(att.media_type, "image/png");
        assert_eq!(att.data, "aGVsbG8=");
        assert_eq!(att.to_data_url(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn payload_serializes_without_empty_images() {
        let payload = MessagePayload::text_only("extract this");
        let json = serde_json::to_string(&payload).unwrap();
        assert!(!json.contains("images"));
    }
}
