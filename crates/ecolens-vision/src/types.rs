//! Wire types for the chat-completions contract.
//!
//! Field names follow the backend schema exactly; the request is built
//! from typed structs so a malformed payload is caught at construction
//! rather than surfacing as a backend 400.

use serde::{Deserialize, Serialize};

/// Chat-completions request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// A single chat message with multi-part content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    /// Build a `user` message from content parts.
    pub fn user(content: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// One part of a message: either prompt text or an inline image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Inline JPEG image as a base64 data URI.
    pub fn jpeg_data_uri(base64_data: &str) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl {
                url: format!("data:image/jpeg;base64,{}", base64_data),
            },
        }
    }
}

/// Image reference wrapper required by the backend schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Chat-completions success envelope.
///
/// `choices` defaults to empty so a well-formed envelope with no
/// generation decodes cleanly; the client substitutes fallback content
/// in that case rather than erroring.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

/// Backend error envelope returned on non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_part_serializes_with_type_tag() {
        let part = ContentPart::text("which bin?");
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "which bin?"}));

        let part = ContentPart::jpeg_data_uri("aGVsbG8=");
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "image_url",
                "image_url": {"url": "data:image/jpeg;base64,aGVsbG8="}
            })
        );
    }

    #[test]
    fn test_response_without_choices_decodes_to_empty() {
        let envelope: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert!(envelope.choices.is_empty());
    }

    #[test]
    fn test_error_envelope_decodes() {
        let envelope: ErrorEnvelope = serde_json::from_value(json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        }))
        .unwrap();
        assert_eq!(envelope.error.kind, "invalid_request_error");
        assert_eq!(envelope.error.code.as_deref(), Some("invalid_api_key"));
        assert!(envelope.error.message.contains("API key"));
    }
}
