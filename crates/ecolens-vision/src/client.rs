//! Vision classification client.
//!
//! One-shot client for an OpenAI-compatible chat-completions endpoint:
//! - Credential injected via configuration, never compiled in
//! - HTTP client tuning (pooling, timeouts)
//! - Typed status mapping into the error taxonomy
//! - No retries; callers own retry policy via `VisionError::is_retryable`

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use tracing::{debug, warn};

use ecolens_models::Classification;

use crate::error::{VisionError, VisionResult};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ContentPart, ErrorEnvelope};

// =============================================================================
// Constants
// =============================================================================

/// Default inference endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default generation token limit.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default cap on the decoded response body (1 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Content substituted when the backend returns a well-formed envelope
/// with no choices. A deliberate fallback, not an error.
const NO_RESPONSE_FALLBACK: &str = "No response";

/// Fixed instruction prompt sent with every request.
///
/// Constrains the backend to lead with a single bin digit (1 blue,
/// 2 green, 3 black, 4 none) before the free-text disposal guidance.
pub const INSTRUCTION_PROMPT: &str = "Analyze this image and explain how to properly dispose of it \
    according to Canadian recycling guidelines. Identify which bin (black, blue, or green) it \
    should go in and why. If any specific disposing steps are required, take note that we are \
    located in York Region (Ontario, Canada). Do not use formatting (bold, italics, etc.) Before \
    explaining any disposing rules, please state the bin that the item goes into with a single \
    number, 1 for blue, 2 for green, 3 for black. If the item does not belong in any of the bins, \
    instead please state 4. Do not state 4 if the item belongs in the black bin";

// =============================================================================
// Configuration
// =============================================================================

/// Vision client configuration.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Backend bearer credential
    pub api_key: String,
    /// Inference endpoint URL
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Generation token limit
    pub max_tokens: u32,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Upper bound on the response body size
    pub max_response_bytes: usize,
}

impl VisionConfig {
    /// Create config from environment variables.
    ///
    /// `OPENAI_API_KEY` is required; everything else has defaults.
    pub fn from_env() -> VisionResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| VisionError::config_error("OPENAI_API_KEY must be set"))?;

        if api_key.is_empty() {
            return Err(VisionError::config_error("OPENAI_API_KEY cannot be empty"));
        }

        let timeout_secs: u64 = std::env::var("ECOLENS_VISION_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let connect_timeout_secs: u64 = std::env::var("ECOLENS_VISION_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            api_key,
            endpoint: std::env::var("ECOLENS_VISION_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            model: std::env::var("ECOLENS_VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            max_tokens: std::env::var("ECOLENS_VISION_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOKENS),
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        })
    }
}

// =============================================================================
// Client
// =============================================================================

/// Vision inference client.
///
/// Holds only read-only configuration and a pooled HTTP client; concurrent
/// `classify` calls are independent. Cloning shares the connection pool.
#[derive(Clone)]
pub struct VisionClient {
    http: Client,
    config: VisionConfig,
}

impl VisionClient {
    /// Create a new vision client.
    pub fn new(config: VisionConfig) -> VisionResult<Self> {
        if config.api_key.is_empty() {
            return Err(VisionError::config_error("API key cannot be empty"));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("ecolens-vision/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(VisionError::Transport)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> VisionResult<Self> {
        let config = VisionConfig::from_env()?;
        Self::new(config)
    }

    /// Classify a JPEG image into a waste-bin category.
    ///
    /// Issues exactly one backend call. Dropping the returned future
    /// abandons the in-flight request.
    pub async fn classify(&self, image_bytes: &[u8]) -> VisionResult<Classification> {
        if image_bytes.is_empty() {
            return Err(VisionError::encoding_failed("image payload is empty"));
        }

        let request = self.build_request(image_bytes);

        debug!(
            model = %self.config.model,
            image_bytes = image_bytes.len(),
            "sending classification request"
        );

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.map_error_response(status.as_u16(), response).await);
        }

        let body = self.read_bounded_body(response).await?;

        let envelope: ChatResponse = serde_json::from_slice(&body)
            .map_err(|e| VisionError::malformed(format!("invalid completion envelope: {}", e)))?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string());

        let classification = Classification::parse(&content);
        debug!(bin = %classification.bin, "classification parsed");

        Ok(classification)
    }

    /// Build the typed request body for an image.
    pub(crate) fn build_request(&self, image_bytes: &[u8]) -> ChatRequest {
        let base64_image = STANDARD.encode(image_bytes);

        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(vec![
                ContentPart::text(INSTRUCTION_PROMPT),
                ContentPart::jpeg_data_uri(&base64_image),
            ])],
            max_tokens: self.config.max_tokens,
        }
    }

    /// Read the response body without ever buffering more than the
    /// configured limit. A declared or actual overrun means the envelope
    /// contract was not honored.
    async fn read_bounded_body(&self, mut response: reqwest::Response) -> VisionResult<Vec<u8>> {
        let limit = self.config.max_response_bytes;

        if let Some(declared) = response.content_length() {
            if declared as usize > limit {
                return Err(VisionError::malformed(format!(
                    "declared response body of {} bytes exceeds the {} byte limit",
                    declared, limit
                )));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(VisionError::malformed(format!(
                    "response body exceeds the {} byte limit",
                    limit
                )));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }

    /// Map a non-2xx response into the error taxonomy, decoding the
    /// backend error envelope best-effort to enrich the detail.
    async fn map_error_response(&self, status: u16, response: reqwest::Response) -> VisionError {
        let body = response.text().await.unwrap_or_default();

        let detail = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => match envelope.error.code {
                Some(code) => format!("{} ({})", envelope.error.message, code),
                None => envelope.error.message,
            },
            Err(_) => body,
        };

        warn!(status, detail = %detail, "classification request failed");
        VisionError::from_http_status(status, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_from_env_requires_api_key() {
        std::env::remove_var("OPENAI_API_KEY");
        let result = VisionConfig::from_env();
        assert!(matches!(result, Err(VisionError::ConfigError(_))));
    }

    #[test]
    #[serial]
    fn test_config_from_env_rejects_empty_api_key() {
        std::env::set_var("OPENAI_API_KEY", "");
        let result = VisionConfig::from_env();
        assert!(matches!(result, Err(VisionError::ConfigError(_))));
        std::env::remove_var("OPENAI_API_KEY");
    }

    #[test]
    #[serial]
    fn test_config_default_values() {
        std::env::set_var("OPENAI_API_KEY", "test-key");
        std::env::remove_var("ECOLENS_VISION_ENDPOINT");
        std::env::remove_var("ECOLENS_VISION_MODEL");
        std::env::remove_var("ECOLENS_VISION_MAX_TOKENS");
        std::env::remove_var("ECOLENS_VISION_TIMEOUT_SECS");

        let config = VisionConfig::from_env().unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));

        std::env::remove_var("OPENAI_API_KEY");
    }

    #[test]
    fn test_new_rejects_empty_api_key() {
        let config = VisionConfig {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        };
        assert!(matches!(
            VisionClient::new(config),
            Err(VisionError::ConfigError(_))
        ));
    }

    #[test]
    fn test_prompt_pins_digit_contract() {
        // The parser depends on the leading-digit instruction
        assert!(INSTRUCTION_PROMPT.contains("1 for blue"));
        assert!(INSTRUCTION_PROMPT.contains("2 for green"));
        assert!(INSTRUCTION_PROMPT.contains("3 for black"));
        assert!(INSTRUCTION_PROMPT.contains("please state 4"));
    }
}
