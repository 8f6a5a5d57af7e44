//! Request and response types shared by the router, the strategies and provider handlers
//!
//! These are deliberately small: the relay only needs enough structure to correlate
//! a logical call (`request_id`) with the provider that served it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Provider identifier (unique key across all per-provider state)
pub type ProviderId = String;

/// Duration in fractional milliseconds, as stored in latency statistics
pub fn duration_ms(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

/// Whole milliseconds, saturating at `u64::MAX`
pub fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A prompt to dispatch to a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPayload {
    /// Unique per logical call; shared by every provider attempt made for it
    pub request_id: String,
    /// Prompt text
    pub text: String,
    /// Target provider, when the caller already knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<ProviderId>,
}

impl PromptPayload {
    /// Create a payload with a freshly generated request id
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            provider_id: None,
        }
    }

    /// Create a payload with an explicit request id
    pub fn with_request_id(request_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            text: text.into(),
            provider_id: None,
        }
    }

    /// Pin the payload to a provider (builder pattern)
    pub fn for_provider(mut self, provider_id: impl Into<ProviderId>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }
}

/// A complete (non-streamed) provider response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmResponse {
    pub request_id: String,
    pub output: String,
}

impl LlmResponse {
    pub fn new(request_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            output: output.into(),
        }
    }
}

/// One token of a streamed response
///
/// A stream ends with exactly one token whose `is_final` is set and whose `token` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamToken {
    pub request_id: String,
    pub token: String,
    #[serde(default)]
    pub is_final: bool,
}

impl StreamToken {
    /// A content token
    pub fn chunk(request_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            token: token.into(),
            is_final: false,
        }
    }

    /// The terminating token of a stream
    pub fn final_token(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            token: String::new(),
            is_final: true,
        }
    }
}

/// Callback receiving streamed tokens, in emission order for a given request
#[derive(Clone)]
pub struct TokenSink(Arc<dyn Fn(StreamToken) + Send + Sync>);

impl TokenSink {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(StreamToken) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Deliver a token to the callback
    pub fn emit(&self, token: StreamToken) {
        (self.0)(token)
    }
}

impl fmt::Debug for TokenSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSink(..)")
    }
}
