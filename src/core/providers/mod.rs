//! Provider handler contract and registry
//!
//! A provider is any backend reachable through [`ProviderHandler`]. Vendor adapters
//! (HTTP clients, SDK wrappers) live outside this crate and only need to implement
//! the trait; the relay never looks past it.

pub mod registry;


pub use registry::ProviderRegistry;

use crate::core::types::{LlmResponse, PromptPayload, TokenSink};
use async_trait::async_trait;

/// Failure reported by a provider handler
///
/// The `Display` text is what telemetry records as the provider's last error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Vendor API returned an error status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The call did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The call observed a cancellation request
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// The handler has no streaming implementation
    #[error("Streaming not supported")]
    StreamingUnsupported,

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Uniform call contract implemented by every provider adapter
///
/// Calls fail by returning `Err`. `cancel` is advisory: a handler that never started
/// the request, or cannot interrupt it, treats it as a no-op.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderHandler: Send + Sync {
    /// Send a prompt and wait for the complete response
    async fn send_prompt(&self, payload: &PromptPayload) -> Result<LlmResponse, ProviderError>;

    /// Stream a response, delivering tokens to `on_token`; resolves when the stream ends
    async fn stream_prompt(
        &self,
        _payload: &PromptPayload,
        _on_token: TokenSink,
    ) -> Result<(), ProviderError> {
        Err(ProviderError::StreamingUnsupported)
    }

    /// Best-effort cancellation of an in-flight request
    fn cancel(&self, request_id: &str);

    /// Whether `stream_prompt` is implemented
    fn supports_streaming(&self) -> bool {
        false
    }
}
