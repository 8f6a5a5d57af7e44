//! Error handling for the relay
//!
//! Routing failures keep their own [`RouterError`] taxonomy; this type wraps them together
//! with the configuration and setup failures that surround the router.

use crate::core::router::RouterError;
use thiserror::Error;

/// Result type alias for the relay
pub type Result<T> = std::result::Result<T, RelayError>;

/// Main error type for the relay
#[derive(Error, Debug)]
pub enum RelayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// Routing errors
    #[error(transparent)]
    Router(#[from] RouterError),
}

impl RelayError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The routing error, if this is one
    pub fn as_router_error(&self) -> Option<&RouterError> {
        match self {
            Self::Router(e) => Some(e),
            _ => None,
        }
    }

    /// Whether every provider failed or was skipped
    pub fn is_exhausted(&self) -> bool {
        matches!(
            self.as_router_error(),
            Some(RouterError::AllProvidersExhausted { .. })
        )
    }
}
