//! Router error types
//!
//! `InvalidArgument` and `ProviderNotRegistered` are programming errors and are never
//! retried. `ProviderCallFailure` is recoverable: strategies catch it and move on to the
//! next candidate. `AllProvidersExhausted` is the only provider-side failure a strategy
//! caller should observe.

use crate::core::providers::ProviderError;
use crate::core::strategy::StrategyKind;
use crate::core::types::ProviderId;

/// Router error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouterError {
    /// Caller passed an invalid argument (e.g. an empty candidate set)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Dispatch requested a provider id with no registered handler
    #[error("Provider not registered: {0}")]
    ProviderNotRegistered(ProviderId),

    /// A specific provider's call failed
    #[error("Provider {provider} failed: {source}")]
    ProviderCallFailure {
        provider: ProviderId,
        #[source]
        source: ProviderError,
    },

    /// Every candidate considered by the strategy failed or was in cooldown
    #[error(
        "All providers exhausted for {strategy} strategy (attempted: {attempted:?}, skipped: {skipped:?})"
    )]
    AllProvidersExhausted {
        strategy: StrategyKind,
        attempted: Vec<ProviderId>,
        skipped: Vec<ProviderId>,
    },
}

impl RouterError {
    /// Whether a strategy may continue with the next candidate
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ProviderCallFailure { .. })
    }

    /// Provider that produced the error, if any
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::ProviderNotRegistered(id) => Some(id),
            Self::ProviderCallFailure { provider, .. } => Some(provider),
            _ => None,
        }
    }
}
