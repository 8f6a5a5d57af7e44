//! Strategy identifiers and the shared input/output shapes

use crate::core::types::{PromptPayload, ProviderId, TokenSink};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dispatch policy deciding how candidates are tried for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// One ranked candidate at a time until the first success
    Sequential,
    /// All admitted candidates concurrently; first success wins
    Parallel,
    /// Scored best, then at most one next-best
    #[default]
    FallbackOnly,
    /// Streaming-capable candidates first, then sequential over the rest
    StreamFirst,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Sequential,
        StrategyKind::Parallel,
        StrategyKind::FallbackOnly,
        StrategyKind::StreamFirst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Sequential => "sequential",
            StrategyKind::Parallel => "parallel",
            StrategyKind::FallbackOnly => "fallback-only",
            StrategyKind::StreamFirst => "stream-first",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown strategy: {s}"))
    }
}

/// Input shared by every strategy
#[derive(Debug, Clone)]
pub struct StrategyInput {
    pub payload: PromptPayload,
    /// Providers to consider; empty means every registered provider
    pub candidates: Vec<ProviderId>,
    /// Receives streamed tokens (stream-first only)
    pub on_token: Option<TokenSink>,
}

impl StrategyInput {
    pub fn new(payload: PromptPayload) -> Self {
        Self {
            payload,
            candidates: Vec::new(),
            on_token: None,
        }
    }

    /// Restrict the candidate set (builder pattern)
    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ProviderId>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_token_sink(mut self, on_token: TokenSink) -> Self {
        self.on_token = Some(on_token);
        self
    }
}

/// Result of a successful strategy run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOutput {
    /// The strategy that produced this output
    pub strategy: StrategyKind,
    pub request_id: String,
    /// Provider whose call succeeded
    pub provider_id: ProviderId,
    pub output: String,
    /// Providers actually called, in the order the calls were issued
    pub attempts: Vec<ProviderId>,
    /// Whether the output was produced by a streamed call
    pub streamed: bool,
}

/// Which providers a run called and which it skipped for cooldown
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct AttemptTrail {
    pub attempted: Vec<ProviderId>,
    pub skipped: Vec<ProviderId>,
}
