// ── SOMX Atoms: Error Types ────────────────────────────────────────────────
// Single canonical error enum for the service, built with `thiserror`.
//
// Design rules:
//   • `Upstream` is the only variant that maps to 502; everything else is an
//     internal failure (500).
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • Amount parse failures never reach this type; somx-core degrades them
//     to a zero display value.

use std::fmt;
use thiserror::Error;

/// Which explorer endpoint answered with a non-success status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamService {
    Explorer,
    BalanceApi,
}

impl fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamService::Explorer => f.write_str("Explorer"),
            UpstreamService::BalanceApi => f.write_str("Balance API"),
        }
    }
}

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    /// Explorer or balance API responded with a non-success HTTP status.
    #[error("{service} {status}")]
    Upstream { service: UpstreamService, status: u16 },

    /// HTTP / network failure (reqwest layer).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem or socket I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feed configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catch-all for errors that do not yet have a dedicated variant.
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    pub fn upstream(service: UpstreamService, status: u16) -> Self {
        Self::Upstream { service, status }
    }

    /// HTTP status the endpoint answers with for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::Upstream { .. } => 502,
            _ => 500,
        }
    }
}

impl From<String> for EngineError {
    fn from(s: String) -> Self {
        EngineError::Other(s)
    }
}

impl From<&str> for EngineError {
    fn from(s: &str) -> Self {
        EngineError::Other(s.to_string())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All service operations return this type.
pub type EngineResult<T> = Result<T, EngineError>;
