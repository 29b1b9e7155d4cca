// ── SOMX Core: Error Types ─────────────────────────────────────────────────
// Amount parsing failures. These are swallowed by the converter and turned
// into a degraded "0" display value, so one malformed amount never aborts a
// batch. They stay typed so callers and tests can tell a real zero apart
// from a fallback.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Non-empty input that carries no decimal digit at all.
    #[error("no digits in amount {0:?}")]
    NoDigits(String),

    /// Leading minus sign; base-unit amounts are unsigned.
    #[error("negative amount {0:?}")]
    Negative(String),

    /// JSON value that is neither a string nor a number.
    #[error("unsupported amount type: {0}")]
    Unsupported(&'static str),
}
