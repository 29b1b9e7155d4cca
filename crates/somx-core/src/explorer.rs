// SOMX Core — Blockscout v2 Item Readers
// Lenient field access over raw explorer JSON. Every field may be missing
// or mistyped; a bad field only affects its own record.

use crate::amount::{to_approx_float_json, Scale};
use serde_json::Value;

/// Contract method that marks a presale purchase.
pub const PURCHASE_METHOD: &str = "buyTokens";

/// The subset of a Blockscout transaction item the feed reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplorerTransaction {
    pub method: Option<String>,
    pub status: Option<String>,
    pub result: Option<String>,
    pub from: Option<String>,
    pub value: Value,
    pub hash: Option<String>,
    /// `None` when present but not a usable block number.
    pub block: Option<u64>,
    pub timestamp: Option<String>,
}

impl ExplorerTransaction {
    pub fn from_json(item: &Value) -> Self {
        ExplorerTransaction {
            method: str_field(item, "method"),
            status: str_field(item, "status"),
            result: str_field(item, "result"),
            from: item.get("from").and_then(|f| str_field(f, "hash")),
            value: item.get("value").cloned().unwrap_or(Value::Null),
            hash: str_field(item, "hash"),
            block: parse_block_number(item.get("block_number").unwrap_or(&Value::Null)),
            timestamp: item.get("timestamp").and_then(|t| match t {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
        }
    }

    /// `buyTokens` call that the chain accepted (either success field counts).
    pub fn is_successful_purchase(&self) -> bool {
        self.method.as_deref() == Some(PURCHASE_METHOD)
            && (self.status.as_deref() == Some("ok") || self.result.as_deref() == Some("success"))
    }

    /// Block used for ordering; unusable numbers sort as block 0.
    pub fn sort_block(&self) -> u64 {
        self.block.unwrap_or(0)
    }
}

fn str_field(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).map(String::from)
}

/// Block number from a JSON number or numeric string. Null means block 0;
/// fractional values are floored; negatives and text are unusable.
pub fn parse_block_number(v: &Value) -> Option<u64> {
    match v {
        Value::Null => Some(0),
        Value::Number(n) => n.as_u64().or_else(|| float_block(n.as_f64()?)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(0);
            }
            s.parse::<u64>().ok().or_else(|| float_block(s.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

fn float_block(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f <= u64::MAX as f64 {
        Some(f.floor() as u64)
    } else {
        None
    }
}

/// Total raised in display units from a coin-balance-history page.
/// Items are newest first; an empty page or missing value is zero.
pub fn latest_total_raised(history: &[Value], scale: Scale) -> f64 {
    history
        .first()
        .and_then(|latest| latest.get("value"))
        .map(|v| to_approx_float_json(v, scale))
        .unwrap_or(0.0)
}
