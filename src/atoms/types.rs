// ── SOMX Atoms: Response Types ─────────────────────────────────────────────
// JSON bodies returned by the feed endpoint.

use crate::atoms::error::EngineError;
use serde::Serialize;
use somx_core::{PurchaseBatch, PurchaseRecord};

/// 200 body: purchases newer than the caller's watermark.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub success: bool,
    pub newest_block: u64,
    pub count: usize,
    pub transactions: Vec<PurchaseRecord>,
}

impl From<PurchaseBatch> for FeedResponse {
    fn from(batch: PurchaseBatch) -> Self {
        FeedResponse {
            success: true,
            newest_block: batch.newest_block,
            count: batch.transactions.len(),
            transactions: batch.transactions,
        }
    }
}

/// 4xx/5xx body.
#[derive(Debug, Clone, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>) -> Self {
        FailureResponse { success: false, error: error.into() }
    }
}

impl From<&EngineError> for FailureResponse {
    fn from(e: &EngineError) -> Self {
        FailureResponse::new(e.to_string())
    }
}
