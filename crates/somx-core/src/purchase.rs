// SOMX Core — Purchase Selection
// Successful buyTokens calls above the caller's block watermark, oldest first.

use crate::amount::{to_fixed_display_json, FixedDisplay, Scale};
use crate::explorer::ExplorerTransaction;
use crate::tier::PresaleSnapshot;
use serde::Serialize;
use serde_json::Value;

/// Shared inputs for turning explorer items into purchase records.
#[derive(Debug, Clone)]
pub struct SelectionContext<'a> {
    pub scale: Scale,
    /// Prefix for transaction links, e.g. "https://explorer.somnia.network/tx/".
    pub explorer_tx_base: &'a str,
    pub presale: PresaleSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub buyer: String,
    #[serde(rename = "amountSOMI")]
    pub amount_somi: FixedDisplay,
    pub tx_hash: String,
    pub block: u64,
    pub timestamp: Option<String>,
    pub explorer_link: Option<String>,
    pub presale: PresaleSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseBatch {
    /// Highest block among selected purchases, or the watermark if none.
    pub newest_block: u64,
    pub transactions: Vec<PurchaseRecord>,
}

impl PurchaseBatch {
    /// Records whose amount fell back to zero.
    pub fn degraded_count(&self) -> usize {
        self.transactions.iter().filter(|t| t.amount_somi.is_degraded()).count()
    }
}

/// Select new purchases from a page of explorer transaction items.
///
/// Items are stable-sorted by block so `newest_block` only grows while
/// scanning and same-block purchases keep their page order.
pub fn select_new_purchases(items: &[Value], watermark: u64, ctx: &SelectionContext<'_>) -> PurchaseBatch {
    let mut txs: Vec<ExplorerTransaction> = items.iter().map(ExplorerTransaction::from_json).collect();
    txs.sort_by_key(ExplorerTransaction::sort_block);

    let mut newest_block = watermark;
    let mut transactions = Vec::new();

    for tx in txs {
        if !tx.is_successful_purchase() {
            continue;
        }
        let block = match tx.block {
            Some(b) if b > watermark => b,
            _ => continue,
        };

        let hash = tx.hash.filter(|h| !h.is_empty());
        transactions.push(PurchaseRecord {
            buyer: tx.from.filter(|h| !h.is_empty()).unwrap_or_else(|| "unknown".into()),
            amount_somi: to_fixed_display_json(&tx.value, ctx.scale),
            explorer_link: hash.as_ref().map(|h| format!("{}{}", ctx.explorer_tx_base, h)),
            tx_hash: hash.unwrap_or_default(),
            block,
            timestamp: tx.timestamp,
            presale: ctx.presale,
        });

        if block > newest_block {
            newest_block = block;
        }
    }

    PurchaseBatch { newest_block, transactions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier::TierSchedule;
    use serde_json::json;

    fn ctx() -> SelectionContext<'static> {
        SelectionContext {
            scale: Scale::default(),
            explorer_tx_base: "https://explorer.somnia.network/tx/",
            presale: TierSchedule::default().snapshot(100_000.0),
        }
    }

    fn buy(block: u64, hash: &str) -> Value {
        json!({
            "method": "buyTokens",
            "status": "ok",
            "from": { "hash": format!("0xbuyer{}", block) },
            "value": "1234500000000000000",
            "hash": hash,
            "block_number": block,
            "timestamp": "2025-09-01T10:00:00Z"
        })
    }

    #[test]
    fn watermark_filters_and_advances() {
        let items = vec![buy(5, "0x05"), buy(3, "0x03"), buy(9, "0x09")];
        let batch = select_new_purchases(&items, 4, &ctx());
        let blocks: Vec<u64> = batch.transactions.iter().map(|t| t.block).collect();
        assert_eq!(blocks, vec![5, 9]);
        assert_eq!(batch.newest_block, 9);
    }

    #[test]
    fn nothing_new_keeps_watermark() {
        let items = vec![buy(2, "0x02"), buy(3, "0x03")];
        let batch = select_new_purchases(&items, 3, &ctx());
        assert!(batch.transactions.is_empty());
        assert_eq!(batch.newest_block, 3);
    }

    #[test]
    fn same_block_keeps_page_order() {
        let items = vec![buy(8, "0xb"), buy(7, "0xa"), buy(8, "0xc")];
        let batch = select_new_purchases(&items, 0, &ctx());
        let hashes: Vec<&str> = batch.transactions.iter().map(|t| t.tx_hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xa", "0xb", "0xc"]);
    }

    #[test]
    fn skips_failed_and_foreign_calls() {
        let mut failed = buy(10, "0xf");
        failed["status"] = json!("error");
        let mut claim = buy(11, "0xc");
        claim["method"] = json!("claim");
        let mut bad_block = buy(12, "0xd");
        bad_block["block_number"] = json!("pending");
        let items = vec![failed, claim, bad_block, buy(13, "0xe")];
        let batch = select_new_purchases(&items, 0, &ctx());
        assert_eq!(batch.transactions.len(), 1);
        assert_eq!(batch.transactions[0].tx_hash, "0xe");
        assert_eq!(batch.newest_block, 13);
    }

    #[test]
    fn record_fields_and_defaults() {
        let items = vec![
            buy(20, "0xfeed"),
            json!({"method": "buyTokens", "result": "success", "block_number": 21, "value": "oops"}),
        ];
        let batch = select_new_purchases(&items, 0, &ctx());
        let first = &batch.transactions[0];
        assert_eq!(first.buyer, "0xbuyer20");
        assert_eq!(first.amount_somi.as_str(), "1.2345");
        assert_eq!(first.explorer_link.as_deref(), Some("https://explorer.somnia.network/tx/0xfeed"));
        assert_eq!(first.presale.tier, 1);

        let second = &batch.transactions[1];
        assert_eq!(second.buyer, "unknown");
        assert_eq!(second.tx_hash, "");
        assert_eq!(second.explorer_link, None);
        assert_eq!(second.timestamp, None);
        assert!(second.amount_somi.is_degraded());
        assert_eq!(batch.degraded_count(), 1);
    }

    #[test]
    fn record_wire_shape() {
        let batch = select_new_purchases(&[buy(30, "0x30")], 0, &ctx());
        let v = serde_json::to_value(&batch.transactions[0]).unwrap();
        assert_eq!(v["amountSOMI"], "1.2345");
        assert_eq!(v["txHash"], "0x30");
        assert_eq!(v["block"], 30);
        assert_eq!(v["explorerLink"], "https://explorer.somnia.network/tx/0x30");
        assert_eq!(v["presale"]["priceSOMI"], 0.025);
        assert_eq!(v["presale"]["totalRaised"], 100_000.0);
    }
}
