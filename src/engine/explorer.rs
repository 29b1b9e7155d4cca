// SOMX Feed — Blockscout Explorer Client
// Fetches the contract's transaction list and coin-balance history.

use crate::atoms::error::{EngineError, EngineResult, UpstreamService};
use crate::engine::config::FeedConfig;
use log::{debug, warn};
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Duration;

/// Both upstream pages, already unwrapped to their `items` arrays.
#[derive(Debug, Clone, Default)]
pub struct ExplorerPages {
    pub transactions: Vec<Value>,
    pub balance_history: Vec<Value>,
}

pub struct ExplorerClient {
    http: reqwest::Client,
    transactions_url: String,
    balance_history_url: String,
}

impl ExplorerClient {
    pub fn new(config: &FeedConfig) -> EngineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(ExplorerClient {
            http,
            transactions_url: config.transactions_url(),
            balance_history_url: config.balance_history_url(),
        })
    }

    /// Request both pages concurrently. Statuses are checked transactions
    /// first, so a double outage reports the explorer.
    pub async fn fetch_pages(&self) -> EngineResult<ExplorerPages> {
        let (txs, balance) = tokio::join!(self.get(&self.transactions_url), self.get(&self.balance_history_url));

        let txs = ensure_success(UpstreamService::Explorer, txs?)?;
        let balance = ensure_success(UpstreamService::BalanceApi, balance?)?;

        let pages = ExplorerPages {
            transactions: read_items(txs).await?,
            balance_history: read_items(balance).await?,
        };
        debug!(
            "[explorer] {} transaction items, {} balance items",
            pages.transactions.len(),
            pages.balance_history.len()
        );
        Ok(pages)
    }

    async fn get(&self, url: &str) -> EngineResult<reqwest::Response> {
        let resp = self.http.get(url).header(ACCEPT, "application/json").send().await?;
        Ok(resp)
    }
}

fn ensure_success(service: UpstreamService, resp: reqwest::Response) -> EngineResult<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        warn!("[explorer] {} returned {}", service, status);
        return Err(EngineError::upstream(service, status.as_u16()));
    }
    Ok(resp)
}

/// Body → `items` array. A body without an array of items is an empty page.
async fn read_items(resp: reqwest::Response) -> EngineResult<Vec<Value>> {
    let bytes = resp.bytes().await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    Ok(items_of(body))
}

fn items_of(body: Value) -> Vec<Value> {
    match body {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
