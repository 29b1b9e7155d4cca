// SOMX Feed — Purchase Feed Handler
// One request: fetch explorer pages, price the presale, select new buys.

use crate::atoms::error::EngineResult;
use crate::atoms::types::FeedResponse;
use crate::engine::config::FeedConfig;
use crate::engine::explorer::{ExplorerClient, ExplorerPages};
use log::{info, warn};
use somx_core::explorer::latest_total_raised;
use somx_core::{select_new_purchases, PresaleSnapshot, SelectionContext, TierSchedule};

pub struct FeedService {
    config: FeedConfig,
    client: ExplorerClient,
    schedule: TierSchedule,
}

impl FeedService {
    pub fn new(config: FeedConfig) -> EngineResult<Self> {
        config.validate()?;
        let client = ExplorerClient::new(&config)?;
        let schedule = config.tier_schedule();
        Ok(FeedService { config, client, schedule })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Purchases strictly above `watermark`, with the current presale tier.
    pub async fn new_purchases(&self, watermark: u64) -> EngineResult<FeedResponse> {
        let pages = self.client.fetch_pages().await?;
        Ok(self.build_response(&pages, watermark))
    }

    /// Pure half of [`new_purchases`]: pages in, response out.
    pub fn build_response(&self, pages: &ExplorerPages, watermark: u64) -> FeedResponse {
        let scale = self.config.scale();
        let presale = self.presale_snapshot(pages);

        let ctx = SelectionContext { scale, explorer_tx_base: &self.config.explorer_tx_base, presale };
        let batch = select_new_purchases(&pages.transactions, watermark, &ctx);

        let degraded = batch.degraded_count();
        if degraded > 0 {
            warn!("[feed] {} purchase amount(s) could not be parsed and were reported as 0", degraded);
        }
        info!(
            "[feed] since={} new={} newest={} raised={:.4} tier={} progress={}%",
            watermark,
            batch.transactions.len(),
            batch.newest_block,
            presale.total_raised,
            presale.tier,
            presale.progress_pct
        );
        FeedResponse::from(batch)
    }

    fn presale_snapshot(&self, pages: &ExplorerPages) -> PresaleSnapshot {
        let total_raised = latest_total_raised(&pages.balance_history, self.config.scale());
        self.schedule.snapshot(total_raised)
    }
}

/// `sinceBlock` query value → watermark. Fractions are floored; missing,
/// negative or non-numeric values mean "from the beginning" (0).
pub fn parse_watermark(raw: Option<&str>) -> u64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };
    if let Ok(v) = raw.parse::<u64>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f <= u64::MAX as f64 => f.floor() as u64,
        _ => 0,
    }
}
