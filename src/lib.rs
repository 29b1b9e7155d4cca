// SOMX Presale Feed
// Incremental "new buyTokens purchases since block N" endpoint for the SOMX
// presale, with the current tier, bonus and price attached to each record.

pub mod atoms;
pub mod engine;

pub use atoms::error::{EngineError, EngineResult, UpstreamService};
pub use atoms::types::{FailureResponse, FeedResponse};
pub use engine::config::FeedConfig;
pub use engine::feed::{parse_watermark, FeedService};
pub use engine::server::{run_server, serve};
