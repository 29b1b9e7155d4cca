// ── SOMX Atoms: Constants ──────────────────────────────────────────────────
// Defaults for the feed configuration. Every value here can be overridden
// from feed.toml or the environment; see engine/config.rs.

// ── Upstream explorer (Blockscout v2 on Somnia mainnet) ────────────────────
pub(crate) const DEFAULT_API_BASE: &str = "https://mainnet.somnia.w3us.site/api/v2";
pub(crate) const DEFAULT_CONTRACT: &str = "0x622386489BCbc8Ee78557637073407343053a566";
/// Query string for the address transactions listing (URL-encoded "to | from").
pub(crate) const TRANSACTIONS_FILTER: &str = "filter=to%20%7C%20from";
/// Base of the human-facing transaction links in each purchase record.
pub(crate) const DEFAULT_EXPLORER_TX_BASE: &str = "https://explorer.somnia.network/tx/";
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("somx-feed/", env!("CARGO_PKG_VERSION"));
pub(crate) const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

// ── HTTP server ────────────────────────────────────────────────────────────
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1";
pub(crate) const DEFAULT_PORT: u16 = 3000;
pub(crate) const FEED_PATH: &str = "/api/somx";
pub(crate) const HEALTH_PATH: &str = "/health";
/// Largest request head read from a client; the endpoint only takes GETs.
pub(crate) const MAX_REQUEST_BYTES: usize = 16 * 1024;
pub(crate) const REQUEST_HEAD_TIMEOUT_SECS: u64 = 10;

// ── Config file discovery ──────────────────────────────────────────────────
pub(crate) const CONFIG_DIR_NAME: &str = "somx";
pub(crate) const CONFIG_FILE_NAME: &str = "feed.toml";
