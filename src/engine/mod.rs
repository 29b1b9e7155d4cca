// SOMX Feed Engine — explorer I/O around the pure somx-core logic.
//
//   config   — feed.toml + SOMX_* environment overrides
//   explorer — Blockscout transaction list + coin-balance-history client
//   feed     — one request: fetch, price the presale, select new purchases
//   server   — raw TCP HTTP endpoint (GET /api/somx?sinceBlock=N)

pub mod config;
pub mod explorer;
pub mod feed;
pub mod server;
