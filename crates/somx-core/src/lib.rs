// ── SOMX Core ──────────────────────────────────────────────────────────────
// Pure presale logic — zero side effects, no I/O.
//
//   amount   — base units → fixed 4-decimal display strings and f64
//   tier     — presale progress → pricing tier, bonus and unit price
//   explorer — lenient readers for Blockscout v2 transaction / balance items
//   purchase — successful buyTokens selection above a block watermark
//   error    — conversion failure kinds (never surfaced as request errors)

pub mod amount;
pub mod error;
pub mod explorer;
pub mod purchase;
pub mod tier;

pub use amount::{
    to_approx_float, to_approx_float_json, to_fixed_display, to_fixed_display_json, BaseUnits, FixedDisplay, Scale,
    MAX_DECIMALS,
};
pub use error::AmountError;
pub use explorer::{latest_total_raised, ExplorerTransaction};
pub use purchase::{select_new_purchases, PurchaseBatch, PurchaseRecord, SelectionContext};
pub use tier::{compute_tier, PresaleSnapshot, PresaleTierInfo, TierSchedule, PRESALE_TARGET};
