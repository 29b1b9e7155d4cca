// ── SOMX Atoms Layer ───────────────────────────────────────────────────────
// Constants, error types and response shapes — zero side effects, no I/O.
// Dependency rule: atoms may only depend on std, somx-core and pure crates.
// Nothing here may import from engine/ or lib.rs.

pub mod constants;
pub mod error;
pub mod types;
