// SOMX Core — Presale Tier Pricing
// Maps cumulative SOMI raised to progress toward the target and a pricing tier.

use serde::{Deserialize, Serialize};

/// Fundraising target in display units (SOMI).
pub const PRESALE_TARGET: f64 = 2_500_000.0;

/// One pricing bracket. `max_progress` is an inclusive upper bound in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierBracket {
    pub max_progress: f64,
    pub tier: u8,
    pub bonus_pct: f64,
    pub price_somi: f64,
}

/// Brackets checked in order; the first whose bound covers progress wins.
pub const TIER_BRACKETS: &[TierBracket] = &[
    TierBracket { max_progress: 10.0, tier: 1, bonus_pct: 5.0, price_somi: 0.02500 },
    TierBracket { max_progress: 30.0, tier: 2, bonus_pct: 2.5, price_somi: 0.02625 },
    TierBracket { max_progress: 50.0, tier: 3, bonus_pct: 1.2, price_somi: 0.02756 },
];

/// Applies once progress is past every bracket in [`TIER_BRACKETS`].
pub const FINAL_TIER: TierBracket =
    TierBracket { max_progress: 100.0, tier: 4, bonus_pct: 0.0, price_somi: 0.02894 };

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresaleTierInfo {
    pub tier: u8,
    pub bonus_pct: f64,
    #[serde(rename = "priceSOMI")]
    pub price_somi: f64,
    /// Rounded to 2 decimals.
    pub progress_pct: f64,
}

/// Presale state attached to each purchase record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresaleSnapshot {
    pub total_raised: f64,
    pub progress_pct: f64,
    pub tier: u8,
    pub bonus_pct: f64,
    #[serde(rename = "priceSOMI")]
    pub price_somi: f64,
}

impl PresaleSnapshot {
    pub fn new(total_raised: f64, info: PresaleTierInfo) -> Self {
        PresaleSnapshot {
            total_raised,
            progress_pct: info.progress_pct,
            tier: info.tier,
            bonus_pct: info.bonus_pct,
            price_somi: info.price_somi,
        }
    }
}

// ── Schedule ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierSchedule {
    pub target: f64,
    pub brackets: &'static [TierBracket],
    pub final_tier: TierBracket,
}

impl Default for TierSchedule {
    fn default() -> Self {
        TierSchedule::with_target(PRESALE_TARGET)
    }
}

impl TierSchedule {
    pub fn with_target(target: f64) -> Self {
        TierSchedule { target, brackets: TIER_BRACKETS, final_tier: FINAL_TIER }
    }

    /// Unrounded progress in percent, clamped to [0, 100]. NaN counts as 0.
    pub fn progress(&self, total_raised: f64) -> f64 {
        let pct = (total_raised / self.target) * 100.0;
        if pct.is_nan() {
            return 0.0;
        }
        pct.clamp(0.0, 100.0)
    }

    /// Tier selection compares the unrounded progress; only the reported
    /// `progress_pct` is rounded.
    pub fn classify(&self, total_raised: f64) -> PresaleTierInfo {
        let progress = self.progress(total_raised);
        let bracket = self
            .brackets
            .iter()
            .find(|b| progress <= b.max_progress)
            .unwrap_or(&self.final_tier);
        PresaleTierInfo {
            tier: bracket.tier,
            bonus_pct: bracket.bonus_pct,
            price_somi: bracket.price_somi,
            progress_pct: round2(progress),
        }
    }

    pub fn snapshot(&self, total_raised: f64) -> PresaleSnapshot {
        PresaleSnapshot::new(total_raised, self.classify(total_raised))
    }
}

/// Tier for `total_raised` SOMI against [`PRESALE_TARGET`].
pub fn compute_tier(total_raised: f64) -> PresaleTierInfo {
    TierSchedule::default().classify(total_raised)
}

/// Round the exact decimal value of `v` to 2 places, ties away from zero.
/// Progress is clamped to [0, 100] before it gets here.
fn round2(v: f64) -> f64 {
    if !(v > 0.0) {
        return 0.0;
    }
    // A finite f64 has at most 1074 fractional digits, so this is exact.
    let exact = format!("{:.1074}", v);
    let (whole, frac) = match exact.split_once('.') {
        Some(parts) => parts,
        None => (exact.as_str(), ""),
    };
    let digit = |i: usize| frac.as_bytes().get(i).map_or(0, |b| u64::from(b - b'0'));
    let mut cents = whole.parse::<u64>().unwrap_or(0) * 100 + digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        cents += 1;
    }
    cents as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_raised_is_tier_one() {
        let info = compute_tier(0.0);
        assert_eq!(info.tier, 1);
        assert_eq!(info.bonus_pct, 5.0);
        assert_eq!(info.price_somi, 0.025);
        assert_eq!(info.progress_pct, 0.0);
    }

    #[test]
    fn ten_percent_boundary_is_inclusive() {
        let info = compute_tier(250_000.0);
        assert_eq!(info.progress_pct, 10.0);
        assert_eq!(info.tier, 1);
    }

    #[test]
    fn just_past_ten_percent_is_tier_two() {
        let info = compute_tier(250_000.01);
        assert_eq!(info.tier, 2);
        assert_eq!(info.bonus_pct, 2.5);
        assert_eq!(info.price_somi, 0.02625);
        // reported value rounds back down to the boundary
        assert_eq!(info.progress_pct, 10.0);
    }

    #[test]
    fn thirty_percent_boundary() {
        assert_eq!(compute_tier(750_000.0).tier, 2);
        assert_eq!(compute_tier(750_001.0).tier, 3);
    }

    #[test]
    fn fifty_percent_boundary_is_tier_three() {
        let info = compute_tier(1_250_000.0);
        assert_eq!(info.progress_pct, 50.0);
        assert_eq!(info.tier, 3);
        assert_eq!(info.bonus_pct, 1.2);
        assert_eq!(info.price_somi, 0.02756);
    }

    #[test]
    fn over_target_clamps_to_hundred() {
        let info = compute_tier(3_000_000.0);
        assert_eq!(info.progress_pct, 100.0);
        assert_eq!(info.tier, 4);
        assert_eq!(info.bonus_pct, 0.0);
        assert_eq!(info.price_somi, 0.02894);
    }

    #[test]
    fn unrounded_progress_drives_selection() {
        // 9.996% reports as 10.00 and 10.004% also reports as 10.00,
        // but only the latter is past the tier-one bound.
        let below = compute_tier(249_900.0);
        assert_eq!(below.progress_pct, 10.0);
        assert_eq!(below.tier, 1);
        let above = compute_tier(250_100.0);
        assert_eq!(above.progress_pct, 10.0);
        assert_eq!(above.tier, 2);
    }

    #[test]
    fn progress_rounds_exact_decimal_half_up() {
        // 0.015 is stored just below the tie, 0.125 exactly on it
        assert_eq!(compute_tier(375.0).progress_pct, 0.01);
        assert_eq!(compute_tier(3125.0).progress_pct, 0.13);
        assert_eq!(compute_tier(1125.0).progress_pct, 0.04);
        assert_eq!(compute_tier(2625.0).progress_pct, 0.1);
        assert_eq!(compute_tier(1.0).progress_pct, 0.0);
        assert_eq!(compute_tier(2_499_999.0).progress_pct, 100.0);
    }

    #[test]
    fn round2_edges() {
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(-0.0), 0.0);
        assert_eq!(round2(f64::MIN_POSITIVE), 0.0);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(99.994999), 99.99);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn odd_inputs_stay_in_range() {
        assert_eq!(compute_tier(-10.0).progress_pct, 0.0);
        assert_eq!(compute_tier(f64::NAN).tier, 1);
        assert_eq!(compute_tier(f64::INFINITY).progress_pct, 100.0);
    }

    #[test]
    fn custom_target() {
        let schedule = TierSchedule::with_target(1_000.0);
        let info = schedule.classify(400.0);
        assert_eq!(info.progress_pct, 40.0);
        assert_eq!(info.tier, 3);
    }

    #[test]
    fn snapshot_serializes_with_wire_names() {
        let snap = TierSchedule::default().snapshot(125_000.0);
        let v = serde_json::to_value(snap).unwrap();
        assert_eq!(v["totalRaised"], 125_000.0);
        assert_eq!(v["progressPct"], 5.0);
        assert_eq!(v["tier"], 1);
        assert_eq!(v["bonusPct"], 5.0);
        assert_eq!(v["priceSOMI"], 0.025);
    }
}
