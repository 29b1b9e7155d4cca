// SOMX Core — Amount Conversion
// Base-unit integers (wei-style, arbitrary size) to display units.
//
// Amounts are kept as normalized decimal digit strings. Dividing by
// 10^decimals is then a split at a digit position, so the whole part and
// the floored fraction are exact for any input length.

use crate::error::AmountError;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Fractional digits in the fixed display form ("1.2345").
pub const DISPLAY_FRACTION_DIGITS: usize = 4;

/// Decimals of the native SOMI coin (1 SOMI = 10^18 base units).
pub const DEFAULT_DECIMALS: u32 = 18;

/// Largest accepted scale. 10^77 is the biggest power of ten below 2^256,
/// so no on-chain uint256 amount needs more.
pub const MAX_DECIMALS: u32 = 77;

// ── Scale ─────────────────────────────────────────────────────────────

/// Base units per display unit, expressed as a power of ten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scale {
    decimals: u32,
}

impl Scale {
    pub const fn new(decimals: u32) -> Self {
        Scale { decimals }
    }

    pub const fn decimals(self) -> u32 {
        self.decimals
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::new(DEFAULT_DECIMALS)
    }
}

// ── Base units ────────────────────────────────────────────────────────

/// An unsigned integer amount in the smallest denomination.
/// Invariant: `digits` is ASCII digits only, no leading zeros, "0" for zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUnits {
    digits: String,
}

impl BaseUnits {
    pub fn zero() -> Self {
        BaseUnits { digits: "0".into() }
    }

    /// Parse a base-unit string, dropping every non-digit character.
    /// Blank input is a legitimate zero; input with no digit is an error.
    pub fn parse(raw: &str) -> Result<Self, AmountError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::zero());
        }
        if trimmed.starts_with('-') {
            return Err(AmountError::Negative(trimmed.to_string()));
        }
        let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(AmountError::NoDigits(trimmed.to_string()));
        }
        Ok(Self::from_digits(&digits))
    }

    /// Read an amount from an explorer JSON field (string or number).
    /// A missing / null field is zero.
    pub fn from_json(value: &Value) -> Result<Self, AmountError> {
        match value {
            Value::Null => Ok(Self::zero()),
            Value::String(s) => Self::parse(s),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    return Ok(Self::from(u));
                }
                if n.as_i64().is_some() {
                    return Err(AmountError::Negative(n.to_string()));
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() && f >= 0.0 => Ok(Self::from_digits(&format!("{:.0}", f.trunc()))),
                    Some(f) if f < 0.0 => Err(AmountError::Negative(n.to_string())),
                    _ => Err(AmountError::Unsupported("number")),
                }
            }
            Value::Bool(_) => Err(AmountError::Unsupported("bool")),
            Value::Array(_) => Err(AmountError::Unsupported("array")),
            Value::Object(_) => Err(AmountError::Unsupported("object")),
        }
    }

    fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Self::zero()
        } else {
            BaseUnits { digits: trimmed.to_string() }
        }
    }

    /// `(amount div 10^d, amount mod 10^d)`, the remainder zero-padded to `d` digits.
    pub fn split(&self, scale: Scale) -> (String, String) {
        let dec = scale.decimals() as usize;
        if dec == 0 {
            return (self.digits.clone(), String::new());
        }
        if self.digits.len() <= dec {
            let frac = format!("{:0>width$}", self.digits, width = dec);
            return ("0".into(), frac);
        }
        let (whole, frac) = self.digits.split_at(self.digits.len() - dec);
        (whole.to_string(), frac.to_string())
    }

    /// Fixed-point display with `fraction_digits` digits, floored.
    ///
    /// Equivalent to `whole.(remainder * 10^k div 10^d)` zero-padded to `k`:
    /// the leading `k` digits of the padded remainder, or the remainder
    /// followed by zeros when the asset has fewer than `k` decimals.
    pub fn to_fixed(&self, scale: Scale, fraction_digits: usize) -> String {
        let (whole, remainder) = self.split(scale);
        if fraction_digits == 0 {
            return whole;
        }
        let mut frac: String = remainder.chars().take(fraction_digits).collect();
        while frac.len() < fraction_digits {
            frac.push('0');
        }
        format!("{}.{}", whole, frac)
    }

    /// Approximate display value. Loses precision past 2^53 base units of
    /// significance; very large values saturate to infinity instead of failing.
    pub fn to_f64(&self, scale: Scale) -> f64 {
        format!("{}e-{}", self.digits, scale.decimals())
            .parse::<f64>()
            .unwrap_or(0.0)
    }
}

impl From<u64> for BaseUnits {
    fn from(v: u64) -> Self {
        BaseUnits { digits: v.to_string() }
    }
}

impl fmt::Display for BaseUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

// ── Fixed display result ──────────────────────────────────────────────

/// Output of [`to_fixed_display`]. `Degraded` renders as "0" (no fraction),
/// which keeps the fallback visible on the wire as well as in code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedDisplay {
    Value(String),
    Degraded(AmountError),
}

impl FixedDisplay {
    pub fn as_str(&self) -> &str {
        match self {
            FixedDisplay::Value(s) => s,
            FixedDisplay::Degraded(_) => "0",
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, FixedDisplay::Degraded(_))
    }
}

impl fmt::Display for FixedDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FixedDisplay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn fixed_from(parsed: Result<BaseUnits, AmountError>, scale: Scale) -> FixedDisplay {
    match parsed {
        Ok(units) => FixedDisplay::Value(units.to_fixed(scale, DISPLAY_FRACTION_DIGITS)),
        Err(e) => {
            log::debug!("[amount] degraded to 0: {}", e);
            FixedDisplay::Degraded(e)
        }
    }
}

// ── Converter entry points ────────────────────────────────────────────

/// Base-unit string → "whole.ffff". Never fails; bad input is `Degraded`.
pub fn to_fixed_display(raw: &str, scale: Scale) -> FixedDisplay {
    fixed_from(BaseUnits::parse(raw), scale)
}

/// Same as [`to_fixed_display`] for an explorer JSON field.
pub fn to_fixed_display_json(value: &Value, scale: Scale) -> FixedDisplay {
    fixed_from(BaseUnits::from_json(value), scale)
}

/// Base-unit string → approximate display units; 0.0 for bad input.
pub fn to_approx_float(raw: &str, scale: Scale) -> f64 {
    BaseUnits::parse(raw).map(|u| u.to_f64(scale)).unwrap_or(0.0)
}

/// Same as [`to_approx_float`] for an explorer JSON field.
pub fn to_approx_float_json(value: &Value, scale: Scale) -> f64 {
    BaseUnits::from_json(value).map(|u| u.to_f64(scale)).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WEI: Scale = Scale::new(18);

    fn is_fixed4(s: &str) -> bool {
        match s.split_once('.') {
            Some((whole, frac)) => {
                !whole.is_empty()
                    && whole.chars().all(|c| c.is_ascii_digit())
                    && frac.len() == 4
                    && frac.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        }
    }

    #[test]
    fn zero_formats_with_four_places() {
        assert_eq!(to_fixed_display("0", WEI).as_str(), "0.0000");
    }

    #[test]
    fn one_point_two_three_four_five() {
        let out = to_fixed_display("1234500000000000000", WEI);
        assert_eq!(out, FixedDisplay::Value("1.2345".into()));
        assert!(!out.is_degraded());
    }

    #[test]
    fn garbage_degrades_to_zero() {
        let out = to_fixed_display("garbage", WEI);
        assert_eq!(out.as_str(), "0");
        assert_eq!(out, FixedDisplay::Degraded(AmountError::NoDigits("garbage".into())));
    }

    #[test]
    fn blank_is_a_real_zero() {
        let out = to_fixed_display("   ", WEI);
        assert_eq!(out.as_str(), "0.0000");
        assert!(!out.is_degraded());
    }

    #[test]
    fn negative_degrades() {
        let out = to_fixed_display("-5000", WEI);
        assert!(out.is_degraded());
        assert_eq!(out.to_string(), "0");
    }

    #[test]
    fn strips_symbols_and_whitespace() {
        assert_eq!(to_fixed_display(" $2,000000000000000000 wei", WEI).as_str(), "2.0000");
    }

    #[test]
    fn fraction_is_floored_not_rounded() {
        // 0.99999... SOMI
        assert_eq!(to_fixed_display("999999999999999999", WEI).as_str(), "0.9999");
        // 1 wei
        assert_eq!(to_fixed_display("1", WEI).as_str(), "0.0000");
        // exactly 0.0001
        assert_eq!(to_fixed_display("100000000000000", WEI).as_str(), "0.0001");
    }

    #[test]
    fn values_beyond_u128_keep_every_whole_digit() {
        let raw = "123456789012345678901234567890123456789012345678905555000000000000000";
        let out = to_fixed_display(raw, WEI);
        assert_eq!(out.as_str(), "123456789012345678901234567890123456789012345678905.5550");
    }

    #[test]
    fn reconstructs_within_truncation() {
        // every power of ten and its neighbours, through 10^38
        let mut samples = vec![0u128, 1_234_500_000_000_000_000, 98_765_432_109_876_543_210_987, u128::MAX];
        for k in 0..=38 {
            let p = 10u128.pow(k);
            samples.extend([p - 1, p, p + 1]);
        }
        for w in samples {
            let out = to_fixed_display(&w.to_string(), WEI);
            assert!(is_fixed4(out.as_str()), "bad shape for {}: {}", w, out);
            let (whole, frac) = out.as_str().split_once('.').unwrap();
            let whole: u128 = whole.parse().unwrap();
            let frac: u128 = frac.parse().unwrap();
            let floor = whole * 10u128.pow(18) + frac * 10u128.pow(14);
            assert!(floor <= w, "{} > {}", floor, w);
            assert!(w - floor < 10u128.pow(14), "truncation too large for {}", w);
        }
    }

    #[test]
    fn other_scales() {
        // USDC-style 6 decimals
        assert_eq!(to_fixed_display("1234567", Scale::new(6)).as_str(), "1.2345");
        // fewer decimals than display places pads with zeros
        assert_eq!(to_fixed_display("12345", Scale::new(2)).as_str(), "123.4500");
        assert_eq!(to_fixed_display("42", Scale::new(0)).as_str(), "42.0000");
    }

    #[test]
    fn json_inputs() {
        assert_eq!(to_fixed_display_json(&json!("2500000000000000000"), WEI).as_str(), "2.5000");
        assert_eq!(to_fixed_display_json(&json!(3000000000000000000u64), WEI).as_str(), "3.0000");
        assert_eq!(to_fixed_display_json(&json!(1.5e18), WEI).as_str(), "1.5000");
        assert_eq!(to_fixed_display_json(&Value::Null, WEI).as_str(), "0.0000");
        assert!(to_fixed_display_json(&json!(true), WEI).is_degraded());
        assert!(to_fixed_display_json(&json!(-1), WEI).is_degraded());
        assert!(to_fixed_display_json(&json!({"v": 1}), WEI).is_degraded());
    }

    #[test]
    fn approx_float() {
        assert_eq!(to_approx_float("1500000000000000000", WEI), 1.5);
        assert_eq!(to_approx_float("0", WEI), 0.0);
        assert_eq!(to_approx_float("garbage", WEI), 0.0);
        assert_eq!(to_approx_float_json(&json!("250000000000000000000000"), WEI), 250_000.0);
        let huge = "9".repeat(400);
        assert!(to_approx_float(&huge, WEI).is_infinite());
    }

    #[test]
    fn degraded_serializes_as_plain_zero() {
        let out = to_fixed_display("n/a", WEI);
        assert_eq!(serde_json::to_string(&out).unwrap(), "\"0\"");
        let ok = to_fixed_display("1000000000000000000", WEI);
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"1.0000\"");
    }
}
