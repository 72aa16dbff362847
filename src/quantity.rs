//! Quantity - exact decimal values carried by experiment resources
//!
//! Limits and metric values arrive either as plain YAML numbers or as
//! Kubernetes-style quantity strings (`10m`, `1k`, `2Mi`, `5e-3`). They are
//! held as exact decimals so rendering never suffers binary floating-point
//! drift.
//!
//! Digits beyond [`MAX_SCALE`] places are rounded toward positive infinity,
//! so a tiny positive value never collapses to zero. Magnitudes that do not
//! fit a 96-bit decimal (about 7.9e28) are rejected.
//!
//! ## Rendering
//!
//! ```rust
//! use expctl::quantity::Quantity;
//!
//! let q: Quantity = "0.0105".parse()?;
//! assert_eq!(q.rounded(), "0.011");
//!
//! let q: Quantity = "10m".parse()?;
//! assert_eq!(q.rounded(), "0.010");
//! # Ok::<(), expctl::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Fractional digits kept when a non-integral quantity is rendered.
pub const DISPLAY_DIGITS: u32 = 3;

/// Most fractional digits a quantity can hold.
pub const MAX_SCALE: u32 = 28;

/// An exact decimal quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Wrap an existing decimal.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Get the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Render the quantity the way reports show it.
    ///
    /// Integral values print as plain integers (`0`, `1000`). Anything with a
    /// fractional part is rounded toward positive infinity to
    /// [`DISPLAY_DIGITS`] places and printed with exactly that many digits.
    #[must_use]
    pub fn rounded(&self) -> String {
        if self.0.fract().is_zero() {
            return positive_zero(self.0.trunc()).to_string();
        }
        let mut rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_DIGITS, RoundingStrategy::ToPositiveInfinity);
        rounded.rescale(DISPLAY_DIGITS);
        positive_zero(rounded).to_string()
    }
}

// -0.0004 rounds up to zero; never print it as "-0.000".
fn positive_zero(mut value: Decimal) -> Decimal {
    if value.is_zero() {
        value.set_sign_positive(true);
    }
    value
}

impl From<Decimal> for Quantity {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        let split = input
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.')))
            .unwrap_or(input.len());
        let (number, suffix) = input.split_at(split);
        let number = number.strip_prefix('+').unwrap_or(number);

        let base = parse_decimal(number).ok_or_else(|| Error::InvalidQuantity(s.to_string()))?;
        apply_suffix(base, suffix)
            .map(Self)
            .ok_or_else(|| Error::InvalidQuantity(s.to_string()))
    }
}

// Ceiling-truncates fractional digits past MAX_SCALE.
fn parse_decimal(number: &str) -> Option<Decimal> {
    let max = MAX_SCALE as usize;
    let Some((int, frac)) = number.split_once('.').filter(|(_, frac)| frac.len() > max) else {
        return Decimal::from_str(number).ok();
    };
    let (kept, dropped) = frac.split_at(max);
    if !dropped.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = Decimal::from_str(&format!("{int}.{kept}")).ok()?;
    if int.starts_with('-') || dropped.bytes().all(|b| b == b'0') {
        // Truncation already moved a negative value toward +inf.
        return Some(value);
    }
    value.checked_add(Decimal::new(1, value.scale()))
}

fn apply_suffix(base: Decimal, suffix: &str) -> Option<Decimal> {
    let binary = |power: u32| base.checked_mul(Decimal::from(1_u64 << (10 * power)));
    match suffix {
        "" => Some(base),
        "n" => scale_pow10(base, -9),
        "u" => scale_pow10(base, -6),
        "m" => scale_pow10(base, -3),
        "k" => scale_pow10(base, 3),
        "M" => scale_pow10(base, 6),
        "G" => scale_pow10(base, 9),
        "T" => scale_pow10(base, 12),
        "P" => scale_pow10(base, 15),
        "E" => scale_pow10(base, 18),
        "Ki" => binary(1),
        "Mi" => binary(2),
        "Gi" => binary(3),
        "Ti" => binary(4),
        "Pi" => binary(5),
        "Ei" => binary(6),
        _ => {
            let exponent = suffix
                .strip_prefix('e')
                .or_else(|| suffix.strip_prefix('E'))?;
            scale_pow10(base, exponent.parse().ok()?)
        }
    }
}

fn scale_pow10(value: Decimal, exponent: i32) -> Option<Decimal> {
    if value.is_zero() {
        return Some(value);
    }
    if exponent >= 0 {
        // A non-zero value overflows within a few dozen steps.
        (0..exponent).try_fold(value, |acc, _| acc.checked_mul(Decimal::TEN))
    } else {
        shift_right(value, exponent.unsigned_abs())
    }
}

// Divides by 10^places, rounding toward +inf once the scale passes MAX_SCALE.
fn shift_right(value: Decimal, places: u32) -> Option<Decimal> {
    let scale = value.scale().checked_add(places)?;
    if scale <= MAX_SCALE {
        let mut scaled = value;
        scaled.set_scale(scale).ok()?;
        return Some(scaled);
    }
    let mantissa = value.mantissa();
    let (kept, inexact) = match 10_i128.checked_pow(scale - MAX_SCALE) {
        Some(divisor) => (mantissa / divisor, mantissa % divisor != 0),
        None => (0, true),
    };
    let kept = if inexact && mantissa > 0 { kept + 1 } else { kept };
    Decimal::try_from_i128_with_scale(kept, MAX_SCALE).ok()
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(QuantityVisitor)
    }
}

struct QuantityVisitor;

impl Visitor<'_> for QuantityVisitor {
    type Value = Quantity;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a quantity string such as \"10m\"")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Quantity, E> {
        Ok(Quantity::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Quantity, E> {
        Ok(Quantity(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Quantity, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("quantity must be finite, got {v}")));
        }
        // Display yields the shortest round-tripping decimal form.
        v.to_string().parse().map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Quantity, E> {
        v.parse().map_err(E::custom)
    }
}
