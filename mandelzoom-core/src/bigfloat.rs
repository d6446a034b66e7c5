use dashu_base::Approximation;
use dashu_float::round::mode::{HalfAway, Zero};
use dashu_float::{DBig, FBig};

use crate::ExtendedValue;

/// Arbitrary precision binary floating point with explicit precision enforcement.
///
/// Only the operations the reference orbit needs are provided: add, sub,
/// mul, comparison, decimal string import/export and extraction of a
/// (mantissa, exponent) pair.
#[derive(Clone, Debug)]
pub struct BigFloat {
    value: FBig,
    precision_bits: usize,
}

/// Bits kept when collapsing to an f64 mantissa.
const F64_MANTISSA_BITS: usize = 53;

fn unwrap_rounded<T, E>(approx: Approximation<T, E>) -> T {
    match approx {
        Approximation::Exact(v) => v,
        Approximation::Inexact(v, _) => v,
    }
}

impl BigFloat {
    /// Create BigFloat from f64 with explicit precision
    ///
    /// NO DEFAULT - precision must always be specified.
    /// Non-finite input yields zero; callers validate finiteness first.
    pub fn with_precision(val: f64, precision_bits: usize) -> Self {
        let value = match FBig::<Zero>::try_from(val) {
            Ok(v) if val != 0.0 => unwrap_rounded(v.with_precision(precision_bits)),
            _ => unwrap_rounded(FBig::<Zero>::ZERO.with_precision(precision_bits)),
        };
        Self {
            value,
            precision_bits,
        }
    }

    /// Create zero with explicit precision
    pub fn zero(precision_bits: usize) -> Self {
        Self::with_precision(0.0, precision_bits)
    }

    /// Create one with explicit precision
    pub fn one(precision_bits: usize) -> Self {
        Self::with_precision(1.0, precision_bits)
    }

    /// Get precision in bits
    pub fn precision_bits(&self) -> usize {
        self.precision_bits
    }

    /// Same value rounded (or widened) to a new precision.
    pub fn with_precision_bits(&self, precision_bits: usize) -> Self {
        Self {
            value: unwrap_rounded(self.value.clone().with_precision(precision_bits)),
            precision_bits,
        }
    }

    /// Convert to f64 (for display and shallow rendering only).
    /// Saturates to infinity / flushes to zero outside f64 range.
    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().value()
    }

    /// Create BigFloat from a base-10 string with explicit precision
    ///
    /// Accepts optional sign, fraction and exponent ("-1.25e-300").
    /// Allows values far beyond f64 range. The decimal-to-binary conversion
    /// happens in one step at the target precision.
    pub fn from_string(val: &str, precision_bits: usize) -> Result<Self, String> {
        let trimmed = val.trim();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let dbig = unsigned
            .parse::<DBig>()
            .map_err(|e| format!("failed to parse decimal: {}", e))?;
        let binary = unwrap_rounded(dbig.with_base_and_precision::<2>(precision_bits));
        Ok(Self {
            value: binary.with_rounding::<Zero>(),
            precision_bits,
        })
    }

    /// Decimal representation with enough digits to re-parse to the same
    /// value at this precision.
    pub fn to_decimal_string(&self) -> String {
        let digits = (self.precision_bits as f64 * std::f64::consts::LOG10_2).ceil() as usize + 2;
        let decimal = unwrap_rounded(
            self.value
                .clone()
                .with_rounding::<HalfAway>()
                .with_base_and_precision::<10>(digits),
        );
        decimal.to_string()
    }

    /// Add two BigFloats, preserving max precision
    pub fn add(&self, other: &Self) -> Self {
        Self {
            value: &self.value + &other.value,
            precision_bits: self.precision_bits.max(other.precision_bits),
        }
    }

    /// Subtract two BigFloats, preserving max precision
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            value: &self.value - &other.value,
            precision_bits: self.precision_bits.max(other.precision_bits),
        }
    }

    /// Multiply two BigFloats, preserving max precision
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            value: &self.value * &other.value,
            precision_bits: self.precision_bits.max(other.precision_bits),
        }
    }

    /// Multiply by a native double at this value's precision.
    pub fn mul_f64(&self, factor: f64) -> Self {
        self.mul(&Self::with_precision(factor, self.precision_bits))
    }

    pub fn is_zero(&self) -> bool {
        self.value.repr().is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.value > FBig::<Zero>::ZERO
    }

    /// Greater than
    pub fn gt(&self, other: &Self) -> bool {
        self.value > other.value
    }

    /// (mantissa in [0.5, 1.0), exponent) with value = mantissa × 2^exponent.
    /// None for zero.
    fn frexp(&self) -> Option<(f64, i64)> {
        if self.is_zero() {
            return None;
        }
        let reduced = unwrap_rounded(self.value.clone().with_precision(F64_MANTISSA_BITS));
        let repr = reduced.repr();
        // A 53-bit significand always fits in i64.
        let significand = i64::try_from(repr.significand().clone()).ok()? as f64;
        let (mantissa, shift) = libm::frexp(significand);
        Some((mantissa, repr.exponent() as i64 + shift as i64))
    }

    /// Binary exponent e such that |value| ∈ [2^(e-1), 2^e). None for zero.
    pub fn binary_exponent(&self) -> Option<i64> {
        self.frexp().map(|(_, exp)| exp)
    }

    /// Convert to extended-range form without overflow or underflow.
    pub fn to_extended(&self) -> ExtendedValue {
        match self.frexp() {
            Some((mantissa, exp)) => ExtendedValue::new(mantissa, exp),
            None => ExtendedValue::ZERO,
        }
    }

    /// log2 of the magnitude, valid at any depth. -infinity for zero.
    pub fn log2(&self) -> f64 {
        self.to_extended().log2()
    }
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl std::fmt::Display for BigFloat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_exponent_of_powers_of_two() {
        assert_eq!(BigFloat::with_precision(1.0, 1216).binary_exponent(), Some(1));
        assert_eq!(BigFloat::with_precision(2.0, 1216).binary_exponent(), Some(2));
        assert_eq!(BigFloat::with_precision(0.5, 1216).binary_exponent(), Some(0));
        assert_eq!(BigFloat::with_precision(-0.75, 1216).binary_exponent(), Some(0));
    }

    #[test]
    fn binary_exponent_of_zero_is_none() {
        assert_eq!(BigFloat::zero(1216).binary_exponent(), None);
        assert!(BigFloat::zero(1216).to_extended().is_zero());
    }

    #[test]
    fn to_extended_matches_to_f64_in_range() {
        for v in [3.25, -0.1, 1e-200, 7.5e150] {
            let bf = BigFloat::with_precision(v, 1216);
            let ev = bf.to_extended();
            assert!((ev.to_f64() - v).abs() <= v.abs() * 1e-15);
            assert!((0.5..1.0).contains(&ev.mantissa().abs()));
        }
    }

    #[test]
    fn to_extended_survives_extreme_depth() {
        let bf = BigFloat::from_string("1e-500", 2048).unwrap();
        let ev = bf.to_extended();
        // log2(1e-500) = -1660.96...
        assert!((ev.log2() - (-500.0 * std::f64::consts::LOG2_10)).abs() < 1e-9);
        assert_eq!(bf.to_f64(), 0.0);
    }

    #[test]
    fn from_string_accepts_leading_plus() {
        let a = BigFloat::from_string("+1.5", 256).unwrap();
        let b = BigFloat::with_precision(1.5, 256);
        assert_eq!(a, b);
    }

    #[test]
    fn from_string_rejects_garbage() {
        assert!(BigFloat::from_string("abc", 256).is_err());
        assert!(BigFloat::from_string("", 256).is_err());
    }

    #[test]
    fn mul_f64_halves() {
        let r = BigFloat::with_precision(2.0, 1216);
        assert_eq!(r.mul_f64(0.5), BigFloat::one(1216));
    }

    #[test]
    fn sign_checks() {
        assert!(BigFloat::with_precision(1e-300, 1216).is_positive());
        assert!(!BigFloat::with_precision(-2.0, 1216).is_positive());
        assert!(!BigFloat::zero(1216).is_positive());
        assert!(BigFloat::zero(1216).is_zero());
    }
}
