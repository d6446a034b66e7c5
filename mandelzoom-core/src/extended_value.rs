//! Extended-range floating point for the perturbation series.
//!
//! ExtendedValue = f64 mantissa + i64 exponent, value = mantissa × 2^exp.
//! The mantissa is NOT kept in a canonical interval: `add`/`sub` realign
//! both operands to the larger exponent and combine without renormalizing,
//! so magnitudes may drift across long chains. Only `mul` renormalizes.

use serde::{Deserialize, Serialize};

/// Extended-range floating point: f64 mantissa + i64 exponent.
/// Value = mantissa × 2^exp (or 0 if mantissa == 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedValue {
    mantissa: f64,
    exp: i64,
}

/// Exponent differences beyond this flush the smaller operand to zero.
const MAX_ALIGN_SHIFT: i64 = 1 << 20;

impl ExtendedValue {
    /// Zero value.
    pub const ZERO: Self = Self {
        mantissa: 0.0,
        exp: 0,
    };

    /// Unit value (1 × 2^0).
    pub const ONE: Self = Self {
        mantissa: 1.0,
        exp: 0,
    };

    /// Create from raw parts without normalizing.
    pub const fn new(mantissa: f64, exp: i64) -> Self {
        Self { mantissa, exp }
    }

    /// Create from f64, mantissa normalized to [0.5, 1.0).
    pub fn from_f64(val: f64) -> Self {
        if val == 0.0 {
            return Self::ZERO;
        }
        let (mantissa, exp) = libm::frexp(val);
        Self {
            mantissa,
            exp: exp as i64,
        }
    }

    pub fn mantissa(&self) -> f64 {
        self.mantissa
    }

    pub fn exp(&self) -> i64 {
        self.exp
    }

    /// Check if zero.
    pub fn is_zero(&self) -> bool {
        self.mantissa == 0.0
    }

    /// Collapse to a native double: mantissa × 2^exp.
    ///
    /// Overflows to ±infinity and underflows to zero outside f64 range.
    pub fn to_f64(&self) -> f64 {
        if self.mantissa == 0.0 {
            return 0.0;
        }
        libm::ldexp(self.mantissa, clamp_shift(self.exp))
    }

    /// Approximate log2 of the magnitude. Returns -infinity for zero.
    pub fn log2(&self) -> f64 {
        if self.mantissa == 0.0 {
            return f64::NEG_INFINITY;
        }
        libm::log2(self.mantissa.abs()) + self.exp as f64
    }

    /// Both mantissas rescaled to the larger of the two exponents.
    ///
    /// A zero operand carries no magnitude, so its exponent never drags the
    /// other operand down.
    #[inline]
    fn aligned(&self, other: &Self) -> (f64, f64, i64) {
        if self.is_zero() {
            return (0.0, other.mantissa, if other.is_zero() { 0 } else { other.exp });
        }
        if other.is_zero() {
            return (self.mantissa, 0.0, self.exp);
        }
        let exp = self.exp.max(other.exp);
        (
            rescale(self.mantissa, self.exp - exp),
            rescale(other.mantissa, other.exp - exp),
            exp,
        )
    }

    /// Sum, expressed at the larger exponent. Not renormalized.
    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        let (a, b, exp) = self.aligned(other);
        Self::canonical(a + b, exp)
    }

    /// Difference, expressed at the larger exponent. Not renormalized.
    #[inline]
    pub fn sub(&self, other: &Self) -> Self {
        let (a, b, exp) = self.aligned(other);
        Self::canonical(a - b, exp)
    }

    /// Product. Mantissas multiply, exponents add, then round(log2|m|)
    /// moves into the exponent so the mantissa stays near unit magnitude.
    #[inline]
    pub fn mul(&self, other: &Self) -> Self {
        let mut mantissa = self.mantissa * other.mantissa;
        if mantissa == 0.0 {
            return Self::ZERO;
        }
        let mut exp = self.exp.saturating_add(other.exp);
        if mantissa.is_finite() {
            let shift = libm::round(libm::log2(mantissa.abs())) as i64;
            mantissa = libm::ldexp(mantissa, clamp_shift(-shift));
            exp = exp.saturating_add(shift);
        }
        Self { mantissa, exp }
    }

    /// Larger absolute mantissa after realignment, at the shared exponent.
    #[inline]
    pub fn maxabs(&self, other: &Self) -> Self {
        let (a, b, exp) = self.aligned(other);
        Self {
            mantissa: a.abs().max(b.abs()),
            exp,
        }
    }

    /// Greater-than after realignment.
    #[inline]
    pub fn gt(&self, other: &Self) -> bool {
        let (a, b, _) = self.aligned(other);
        a > b
    }

    /// Zero results drop their exponent.
    #[inline]
    fn canonical(mantissa: f64, exp: i64) -> Self {
        if mantissa == 0.0 {
            Self::ZERO
        } else {
            Self { mantissa, exp }
        }
    }

    /// Same value with the mantissa moved near unit magnitude.
    pub fn normalized(&self) -> Self {
        Self::ONE.mul(self)
    }
}

/// m × 2^shift for shift <= 0.
#[inline]
fn rescale(mantissa: f64, shift: i64) -> f64 {
    if shift == 0 || mantissa == 0.0 {
        return mantissa;
    }
    if shift < -MAX_ALIGN_SHIFT {
        return 0.0;
    }
    libm::ldexp(mantissa, shift as i32)
}

#[inline]
fn clamp_shift(shift: i64) -> i32 {
    shift.clamp(-MAX_ALIGN_SHIFT, MAX_ALIGN_SHIFT) as i32
}
