//! Complex number using ExtendedValue components.

use crate::ExtendedValue;
use serde::{Deserialize, Serialize};

/// Complex number using ExtendedValue components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedComplex {
    pub re: ExtendedValue,
    pub im: ExtendedValue,
}

/// Exact factor of two for doubling through `mul`.
const TWO: ExtendedValue = ExtendedValue::new(2.0, 0);

impl ExtendedComplex {
    /// Zero constant.
    pub const ZERO: Self = Self {
        re: ExtendedValue::ZERO,
        im: ExtendedValue::ZERO,
    };

    /// One constant (1 + 0i).
    pub const ONE: Self = Self {
        re: ExtendedValue::ONE,
        im: ExtendedValue::ZERO,
    };

    pub fn new(re: ExtendedValue, im: ExtendedValue) -> Self {
        Self { re, im }
    }

    /// Add two complex numbers.
    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            re: self.re.add(&other.re),
            im: self.im.add(&other.im),
        }
    }

    /// Multiply two complex numbers: (a + bi)(c + di) = (ac - bd) + (ad + bc)i
    #[inline]
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            re: self.re.mul(&other.re).sub(&self.im.mul(&other.im)),
            im: self.re.mul(&other.im).add(&self.im.mul(&other.re)),
        }
    }

    /// Multiply both components by 2.
    #[inline]
    pub fn double(&self) -> Self {
        Self {
            re: TWO.mul(&self.re),
            im: TWO.mul(&self.im),
        }
    }

    /// Squared magnitude: re² + im²
    #[inline]
    pub fn norm_sq(&self) -> ExtendedValue {
        self.re.mul(&self.re).add(&self.im.mul(&self.im))
    }

    /// Larger of |re| and |im|.
    #[inline]
    pub fn maxabs(&self) -> ExtendedValue {
        self.re.maxabs(&self.im)
    }

    /// Check if zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }
}
