//! Third-order perturbation series and its validity latch.
//!
//! For a pixel at c + δ the orbit deviates from the reference by roughly
//! B·δ + C·δ² + D·δ³. The coefficients follow the reference orbit:
//!
//! ```text
//! B' = 2zB + 1
//! C' = 2zC + B'²
//! D' = 2zD + 2B'C'
//! ```
//!
//! evaluated in that order, each step seeing the freshly updated terms.

use mandelzoom_core::{ExtendedComplex, ExtendedValue};
use serde::{Deserialize, Serialize};

/// First, second and third order coefficients of the series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerturbationSeries {
    pub b: ExtendedComplex,
    pub c: ExtendedComplex,
    pub d: ExtendedComplex,
}

impl PerturbationSeries {
    pub const ZERO: Self = Self {
        b: ExtendedComplex::ZERO,
        c: ExtendedComplex::ZERO,
        d: ExtendedComplex::ZERO,
    };

    /// Advance all three coefficients by one reference step at `z`.
    pub fn advance(&self, z: &ExtendedComplex) -> Self {
        let two_z = z.double();
        let b = two_z.mul(&self.b).add(&ExtendedComplex::ONE);
        let c = two_z.mul(&self.c).add(&b.mul(&b));
        let d = two_z.mul(&self.d).add(&b.mul(&c).double());
        Self { b, c, d }
    }

    /// Coefficients as `[Bx, By, Cx, Cy, Dx, Dy]`.
    pub fn components(&self) -> [ExtendedValue; 6] {
        [
            self.b.re, self.b.im, self.c.re, self.c.im, self.d.re, self.d.im,
        ]
    }
}

/// Tracks how long the series stays trustworthy.
///
/// The series is trusted while the second order term dominates the third
/// at the view radius: `max|C| > 1000 · 2^radius_exp · max|D|`. The first
/// failure latches permanently.
#[derive(Clone, Debug)]
pub struct ValidityLatch {
    threshold_scale: ExtendedValue,
    frozen: PerturbationSeries,
    limit: u32,
    failed: bool,
}

impl ValidityLatch {
    pub fn new(radius_exponent: i64) -> Self {
        Self {
            threshold_scale: ExtendedValue::new(1000.0, radius_exponent),
            frozen: PerturbationSeries::ZERO,
            limit: 0,
            failed: false,
        }
    }

    /// Check the series after step `iteration`.
    ///
    /// `previous` is the series before this step's update and is what
    /// gets frozen while the check passes.
    pub fn observe(
        &mut self,
        iteration: u32,
        previous: &PerturbationSeries,
        current: &PerturbationSeries,
    ) {
        if self.failed {
            return;
        }
        let threshold = self.threshold_scale.mul(&current.d.maxabs());
        if iteration == 0 || current.c.maxabs().gt(&threshold) {
            self.frozen = *previous;
            self.limit = iteration;
        } else {
            self.failed = true;
        }
    }

    pub fn frozen(&self) -> &PerturbationSeries {
        &self.frozen
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }
}
