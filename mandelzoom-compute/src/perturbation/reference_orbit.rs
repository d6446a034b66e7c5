//! Reference orbit computation for perturbation rendering.
//!
//! Iterates z ← z² + c at the view's full precision and stores every step
//! as a compressed f32 triple `(re / 2^e, im / 2^e, e)` with a shared
//! exponent `e`. The series recurrence runs alongside on the compressed
//! values, so it never touches arbitrary precision.

use super::series::{PerturbationSeries, ValidityLatch};
use log::{debug, warn};
use mandelzoom_core::{BigFloat, ExtendedComplex, ExtendedValue, ViewState};
use serde::{Deserialize, Serialize};

/// Value stored in every slot past the last computed step.
pub const ORBIT_SENTINEL: f32 = -1.0;

/// Shared exponents below this are treated as zero.
const MIN_SCALE_EXPONENT: i64 = -10_000;

/// Squared bailout modulus (20²).
const BAILOUT_SQ: ExtendedValue = ExtendedValue::new(400.0, 0);

/// Why an orbit pass stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitTermination {
    /// |z|² exceeded the bailout after `iteration` steps.
    Escaped { iteration: u32 },
    /// The iteration cap was reached without escaping.
    IterationCap,
    /// The buffer filled up first; escape is unknown.
    CapacityExceeded,
}

/// Outcome of one generator pass.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitPass {
    /// Valid triples at the start of the buffer.
    pub length: usize,
    pub termination: OrbitTermination,
    /// Series frozen at the last trusted iteration.
    pub series: PerturbationSeries,
    pub validity_limit: u32,
}

/// Fixed-capacity orbit buffer, reused across passes.
#[derive(Clone, Debug)]
pub struct ReferenceOrbit {
    data: Vec<f32>,
    length: usize,
}

impl ReferenceOrbit {
    /// Allocate a buffer of `capacity` floats, rounded down to whole triples.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity - capacity % 3;
        Self {
            data: vec![ORBIT_SENTINEL; capacity],
            length: 0,
        }
    }

    /// Capacity in floats.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Capacity in steps.
    pub fn max_steps(&self) -> usize {
        self.data.len() / 3
    }

    /// Valid steps from the last pass.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whole buffer, sentinel-padded past [`len`](Self::len).
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Step `i` as `(x_mantissa, y_mantissa, exponent)`.
    pub fn triple(&self, i: usize) -> Option<(f32, f32, f32)> {
        if i >= self.length {
            return None;
        }
        Some((self.data[3 * i], self.data[3 * i + 1], self.data[3 * i + 2]))
    }

    /// Recompute the orbit for `view`, overwriting the buffer in place.
    pub fn generate(&mut self, view: &ViewState) -> OrbitPass {
        self.data.fill(ORBIT_SENTINEL);
        self.length = 0;

        let precision = view.precision_bits();
        let cx = view.center_x();
        let cy = view.center_y();
        let iterations = view.iterations() as usize;
        let steps = iterations.min(self.max_steps());

        let mut x = BigFloat::zero(precision);
        let mut y = BigFloat::zero(precision);
        let mut series = PerturbationSeries::ZERO;
        let mut latch = ValidityLatch::new(view.radius_exponent());

        let mut termination = if steps < iterations {
            OrbitTermination::CapacityExceeded
        } else {
            OrbitTermination::IterationCap
        };
        let mut length = steps;

        for i in 0..steps {
            let (mx, my, e) = compress(&x, &y);
            self.data[3 * i] = mx;
            self.data[3 * i + 1] = my;
            self.data[3 * i + 2] = e as f32;

            let z = ExtendedComplex::new(
                ExtendedValue::new(mx as f64, e),
                ExtendedValue::new(my as f64, e),
            );
            let previous = series;

            // z = z² + c from the pre-update values
            let x_sq = x.mul(&x);
            let y_sq = y.mul(&y);
            let xy = x.mul(&y);
            let new_x = x_sq.sub(&y_sq).add(cx);
            let new_y = xy.add(&xy).add(cy);
            x = new_x;
            y = new_y;

            series = series.advance(&z);

            let z_new = ExtendedComplex::new(x.to_extended(), y.to_extended());
            latch.observe(i as u32, &previous, &series);

            if z_new.norm_sq().gt(&BAILOUT_SQ) {
                length = i + 1;
                termination = OrbitTermination::Escaped {
                    iteration: (i + 1) as u32,
                };
                break;
            }
        }
        self.length = length;

        if termination == OrbitTermination::CapacityExceeded {
            warn!(
                "orbit buffer full after {} of {} iterations, escape unknown",
                steps, iterations
            );
        }
        debug!(
            "reference orbit: {} steps, validity limit {}, {:?}",
            length,
            latch.limit(),
            termination
        );

        OrbitPass {
            length,
            termination,
            series: *latch.frozen(),
            validity_limit: latch.limit(),
        }
    }
}

/// Compress (x, y) to f32 mantissas over a shared binary exponent.
fn compress(x: &BigFloat, y: &BigFloat) -> (f32, f32, i64) {
    let ex = x.to_extended();
    let ey = y.to_extended();
    let mut scale = match (ex.is_zero(), ey.is_zero()) {
        (true, true) => 0,
        (true, false) => ey.exp(),
        (false, true) => ex.exp(),
        (false, false) => ex.exp().max(ey.exp()),
    };
    if scale < MIN_SCALE_EXPONENT {
        scale = 0;
    }
    (shift_mantissa(&ex, scale), shift_mantissa(&ey, scale), scale)
}

/// mantissa / 2^(scale - exp), or 0 for an exact zero.
fn shift_mantissa(value: &ExtendedValue, scale: i64) -> f32 {
    if value.is_zero() {
        return 0.0;
    }
    ExtendedValue::new(value.mantissa(), value.exp() - scale).to_f64() as f32
}
