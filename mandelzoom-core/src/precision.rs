//! Precision calculation for deep zoom orbits.
//!
//! Determines how many mantissa bits the reference orbit needs so that the
//! center stays resolvable relative to the radius over many iterations.

/// Safety margin for rounding errors in arithmetic operations.
const SAFETY_BITS: u64 = 64;

/// Orbit values stay below the bailout modulus of 20, so 2^5 bounds them.
const LOG2_ORBIT_MAGNITUDE: f64 = 5.0;

/// Precision granularity in bits.
const PRECISION_STEP: usize = 64;

/// Calculate required precision bits for a view at the given depth.
///
/// # Arguments
/// * `radius_log2` - log2 of the view radius (very negative when deep)
/// * `max_iterations` - iteration cap of the orbit
/// * `minimum_bits` - floor, never returned below this
///
/// # Returns
/// Required precision bits, rounded up to a multiple of 64.
pub fn required_precision_bits(radius_log2: f64, max_iterations: u32, minimum_bits: usize) -> usize {
    // bits needed to distinguish c from c + radius
    let log2_ratio = LOG2_ORBIT_MAGNITUDE - radius_log2;
    let bits_from_ratio = if log2_ratio.is_finite() {
        log2_ratio.ceil().max(0.0) as u64
    } else {
        0
    };

    // Bits for iteration error amplification: log2(iterations)
    let iter_bits = if max_iterations > 1 {
        (max_iterations as f64).log2().ceil() as u64
    } else {
        0
    };

    let total_bits = (bits_from_ratio + iter_bits + SAFETY_BITS) as usize;
    let rounded = total_bits.div_ceil(PRECISION_STEP) * PRECISION_STEP;
    rounded.max(minimum_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shallow_view_uses_minimum() {
        assert_eq!(required_precision_bits(1.0, 1000, 1216), 1216);
    }

    #[test]
    fn precision_increases_with_depth() {
        let shallow = required_precision_bits(-100.0, 1000, 64);
        let deep = required_precision_bits(-3000.0, 1000, 64);
        assert!(deep > shallow, "Expected {} > {}", deep, shallow);
    }

    #[test]
    fn precision_at_extreme_zoom() {
        // 10^-2000 radius is about 2^-6644
        let bits = required_precision_bits(-6644.0, 5000, 1216);
        assert!(bits >= 6644 + 64);
        assert!(bits <= 7000);
    }

    #[test]
    fn precision_is_multiple_of_step() {
        for radius_log2 in [-10.0, -333.3, -1234.5, -9999.0] {
            let bits = required_precision_bits(radius_log2, 777, 64);
            assert_eq!(bits % PRECISION_STEP, 0);
        }
    }

    #[test]
    fn zero_radius_log_is_handled() {
        assert_eq!(required_precision_bits(f64::NEG_INFINITY, 1000, 1216), 1216);
    }
}
