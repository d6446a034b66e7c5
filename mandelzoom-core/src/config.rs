//! Session configuration and iteration helpers.
//!
//! Holds the defaults a deep zoom session starts from and the pure helper
//! used by hosts to pick an iteration cap for a given depth.

use serde::{Deserialize, Serialize};

/// Default center (real part) as a decimal string.
pub const DEFAULT_CENTER_X: &str = "-0.5";
/// Default center (imaginary part) as a decimal string.
pub const DEFAULT_CENTER_Y: &str = "0";
/// Default view radius as a decimal string.
pub const DEFAULT_RADIUS: &str = "2";
/// Default iteration cap.
pub const DEFAULT_ITERATIONS: u32 = 1000;
/// Default orbit buffer capacity in floats (1024 × 1024).
pub const DEFAULT_ORBIT_CAPACITY: usize = 1 << 20;
/// Enough bits for roughly 360 decimal digits of zoom depth.
pub const DEFAULT_MIN_PRECISION_BITS: usize = 1216;

/// Bounds for [`suggested_iterations`].
const MIN_SUGGESTED_ITERATIONS: u32 = 500;
const MAX_SUGGESTED_ITERATIONS: u32 = 5000;

/// Configuration a [`ViewState`](crate::ViewState) and its session are built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub center_x: String,
    pub center_y: String,
    pub radius: String,
    pub iterations: u32,
    /// Orbit buffer capacity in floats; rounded down to whole triples.
    pub orbit_capacity: usize,
    pub min_precision_bits: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            center_x: DEFAULT_CENTER_X.to_string(),
            center_y: DEFAULT_CENTER_Y.to_string(),
            radius: DEFAULT_RADIUS.to_string(),
            iterations: DEFAULT_ITERATIONS,
            orbit_capacity: DEFAULT_ORBIT_CAPACITY,
            min_precision_bits: DEFAULT_MIN_PRECISION_BITS,
        }
    }
}

impl SessionConfig {
    /// Orbit steps that fit in the buffer.
    pub fn orbit_steps(&self) -> usize {
        self.orbit_capacity / 3
    }
}

/// Iteration cap suggestion for a view of radius 2^`radius_log2`.
///
/// Uses 1000 × log10(2 / r), clamped to [500, 5000].
pub fn suggested_iterations(radius_log2: f64) -> u32 {
    let zoom_decades = (1.0 - radius_log2) * std::f64::consts::LOG10_2;
    if !zoom_decades.is_finite() {
        return MAX_SUGGESTED_ITERATIONS;
    }
    let raw = (1000.0 * zoom_decades).round();
    (raw.max(0.0) as u32).clamp(MIN_SUGGESTED_ITERATIONS, MAX_SUGGESTED_ITERATIONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_constants() {
        let config = SessionConfig::default();
        assert_eq!(config.center_x, "-0.5");
        assert_eq!(config.center_y, "0");
        assert_eq!(config.radius, "2");
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.orbit_capacity, 1_048_576);
        assert_eq!(config.orbit_steps(), 349_525);
    }

    #[test]
    fn suggested_iterations_clamps_at_default_view() {
        // log10(2 / 2) = 0
        assert_eq!(suggested_iterations(1.0), 500);
    }

    #[test]
    fn suggested_iterations_grows_with_zoom() {
        // r = 2^-9: log10(2^10) = 3.01
        assert_eq!(suggested_iterations(-9.0), 3010);
        assert!(suggested_iterations(-5.0) < suggested_iterations(-9.0));
    }

    #[test]
    fn suggested_iterations_caps_deep_views() {
        assert_eq!(suggested_iterations(-1000.0), 5000);
        assert_eq!(suggested_iterations(f64::NEG_INFINITY), 5000);
    }

    #[test]
    fn config_json_roundtrip() {
        let config = SessionConfig {
            iterations: 4242,
            ..SessionConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: SessionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
