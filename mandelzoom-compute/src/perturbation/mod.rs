//! Reference orbit and perturbation series for deep zoom.
//!
//! One high precision orbit is computed at the view center; pixels near it
//! are approximated by a third-order series in their offset from the center.

mod encoder;
mod reference_orbit;
mod series;

pub use encoder::EncodedSeries;
pub use reference_orbit::{OrbitPass, OrbitTermination, ReferenceOrbit, ORBIT_SENTINEL};
pub use series::{PerturbationSeries, ValidityLatch};

#[cfg(test)]
mod tests;
