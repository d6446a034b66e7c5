//! Deep zoom session: view state plus the reusable orbit buffer.

use crate::perturbation::{EncodedSeries, OrbitTermination, ReferenceOrbit};
use log::info;
use mandelzoom_core::{CoreError, SessionConfig, ViewState};

/// Everything a renderer needs from one orbit pass.
#[derive(Debug)]
pub struct GeneratedOrbit<'a> {
    /// Full buffer; entries past `3 * length` hold the sentinel.
    pub orbit: &'a [f32],
    pub length: usize,
    pub termination: OrbitTermination,
    pub series: EncodedSeries,
}

impl GeneratedOrbit<'_> {
    pub fn validity_limit(&self) -> u32 {
        self.series.validity_limit
    }

    pub fn radius_log2(&self) -> f64 {
        self.series.radius_log2
    }
}

/// Owns one view and its orbit buffer.
///
/// Mutations and orbit generation must be serialized by the caller; the
/// `&mut self` receivers enforce this within one thread.
pub struct DeepZoomSession {
    config: SessionConfig,
    view: ViewState,
    orbit: ReferenceOrbit,
}

impl DeepZoomSession {
    pub fn new(config: SessionConfig) -> Result<Self, CoreError> {
        let view = ViewState::new(&config)?;
        let orbit = ReferenceOrbit::with_capacity(config.orbit_capacity);
        info!(
            "deep zoom session created, orbit capacity {} floats",
            orbit.capacity()
        );
        Ok(Self {
            config,
            view,
            orbit,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn orbit(&self) -> &ReferenceOrbit {
        &self.orbit
    }

    pub fn set_view(&mut self, x: f64, y: f64, radius: f64, iterations: u32) -> Result<(), CoreError> {
        self.view.set(x, y, radius, iterations)
    }

    pub fn set_view_from_strings(
        &mut self,
        x: &str,
        y: &str,
        radius: &str,
        iterations: u32,
    ) -> Result<(), CoreError> {
        self.view.set_from_strings(x, y, radius, iterations)
    }

    /// Recenter by a screen-fraction offset and halve the radius.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.view.update(dx, dy);
    }

    pub fn zoom_in(&mut self, dx: f64, dy: f64, factor: f64) -> Result<(), CoreError> {
        self.view.zoom_in(dx, dy, factor)
    }

    pub fn zoom_out(&mut self, factor: f64) -> Result<(), CoreError> {
        self.view.zoom_out(factor)
    }

    pub fn set_iterations(&mut self, iterations: u32) {
        self.view.set_iterations(iterations);
    }

    pub fn reset(&mut self) -> Result<(), CoreError> {
        self.view.reset(&self.config)
    }

    pub fn center_x(&self) -> String {
        self.view.center_x_string()
    }

    pub fn center_y(&self) -> String {
        self.view.center_y_string()
    }

    pub fn radius(&self) -> String {
        self.view.radius_string()
    }

    /// Regenerate the orbit and series for the current view.
    pub fn generate_orbit(&mut self) -> GeneratedOrbit<'_> {
        let pass = self.orbit.generate(&self.view);
        let series = EncodedSeries::encode(&pass.series, pass.validity_limit, self.view.radius());
        GeneratedOrbit {
            orbit: self.orbit.as_slice(),
            length: pass.length,
            termination: pass.termination,
            series,
        }
    }
}
