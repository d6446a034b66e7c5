//! Parameters of the escape-time tiled renderer.
//!
//! Plain f64 screen bounds, independent of the deep zoom view state.

use crate::RenderError;
use serde::{Deserialize, Serialize};

/// Exponent of the iterated map z ← z^p + c.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Power {
    Square,
    Cube,
    Quartic,
}

impl Power {
    pub fn exponent(&self) -> u32 {
        match self {
            Power::Square => 2,
            Power::Cube => 3,
            Power::Quartic => 4,
        }
    }
}

impl TryFrom<u32> for Power {
    type Error = RenderError;

    fn try_from(power: u32) -> Result<Self, Self::Error> {
        match power {
            2 => Ok(Power::Square),
            3 => Ok(Power::Cube),
            4 => Ok(Power::Quartic),
            other => Err(RenderError::UnsupportedPower(other)),
        }
    }
}

/// Mandelbrot varies c per pixel from z = 0; Julia fixes c to the seed and
/// varies the starting z.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FractalMode {
    Mandelbrot,
    Julia { seed_x: f64, seed_y: f64 },
}

/// Complex-plane rectangle mapped onto the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bounds {
    /// Whole Mandelbrot set.
    pub const MANDELBROT: Bounds = Bounds {
        xmin: -2.0,
        xmax: 1.0,
        ymin: -1.5,
        ymax: 1.5,
    };

    /// Default square for Julia sets.
    pub const JULIA: Bounds = Bounds {
        xmin: -1.5,
        xmax: 1.5,
        ymin: -1.5,
        ymax: 1.5,
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderParams {
    pub power: Power,
    pub max_iterations: u32,
    pub bounds: Bounds,
    pub mode: FractalMode,
    pub view_width: u32,
    pub view_height: u32,
}

impl RenderParams {
    /// Build from the host's raw values, validating the power.
    pub fn new(
        power: u32,
        max_iterations: u32,
        bounds: Bounds,
        julia_seed: Option<(f64, f64)>,
        view_width: u32,
        view_height: u32,
    ) -> Result<Self, RenderError> {
        let mode = match julia_seed {
            Some((seed_x, seed_y)) => FractalMode::Julia { seed_x, seed_y },
            None => FractalMode::Mandelbrot,
        };
        Ok(Self {
            power: Power::try_from(power)?,
            max_iterations,
            bounds,
            mode,
            view_width,
            view_height,
        })
    }

    /// Complex-plane width of one pixel.
    pub fn x_scale(&self) -> f64 {
        (self.bounds.xmax - self.bounds.xmin) / self.view_width as f64
    }

    /// Complex-plane height of one pixel.
    pub fn y_scale(&self) -> f64 {
        (self.bounds.ymax - self.bounds.ymin) / self.view_height as f64
    }

    /// Complex coordinate of pixel (px, py).
    pub fn pixel_to_complex(&self, px: u32, py: u32) -> (f64, f64) {
        (
            self.bounds.xmin + px as f64 * self.x_scale(),
            self.bounds.ymin + py as f64 * self.y_scale(),
        )
    }
}
