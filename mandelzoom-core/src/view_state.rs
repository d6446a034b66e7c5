use crate::config::SessionConfig;
use crate::precision::required_precision_bits;
use crate::{BigFloat, CoreError};
use log::{info, warn};

/// Arbitrary precision view: center, radius and iteration cap.
///
/// The radius is always strictly positive. Precision grows as the view
/// deepens and only shrinks again on [`ViewState::reset`].
#[derive(Clone, Debug)]
pub struct ViewState {
    center_x: BigFloat,
    center_y: BigFloat,
    radius: BigFloat,
    iterations: u32,
    min_precision_bits: usize,
}

/// Smallest accepted iteration cap.
const MIN_ITERATIONS: u32 = 2;

impl ViewState {
    /// Create a view from the configured default strings.
    pub fn new(config: &SessionConfig) -> Result<Self, CoreError> {
        let min_precision_bits = config.min_precision_bits;
        let (center_x, center_y, radius) = parse_view(
            &config.center_x,
            &config.center_y,
            &config.radius,
            config.iterations,
            min_precision_bits,
        )?;
        let view = Self {
            center_x,
            center_y,
            radius,
            iterations: config.iterations.max(MIN_ITERATIONS),
            min_precision_bits,
        };
        info!(
            "view created at {} bits: {}",
            view.precision_bits(),
            view.state_string()
        );
        Ok(view)
    }

    /// Return to the configured defaults, dropping any precision raised by zooming.
    pub fn reset(&mut self, config: &SessionConfig) -> Result<(), CoreError> {
        *self = Self::new(config)?;
        Ok(())
    }

    pub fn center_x(&self) -> &BigFloat {
        &self.center_x
    }

    pub fn center_y(&self) -> &BigFloat {
        &self.center_y
    }

    pub fn radius(&self) -> &BigFloat {
        &self.radius
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Current working precision in bits.
    pub fn precision_bits(&self) -> usize {
        self.radius.precision_bits()
    }

    /// Replace the view with native doubles.
    pub fn set(&mut self, x: f64, y: f64, radius: f64, iterations: u32) -> Result<(), CoreError> {
        check_finite("center_x", x)?;
        check_finite("center_y", y)?;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(CoreError::NonPositiveRadius);
        }
        let bits = self.precision_bits();
        self.center_x = BigFloat::with_precision(x, bits);
        self.center_y = BigFloat::with_precision(y, bits);
        self.radius = BigFloat::with_precision(radius, bits);
        self.set_iterations(iterations);
        self.ensure_precision();
        Ok(())
    }

    /// Replace the view from decimal strings.
    ///
    /// Either all three values are applied or none: on any parse failure
    /// the previous state is left untouched.
    pub fn set_from_strings(
        &mut self,
        x: &str,
        y: &str,
        radius: &str,
        iterations: u32,
    ) -> Result<(), CoreError> {
        let floor = self.precision_bits().max(self.min_precision_bits);
        let parsed = parse_view(x, y, radius, iterations, floor);
        match parsed {
            Ok((center_x, center_y, radius)) => {
                let old_bits = self.precision_bits();
                self.center_x = center_x;
                self.center_y = center_y;
                self.radius = radius;
                self.set_iterations(iterations);
                if self.precision_bits() != old_bits {
                    info!(
                        "precision changed from {} to {} bits",
                        old_bits,
                        self.precision_bits()
                    );
                }
                Ok(())
            }
            Err(e) => {
                warn!("rejected view update: {}", e);
                Err(e)
            }
        }
    }

    /// Pan by a screen-fraction offset and halve the radius.
    pub fn update(&mut self, dx: f64, dy: f64) {
        self.recenter(dx, dy);
        self.radius = self.radius.mul_f64(0.5);
        self.ensure_precision();
    }

    /// Pan by a screen-fraction offset, then scale the radius by `factor`.
    pub fn zoom_in(&mut self, dx: f64, dy: f64, factor: f64) -> Result<(), CoreError> {
        check_zoom_factor(factor)?;
        self.recenter(dx, dy);
        self.radius = self.radius.mul_f64(factor);
        self.ensure_precision();
        Ok(())
    }

    /// Multiply the radius by `factor`, keeping the center.
    pub fn zoom_out(&mut self, factor: f64) -> Result<(), CoreError> {
        check_zoom_factor(factor)?;
        self.radius = self.radius.mul_f64(factor);
        Ok(())
    }

    /// Set the iteration cap (at least 2).
    pub fn set_iterations(&mut self, iterations: u32) {
        self.iterations = iterations.max(MIN_ITERATIONS);
    }

    pub fn center_x_string(&self) -> String {
        self.center_x.to_decimal_string()
    }

    pub fn center_y_string(&self) -> String {
        self.center_y.to_decimal_string()
    }

    pub fn radius_string(&self) -> String {
        self.radius.to_decimal_string()
    }

    /// Center collapsed to native doubles (for shallow rendering and display).
    pub fn center_as_f64(&self) -> (f64, f64) {
        (self.center_x.to_f64(), self.center_y.to_f64())
    }

    /// log2 of the radius, valid at any depth.
    pub fn radius_log2(&self) -> f64 {
        self.radius.log2()
    }

    /// Binary exponent of the radius (radius in [2^(e-1), 2^e)).
    pub fn radius_exponent(&self) -> i64 {
        self.radius.binary_exponent().unwrap_or(0)
    }

    /// One-line summary: `re=<x>; im=<y>; r=<r>; iterations=<n>`.
    pub fn state_string(&self) -> String {
        format!(
            "re={}; im={}; r={}; iterations={}",
            self.center_x_string(),
            self.center_y_string(),
            self.radius_string(),
            self.iterations
        )
    }

    fn recenter(&mut self, dx: f64, dy: f64) {
        self.center_x = self.center_x.add(&self.radius.mul_f64(dx));
        self.center_y = self.center_y.add(&self.radius.mul_f64(dy));
    }

    /// Widen all three values when the radius outgrows the current precision.
    fn ensure_precision(&mut self) {
        let current = self.precision_bits();
        let required =
            required_precision_bits(self.radius_log2(), self.iterations, self.min_precision_bits);
        if required <= current {
            return;
        }
        info!("precision raised from {} to {} bits", current, required);
        self.center_x = self.center_x.with_precision_bits(required);
        self.center_y = self.center_y.with_precision_bits(required);
        self.radius = self.radius.with_precision_bits(required);
    }
}

/// Parse the radius first to size the precision, then the center.
fn parse_view(
    x: &str,
    y: &str,
    radius: &str,
    iterations: u32,
    floor_bits: usize,
) -> Result<(BigFloat, BigFloat, BigFloat), CoreError> {
    let parsed = parse_field("radius", radius, floor_bits)?;
    if !parsed.is_positive() {
        return Err(CoreError::NonPositiveRadius);
    }
    let bits = required_precision_bits(parsed.log2(), iterations, floor_bits);
    let radius = if bits == floor_bits {
        parsed
    } else {
        parse_field("radius", radius, bits)?
    };
    let center_x = parse_field("center_x", x, bits)?;
    let center_y = parse_field("center_y", y, bits)?;
    Ok((center_x, center_y, radius))
}

fn parse_field(field: &'static str, input: &str, bits: usize) -> Result<BigFloat, CoreError> {
    BigFloat::from_string(input, bits).map_err(|reason| CoreError::InvalidCoordinate {
        field,
        input: input.to_string(),
        reason,
    })
}

fn check_finite(field: &'static str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::InvalidCoordinate {
            field,
            input: value.to_string(),
            reason: "not a finite number".to_string(),
        })
    }
}

fn check_zoom_factor(factor: f64) -> Result<(), CoreError> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidZoomFactor(factor))
    }
}
