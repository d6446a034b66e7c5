use super::series::PerturbationSeries;
use mandelzoom_core::{BigFloat, ExtendedValue};
use serde::{Deserialize, Serialize};

/// Series coefficients in the single precision form a renderer consumes.
///
/// `coefficients` holds `[Bx, By, r·Cx, r·Cy, r²·Dx, r²·Dy]`, all scaled by
/// `2^-scale_exponent` so the first order term is near unit magnitude. The
/// radius powers let the renderer evaluate the series in units of the view
/// radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedSeries {
    pub coefficients: [f32; 6],
    pub scale_exponent: i64,
    pub validity_limit: u32,
    pub radius_log2: f64,
}

impl EncodedSeries {
    pub fn encode(series: &PerturbationSeries, validity_limit: u32, radius: &BigFloat) -> Self {
        let mut scale_mag = series.b.maxabs().normalized();
        if scale_mag.is_zero() {
            scale_mag = ExtendedValue::ONE;
        }
        let poly_scale = ExtendedValue::new(1.0, -scale_mag.exp());

        let r = radius.to_extended();
        let r_scale = poly_scale.mul(&r);
        let r2_scale = r_scale.mul(&r);

        let factors = [poly_scale, poly_scale, r_scale, r_scale, r2_scale, r2_scale];
        let components = series.components();
        let coefficients =
            std::array::from_fn(|k| factors[k].mul(&components[k]).to_f64() as f32);

        Self {
            coefficients,
            scale_exponent: scale_mag.exp(),
            validity_limit,
            radius_log2: radius.log2(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelzoom_core::ExtendedComplex;

    fn ev(v: f64) -> ExtendedValue {
        ExtendedValue::from_f64(v)
    }

    #[test]
    fn zero_series_uses_unit_scale() {
        let radius = BigFloat::with_precision(2.0, 256);
        let encoded = EncodedSeries::encode(&PerturbationSeries::ZERO, 0, &radius);
        assert_eq!(encoded.scale_exponent, 0);
        assert_eq!(encoded.coefficients, [0.0; 6]);
        assert_eq!(encoded.radius_log2, 1.0);
    }

    #[test]
    fn dominant_term_is_near_unit() {
        let series = PerturbationSeries {
            b: ExtendedComplex::new(ev(3.0e20), ev(-1.0e20)),
            c: ExtendedComplex::new(ev(5.0), ev(0.0)),
            d: ExtendedComplex::new(ev(0.0), ev(7.0)),
        };
        let radius = BigFloat::with_precision(0.5, 256);
        let encoded = EncodedSeries::encode(&series, 12, &radius);

        let scale = 2f64.powi(-encoded.scale_exponent as i32);
        let [bx, by, cx, cy, dx, dy] = encoded.coefficients;
        assert!((0.5..2.0).contains(&bx.abs()));
        assert!(((bx as f64) - 3.0e20 * scale).abs() < 1e-6);
        assert!(((by as f64) + 1.0e20 * scale).abs() < 1e-6);
        assert!(((cx as f64) - 5.0 * 0.5 * scale).abs() < 1e-20);
        assert_eq!(cy, 0.0);
        assert_eq!(dx, 0.0);
        assert!(((dy as f64) - 7.0 * 0.25 * scale).abs() < 1e-20);
        assert_eq!(encoded.validity_limit, 12);
        assert_eq!(encoded.radius_log2, -1.0);
    }

    #[test]
    fn deep_radius_scales_higher_orders_without_underflow() {
        let series = PerturbationSeries {
            b: ExtendedComplex::new(ExtendedValue::new(1.0, 2000), ExtendedValue::ZERO),
            c: ExtendedComplex::new(ExtendedValue::new(1.0, 4000), ExtendedValue::ZERO),
            d: ExtendedComplex::new(ExtendedValue::new(1.0, 6000), ExtendedValue::ZERO),
        };
        let radius = BigFloat::from_string("1e-600", 4096).unwrap();
        let encoded = EncodedSeries::encode(&series, 99, &radius);

        assert_eq!(encoded.scale_exponent, 2000);
        assert_eq!(encoded.coefficients[0], 1.0);
        // 2^2000 · 10^-600 ≈ 2^6.86
        let expected_c = (2000.0 - 600.0 * std::f64::consts::LOG2_10).exp2();
        let expected_d = (4000.0 - 1200.0 * std::f64::consts::LOG2_10).exp2();
        assert!(((encoded.coefficients[2] as f64) / expected_c - 1.0).abs() < 1e-6);
        assert!(((encoded.coefficients[4] as f64) / expected_d - 1.0).abs() < 1e-6);
    }
}
