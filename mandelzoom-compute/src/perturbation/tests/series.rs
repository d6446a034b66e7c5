use super::helpers::{native_series, view_at};
use crate::perturbation::{EncodedSeries, PerturbationSeries, ReferenceOrbit};
use mandelzoom_core::ExtendedComplex;

/// Frozen coefficients agree with the f64 recurrence at the validity limit.
fn assert_series_matches_native(x: &str, y: &str, iterations: u32, min_limit: u32) {
    let view = view_at(x, y, "1e-30", iterations);
    let mut orbit = ReferenceOrbit::with_capacity(3 * iterations as usize);
    let pass = orbit.generate(&view);
    assert!(
        pass.validity_limit >= min_limit,
        "c = ({}, {}): series trusted only to {}",
        x,
        y,
        pass.validity_limit
    );

    let expected = native_series(&view, pass.validity_limit as usize);
    let actual: [&ExtendedComplex; 3] = [&pass.series.b, &pass.series.c, &pass.series.d];
    for (order, (got, want)) in actual.iter().zip(expected).enumerate() {
        let (re, im) = (got.re.to_f64(), got.im.to_f64());
        let tolerance = 1e-4 * want.0.abs().max(want.1.abs()).max(1.0);
        assert!(
            (re - want.0).abs() <= tolerance && (im - want.1).abs() <= tolerance,
            "c = ({}, {}), order {}: got ({}, {}), expected ({}, {})",
            x,
            y,
            order + 1,
            re,
            im,
            want.0,
            want.1
        );
    }
}

#[test]
fn period_two_real_axis_series_stays_exact() {
    // z alternates 0, -1: B and C flip sign each step, D = ±2
    let view = view_at("-1", "0", "1e-30", 5000);
    let mut orbit = ReferenceOrbit::with_capacity(3 * 5000);
    let pass = orbit.generate(&view);

    assert_eq!(pass.validity_limit, 4999);
    let s = pass.series;
    assert_eq!((s.b.re.to_f64(), s.c.re.to_f64(), s.d.re.to_f64()), (1.0, 1.0, 2.0));
    assert!(s.b.im.is_zero() && s.c.im.is_zero() && s.d.im.is_zero());
}

#[test]
fn real_axis_series_matches_native_recurrence() {
    assert_series_matches_native("-0.5", "0", 1000, 999);
    assert_series_matches_native("-1.2", "0", 800, 500);
}

#[test]
fn complex_series_matches_native_recurrence() {
    assert_series_matches_native("0.1", "0.3", 600, 500);
}

#[test]
fn escape_on_first_step_freezes_empty_series() {
    let view = view_at("15", "15", "2", 1000);
    let mut orbit = ReferenceOrbit::with_capacity(300);
    let pass = orbit.generate(&view);

    assert_eq!(pass.series, PerturbationSeries::ZERO);
    let encoded = EncodedSeries::encode(&pass.series, pass.validity_limit, view.radius());
    assert_eq!(encoded.scale_exponent, 0);
    assert_eq!(encoded.coefficients, [0.0; 6]);
}

#[test]
fn validity_limit_never_exceeds_orbit_length() {
    for (x, y) in [("-0.75", "0.1"), ("0.3", "0.5"), ("-1.25", "0"), ("-0.5", "0")] {
        let view = view_at(x, y, "1e-20", 2000);
        let mut orbit = ReferenceOrbit::with_capacity(3 * 4000);
        let pass = orbit.generate(&view);
        assert!(
            (pass.validity_limit as usize) < pass.length,
            "c = ({}, {}): limit {} vs length {}",
            x,
            y,
            pass.validity_limit,
            pass.length
        );
    }
}

#[test]
fn smaller_radius_trusts_series_longer() {
    // Escaping point just outside the main cardioid cusp
    let mut orbit = ReferenceOrbit::with_capacity(3 * 5000);
    let shallow = orbit.generate(&view_at("0.2501", "0", "1e-3", 5000));
    let deep = orbit.generate(&view_at("0.2501", "0", "1e-40", 5000));
    assert!(deep.validity_limit >= shallow.validity_limit);
}

#[test]
fn encoded_first_order_term_is_near_unit() {
    let view = view_at("-0.743643887037151", "0.131825904205330", "1e-14", 1500);
    let mut orbit = ReferenceOrbit::with_capacity(3 * 2000);
    let pass = orbit.generate(&view);
    let encoded = EncodedSeries::encode(&pass.series, pass.validity_limit, view.radius());

    let [bx, by, ..] = encoded.coefficients;
    let dominant = bx.abs().max(by.abs());
    assert!(
        (0.5..2.0).contains(&dominant),
        "dominant first order coefficient {}",
        dominant
    );
    assert_eq!(encoded.validity_limit, pass.validity_limit);
    assert!((encoded.radius_log2 - view.radius_log2()).abs() < 1e-12);
}
