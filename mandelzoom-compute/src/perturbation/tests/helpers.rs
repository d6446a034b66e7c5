use mandelzoom_core::{BigFloat, SessionConfig, ViewState};

/// View at the given decimal center and radius.
pub fn view_at(x: &str, y: &str, radius: &str, iterations: u32) -> ViewState {
    let mut view = ViewState::new(&SessionConfig::default()).unwrap();
    view.set_from_strings(x, y, radius, iterations).unwrap();
    view
}

/// Direct high precision orbit z_0 = 0, z_{n+1} = z_n² + c, as f64 pairs.
pub fn direct_orbit(view: &ViewState, steps: usize) -> Vec<(f64, f64)> {
    let precision = view.precision_bits();
    let (cx, cy) = (view.center_x(), view.center_y());
    let two = BigFloat::with_precision(2.0, precision);
    let mut x = BigFloat::zero(precision);
    let mut y = BigFloat::zero(precision);
    let mut out = Vec::with_capacity(steps);
    for _ in 0..steps {
        out.push((x.to_f64(), y.to_f64()));
        let new_x = x.mul(&x).sub(&y.mul(&y)).add(cx);
        let new_y = two.mul(&x).mul(&y).add(cy);
        x = new_x;
        y = new_y;
    }
    out
}

/// Decode a compressed triple back to native doubles.
pub fn decode(triple: (f32, f32, f32)) -> (f64, f64) {
    let scale = (triple.2 as f64).exp2();
    (triple.0 as f64 * scale, triple.1 as f64 * scale)
}

/// Series coefficients `[B, C, D]` after `steps` updates, evaluated in
/// plain f64 complex arithmetic along the direct orbit.
pub fn native_series(view: &ViewState, steps: usize) -> [(f64, f64); 3] {
    let mul = |a: (f64, f64), b: (f64, f64)| (a.0 * b.0 - a.1 * b.1, a.0 * b.1 + a.1 * b.0);
    let (mut b, mut c, mut d) = ((0.0, 0.0), (0.0, 0.0), (0.0, 0.0));
    for (x, y) in direct_orbit(view, steps) {
        let two_z = (2.0 * x, 2.0 * y);
        let zb = mul(two_z, b);
        b = (zb.0 + 1.0, zb.1);
        let (zc, bb) = (mul(two_z, c), mul(b, b));
        c = (zc.0 + bb.0, zc.1 + bb.1);
        let (zd, bc) = (mul(two_z, d), mul(b, c));
        d = (zd.0 + 2.0 * bc.0, zd.1 + 2.0 * bc.1);
    }
    [b, c, d]
}
