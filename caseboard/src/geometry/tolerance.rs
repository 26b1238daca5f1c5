// Tolerances for board geometry (model units)

pub const EPS_FACTOR: f64 = 1e-12;        // zoom factor treated as identity

#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

/// Relative comparison for values that grow with zoom.
#[inline]
pub fn approx_eq_rel(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps * (1.0 + a.abs().max(b.abs()))
}
