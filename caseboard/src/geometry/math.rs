use super::rect::Point;

/// Squared distance from `p` to segment `a..b`, and the clamped parameter of
/// the closest point along the segment.
pub fn seg_distance_sq(p: Point, a: Point, b: Point) -> (f64, f64) {
    let vx = b.x - a.x; let vy = b.y - a.y;
    let wx = p.x - a.x; let wy = p.y - a.y;
    let vv = vx*vx + vy*vy;
    let t = if vv > 0.0 { ((wx*vx + wy*vy) / vv).clamp(0.0, 1.0) } else { 0.0 };
    let dx = p.x - (a.x + t * vx); let dy = p.y - (a.y + t * vy);
    (dx*dx + dy*dy, t)
}

/// Scales `v` about `pivot`: `pivot + factor * (v - pivot)`.
#[inline]
pub fn scale_about(v: f64, pivot: f64, factor: f64) -> f64 {
    pivot + factor * (v - pivot)
}
