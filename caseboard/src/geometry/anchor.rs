//! Where a thread touches the boundary of a node.

use super::rect::{Point, Rect};
use serde::Serialize;

/// The two anchor points of a visible edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EdgeRoute {
    pub from: Point,
    pub to: Point,
}

impl EdgeRoute {
    pub fn between(source: &Rect, target: &Rect) -> Self {
        EdgeRoute {
            from: anchor_point(source, target),
            to: anchor_point(target, source),
        }
    }
}

/// Midpoint of the side of `node` that faces `other`.
///
/// The left/right side is used when the centres are further apart
/// horizontally than vertically; ties go to top/bottom.
pub fn anchor_point(node: &Rect, other: &Rect) -> Point {
    let c = node.center();
    let o = other.center();
    let dx = o.x - c.x;
    let dy = o.y - c.y;
    if dx.abs() > dy.abs() {
        Point::new(if dx > 0.0 { node.max_x } else { node.min_x }, c.y)
    } else {
        Point::new(c.x, if dy > 0.0 { node.max_y } else { node.min_y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_by_side_nodes_meet_at_facing_sides() {
        let a = Rect::from_origin_size(0.0, 0.0, 100.0, 60.0);
        let b = Rect::from_origin_size(200.0, 0.0, 100.0, 60.0);
        assert_eq!(anchor_point(&a, &b), Point::new(100.0, 30.0));
        assert_eq!(anchor_point(&b, &a), Point::new(200.0, 30.0));
    }

    #[test]
    fn stacked_nodes_use_top_and_bottom() {
        let a = Rect::from_origin_size(0.0, 0.0, 100.0, 60.0);
        let b = Rect::from_origin_size(20.0, 300.0, 100.0, 60.0);
        let route = EdgeRoute::between(&a, &b);
        assert_eq!(route.from, Point::new(50.0, 60.0));
        assert_eq!(route.to, Point::new(70.0, 300.0));
    }

    #[test]
    fn diagonal_tie_prefers_vertical_sides() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_origin_size(20.0, 20.0, 10.0, 10.0);
        assert_eq!(anchor_point(&a, &b), Point::new(5.0, 10.0));
    }
}
