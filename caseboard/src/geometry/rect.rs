use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle; `min_* <= max_*` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect::from_corners(Point::new(x, y), Point::new(x + width, y + height))
    }

    /// Normalised rectangle spanned by two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Rect {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Inclusive overlap: rectangles sharing only an edge still intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.max_x < self.min_x
            || other.min_x > self.max_x
            || other.max_y < self.min_y
            || other.min_y > self.max_y)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_normalise() {
        let r = Rect::from_corners(Point::new(150.0, 10.0), Point::new(10.0, 150.0));
        assert_eq!(r, Rect { min_x: 10.0, min_y: 10.0, max_x: 150.0, max_y: 150.0 });
        assert_eq!(r.center(), Point::new(80.0, 80.0));
    }

    #[test]
    fn overlap_is_inclusive() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::from_origin_size(10.0, 0.0, 5.0, 5.0);
        let apart = Rect::from_origin_size(10.5, 0.0, 5.0, 5.0);
        assert!(a.intersects(&touching));
        assert!(touching.intersects(&a));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn contains_boundary() {
        let r = Rect::from_origin_size(0.0, 0.0, 4.0, 4.0);
        assert!(r.contains(Point::new(4.0, 0.0)));
        assert!(!r.contains(Point::new(4.0001, 2.0)));
    }
}
