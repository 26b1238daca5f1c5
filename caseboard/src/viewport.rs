//! Device <-> model coordinates.
//!
//! Zoom is applied to the model itself (positions and sizes are rescaled
//! about the pivot), so the viewport only keeps the zoom factor for clamping
//! and a scroll offset for panning.

use crate::config::BoardConfig;
use crate::geometry::rect::Point;
use crate::geometry::tolerance::EPS_FACTOR;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    zoom: f64,
    zoom_min: f64,
    zoom_max: f64,
    scroll: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::from_config(&BoardConfig::default())
    }
}

impl Viewport {
    pub fn new(zoom_min: f64, zoom_max: f64) -> Self {
        Viewport {
            zoom: 1.0,
            zoom_min,
            zoom_max,
            scroll: Point::default(),
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Viewport::new(config.zoom_min, config.zoom_max)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_range(&self) -> (f64, f64) {
        (self.zoom_min, self.zoom_max)
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    pub fn device_to_model(&self, p: Point) -> Point {
        Point::new(p.x + self.scroll.x, p.y + self.scroll.y)
    }

    pub fn model_to_device(&self, p: Point) -> Point {
        Point::new(p.x - self.scroll.x, p.y - self.scroll.y)
    }

    /// Drags the content by `(dx, dy)` device pixels. Model coordinates are
    /// untouched.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.scroll.x -= dx;
            self.scroll.y -= dy;
        }
    }

    /// The factor that can actually be applied for a requested one, keeping
    /// the cumulative zoom inside `[zoom_min, zoom_max]`. Returns `1.0` for
    /// non-finite or non-positive requests.
    pub fn effective_factor(&self, requested: f64) -> f64 {
        if !(requested.is_finite() && requested > 0.0) {
            return 1.0;
        }
        let target = (self.zoom * requested).clamp(self.zoom_min, self.zoom_max);
        let f = target / self.zoom;
        if (f - 1.0).abs() <= EPS_FACTOR {
            1.0
        } else {
            f
        }
    }

    pub(crate) fn apply_factor(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(self.zoom_min, self.zoom_max);
    }

    /// Adopts the scale of a freshly loaded board.
    pub(crate) fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom.clamp(self.zoom_min, self.zoom_max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pan_moves_content_with_pointer() {
        let mut vp = Viewport::default();
        vp.pan_by(30.0, -10.0);
        assert_eq!(vp.device_to_model(Point::new(0.0, 0.0)), Point::new(-30.0, 10.0));
        assert_eq!(vp.model_to_device(Point::new(-30.0, 10.0)), Point::new(0.0, 0.0));
    }

    #[test]
    fn factor_is_clamped_to_range() {
        let mut vp = Viewport::new(0.5, 2.0);
        assert_eq!(vp.effective_factor(4.0), 2.0);
        vp.apply_factor(2.0);
        assert_eq!(vp.effective_factor(1.1), 1.0);
        assert_eq!(vp.effective_factor(0.1), 0.25);
        assert_eq!(vp.effective_factor(f64::NAN), 1.0);
        assert_eq!(vp.effective_factor(-2.0), 1.0);
    }
}
