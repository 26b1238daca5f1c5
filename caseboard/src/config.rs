use crate::error::ConfigError;
use crate::model::Color;
use serde::{Deserialize, Serialize};

/// Vertical layout of an expanded node's content, at scale 1.
///
/// The title row sits under `title_pad`, followed by `description_pad`, the
/// description lines, `details_pad`, one line per visible field and a final
/// `details_pad`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentLayout {
    pub title_pad: f64,
    pub title_row: f64,
    pub description_pad: f64,
    pub description_line: f64,
    pub details_pad: f64,
    pub field_line: f64,
}

impl Default for ContentLayout {
    fn default() -> Self {
        ContentLayout {
            title_pad: 4.0,
            title_row: 18.0,
            description_pad: 4.0,
            description_line: 14.0,
            details_pad: 4.0,
            field_line: 14.0,
        }
    }
}

impl ContentLayout {
    /// Distance from a node's top edge to the bottom of its last visible
    /// field line plus padding. An empty description still takes one line.
    pub fn content_height(&self, description: &str, visible_fields: usize) -> f64 {
        let description_lines = description.lines().count().max(1) as f64;
        self.title_pad
            + self.title_row
            + self.description_pad
            + description_lines * self.description_line
            + self.details_pad
            + visible_fields as f64 * self.field_line
            + self.details_pad
    }
}

/// Tunables for a board and its editing session. Sizes are model units at
/// scale 1; the board multiplies them by its current scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Factor applied per wheel notch.
    pub zoom_step: f64,
    pub default_width: f64,
    pub default_height: f64,
    pub min_width: f64,
    pub min_height: f64,
    pub collapsed_diameter: f64,
    pub resize_handle: f64,
    /// Maximum pointer distance for picking an edge.
    pub edge_pick_tolerance: f64,
    pub node_background: Color,
    pub edge_color: Color,
    pub layout: ContentLayout,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            zoom_min: 0.2,
            zoom_max: 5.0,
            zoom_step: 1.1,
            default_width: 240.0,
            default_height: 130.0,
            min_width: 180.0,
            min_height: 60.0,
            collapsed_diameter: 60.0,
            resize_handle: 16.0,
            edge_pick_tolerance: 6.0,
            node_background: Color::NODE_BACKGROUND,
            edge_color: Color::EDGE,
            layout: ContentLayout::default(),
        }
    }
}

impl BoardConfig {
    /// Parses a (possibly partial) JSON object; absent keys keep defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: BoardConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("zoomMin", self.zoom_min),
            ("zoomMax", self.zoom_max),
            ("zoomStep", self.zoom_step),
            ("defaultWidth", self.default_width),
            ("defaultHeight", self.default_height),
            ("minWidth", self.min_width),
            ("minHeight", self.min_height),
            ("collapsedDiameter", self.collapsed_diameter),
            ("resizeHandle", self.resize_handle),
            ("edgePickTolerance", self.edge_pick_tolerance),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if self.zoom_min > 1.0 || self.zoom_max < 1.0 {
            return Err(ConfigError::ZoomRange {
                min: self.zoom_min,
                max: self.zoom_max,
            });
        }
        if self.default_width < self.min_width || self.default_height < self.min_height {
            return Err(ConfigError::DefaultBelowMinimum);
        }
        Ok(())
    }
}
