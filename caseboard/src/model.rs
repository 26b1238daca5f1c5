use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub type NodeId = u32;
pub type EdgeId = u32;

/// RGBA colour. Persists as `#rrggbb`, or `#rrggbbaa` when not opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const NODE_BACKGROUND: Color = Color::rgb(0xff, 0xfe, 0xf8);
    pub const EDGE: Color = Color::rgb(0x66, 0x66, 0x66);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Color::rgb(nib(0)? * 17, nib(1)? * 17, nib(2)? * 17)),
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| de::Error::custom(format!("invalid colour `{s}`")))
    }
}

/// A named detail line on a node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub value: String,
    pub visible: bool,
    pub file_link: Option<String>,
    pub image_ref: Option<String>,
}

impl FieldRecord {
    pub fn new(value: impl Into<String>) -> Self {
        FieldRecord {
            value: value.into(),
            visible: true,
            file_link: None,
            image_ref: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// A clue on the board. `(x, y)` is the top-left corner in model units.
///
/// `width`/`height` hold the expanded size even while `collapsed` is set, so
/// expanding restores the previous rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub image_ref: Option<String>,
    pub background_color: Color,
    pub collapsed: bool,
    pub fields: IndexMap<String, FieldRecord>,
}

impl Node {
    pub fn visible_field_count(&self) -> usize {
        self.fields.values().filter(|f| f.visible).count()
    }
}

/// A directed thread between two distinct nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub label: String,
    pub color: Color,
    pub hidden: bool,
}

impl Edge {
    pub fn touches(&self, node: NodeId) -> bool {
        self.source == node || self.target == node
    }

    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.source == node {
            Some(self.target)
        } else if self.target == node {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Creation parameters for a node. Unset position defaults to the origin,
/// unset colour to the configured node background.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeSpec {
    pub x: f64,
    pub y: f64,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub image_ref: Option<String>,
    pub background_color: Option<Color>,
    pub collapsed: bool,
    pub fields: IndexMap<String, FieldRecord>,
}

impl NodeSpec {
    pub fn new(title: impl Into<String>) -> Self {
        NodeSpec {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn field(mut self, name: impl Into<String>, record: FieldRecord) -> Self {
        self.fields.insert(name.into(), record);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeSpec {
    pub label: String,
    pub color: Option<Color>,
    pub hidden: bool,
}

impl EdgeSpec {
    pub fn labeled(label: impl Into<String>) -> Self {
        EdgeSpec {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// What `Board::remove_node` took out of the model.
#[derive(Clone, Debug, PartialEq)]
pub struct RemovedNode {
    pub node: Node,
    pub edges: Vec<Edge>,
}
