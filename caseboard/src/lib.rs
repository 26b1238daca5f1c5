pub mod adjacency;
pub mod collab;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod selection;
pub mod session;
pub mod todo;
pub mod viewport;
pub mod geometry {
    pub mod anchor;
    pub mod limits;
    pub mod math;
    pub mod rect;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod picking;
}
#[cfg(not(target_arch = "wasm32"))]
pub mod storage;
mod json;

use adjacency::AdjacencyIndex;
use config::BoardConfig;
use error::{BoardError, DocumentError, InvalidEdge};
use geometry::anchor::{anchor_point, EdgeRoute};
use geometry::math;
use geometry::rect::{Point, Rect};
use model::{Color, Edge, EdgeId, EdgeSpec, FieldRecord, Node, NodeId, NodeSpec, RemovedNode};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use todo::TodoList;
use tracing::debug;

pub use json::{LoadReport, FORMAT_VERSION};
pub use session::{Action, Gesture, Mode, PointerEvent, Session};

/// What lies under a model-space point, topmost first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Hit {
    ResizeHandle { node: NodeId },
    Node { node: NodeId },
    Edge { edge: EdgeId, dist: f64 },
}

/// The case board: nodes, the threads between them, and the task list.
///
/// Ids come from counters that start at 1 and are never reused. Every edge
/// mutation goes through this type so the adjacency index stays exact.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) edges: BTreeMap<EdgeId, Edge>,
    pub(crate) adjacency: AdjacencyIndex,
    pub(crate) todos: TodoList,
    pub(crate) next_node_id: NodeId,
    pub(crate) next_edge_id: EdgeId,
    pub(crate) config: BoardConfig,
    // Accumulated zoom applied to model geometry. Minimum sizes scale with it.
    pub(crate) scale: f64,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Board::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Self {
        Board {
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            adjacency: AdjacencyIndex::new(),
            todos: TodoList::new(),
            next_node_id: 1,
            next_edge_id: 1,
            config,
            scale: 1.0,
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Minimum expanded size at the current scale.
    pub fn min_size(&self) -> (f64, f64) {
        (
            self.config.min_width * self.scale,
            self.config.min_height * self.scale,
        )
    }

    pub fn collapsed_diameter(&self) -> f64 {
        self.config.collapsed_diameter * self.scale
    }

    pub fn resize_handle_size(&self) -> f64 {
        self.config.resize_handle * self.scale
    }

    pub fn next_ids(&self) -> (NodeId, EdgeId) {
        (self.next_node_id, self.next_edge_id)
    }

    // Nodes
    pub fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId, BoardError> {
        if !spec.x.is_finite() {
            return Err(BoardError::NonFinite("x"));
        }
        if !spec.y.is_finite() {
            return Err(BoardError::NonFinite("y"));
        }
        let id = self.next_node_id;
        self.next_node_id = id.checked_add(1).ok_or(BoardError::IdsExhausted("node"))?;
        let node = Node {
            id,
            x: spec.x,
            y: spec.y,
            width: self.config.default_width * self.scale,
            height: self.config.default_height * self.scale,
            title: spec.title,
            description: spec.description,
            icon: spec.icon,
            image_ref: spec.image_ref,
            background_color: spec.background_color.unwrap_or(self.config.node_background),
            collapsed: spec.collapsed,
            fields: spec.fields,
        };
        self.nodes.insert(id, node);
        self.fit_height(id)?;
        debug!(node = id, "node created");
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: NodeId) -> Result<RemovedNode, BoardError> {
        if !self.nodes.contains_key(&id) {
            return Err(BoardError::UnknownNode(id));
        }
        let incident: Vec<EdgeId> = self.adjacency.edges_of(id).iter().copied().collect();
        let mut edges = Vec::with_capacity(incident.len());
        for eid in incident {
            edges.push(self.remove_edge(eid)?);
        }
        let node = self.nodes.remove(&id).ok_or(BoardError::UnknownNode(id))?;
        debug!(node = id, edges = edges.len(), "node removed");
        Ok(RemovedNode { node, edges })
    }

    /// Current bounding box. A collapsed node is a circle of the collapsed
    /// diameter anchored at its top-left corner.
    pub fn node_bounds(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(&id).map(|n| self.bounds_of(n))
    }

    pub(crate) fn bounds_of(&self, n: &Node) -> Rect {
        if n.collapsed {
            let d = self.collapsed_diameter();
            Rect::from_origin_size(n.x, n.y, d, d)
        } else {
            Rect::from_origin_size(n.x, n.y, n.width, n.height)
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, BoardError> {
        self.nodes.get_mut(&id).ok_or(BoardError::UnknownNode(id))
    }

    pub fn translate_node(&mut self, id: NodeId, dx: f64, dy: f64) -> Result<(), BoardError> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(BoardError::NonFinite("delta"));
        }
        let n = self.node_mut(id)?;
        n.x += dx;
        n.y += dy;
        Ok(())
    }

    pub fn set_node_position(&mut self, id: NodeId, x: f64, y: f64) -> Result<(), BoardError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(BoardError::NonFinite("position"));
        }
        let n = self.node_mut(id)?;
        n.x = x;
        n.y = y;
        Ok(())
    }

    /// Sets the expanded size, clamped to the minimum. Returns the size applied.
    pub fn set_node_size(&mut self, id: NodeId, width: f64, height: f64) -> Result<(f64, f64), BoardError> {
        if !width.is_finite() || !height.is_finite() {
            return Err(BoardError::NonFinite("size"));
        }
        let (min_w, min_h) = self.min_size();
        let n = self.node_mut(id)?;
        n.width = width.max(min_w);
        n.height = height.max(min_h);
        Ok((n.width, n.height))
    }

    /// Returns whether the state changed. Expanding re-runs auto-grow.
    pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) -> Result<bool, BoardError> {
        let n = self.node_mut(id)?;
        if n.collapsed == collapsed {
            return Ok(false);
        }
        n.collapsed = collapsed;
        if !collapsed {
            self.fit_height(id)?;
        }
        Ok(true)
    }

    /// Grows the node so its visible content fits. Never shrinks it.
    /// Returns whether the height changed.
    pub fn fit_height(&mut self, id: NodeId) -> Result<bool, BoardError> {
        let scale = self.scale;
        let min_h = self.config.min_height * scale;
        let n = self.nodes.get_mut(&id).ok_or(BoardError::UnknownNode(id))?;
        let required =
            (self.config.layout.content_height(&n.description, n.visible_field_count()) * scale).max(min_h);
        if required > n.height {
            n.height = required;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn set_title(&mut self, id: NodeId, title: impl Into<String>) -> Result<(), BoardError> {
        self.node_mut(id)?.title = title.into();
        Ok(())
    }

    pub fn set_description(&mut self, id: NodeId, description: impl Into<String>) -> Result<bool, BoardError> {
        self.node_mut(id)?.description = description.into();
        self.fit_height(id)
    }

    pub fn set_icon(&mut self, id: NodeId, icon: Option<String>) -> Result<(), BoardError> {
        self.node_mut(id)?.icon = icon;
        Ok(())
    }

    pub fn set_image_ref(&mut self, id: NodeId, image_ref: Option<String>) -> Result<(), BoardError> {
        self.node_mut(id)?.image_ref = image_ref;
        Ok(())
    }

    pub fn set_background(&mut self, id: NodeId, color: Color) -> Result<(), BoardError> {
        self.node_mut(id)?.background_color = color;
        Ok(())
    }

    // Fields
    /// Inserts or replaces a field. A replaced field keeps its position.
    pub fn set_field(&mut self, id: NodeId, name: &str, record: FieldRecord) -> Result<bool, BoardError> {
        self.node_mut(id)?.fields.insert(name.to_string(), record);
        self.fit_height(id)
    }

    pub fn remove_field(&mut self, id: NodeId, name: &str) -> Result<FieldRecord, BoardError> {
        let removed = self
            .node_mut(id)?
            .fields
            .shift_remove(name)
            .ok_or_else(|| BoardError::UnknownField { node: id, name: name.to_string() })?;
        self.fit_height(id)?;
        Ok(removed)
    }

    pub fn set_field_visible(&mut self, id: NodeId, name: &str, visible: bool) -> Result<bool, BoardError> {
        let field = self
            .node_mut(id)?
            .fields
            .get_mut(name)
            .ok_or_else(|| BoardError::UnknownField { node: id, name: name.to_string() })?;
        field.visible = visible;
        self.fit_height(id)
    }

    // Edges
    /// Refused edges fail with `BoardError::InvalidEdge` and leave the board unchanged.
    pub fn create_edge(&mut self, source: NodeId, target: NodeId, spec: EdgeSpec) -> Result<EdgeId, BoardError> {
        if source == target {
            return Err(InvalidEdge::SelfLoop(source).into());
        }
        for end in [source, target] {
            if !self.nodes.contains_key(&end) {
                return Err(InvalidEdge::UnknownEndpoint(end).into());
            }
        }
        let id = self.next_edge_id;
        self.next_edge_id = id.checked_add(1).ok_or(BoardError::IdsExhausted("edge"))?;
        let edge = Edge {
            id,
            source,
            target,
            label: spec.label,
            color: spec.color.unwrap_or(self.config.edge_color),
            hidden: spec.hidden,
        };
        self.adjacency.on_edge_added(&edge);
        self.edges.insert(id, edge);
        debug!(edge = id, source, target, "edge created");
        Ok(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, BoardError> {
        let edge = self.edges.remove(&id).ok_or(BoardError::UnknownEdge(id))?;
        self.adjacency.on_edge_removed(&edge);
        Ok(edge)
    }

    fn edge_mut(&mut self, id: EdgeId) -> Result<&mut Edge, BoardError> {
        self.edges.get_mut(&id).ok_or(BoardError::UnknownEdge(id))
    }

    pub fn set_edge_label(&mut self, id: EdgeId, label: impl Into<String>) -> Result<(), BoardError> {
        self.edge_mut(id)?.label = label.into();
        Ok(())
    }

    pub fn set_edge_color(&mut self, id: EdgeId, color: Color) -> Result<(), BoardError> {
        self.edge_mut(id)?.color = color;
        Ok(())
    }

    /// Returns whether the flag changed.
    pub fn set_edge_hidden(&mut self, id: EdgeId, hidden: bool) -> Result<bool, BoardError> {
        let e = self.edge_mut(id)?;
        let changed = e.hidden != hidden;
        e.hidden = hidden;
        Ok(changed)
    }

    pub fn edges_of(&self, node: NodeId) -> &BTreeSet<EdgeId> {
        self.adjacency.edges_of(node)
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    // Geometry
    pub fn anchor_point(&self, node: NodeId, other: NodeId) -> Option<Point> {
        let a = self.node_bounds(node)?;
        let b = self.node_bounds(other)?;
        Some(anchor_point(&a, &b))
    }

    /// Anchors of a visible edge; `None` for hidden or unknown edges.
    pub fn edge_route(&self, id: EdgeId) -> Option<EdgeRoute> {
        let e = self.edges.get(&id).filter(|e| !e.hidden)?;
        let a = self.node_bounds(e.source)?;
        let b = self.node_bounds(e.target)?;
        Some(EdgeRoute::between(&a, &b))
    }

    /// Rescales all node geometry about `pivot`. The minimum sizes follow
    /// through `scale`, so repeated calls with reciprocal factors invert.
    pub fn scale_about(&mut self, pivot: Point, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) || !pivot.is_finite() {
            return;
        }
        for n in self.nodes.values_mut() {
            n.x = math::scale_about(n.x, pivot.x, factor);
            n.y = math::scale_about(n.y, pivot.y, factor);
            n.width *= factor;
            n.height *= factor;
        }
        self.scale *= factor;
    }

    /// Nodes whose bounds overlap `rect`, edges included.
    pub fn nodes_in_rect(&self, rect: &Rect) -> BTreeSet<NodeId> {
        self.nodes
            .values()
            .filter(|n| self.bounds_of(n).intersects(rect))
            .map(|n| n.id)
            .collect()
    }

    pub fn hit_test(&self, p: Point) -> Option<Hit> {
        algorithms::picking::hit_test_impl(self, p)
    }

    // Tasks
    pub fn todos(&self) -> &TodoList {
        &self.todos
    }

    pub fn todos_mut(&mut self) -> &mut TodoList {
        &mut self.todos
    }

    // JSON
    pub fn to_json_value(&self) -> Result<serde_json::Value, DocumentError> {
        json::to_json_impl(self)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(&self.to_json_value()?)?)
    }

    /// Parses a document into a fresh board with the given configuration.
    pub fn from_json_value(config: BoardConfig, v: serde_json::Value) -> Result<(Board, LoadReport), DocumentError> {
        json::from_json_impl(config, v)
    }

    pub fn from_json_str(config: BoardConfig, s: &str) -> Result<(Board, LoadReport), DocumentError> {
        let v: serde_json::Value = serde_json::from_str(s)?;
        Board::from_json_value(config, v)
    }

    /// Replaces this board's contents with the document. On error the board
    /// is left untouched.
    pub fn load_json_value(&mut self, v: serde_json::Value) -> Result<LoadReport, DocumentError> {
        let (board, report) = json::from_json_impl(self.config.clone(), v)?;
        *self = board;
        Ok(report)
    }

    // Clear
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.adjacency.clear();
        self.todos = TodoList::new();
        self.next_node_id = 1;
        self.next_edge_id = 1;
        self.scale = 1.0;
    }
}
