//! The interaction state machine.
//!
//! A `Session` owns the board for one editing session together with the
//! transient state around it: viewport, selection, mode and the active
//! gesture. It is the only mutator of node geometry while a gesture runs.
//! Every input returns the list of `Action`s the host needs to redraw.

use crate::collab::{self, AddressResolver, Assistant};
use crate::error::{BoardError, DocumentError};
use crate::geometry::anchor::EdgeRoute;
use crate::geometry::rect::{Point, Rect};
use crate::model::{Color, EdgeId, EdgeSpec, FieldRecord, NodeId, NodeSpec};
use crate::render::{EntityRef, RenderHandle, RenderRegistry};
use crate::selection::Selection;
use crate::todo::TodoList;
use crate::viewport::Viewport;
use crate::{Board, Hit, LoadReport};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Select,
    Connect,
}

/// One pointer sample in device coordinates. `sample` increases with every
/// distinct hardware event; repeated deliveries of the same event share it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub sample: u64,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, sample: u64) -> Self {
        PointerEvent { x, y, sample }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    DraggingSingle {
        node: NodeId,
        last: Point,
    },
    DraggingGroup {
        nodes: Vec<NodeId>,
        last: Point,
    },
    Resizing {
        node: NodeId,
        origin: Point,
        original: (f64, f64),
    },
    BoxSelecting {
        origin: Point,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::DraggingSingle { .. } => "drag",
            Gesture::DraggingGroup { .. } => "group-drag",
            Gesture::Resizing { .. } => "resize",
            Gesture::BoxSelecting { .. } => "box-select",
        }
    }
}

/// A redraw instruction for the host.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    NodeCreated { id: NodeId },
    /// Text, icon, image, colour or fields changed.
    NodeChanged { id: NodeId },
    NodeMoved { id: NodeId, x: f64, y: f64 },
    NodeResized { id: NodeId, width: f64, height: f64 },
    NodeReshaped { id: NodeId, collapsed: bool },
    EdgeCreated { id: EdgeId, source: NodeId, target: NodeId },
    EdgeChanged { id: EdgeId },
    EdgeRouted { id: EdgeId, from: Point, to: Point },
    EdgeRouteCleared { id: EdgeId },
    Highlight { entity: EntityRef, on: bool },
    SelectionChanged { nodes: Vec<NodeId>, edge: Option<EdgeId> },
    Marquee { rect: Rect },
    MarqueeCleared,
    Smoothing { edges: Vec<EdgeId>, enabled: bool },
    ConnectPending { source: NodeId },
    ConnectCancelled,
    ModeChanged { mode: Mode },
    Panned { scroll: Point },
    Discard { entity: EntityRef, handles: Vec<RenderHandle> },
    RedrawAll,
}

#[derive(Debug, Default)]
pub struct Session {
    board: Board,
    viewport: Viewport,
    selection: Selection,
    mode: Mode,
    pending_source: Option<NodeId>,
    gesture: Gesture,
    last_sample: Option<u64>,
    // Edges drawn without smoothing for the current drag.
    smoothing_off: BTreeSet<EdgeId>,
    routes: BTreeMap<EdgeId, EdgeRoute>,
    registry: RenderRegistry,
}

impl Session {
    pub fn new(board: Board) -> Self {
        let mut viewport = Viewport::from_config(board.config());
        viewport.set_zoom(board.scale());
        let mut s = Session {
            board,
            viewport,
            ..Default::default()
        };
        s.refresh_routes();
        s
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn pending_source(&self) -> Option<NodeId> {
        self.pending_source
    }

    /// Last anchors emitted for a visible edge.
    pub fn route(&self, edge: EdgeId) -> Option<&EdgeRoute> {
        self.routes.get(&edge)
    }

    pub fn routes(&self) -> impl Iterator<Item = (EdgeId, &EdgeRoute)> {
        self.routes.iter().map(|(id, r)| (*id, r))
    }

    pub fn smoothing_disabled(&self) -> &BTreeSet<EdgeId> {
        &self.smoothing_off
    }

    pub fn registry(&self) -> &RenderRegistry {
        &self.registry
    }

    pub fn register_handle(&mut self, entity: EntityRef, handle: RenderHandle) {
        self.registry.register(entity, handle);
    }

    pub fn todos_mut(&mut self) -> &mut TodoList {
        self.board.todos_mut()
    }

    fn busy(&self, what: &'static str) -> bool {
        if self.gesture.is_idle() {
            return false;
        }
        debug!(command = what, gesture = self.gesture.name(), "refused during gesture");
        true
    }

    // Routing
    fn reroute<I>(&mut self, edges: I, out: &mut Vec<Action>)
    where
        I: IntoIterator<Item = EdgeId>,
    {
        for id in edges {
            match self.board.edge_route(id) {
                Some(route) => {
                    self.routes.insert(id, route);
                    out.push(Action::EdgeRouted {
                        id,
                        from: route.from,
                        to: route.to,
                    });
                }
                None => {
                    if self.routes.remove(&id).is_some() {
                        out.push(Action::EdgeRouteCleared { id });
                    }
                }
            }
        }
    }

    fn reroute_node(&mut self, node: NodeId, out: &mut Vec<Action>) {
        let edges: Vec<EdgeId> = self.board.edges_of(node).iter().copied().collect();
        self.reroute(edges, out);
    }

    fn refresh_routes(&mut self) {
        self.routes = self
            .board
            .edges()
            .filter_map(|e| self.board.edge_route(e.id).map(|r| (e.id, r)))
            .collect();
    }

    // Selection
    fn set_selection(&mut self, next: Selection, out: &mut Vec<Action>) {
        if next == self.selection {
            return;
        }
        let before = self.selection.entities();
        let after = next.entities();
        for &entity in before.difference(&after) {
            out.push(Action::Highlight { entity, on: false });
        }
        for &entity in after.difference(&before) {
            out.push(Action::Highlight { entity, on: true });
        }
        self.selection = next;
        out.push(self.selection_changed());
    }

    fn selection_changed(&self) -> Action {
        Action::SelectionChanged {
            nodes: self.selection.node_ids().into_iter().collect(),
            edge: self.selection.edge(),
        }
    }

    fn forget(&mut self, entity: EntityRef, out: &mut Vec<Action>) {
        let before = self.selection.clone();
        self.selection.forget(entity);
        if self.pending_source.map(EntityRef::Node) == Some(entity) {
            self.pending_source = None;
            out.push(Action::ConnectCancelled);
        }
        if before != self.selection {
            out.push(self.selection_changed());
        }
    }

    pub fn select_node(&mut self, id: NodeId) -> Vec<Action> {
        let mut out = Vec::new();
        if self.board.contains_node(id) && !self.busy("select") {
            self.set_selection(Selection::Node(id), &mut out);
        }
        out
    }

    pub fn select_edge(&mut self, id: EdgeId) -> Vec<Action> {
        let mut out = Vec::new();
        if self.board.edge(id).is_some() && !self.busy("select") {
            self.set_selection(Selection::Edge(id), &mut out);
        }
        out
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        let mut out = Vec::new();
        if !self.busy("clear selection") {
            self.set_selection(Selection::Empty, &mut out);
        }
        out
    }

    // Modes
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        let mut out = Vec::new();
        if self.pending_source.take().is_some() {
            out.push(Action::ConnectCancelled);
        }
        if self.mode != mode {
            self.mode = mode;
            debug!(?mode, "mode changed");
            out.push(Action::ModeChanged { mode });
        }
        out
    }

    pub fn toggle_connect(&mut self) -> Vec<Action> {
        let next = match self.mode {
            Mode::Select => Mode::Connect,
            Mode::Connect => Mode::Select,
        };
        self.set_mode(next)
    }

    // Pointer input
    pub fn pointer_down(&mut self, ev: PointerEvent) -> Vec<Action> {
        let mut out = Vec::new();
        if !self.gesture.is_idle() {
            debug!(gesture = self.gesture.name(), "pointer down ignored");
            return out;
        }
        let device = Point::new(ev.x, ev.y);
        if !device.is_finite() {
            return out;
        }
        let p = self.viewport.device_to_model(device);
        self.last_sample = None;
        let hit = self.board.hit_test(p);
        if self.mode == Mode::Connect {
            self.connect_click(hit, &mut out);
            return out;
        }
        match hit {
            Some(Hit::ResizeHandle { node }) => {
                if let Some(n) = self.board.node(node) {
                    self.gesture = Gesture::Resizing {
                        node,
                        origin: p,
                        original: (n.width, n.height),
                    };
                }
            }
            Some(Hit::Node { node }) => {
                if self.selection.is_multi() && self.selection.contains_node(node) {
                    let nodes: Vec<NodeId> = self.selection.node_ids().into_iter().collect();
                    self.begin_drag(Gesture::DraggingGroup { nodes, last: p }, &mut out);
                } else {
                    self.set_selection(Selection::Node(node), &mut out);
                    self.begin_drag(Gesture::DraggingSingle { node, last: p }, &mut out);
                }
            }
            Some(Hit::Edge { edge, .. }) => self.set_selection(Selection::Edge(edge), &mut out),
            None => {
                self.set_selection(Selection::Empty, &mut out);
                self.gesture = Gesture::BoxSelecting { origin: p };
                out.push(Action::Marquee {
                    rect: Rect::from_corners(p, p),
                });
            }
        }
        if !self.gesture.is_idle() {
            debug!(gesture = self.gesture.name(), "gesture started");
        }
        out
    }

    fn connect_click(&mut self, hit: Option<Hit>, out: &mut Vec<Action>) {
        let clicked = match hit {
            Some(Hit::Node { node } | Hit::ResizeHandle { node }) => Some(node),
            _ => None,
        };
        match (clicked, self.pending_source) {
            (Some(node), None) => {
                self.pending_source = Some(node);
                out.push(Action::ConnectPending { source: node });
            }
            (Some(target), Some(source)) => match self.board.create_edge(source, target, EdgeSpec::default()) {
                Ok(id) => {
                    info!(edge = id, source, target, "connection created");
                    self.pending_source = None;
                    out.push(Action::EdgeCreated { id, source, target });
                    self.reroute([id], out);
                    out.extend(self.set_mode(Mode::Select));
                }
                Err(err) => debug!(%err, "connection refused"),
            },
            (None, Some(_)) => {
                self.pending_source = None;
                out.push(Action::ConnectCancelled);
            }
            (None, None) => {}
        }
    }

    fn begin_drag(&mut self, gesture: Gesture, out: &mut Vec<Action>) {
        let nodes = match &gesture {
            Gesture::DraggingSingle { node, .. } => vec![*node],
            Gesture::DraggingGroup { nodes, .. } => nodes.clone(),
            _ => Vec::new(),
        };
        self.smoothing_off = self
            .board
            .adjacency()
            .edges_of_all(nodes)
            .into_iter()
            .filter(|e| self.board.edge(*e).is_some_and(|e| !e.hidden))
            .collect();
        if !self.smoothing_off.is_empty() {
            out.push(Action::Smoothing {
                edges: self.smoothing_off.iter().copied().collect(),
                enabled: false,
            });
        }
        self.gesture = gesture;
    }

    pub fn pointer_move(&mut self, ev: PointerEvent) -> Vec<Action> {
        let mut out = Vec::new();
        if self.gesture.is_idle() {
            return out;
        }
        if self.last_sample.is_some_and(|last| ev.sample <= last) {
            debug!(sample = ev.sample, "repeated input sample ignored");
            return out;
        }
        let device = Point::new(ev.x, ev.y);
        if !device.is_finite() {
            return out;
        }
        self.last_sample = Some(ev.sample);
        let p = self.viewport.device_to_model(device);
        let gesture = std::mem::take(&mut self.gesture);
        self.gesture = match gesture {
            Gesture::Idle => Gesture::Idle,
            Gesture::DraggingSingle { node, last } => {
                self.drag_nodes(&[node], p.x - last.x, p.y - last.y, &mut out);
                Gesture::DraggingSingle { node, last: p }
            }
            Gesture::DraggingGroup { nodes, last } => {
                self.drag_nodes(&nodes, p.x - last.x, p.y - last.y, &mut out);
                Gesture::DraggingGroup { nodes, last: p }
            }
            Gesture::Resizing { node, origin, original } => {
                let (w, h) = (original.0 + p.x - origin.x, original.1 + p.y - origin.y);
                if let Ok((width, height)) = self.board.set_node_size(node, w, h) {
                    out.push(Action::NodeResized { id: node, width, height });
                    self.reroute_node(node, &mut out);
                }
                Gesture::Resizing { node, origin, original }
            }
            Gesture::BoxSelecting { origin } => {
                let rect = Rect::from_corners(origin, p);
                let hits = self.board.nodes_in_rect(&rect);
                self.set_selection(Selection::from_nodes(hits), &mut out);
                out.push(Action::Marquee { rect });
                Gesture::BoxSelecting { origin }
            }
        };
        out
    }

    fn drag_nodes(&mut self, nodes: &[NodeId], dx: f64, dy: f64, out: &mut Vec<Action>) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        for &id in nodes {
            if self.board.translate_node(id, dx, dy).is_ok() {
                if let Some(n) = self.board.node(id) {
                    out.push(Action::NodeMoved { id, x: n.x, y: n.y });
                }
            }
        }
        let edges = self.board.adjacency().edges_of_all(nodes.iter().copied());
        self.reroute(edges, out);
    }

    /// Applies the final position, then commits the gesture.
    pub fn pointer_up(&mut self, ev: PointerEvent) -> Vec<Action> {
        let mut out = self.pointer_move(ev);
        out.extend(self.cancel_gesture());
        out
    }

    /// Ends the gesture where it stands, as when the pointer is released
    /// outside the canvas.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        let mut out = Vec::new();
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle => return out,
            Gesture::DraggingSingle { .. } | Gesture::DraggingGroup { .. } => {
                let edges = std::mem::take(&mut self.smoothing_off);
                if !edges.is_empty() {
                    out.push(Action::Smoothing {
                        edges: edges.iter().copied().collect(),
                        enabled: true,
                    });
                    self.reroute(edges, &mut out);
                }
            }
            Gesture::Resizing { .. } => {}
            Gesture::BoxSelecting { .. } => out.push(Action::MarqueeCleared),
        }
        self.last_sample = None;
        debug!(gesture = gesture.name(), "gesture committed");
        out
    }

    // Viewport
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Vec<Action> {
        self.viewport.pan_by(dx, dy);
        vec![Action::Panned {
            scroll: self.viewport.scroll(),
        }]
    }

    /// Zooms by `factor` about a device-space pivot, clamped to the zoom range.
    /// Model geometry is rescaled so hit testing keeps matching the drawing.
    pub fn zoom_at(&mut self, pivot: Point, factor: f64) -> Vec<Action> {
        if self.busy("zoom") || !pivot.is_finite() {
            return Vec::new();
        }
        let f = self.viewport.effective_factor(factor);
        if f == 1.0 {
            return Vec::new();
        }
        let model_pivot = self.viewport.device_to_model(pivot);
        self.board.scale_about(model_pivot, f);
        self.viewport.apply_factor(f);
        self.refresh_routes();
        debug!(zoom = self.viewport.zoom(), "zoomed");
        vec![Action::RedrawAll]
    }

    /// One wheel notch: positive `direction` zooms in, negative zooms out.
    pub fn zoom_wheel(&mut self, pivot: Point, direction: f64) -> Vec<Action> {
        let step = self.board.config().zoom_step;
        if direction > 0.0 {
            self.zoom_at(pivot, step)
        } else if direction < 0.0 {
            self.zoom_at(pivot, 1.0 / step)
        } else {
            Vec::new()
        }
    }

    // Entities
    pub fn create_node(&mut self, spec: NodeSpec) -> Result<(NodeId, Vec<Action>), BoardError> {
        let id = self.board.create_node(spec)?;
        Ok((id, vec![Action::NodeCreated { id }]))
    }

    pub fn create_edge(&mut self, source: NodeId, target: NodeId, spec: EdgeSpec) -> Result<(EdgeId, Vec<Action>), BoardError> {
        let id = self.board.create_edge(source, target, spec)?;
        let mut out = vec![Action::EdgeCreated { id, source, target }];
        self.reroute([id], &mut out);
        Ok((id, out))
    }

    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<Action>, BoardError> {
        let mut out = Vec::new();
        if self.busy("delete") {
            return Ok(out);
        }
        let removed = self.board.remove_node(id)?;
        for e in &removed.edges {
            self.discard_edge(e.id, &mut out);
        }
        let entity = EntityRef::Node(id);
        self.forget(entity, &mut out);
        out.push(Action::Discard {
            entity,
            handles: self.registry.release(entity),
        });
        Ok(out)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Vec<Action>, BoardError> {
        let mut out = Vec::new();
        if self.busy("delete") {
            return Ok(out);
        }
        self.board.remove_edge(id)?;
        self.discard_edge(id, &mut out);
        Ok(out)
    }

    fn discard_edge(&mut self, id: EdgeId, out: &mut Vec<Action>) {
        self.routes.remove(&id);
        self.smoothing_off.remove(&id);
        let entity = EntityRef::Edge(id);
        self.forget(entity, out);
        out.push(Action::Discard {
            entity,
            handles: self.registry.release(entity),
        });
    }

    /// Deletes the selected nodes (with their edges) or the selected edge.
    pub fn delete_selection(&mut self) -> Result<Vec<Action>, BoardError> {
        if self.busy("delete") {
            return Ok(Vec::new());
        }
        match self.selection.clone() {
            Selection::Empty => Ok(Vec::new()),
            Selection::Edge(e) => self.remove_edge(e),
            sel => {
                let mut out = Vec::new();
                for n in sel.node_ids() {
                    out.extend(self.remove_node(n)?);
                }
                Ok(out)
            }
        }
    }

    pub fn toggle_collapsed(&mut self, id: NodeId) -> Result<Vec<Action>, BoardError> {
        let mut out = Vec::new();
        if self.busy("collapse") {
            return Ok(out);
        }
        let collapsed = !self.board.node(id).ok_or(BoardError::UnknownNode(id))?.collapsed;
        self.board.set_collapsed(id, collapsed)?;
        out.push(Action::NodeReshaped { id, collapsed });
        if !collapsed {
            self.push_size(id, &mut out);
        }
        self.reroute_node(id, &mut out);
        Ok(out)
    }

    fn push_size(&self, id: NodeId, out: &mut Vec<Action>) {
        if let Some(n) = self.board.node(id) {
            out.push(Action::NodeResized {
                id,
                width: n.width,
                height: n.height,
            });
        }
    }

    // Follows a content edit; a grown node needs its size and routes redrawn.
    fn node_changed(&mut self, id: NodeId, grew: bool) -> Vec<Action> {
        let mut out = vec![Action::NodeChanged { id }];
        if grew {
            self.push_size(id, &mut out);
            self.reroute_node(id, &mut out);
        }
        out
    }

    pub fn set_title(&mut self, id: NodeId, title: &str) -> Result<Vec<Action>, BoardError> {
        self.board.set_title(id, title)?;
        Ok(self.node_changed(id, false))
    }

    pub fn set_description(&mut self, id: NodeId, description: &str) -> Result<Vec<Action>, BoardError> {
        let grew = self.board.set_description(id, description)?;
        Ok(self.node_changed(id, grew))
    }

    pub fn set_icon(&mut self, id: NodeId, icon: Option<String>) -> Result<Vec<Action>, BoardError> {
        self.board.set_icon(id, icon)?;
        Ok(self.node_changed(id, false))
    }

    pub fn set_image_ref(&mut self, id: NodeId, image_ref: Option<String>) -> Result<Vec<Action>, BoardError> {
        self.board.set_image_ref(id, image_ref)?;
        Ok(self.node_changed(id, false))
    }

    pub fn set_background(&mut self, id: NodeId, color: Color) -> Result<Vec<Action>, BoardError> {
        self.board.set_background(id, color)?;
        Ok(self.node_changed(id, false))
    }

    pub fn set_field(&mut self, id: NodeId, name: &str, record: FieldRecord) -> Result<Vec<Action>, BoardError> {
        let grew = self.board.set_field(id, name, record)?;
        Ok(self.node_changed(id, grew))
    }

    pub fn remove_field(&mut self, id: NodeId, name: &str) -> Result<Vec<Action>, BoardError> {
        self.board.remove_field(id, name)?;
        Ok(self.node_changed(id, false))
    }

    pub fn set_field_visible(&mut self, id: NodeId, name: &str, visible: bool) -> Result<Vec<Action>, BoardError> {
        let grew = self.board.set_field_visible(id, name, visible)?;
        Ok(self.node_changed(id, grew))
    }

    pub fn set_edge_label(&mut self, id: EdgeId, label: &str) -> Result<Vec<Action>, BoardError> {
        self.board.set_edge_label(id, label)?;
        Ok(vec![Action::EdgeChanged { id }])
    }

    pub fn set_edge_color(&mut self, id: EdgeId, color: Color) -> Result<Vec<Action>, BoardError> {
        self.board.set_edge_color(id, color)?;
        Ok(vec![Action::EdgeChanged { id }])
    }

    pub fn set_edge_hidden(&mut self, id: EdgeId, hidden: bool) -> Result<Vec<Action>, BoardError> {
        let mut out = Vec::new();
        if self.board.set_edge_hidden(id, hidden)? {
            out.push(Action::EdgeChanged { id });
            self.reroute([id], &mut out);
        }
        Ok(out)
    }

    // Collaborators
    /// Drops a map pin at a model point and selects it.
    pub fn add_map_pin(&mut self, resolver: &dyn AddressResolver, address: &str, at: Point) -> Result<(NodeId, Vec<Action>), BoardError> {
        let spec = collab::map_pin_spec(resolver, address, at);
        let (id, mut out) = self.create_node(spec)?;
        if self.gesture.is_idle() {
            self.set_selection(Selection::Node(id), &mut out);
        }
        Ok((id, out))
    }

    /// Appends assistant leads for a node to the task list. Returns how many
    /// were new.
    pub fn add_suggested_tasks(&mut self, assistant: &dyn Assistant, node: NodeId, count: usize) -> Result<usize, String> {
        let leads = collab::suggest_leads(assistant, &self.board, node, count)?;
        Ok(self.board.todos_mut().extend_suggestions(leads))
    }

    // Documents
    pub fn to_json_value(&self) -> Result<serde_json::Value, DocumentError> {
        self.board.to_json_value()
    }

    /// Replaces the board with a document. Refused while a gesture is active;
    /// on any error the current board stays as it was.
    pub fn load_json_value(&mut self, v: serde_json::Value) -> Result<(LoadReport, Vec<Action>), DocumentError> {
        if self.busy("load") {
            return Err(DocumentError::GestureActive);
        }
        let report = self.board.load_json_value(v)?;
        Ok((report, self.reset_view()))
    }

    /// Adopts an already loaded board.
    pub fn replace_board(&mut self, board: Board) -> Result<Vec<Action>, DocumentError> {
        if self.busy("load") {
            return Err(DocumentError::GestureActive);
        }
        self.board = board;
        Ok(self.reset_view())
    }

    pub fn clear(&mut self) -> Vec<Action> {
        if self.busy("clear") {
            return Vec::new();
        }
        self.board.clear();
        self.reset_view()
    }

    fn reset_view(&mut self) -> Vec<Action> {
        let mut out: Vec<Action> = self
            .registry
            .release_all()
            .into_iter()
            .map(|(entity, handles)| Action::Discard { entity, handles })
            .collect();
        self.viewport = Viewport::from_config(self.board.config());
        self.viewport.set_zoom(self.board.scale());
        self.selection = Selection::Empty;
        self.pending_source = None;
        self.mode = Mode::Select;
        self.smoothing_off.clear();
        self.last_sample = None;
        self.refresh_routes();
        out.push(Action::RedrawAll);
        out
    }
}
