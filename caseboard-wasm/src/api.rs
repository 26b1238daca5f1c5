use crate::error;
use crate::interop::{arr_f64, arr_u32, arr_u8, new_obj, set_kv, to_js};
use crate::CaseBoard;
use caseboard::config::BoardConfig;
use caseboard::error::DocumentError;
use caseboard::geometry::rect::Point;
use caseboard::model::{Color, EdgeSpec, FieldRecord, NodeSpec};
use caseboard::render::{EntityRef, RenderHandle};
use caseboard::{Action, Mode, PointerEvent};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn finite(name: &'static str, v: f64) -> Result<f64, JsValue> {
    if v.is_finite() { Ok(v) } else { Err(error::non_finite(name)) }
}

fn parse_color(s: &str) -> Result<Color, JsValue> {
    Color::from_hex(s).ok_or_else(|| error::invalid_color(s))
}

fn entity(kind: &str, id: u32) -> Option<EntityRef> {
    match kind {
        "node" => Some(EntityRef::Node(id)),
        "edge" => Some(EntityRef::Edge(id)),
        _ => None,
    }
}

fn acts(out: Vec<Action>) -> JsValue { CaseBoard::actions(&out) }

fn ok_acts(out: Vec<Action>) -> JsValue { error::ok(acts(out)) }

#[wasm_bindgen]
impl CaseBoard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> CaseBoard { CaseBoard::rs_new() }

    /// Board with a JSON configuration; missing keys take their defaults.
    pub fn with_config(json: &str) -> Result<CaseBoard, JsValue> {
        let config = BoardConfig::from_json_str(json).map_err(|e| error::config(&e))?;
        Ok(CaseBoard::rs_with_config(config))
    }

    // ---- pointer input (device coordinates) ----
    pub fn pointer_down(&mut self, x: f64, y: f64, sample: u32) -> JsValue {
        acts(self.inner.pointer_down(PointerEvent::new(x, y, sample as u64)))
    }
    pub fn pointer_move(&mut self, x: f64, y: f64, sample: u32) -> JsValue {
        acts(self.inner.pointer_move(PointerEvent::new(x, y, sample as u64)))
    }
    pub fn pointer_up(&mut self, x: f64, y: f64, sample: u32) -> JsValue {
        acts(self.inner.pointer_up(PointerEvent::new(x, y, sample as u64)))
    }
    pub fn cancel_gesture(&mut self) -> JsValue { acts(self.inner.cancel_gesture()) }
    pub fn gesture_active(&self) -> bool { !self.inner.gesture().is_idle() }

    // ---- viewport ----
    /// One wheel notch at `(x, y)`; positive `direction` zooms in.
    pub fn wheel(&mut self, x: f64, y: f64, direction: f64) -> JsValue {
        acts(self.inner.zoom_wheel(Point::new(x, y), direction))
    }
    pub fn zoom_at_res(&mut self, x: f64, y: f64, factor: f64) -> JsValue {
        let pivot = match (finite("x", x), finite("y", y), finite("factor", factor)) {
            (Ok(x), Ok(y), Ok(_)) => Point::new(x, y),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => return e,
        };
        if factor <= 0.0 {
            return error::err("out_of_range", "factor must be positive", None);
        }
        ok_acts(self.inner.zoom_at(pivot, factor))
    }
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> JsValue { acts(self.inner.pan_by(dx, dy)) }
    pub fn viewport(&self) -> JsValue { to_js(self.inner.viewport()) }
    pub fn zoom(&self) -> f64 { self.inner.viewport().zoom() }

    // ---- modes and selection ----
    /// 0: Select, 1: Connect.
    pub fn set_mode_res(&mut self, mode: u8) -> JsValue {
        let mode = match mode { 0 => Mode::Select, 1 => Mode::Connect, m => return error::invalid_mode(m) };
        ok_acts(self.inner.set_mode(mode))
    }
    pub fn toggle_connect(&mut self) -> JsValue { acts(self.inner.toggle_connect()) }
    pub fn mode(&self) -> u8 { match self.inner.mode() { Mode::Select => 0, Mode::Connect => 1 } }
    pub fn pending_source(&self) -> Option<u32> { self.inner.pending_source() }
    pub fn select_node(&mut self, id: u32) -> JsValue { acts(self.inner.select_node(id)) }
    pub fn select_edge(&mut self, id: u32) -> JsValue { acts(self.inner.select_edge(id)) }
    pub fn clear_selection(&mut self) -> JsValue { acts(self.inner.clear_selection()) }
    pub fn selected_nodes(&self) -> js_sys::Uint32Array {
        let ids: Vec<u32> = self.inner.selection().node_ids().into_iter().collect();
        arr_u32(&ids)
    }
    pub fn selected_edge(&self) -> Option<u32> { self.inner.selection().edge() }

    // ---- entities ----
    /// Returns `{ ok, value: { id, actions } }`.
    pub fn create_node_res(&mut self, title: &str, x: f64, y: f64) -> JsValue {
        match self.inner.create_node(NodeSpec::new(title).at(x, y)) {
            Ok((id, out)) => {
                let o = new_obj();
                set_kv(&o, "id", &JsValue::from_f64(id as f64));
                set_kv(&o, "actions", &acts(out));
                error::ok(o.into())
            }
            Err(e) => error::board(&e),
        }
    }
    pub fn create_edge_res(&mut self, source: u32, target: u32, label: &str) -> JsValue {
        match self.inner.create_edge(source, target, EdgeSpec::labeled(label)) {
            Ok((id, out)) => {
                let o = new_obj();
                set_kv(&o, "id", &JsValue::from_f64(id as f64));
                set_kv(&o, "actions", &acts(out));
                error::ok(o.into())
            }
            Err(e) => error::board(&e),
        }
    }
    pub fn remove_node_res(&mut self, id: u32) -> JsValue {
        self.inner.remove_node(id).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn remove_edge_res(&mut self, id: u32) -> JsValue {
        self.inner.remove_edge(id).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn delete_selection_res(&mut self) -> JsValue {
        self.inner.delete_selection().map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn toggle_collapsed_res(&mut self, id: u32) -> JsValue {
        self.inner.toggle_collapsed(id).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn node_count(&self) -> u32 { self.inner.board().node_count() as u32 }
    pub fn edge_count(&self) -> u32 { self.inner.board().edge_count() as u32 }

    // ---- node content ----
    pub fn set_title_res(&mut self, id: u32, title: &str) -> JsValue {
        self.inner.set_title(id, title).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn set_description_res(&mut self, id: u32, description: &str) -> JsValue {
        self.inner.set_description(id, description).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn set_icon_res(&mut self, id: u32, icon: Option<String>) -> JsValue {
        self.inner.set_icon(id, icon).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn set_image_ref_res(&mut self, id: u32, image_ref: Option<String>) -> JsValue {
        self.inner.set_image_ref(id, image_ref).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn set_background_res(&mut self, id: u32, color: &str) -> JsValue {
        let color = match parse_color(color) { Ok(c) => c, Err(e) => return e };
        self.inner.set_background(id, color).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn set_field_res(&mut self, id: u32, name: &str, value: &str, visible: bool) -> JsValue {
        let mut record = FieldRecord::new(value);
        record.visible = visible;
        self.inner.set_field(id, name, record).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn remove_field_res(&mut self, id: u32, name: &str) -> JsValue {
        self.inner.remove_field(id, name).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn set_field_visible_res(&mut self, id: u32, name: &str, visible: bool) -> JsValue {
        self.inner.set_field_visible(id, name, visible).map_or_else(|e| error::board(&e), ok_acts)
    }

    // ---- edge content ----
    pub fn set_edge_label_res(&mut self, id: u32, label: &str) -> JsValue {
        self.inner.set_edge_label(id, label).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn set_edge_color_res(&mut self, id: u32, color: &str) -> JsValue {
        let color = match parse_color(color) { Ok(c) => c, Err(e) => return e };
        self.inner.set_edge_color(id, color).map_or_else(|e| error::board(&e), ok_acts)
    }
    pub fn set_edge_hidden_res(&mut self, id: u32, hidden: bool) -> JsValue {
        self.inner.set_edge_hidden(id, hidden).map_or_else(|e| error::board(&e), ok_acts)
    }

    /// Records a host drawing object so it is handed back in `discard` actions.
    pub fn register_handle(&mut self, kind: &str, id: u32, handle: f64) -> bool {
        let Some(entity) = entity(kind, id) else { return false };
        if !handle.is_finite() || handle < 0.0 { return false; }
        self.inner.register_handle(entity, RenderHandle(handle as u64));
        true
    }

    // ---- snapshots ----
    /// `{ ids: Uint32Array, rects: Float64Array[x,y,w,h]*, collapsed: Uint8Array }`
    /// with collapsed nodes reported at their on-screen diameter.
    pub fn node_arrays(&self) -> JsValue {
        let b = self.inner.board();
        let mut ids = Vec::with_capacity(b.node_count());
        let mut rects = Vec::with_capacity(b.node_count() * 4);
        let mut collapsed = Vec::with_capacity(b.node_count());
        for n in b.nodes() {
            let Some(r) = b.node_bounds(n.id) else { continue };
            ids.push(n.id);
            rects.extend_from_slice(&[r.min_x, r.min_y, r.width(), r.height()]);
            collapsed.push(n.collapsed as u8);
        }
        let o = new_obj();
        set_kv(&o, "ids", &arr_u32(&ids).into());
        set_kv(&o, "rects", &arr_f64(&rects).into());
        set_kv(&o, "collapsed", &arr_u8(&collapsed).into());
        o.into()
    }

    /// `{ ids, endpoints: [source,target]*, routes: [x1,y1,x2,y2]*, hidden }`.
    /// Hidden edges have NaN routes.
    pub fn edge_arrays(&self) -> JsValue {
        let b = self.inner.board();
        let mut ids = Vec::with_capacity(b.edge_count());
        let mut endpoints = Vec::with_capacity(b.edge_count() * 2);
        let mut routes = Vec::with_capacity(b.edge_count() * 4);
        let mut hidden = Vec::with_capacity(b.edge_count());
        for e in b.edges() {
            ids.push(e.id);
            endpoints.extend_from_slice(&[e.source, e.target]);
            match self.inner.route(e.id) {
                Some(r) => routes.extend_from_slice(&[r.from.x, r.from.y, r.to.x, r.to.y]),
                None => routes.extend_from_slice(&[f64::NAN; 4]),
            }
            hidden.push(e.hidden as u8);
        }
        let o = new_obj();
        set_kv(&o, "ids", &arr_u32(&ids).into());
        set_kv(&o, "endpoints", &arr_u32(&endpoints).into());
        set_kv(&o, "routes", &arr_f64(&routes).into());
        set_kv(&o, "hidden", &arr_u8(&hidden).into());
        o.into()
    }

    /// Text content of one node, or `null`.
    pub fn node_info(&self, id: u32) -> JsValue {
        let Some(n) = self.inner.board().node(id) else { return JsValue::NULL };
        let o = new_obj();
        set_kv(&o, "id", &JsValue::from_f64(n.id as f64));
        set_kv(&o, "title", &JsValue::from_str(&n.title));
        set_kv(&o, "description", &JsValue::from_str(&n.description));
        set_kv(&o, "icon", &n.icon.as_deref().map_or(JsValue::NULL, JsValue::from_str));
        set_kv(&o, "imageRef", &n.image_ref.as_deref().map_or(JsValue::NULL, JsValue::from_str));
        set_kv(&o, "backgroundColor", &JsValue::from_str(&n.background_color.to_hex()));
        set_kv(&o, "collapsed", &JsValue::from_bool(n.collapsed));
        let fields = js_sys::Array::new();
        for (name, f) in &n.fields {
            let fo = new_obj();
            set_kv(&fo, "name", &JsValue::from_str(name));
            set_kv(&fo, "value", &JsValue::from_str(&f.value));
            set_kv(&fo, "visible", &JsValue::from_bool(f.visible));
            fields.push(&fo.into());
        }
        set_kv(&o, "fields", &fields.into());
        o.into()
    }

    /// Hit in device coordinates, or `null`.
    pub fn hit_test(&self, x: f64, y: f64) -> JsValue {
        let p = self.inner.viewport().device_to_model(Point::new(x, y));
        match self.inner.board().hit_test(p) {
            Some(hit) => to_js(&hit),
            None => JsValue::NULL,
        }
    }

    // ---- documents ----
    pub fn to_json_res(&self) -> JsValue {
        match self.inner.board().to_json_string() {
            Ok(s) => error::ok(JsValue::from_str(&s)),
            Err(e) => error::document(&e),
        }
    }
    /// Replaces the board; repaired problems come back as `warnings`.
    pub fn load_json_res(&mut self, text: &str) -> JsValue {
        let value: serde_json::Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => return error::document(&DocumentError::from(e)),
        };
        match self.inner.load_json_value(value) {
            Ok((report, out)) => {
                let warnings = js_sys::Array::new();
                for w in &report.warnings {
                    let msg = JsValue::from_str(&w.to_string());
                    web_sys::console::warn_1(&msg);
                    warnings.push(&msg);
                }
                let o = new_obj();
                set_kv(&o, "version", &JsValue::from_f64(report.version as f64));
                set_kv(&o, "warnings", &warnings.into());
                set_kv(&o, "actions", &acts(out));
                error::ok(o.into())
            }
            Err(e) => error::document(&e),
        }
    }
    pub fn clear(&mut self) -> JsValue { acts(self.inner.clear()) }

    // ---- tasks ----
    pub fn todos(&self) -> JsValue { to_js(self.inner.board().todos().items()) }
    /// Index of the new task, or `undefined` for blank text.
    pub fn add_todo(&mut self, task: &str) -> Option<u32> {
        self.inner.todos_mut().add(task).map(|i| i as u32)
    }
    pub fn edit_todo(&mut self, index: u32, task: &str) -> bool {
        self.inner.todos_mut().edit(index as usize, task)
    }
    pub fn remove_todo(&mut self, index: u32) -> bool {
        self.inner.todos_mut().remove(index as usize).is_some()
    }
    /// New state of the task, or `undefined` for a bad index.
    pub fn toggle_todo(&mut self, index: u32) -> Option<bool> {
        self.inner.todos_mut().toggle(index as usize)
    }
}

impl Default for CaseBoard {
    fn default() -> Self { CaseBoard::rs_new() }
}
