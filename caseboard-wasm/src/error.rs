use caseboard::error::{BoardError, ConfigError, DocumentError, InvalidEdge};
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

fn set_kv(obj: &Object, k: &str, v: &JsValue) { let _ = Reflect::set(obj, &JsValue::from_str(k), v); }

fn new_obj() -> Object { Object::new() }

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn invalid_mode(got: u8) -> JsValue {
    let d = new_obj(); set_kv(&d, "got", &JsValue::from_f64(got as f64));
    err("invalid_mode", "mode must be 0:Select, 1:Connect", Some(d.into()))
}

#[inline]
pub fn invalid_color(got: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "got", &JsValue::from_str(got));
    err("invalid_color", "colour must be #rgb, #rrggbb or #rrggbbaa", Some(d.into()))
}

pub fn invalid_edge(e: &InvalidEdge) -> JsValue {
    let d = new_obj();
    let node = match e { InvalidEdge::SelfLoop(n) | InvalidEdge::UnknownEndpoint(n) => *n };
    let reason = match e { InvalidEdge::SelfLoop(_) => "self_loop", InvalidEdge::UnknownEndpoint(_) => "unknown_endpoint" };
    set_kv(&d, "reason", &JsValue::from_str(reason));
    set_kv(&d, "node", &JsValue::from_f64(node as f64));
    err("invalid_edge", e.to_string(), Some(d.into()))
}

pub fn board(e: &BoardError) -> JsValue {
    match e {
        BoardError::UnknownNode(id) => invalid_id("node", *id),
        BoardError::UnknownEdge(id) => invalid_id("edge", *id),
        BoardError::UnknownField { node, name } => {
            let d = new_obj();
            set_kv(&d, "node", &JsValue::from_f64(*node as f64));
            set_kv(&d, "name", &JsValue::from_str(name));
            err("invalid_id", e.to_string(), Some(d.into()))
        }
        BoardError::NonFinite(param) => non_finite(param),
        BoardError::InvalidEdge(inner) => invalid_edge(inner),
        BoardError::IdsExhausted(kind) => {
            let d = new_obj(); set_kv(&d, "kind", &JsValue::from_str(kind));
            err("ids_exhausted", e.to_string(), Some(d.into()))
        }
    }
}

pub fn document(e: &DocumentError) -> JsValue {
    match e {
        DocumentError::Json(_) => err("json_parse", e.to_string(), None),
        DocumentError::GestureActive => err("busy", e.to_string(), None),
        _ => err("document", e.to_string(), None),
    }
}

pub fn config(e: &ConfigError) -> JsValue {
    err("config", e.to_string(), None)
}
