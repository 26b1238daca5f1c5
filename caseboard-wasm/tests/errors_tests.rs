use caseboard_wasm::CaseBoard;
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

fn created_id(v: &JsValue) -> u32 {
    let value = Reflect::get(v, &JsValue::from_str("value")).unwrap();
    Reflect::get(&value, &JsValue::from_str("id")).unwrap().as_f64().unwrap() as u32
}

#[wasm_bindgen_test]
fn unknown_ids_leave_board_untouched() {
    let mut b = CaseBoard::new();
    assert!(is_err(&b.set_title_res(7, "x"), "invalid_id"));
    assert!(is_err(&b.remove_edge_res(9), "invalid_id"));
    assert!(is_err(&b.toggle_collapsed_res(3), "invalid_id"));
    assert_eq!(b.node_count(), 0);
    assert_eq!(b.edge_count(), 0);
}

#[wasm_bindgen_test]
fn refused_edges_are_typed() {
    let mut b = CaseBoard::new();
    let a = created_id(&b.create_node_res("a", 0.0, 0.0));
    assert!(is_err(&b.create_edge_res(a, a, ""), "invalid_edge"));
    assert!(is_err(&b.create_edge_res(a, 99, ""), "invalid_edge"));
    assert_eq!(b.edge_count(), 0);
}

#[wasm_bindgen_test]
fn bad_inputs_are_rejected() {
    let mut b = CaseBoard::new();
    assert!(is_err(&b.create_node_res("n", f64::NAN, 0.0), "non_finite"));
    let n = created_id(&b.create_node_res("n", 0.0, 0.0));
    assert!(is_err(&b.set_background_res(n, "teal"), "invalid_color"));
    assert!(is_err(&b.set_mode_res(4), "invalid_mode"));
    assert!(is_err(&b.zoom_at_res(0.0, 0.0, f64::INFINITY), "non_finite"));
    assert!(is_err(&b.zoom_at_res(0.0, 0.0, -2.0), "out_of_range"));
    assert!(is_err(&b.remove_field_res(n, "Plate"), "invalid_id"));
}

#[wasm_bindgen_test]
fn broken_documents_do_not_replace_board() {
    let mut b = CaseBoard::new();
    b.create_node_res("keep", 0.0, 0.0);
    assert!(is_err(&b.load_json_res("{nodes:"), "json_parse"));
    assert!(is_err(&b.load_json_res("[1, 2]"), "document"));
    assert!(is_err(&b.load_json_res(r#"{"nodes": 5}"#), "document"));
    assert_eq!(b.node_count(), 1);
}

#[wasm_bindgen_test]
fn load_is_refused_mid_gesture() {
    let mut b = CaseBoard::new();
    b.create_node_res("n", 0.0, 0.0);
    b.pointer_down(20.0, 20.0, 1);
    assert!(b.gesture_active());
    assert!(is_err(&b.load_json_res(r#"{"nodes": []}"#), "busy"));
    b.pointer_up(20.0, 20.0, 2);
    assert!(!b.gesture_active());
}
