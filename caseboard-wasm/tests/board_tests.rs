use caseboard_wasm::CaseBoard;
use js_sys::{Array, Float64Array, Reflect, Uint32Array, Uint8Array};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap()
}

fn created_id(v: &JsValue) -> u32 {
    get(&get(v, "value"), "id").as_f64().unwrap() as u32
}

fn kinds(actions: &JsValue) -> Vec<String> {
    Array::from(actions)
        .iter()
        .map(|a| get(&a, "kind").as_string().unwrap())
        .collect()
}

#[wasm_bindgen_test]
fn snapshots_match_board() {
    let mut b = CaseBoard::new();
    let a = created_id(&b.create_node_res("Suspect", 0.0, 0.0));
    let c = created_id(&b.create_node_res("Van", 600.0, 0.0));
    let e = created_id(&b.create_edge_res(a, c, "seen near"));

    let nd = b.node_arrays();
    let ids = Uint32Array::new(&get(&nd, "ids"));
    let rects = Float64Array::new(&get(&nd, "rects"));
    assert_eq!(ids.to_vec(), vec![a, c]);
    assert_eq!(rects.length(), 8);
    assert_eq!(rects.get_index(4), 600.0);

    let ed = b.edge_arrays();
    assert_eq!(Uint32Array::new(&get(&ed, "ids")).to_vec(), vec![e]);
    assert_eq!(Uint32Array::new(&get(&ed, "endpoints")).to_vec(), vec![a, c]);
    let routes = Float64Array::new(&get(&ed, "routes"));
    assert_eq!(routes.length(), 4);
    assert!(routes.get_index(0).is_finite());

    b.set_edge_hidden_res(e, true);
    let ed = b.edge_arrays();
    assert!(Float64Array::new(&get(&ed, "routes")).get_index(0).is_nan());
    assert_eq!(Uint8Array::new(&get(&ed, "hidden")).to_vec(), vec![1]);
}

#[wasm_bindgen_test]
fn drag_emits_move_and_route_actions() {
    let mut b = CaseBoard::new();
    let a = created_id(&b.create_node_res("a", 0.0, 0.0));
    let c = created_id(&b.create_node_res("b", 600.0, 0.0));
    b.create_edge_res(a, c, "");
    b.pointer_down(20.0, 20.0, 1);
    let out = kinds(&b.pointer_move(50.0, 40.0, 2));
    assert!(out.iter().any(|k| k == "node_moved"));
    assert!(out.iter().any(|k| k == "edge_routed"));
    // A repeated sample is ignored.
    assert!(kinds(&b.pointer_move(80.0, 80.0, 2)).is_empty());
    b.pointer_up(50.0, 40.0, 3);
    let info = b.node_info(a);
    assert_eq!(get(&info, "title").as_string().unwrap(), "a");
    let rects = Float64Array::new(&get(&b.node_arrays(), "rects"));
    assert_eq!((rects.get_index(0), rects.get_index(1)), (30.0, 20.0));
}

#[wasm_bindgen_test]
fn connect_mode_links_two_clicks() {
    let mut b = CaseBoard::new();
    b.create_node_res("a", 0.0, 0.0);
    b.create_node_res("b", 600.0, 0.0);
    b.toggle_connect();
    assert_eq!(b.mode(), 1);
    b.pointer_down(20.0, 20.0, 1);
    b.pointer_up(20.0, 20.0, 2);
    assert!(b.pending_source().is_some());
    b.pointer_down(620.0, 20.0, 3);
    b.pointer_up(620.0, 20.0, 4);
    assert_eq!(b.edge_count(), 1);
    assert_eq!(b.pending_source(), None);
}

#[wasm_bindgen_test]
fn json_round_trip_and_warnings() {
    let mut b = CaseBoard::new();
    let n = created_id(&b.create_node_res("Receipt", 10.0, 10.0));
    b.set_field_res(n, "Store", "Kiosk 4", true);
    b.add_todo("call the kiosk");
    let text = get(&b.to_json_res(), "value").as_string().unwrap();

    let mut other = CaseBoard::new();
    let r = other.load_json_res(&text);
    assert_eq!(get(&r, "ok").as_bool(), Some(true));
    assert_eq!(Array::from(&get(&get(&r, "value"), "warnings")).length(), 0);
    assert_eq!(get(&other.to_json_res(), "value").as_string().unwrap(), text);
    assert_eq!(Array::from(&other.todos()).length(), 1);

    let r = other.load_json_res(r#"{"nodes": [{"id": 1, "title": "x"}], "edges": [{"id": 1, "source": 1, "target": 8}]}"#);
    let warnings = Array::from(&get(&get(&r, "value"), "warnings"));
    assert_eq!(warnings.length(), 1);
    assert_eq!(other.edge_count(), 0);
}

#[wasm_bindgen_test]
fn hit_test_follows_viewport() {
    let mut b = CaseBoard::new();
    let n = created_id(&b.create_node_res("a", 0.0, 0.0));
    let hit = b.hit_test(20.0, 20.0);
    assert_eq!(get(&hit, "type").as_string().unwrap(), "node");
    assert_eq!(get(&hit, "node").as_f64(), Some(n as f64));
    b.pan_by(-500.0, 0.0);
    assert!(b.hit_test(20.0, 20.0).is_null());
    assert!(b.register_handle("node", n, 3.0));
    assert!(!b.register_handle("group", n, 3.0));
}
