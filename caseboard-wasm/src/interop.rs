use js_sys::{Float64Array, Object, Reflect, Uint32Array, Uint8Array};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_f64(slice: &[f64]) -> Float64Array {
    let arr = Float64Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_u8(slice: &[u8]) -> Uint8Array {
    let arr = Uint8Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
/// Plain JS objects and arrays; `null` if the value cannot be represented.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible()).unwrap_or(JsValue::NULL)
}
