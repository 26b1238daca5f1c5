use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

use caseboard::config::BoardConfig;
use caseboard::{Action, Board, Session};

#[wasm_bindgen]
pub struct CaseBoard { pub(crate) inner: Session }

impl CaseBoard {
    pub fn rs_new() -> CaseBoard { CaseBoard { inner: Session::new(Board::new()) } }
    pub fn rs_with_config(config: BoardConfig) -> CaseBoard { CaseBoard { inner: Session::new(Board::with_config(config)) } }
    pub fn rs_session(&self) -> &Session { &self.inner }
    pub(crate) fn actions(out: &[Action]) -> JsValue { interop::to_js(out) }
}
