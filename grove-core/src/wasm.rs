//! WASM bindings for the grove-core library.
//!
//! The host page owns one `TreeView` per tree panel. Structured results are
//! returned as JSON strings; node ids are the `id` fields of frame and search
//! payloads.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::layout::{PointF, SizeF};
use crate::model::NodeId;
use crate::output::{DetailOutput, ErrorInfo, LoadOutput, SearchOutput};
use crate::session::{Session, SessionConfig};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        console_error(&format!("Error serializing output: {e}"));
        format!(r#"{{"error":{{"message":"{}"}}}}"#, e.to_string().replace('"', "'"))
    })
}

#[wasm_bindgen]
pub struct TreeView {
    session: Session,
}

#[wasm_bindgen]
impl TreeView {
    /// `config_json` may override any subset of `{"layout": {...}, "view": {...}}`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config_json: Option<String>) -> TreeView {
        let cfg = match config_json.as_deref() {
            Some(json) => serde_json::from_str::<SessionConfig>(json).unwrap_or_else(|e| {
                console_error(&format!("Error parsing config, using defaults: {e}"));
                SessionConfig::default()
            }),
            None => SessionConfig::default(),
        };
        TreeView {
            session: Session::new(cfg, SizeF { w: width, h: height }),
        }
    }

    pub fn load(&mut self, json: &str) -> String {
        let output = match self.session.load(json) {
            Ok(node_count) => LoadOutput { node_count, error: None },
            Err(e) => {
                console_error(&format!("Error loading data: {e}"));
                LoadOutput {
                    node_count: 0,
                    error: Some(ErrorInfo { message: e.to_string() }),
                }
            }
        };
        to_json(&output)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.session.resize(SizeF { w: width, h: height });
    }

    /// Advance time. Returns true while anything is still moving.
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        self.session.tick(dt_ms);
        self.session.is_animating()
    }

    pub fn frame(&self) -> String {
        to_json(&self.session.frame())
    }

    pub fn detail(&self) -> String {
        to_json(&DetailOutput {
            selected: self.session.selected(),
            panel: self.session.detail(),
        })
    }

    pub fn click(&mut self, id: usize, ctrl: bool) {
        self.session.click(NodeId(id), ctrl);
    }

    pub fn dblclick(&mut self, id: usize) {
        self.session.toggle(NodeId(id));
    }

    pub fn deselect(&mut self) {
        self.session.deselect();
    }

    pub fn search(&self, query: &str) -> String {
        to_json(&SearchOutput {
            query: query.to_string(),
            results: self.session.search(query),
        })
    }

    pub fn navigate(&mut self, id: usize) {
        self.session.navigate_to(NodeId(id));
    }

    pub fn collapse_all(&mut self) {
        self.session.collapse_all();
    }

    pub fn expand_all(&mut self) {
        self.session.expand_all();
    }

    pub fn fit_view(&mut self) {
        self.session.fit_view();
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.session.pan(dx, dy);
    }

    pub fn zoom(&mut self, factor: f64, px: f64, py: f64) {
        self.session.zoom(factor, PointF::new(px, py));
    }
}
