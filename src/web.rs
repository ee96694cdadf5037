//! Browser host binding
//!
//! The page owns the canvas, input listeners and the animation frame loop;
//! it forwards commands here and draws from the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::highscores::LocalStorageStore;
use crate::sim::Direction;
use crate::{LogSink, Session, Tuning};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Snake Rush starting...");
}

/// Game handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a game; `tuning_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, tuning_json: &str) -> Result<WebGame, JsValue> {
        let tuning = if tuning_json.is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let mut session = Session::new(seed, tuning, Box::new(LocalStorageStore))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        session.add_sink(Box::new(LogSink));
        Ok(WebGame { session })
    }

    /// Advance by `dt_ms`; returns this frame's events as JSON
    pub fn frame(&mut self, dt_ms: f64) -> Result<String, JsValue> {
        let events = self
            .session
            .frame(dt_ms)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serde_json::to_string(&events).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Turn by key name ("ArrowUp", "w", "left", ...); unknown keys are ignored
    pub fn turn(&mut self, key: &str) -> bool {
        match Direction::from_key(key) {
            Some(dir) => self.session.turn(dir),
            None => false,
        }
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn resume(&mut self) {
        self.session.resume();
    }

    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.session
            .reset()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current frame for the renderer, as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn save(&self) -> Result<String, JsValue> {
        self.session
            .save_state()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn restore(&mut self, json: &str) -> Result<(), JsValue> {
        self.session
            .restore_state(json)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
