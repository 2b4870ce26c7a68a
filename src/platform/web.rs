//! Browser host
//!
//! JS owns the canvas, the input listeners and `requestAnimationFrame`; it
//! forwards timestamps and input here and receives each frame's snapshot as
//! JSON through a callback.

use wasm_bindgen::prelude::*;

use crate::error::SimError;
use crate::scheduler::{FrameScheduler, RenderSink};
use crate::sim::{LevelLayout, RenderSnapshot};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Mech Runner (web) loaded");
}

/// Hands snapshots to a JS callback as JSON strings
#[derive(Default)]
struct JsSink {
    callback: Option<js_sys::Function>,
}

impl RenderSink for JsSink {
    fn present(&mut self, snapshot: &RenderSnapshot) -> Result<(), SimError> {
        let Some(callback) = &self.callback else {
            return Ok(());
        };
        let json = serde_json::to_string(snapshot).map_err(|e| SimError::Render(e.to_string()))?;
        callback
            .call1(&JsValue::NULL, &JsValue::from_str(&json))
            .map_err(|e| SimError::Render(format!("{e:?}")))?;
        Ok(())
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// A running game driven from JS
#[wasm_bindgen]
pub struct WebGame {
    scheduler: FrameScheduler,
    sink: JsSink,
}

#[wasm_bindgen]
impl WebGame {
    /// `tuning_json` and `level_json` override the built-in balance and level
    #[wasm_bindgen(constructor)]
    pub fn new(
        seed: Option<u32>,
        tuning_json: Option<String>,
        level_json: Option<String>,
    ) -> Result<WebGame, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(js_error)?,
            None => Tuning::default(),
        };
        let layout = match level_json {
            Some(json) => LevelLayout::from_json(&json).map_err(js_error)?,
            None => LevelLayout::default(),
        };
        let seed = seed.map_or_else(|| js_sys::Date::now() as u64, u64::from);

        Ok(Self {
            scheduler: FrameScheduler::new(seed, tuning, layout),
            sink: JsSink::default(),
        })
    }

    /// Register `fn(snapshotJson)`, called once per frame
    pub fn set_renderer(&mut self, callback: js_sys::Function) {
        self.sink.callback = Some(callback);
    }

    /// Advance one display frame; `timestamp_ms` comes from requestAnimationFrame
    pub fn frame(&mut self, timestamp_ms: f64) {
        self.scheduler.frame(timestamp_ms / 1000.0, &mut self.sink);
    }

    pub fn set_move_axis(&mut self, axis: i8) {
        self.scheduler.input_mut().move_axis = axis.signum();
    }

    pub fn set_jump(&mut self, held: bool) {
        self.scheduler.input_mut().jump = held;
    }

    pub fn set_fire(&mut self, held: bool) {
        self.scheduler.input_mut().fire = held;
    }

    /// Aim target in screen pixels; converted with the current camera
    pub fn set_aim_screen(&mut self, x: f32, y: f32) {
        let camera = self.scheduler.state().world.camera;
        self.scheduler.input_mut().aim = camera + glam::Vec2::new(x, y);
    }

    pub fn reload(&mut self) {
        self.scheduler.request_reload();
    }

    pub fn toggle_pause(&mut self) {
        self.scheduler.toggle_pause();
    }

    pub fn restart(&mut self) {
        self.scheduler.restart();
    }

    pub fn set_view(&mut self, width: f32, height: f32) {
        self.scheduler.set_view(width, height);
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&RenderSnapshot::capture(self.scheduler.state())).map_err(js_error)
    }

    /// Events from the last frame as a JSON array
    pub fn events_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.scheduler.last_events()).map_err(js_error)
    }

    pub fn fps(&self) -> u32 {
        self.scheduler.fps()
    }

    pub fn notice(&self) -> Option<String> {
        self.scheduler.notice().map(str::to_string)
    }
}
