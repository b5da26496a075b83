use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

use skyhop_core::{Buttons, Params, Phase, SceneDesc, Session, Viewport};

mod canvas;
mod console;
mod dom;

pub use dom::mount;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console::init(log::LevelFilter::Info);
}

/// `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"` or `"off"`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = console::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("unknown log level: {level}")))?;
    console::init(filter);
    Ok(())
}

pub(crate) fn js_err(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

fn set(obj: &js_sys::Object, key: &str, value: JsValue) -> Result<(), JsValue> {
    js_sys::Reflect::set(obj, &JsValue::from_str(key), &value)?;
    Ok(())
}

/// One game session for hosts that run their own frame loop.
#[wasm_bindgen]
pub struct Platformer {
    params: Params,
    scene: SceneDesc,
    viewport: Viewport,
    pub(crate) session: Session,
}

impl Platformer {
    pub(crate) fn build(params: Params, scene: SceneDesc, viewport: Viewport) -> Result<Self, JsValue> {
        let session = Session::new(params, &scene, viewport).map_err(js_err)?;
        Ok(Self { params, scene, viewport, session })
    }
}

#[wasm_bindgen]
impl Platformer {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, preset: &str) -> Result<Platformer, JsValue> {
        let scene = SceneDesc::preset(preset).map_err(js_err)?;
        Self::build(Params::default(), scene, Viewport::new(width, height))
    }

    /// Replace tuning parameters. Missing keys keep their defaults; the
    /// session is rebuilt and goes back to not-started.
    pub fn set_params_json(&mut self, json: &str) -> Result<(), JsValue> {
        let params = Params::from_json(json).map_err(js_err)?;
        *self = Self::build(params, self.scene.clone(), self.viewport)?;
        Ok(())
    }

    /// Replace the layout. The session is rebuilt and goes back to not-started.
    pub fn set_scene_json(&mut self, json: &str) -> Result<(), JsValue> {
        let scene = SceneDesc::from_json(json).map_err(js_err)?;
        *self = Self::build(self.params, scene, self.viewport)?;
        Ok(())
    }

    pub fn start(&mut self, now_ms: f64) -> bool {
        self.session.start(now_ms)
    }

    /// Step the frame (without drawing) and return actor state and events.
    pub fn tick(&mut self, input_bits: u8, now_ms: f64) -> Result<JsValue, JsValue> {
        let buttons = Buttons::from_bits_truncate(input_bits);
        let t = self.session.tick(buttons, now_ms, &mut skyhop_core::NullSurface);
        let a = self.session.actor();

        let obj = js_sys::Object::new();
        set(&obj, "x", JsValue::from_f64(a.x as f64))?;
        set(&obj, "y", JsValue::from_f64(a.y as f64))?;
        set(&obj, "dx", JsValue::from_f64(a.dx as f64))?;
        set(&obj, "dy", JsValue::from_f64(a.dy as f64))?;
        set(&obj, "airborne", JsValue::from_bool(a.airborne))?;
        set(&obj, "steps", JsValue::from_f64(t.steps as f64))?;
        set(&obj, "jumped", JsValue::from_bool(t.events.jumped))?;
        set(&obj, "landed", JsValue::from_bool(t.events.landed))?;
        set(&obj, "rode", JsValue::from_bool(t.events.rode))?;
        set(&obj, "fell", JsValue::from_bool(t.events.fell))?;
        set(&obj, "won", JsValue::from_bool(t.events.won))?;
        set(&obj, "ended", JsValue::from_bool(t.ended))?;

        Ok(JsValue::from(obj))
    }

    /// Draw the current state onto a 2D context.
    pub fn render(&self, ctx: CanvasRenderingContext2d) {
        self.session.render(&mut canvas::CanvasSurface::new(ctx));
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    /// `"not_started"`, `"running"` or `"ended"`.
    pub fn phase(&self) -> String {
        match self.session.phase() {
            Phase::NotStarted => "not_started",
            Phase::Running { .. } => "running",
            Phase::Ended { .. } => "ended",
        }
        .to_string()
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.session.elapsed_seconds().map(|s| s as f64)
    }
}
