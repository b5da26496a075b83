//! Page driver: canvas, key listeners, start/game-over panels and the
//! `requestAnimationFrame` loop.

use std::cell::{Cell, RefCell};

use wasm_bindgen::prelude::*;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, KeyboardEvent, Window};

use skyhop_core::{FallPolicy, KeyMap, KeyState, Params, SceneDesc, Session, Tick, Viewport};

use crate::canvas::CanvasSurface;
use crate::{js_err, Platformer};

const CANVAS_ID: &str = "gameCanvas";
const START_SCREEN_ID: &str = "startScreen";
const START_BUTTON_ID: &str = "startButton";
const GAME_OVER_ID: &str = "gameOver";
const TIME_TEXT_ID: &str = "timeTaken";
const RESTART_BUTTON_ID: &str = "restartButton";
const HIDDEN: &str = "hidden";
const FELL_MESSAGE: &str = "You fell! Try again!";

type FrameClosure = RefCell<Option<Closure<dyn FnMut(f64)>>>;

thread_local! {
    static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
    static LOOP: FrameClosure = const { RefCell::new(None) };
    static PENDING_FRAME: Cell<Option<i32>> = const { Cell::new(None) };
}

struct Panels {
    canvas: HtmlCanvasElement,
    start_screen: Element,
    game_over: Element,
    time_text: Element,
}

impl Panels {
    fn show_start(&self) -> Result<(), JsValue> {
        self.start_screen.class_list().remove_1(HIDDEN)?;
        self.game_over.class_list().add_1(HIDDEN)?;
        self.canvas.class_list().add_1(HIDDEN)?;
        Ok(())
    }

    fn show_game(&self) -> Result<(), JsValue> {
        self.start_screen.class_list().add_1(HIDDEN)?;
        self.game_over.class_list().add_1(HIDDEN)?;
        self.canvas.class_list().remove_1(HIDDEN)?;
        Ok(())
    }

    fn show_game_over(&self, seconds: u64) -> Result<(), JsValue> {
        self.time_text
            .set_text_content(Some(&format!("Time Taken : {seconds} seconds")));
        self.game_over.class_list().remove_1(HIDDEN)?;
        Ok(())
    }
}

struct Host {
    window: Window,
    game: Platformer,
    keymap: KeyMap,
    keys: KeyState,
    surface: CanvasSurface,
    panels: Panels,
}

/// What the page has to do after a frame, once `HOST` is released.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FrameOutcome {
    /// Request another animation frame.
    pub again: bool,
    /// Tell the player they fell. Modal, so it must not run under a borrow.
    pub alert_fall: bool,
    /// Show the game-over panel with this many whole seconds.
    pub ended_after: Option<u64>,
}

pub(crate) fn frame_outcome(session: &Session, t: &Tick) -> FrameOutcome {
    FrameOutcome {
        again: session.is_running(),
        alert_fall: t.events.fell && session.params().fall_policy == FallPolicy::Respawn,
        ended_after: if t.ended { session.elapsed_seconds() } else { None },
    }
}

impl Host {
    fn frame(&mut self, now_ms: f64) -> Result<FrameOutcome, JsValue> {
        let buttons = self.keys.buttons(&self.keymap);
        let t = self.game.session.tick(buttons, now_ms, &mut self.surface);
        let out = frame_outcome(&self.game.session, &t);

        if let Some(seconds) = out.ended_after {
            self.panels.show_game_over(seconds)?;
        }
        Ok(out)
    }

    fn start(&mut self) -> Result<bool, JsValue> {
        let now = self
            .window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now);
        if !self.game.session.start(now) {
            return Ok(false);
        }
        self.panels.show_game()?;
        Ok(true)
    }

    fn restart(&mut self) -> Result<(), JsValue> {
        self.game.session.restart();
        self.keys.clear();
        self.panels.show_start()
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn element(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}

fn with_host<T>(f: impl FnOnce(&mut Host) -> Result<T, JsValue>) -> Result<Option<T>, JsValue> {
    HOST.with(|h| match h.borrow_mut().as_mut() {
        Some(host) => f(host).map(Some),
        None => Ok(None),
    })
}

fn report(result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::error!("{e:?}");
    }
}

fn schedule_frame() -> Result<(), JsValue> {
    if PENDING_FRAME.with(|p| p.get()).is_some() {
        return Ok(());
    }
    let w = window()?;
    let id = LOOP.with(|l| match l.borrow().as_ref() {
        Some(cb) => w.request_animation_frame(cb.as_ref().unchecked_ref()).map(Some),
        None => Ok(None),
    })?;
    PENDING_FRAME.with(|p| p.set(id));
    Ok(())
}

fn cancel_frame() -> Result<(), JsValue> {
    if let Some(id) = PENDING_FRAME.with(|p| p.take()) {
        window()?.cancel_animation_frame(id)?;
    }
    Ok(())
}

fn on_frame(now_ms: f64) -> Result<(), JsValue> {
    PENDING_FRAME.with(|p| p.set(None));
    let Some(mut out) = with_host(|host| host.frame(now_ms))? else {
        return Ok(());
    };

    if out.alert_fall {
        window()?.alert_with_message(FELL_MESSAGE)?;
        // The dialog ate any key-up events, and a restart may have run meanwhile.
        out.again = with_host(|host| {
            host.keys.clear();
            Ok(host.game.session.is_running())
        })? == Some(true);
    }

    if out.again {
        schedule_frame()?;
    }
    Ok(())
}

fn on_start() -> Result<(), JsValue> {
    if with_host(|host| host.start())? == Some(true) {
        schedule_frame()?;
    }
    Ok(())
}

fn on_restart() -> Result<(), JsValue> {
    cancel_frame()?;
    with_host(|host| host.restart())?;
    Ok(())
}

fn on_key(e: &KeyboardEvent, down: bool) -> Result<(), JsValue> {
    let code = e.code();
    let restart = with_host(|host| {
        let bound = host.keymap.is_restart(&code)
            || [&host.keymap.left, &host.keymap.right, &host.keymap.jump]
                .iter()
                .any(|codes| codes.iter().any(|c| *c == code));
        if bound {
            // Keep Space and the arrows from scrolling the page.
            e.prevent_default();
        }
        if down {
            host.keys.press(&code);
        } else {
            host.keys.release(&code);
        }
        Ok(down && host.keymap.is_restart(&code))
    })?;

    if restart == Some(true) {
        on_restart()?;
    }
    Ok(())
}

fn listen<E: FromWasmAbi + 'static>(
    target: &web_sys::EventTarget,
    kind: &str,
    mut handler: impl FnMut(E) -> Result<(), JsValue> + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::<dyn FnMut(E)>::new(move |e: E| report(handler(e)));
    target.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Take over the page: size the canvas to the window, wire the controls and
/// show the start prompt. `preset` names a built-in layout; `params_json`
/// and `keymap_json` optionally override tuning parameters and key bindings.
#[wasm_bindgen]
pub fn mount(
    preset: &str,
    params_json: Option<String>,
    keymap_json: Option<String>,
) -> Result<(), JsValue> {
    if HOST.with(|h| h.borrow().is_some()) {
        return Err(JsValue::from_str("already mounted"));
    }

    let window = window()?;
    let doc = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = element(&doc, CANVAS_ID)?.dyn_into()?;
    let w = window.inner_width()?.as_f64().unwrap_or(800.0);
    let h = window.inner_height()?.as_f64().unwrap_or(600.0);
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;

    let params = match params_json {
        Some(json) => Params::from_json(&json).map_err(js_err)?,
        None => Params::default(),
    };
    let keymap = match keymap_json {
        Some(json) => KeyMap::from_json(&json).map_err(js_err)?,
        None => KeyMap::default(),
    };
    let scene = SceneDesc::preset(preset).map_err(js_err)?;
    let viewport = Viewport::new(canvas.width() as f32, canvas.height() as f32);
    let game = Platformer::build(params, scene, viewport)?;

    let panels = Panels {
        canvas,
        start_screen: element(&doc, START_SCREEN_ID)?,
        game_over: element(&doc, GAME_OVER_ID)?,
        time_text: element(&doc, TIME_TEXT_ID)?,
    };
    panels.show_start()?;

    let start_button = element(&doc, START_BUTTON_ID)?;
    let restart_button = element(&doc, RESTART_BUTTON_ID)?;

    HOST.with(|slot| {
        *slot.borrow_mut() = Some(Host {
            window: window.clone(),
            game,
            keymap,
            keys: KeyState::new(),
            surface: CanvasSurface::new(ctx),
            panels,
        });
    });

    LOOP.with(|l| {
        *l.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(|now: f64| report(on_frame(now))));
    });

    listen(&window, "keydown", |e: KeyboardEvent| on_key(&e, true))?;
    listen(&window, "keyup", |e: KeyboardEvent| on_key(&e, false))?;
    listen(&start_button, "click", |_: web_sys::Event| on_start())?;
    listen(&restart_button, "click", |_: web_sys::Event| on_restart())?;

    log::info!("mounted `{preset}` on a {}x{} canvas", viewport.w, viewport.h);
    Ok(())
}
