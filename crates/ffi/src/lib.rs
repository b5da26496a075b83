//! C ABI over [`skyhop_core::Session`]. Hosts own rendering; the handle only
//! simulates.

use skyhop_core::{Actor, Buttons, NullSurface, Params, Phase, SceneDesc, Session, Viewport};

/// Mirrors `skyhop_core::PRESETS` by index.
pub const SKYHOP_PRESET_TOWER: u32 = 0;
pub const SKYHOP_PRESET_LADDER: u32 = 1;

pub const SKYHOP_PHASE_NOT_STARTED: u8 = 0;
pub const SKYHOP_PHASE_RUNNING: u8 = 1;
pub const SKYHOP_PHASE_ENDED: u8 = 2;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default)]
pub struct TickReport {
    pub steps: u32,
    pub jumped: u8,
    pub landed: u8,
    pub rode: u8,
    pub fell: u8,
    pub won: u8,
    pub phase: u8,
    /// Whole seconds from start to goal; 0 until the session has ended.
    pub elapsed_seconds: u64,
}

fn phase_code(p: Phase) -> u8 {
    match p {
        Phase::NotStarted => SKYHOP_PHASE_NOT_STARTED,
        Phase::Running { .. } => SKYHOP_PHASE_RUNNING,
        Phase::Ended { .. } => SKYHOP_PHASE_ENDED,
    }
}

/// Returns null when the preset is unknown or the viewport is unusable.
/// Every other entry point treats a null handle as a no-op.
#[no_mangle]
pub extern "C" fn skyhop_session_new(width: f32, height: f32, preset: u32) -> *mut Session {
    let scene = match preset {
        SKYHOP_PRESET_TOWER => SceneDesc::tower(),
        SKYHOP_PRESET_LADDER => SceneDesc::ladder(),
        other => {
            log::error!("unknown preset index {other}");
            return std::ptr::null_mut();
        }
    };
    match Session::new(Params::default(), &scene, Viewport::new(width, height)) {
        Ok(s) => Box::into_raw(Box::new(s)),
        Err(e) => {
            log::error!("cannot create session: {e}");
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn skyhop_session_free(session: *mut Session) {
    if !session.is_null() {
        unsafe { drop(Box::from_raw(session)) };
    }
}

#[no_mangle]
pub extern "C" fn skyhop_session_start(session: *mut Session, now_ms: f64) -> u8 {
    match unsafe { session.as_mut() } {
        Some(s) => s.start(now_ms) as u8,
        None => 0,
    }
}

#[no_mangle]
pub extern "C" fn skyhop_session_tick(session: *mut Session, input_bits: u8, now_ms: f64) -> TickReport {
    let Some(s) = (unsafe { session.as_mut() }) else {
        return TickReport::default();
    };
    let buttons = Buttons::from_bits_truncate(input_bits);
    let t = s.tick(buttons, now_ms, &mut NullSurface);

    TickReport {
        steps: t.steps,
        jumped: t.events.jumped as u8,
        landed: t.events.landed as u8,
        rode: t.events.rode as u8,
        fell: t.events.fell as u8,
        won: t.events.won as u8,
        phase: phase_code(s.phase()),
        elapsed_seconds: s.elapsed_seconds().unwrap_or(0),
    }
}

#[no_mangle]
pub extern "C" fn skyhop_session_restart(session: *mut Session) {
    if let Some(s) = unsafe { session.as_mut() } {
        s.restart();
    }
}

#[no_mangle]
pub extern "C" fn skyhop_session_actor(session: *const Session, out: *mut Actor) {
    let (Some(s), false) = (unsafe { session.as_ref() }, out.is_null()) else {
        return;
    };
    unsafe { *out = *s.actor() };
}
