use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const JUMP  = 1 << 4;
    }
}

/// Key codes (DOM `KeyboardEvent.code` names) bound to each control.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyMap {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub restart: Vec<String>,
}

impl Default for KeyMap {
    fn default() -> Self {
        fn codes(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            left: codes(&["ArrowLeft", "KeyA"]),
            right: codes(&["ArrowRight", "KeyD"]),
            jump: codes(&["Space", "KeyW"]),
            restart: codes(&["KeyR"]),
        }
    }
}

impl KeyMap {
    pub fn from_json(json: &str) -> Result<Self, crate::ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_restart(&self, code: &str) -> bool {
        self.restart.iter().any(|c| c == code)
    }
}

/// Which keys are currently held. Written by key events, read once per tick.
#[derive(Clone, Debug, Default)]
pub struct KeyState {
    held: BTreeSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: &str) {
        if !self.held.contains(code) {
            self.held.insert(code.to_owned());
        }
    }

    pub fn release(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Forget everything, e.g. after a modal dialog swallowed the key-up events.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    pub fn buttons(&self, map: &KeyMap) -> Buttons {
        let any = |codes: &[String]| codes.iter().any(|c| self.is_held(c));

        let mut b = Buttons::empty();
        if any(&map.left) {
            b |= Buttons::LEFT;
        }
        if any(&map.right) {
            b |= Buttons::RIGHT;
        }
        if any(&map.jump) {
            b |= Buttons::JUMP;
        }
        b
    }
}
