//! Keyboard adapter.
//!
//! Keys are identified by layout-independent key codes ("KeyW", "Space",
//! "ShiftLeft"), the same strings browsers report in `KeyboardEvent.code`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use starwake_core::components::ShipControls;

use crate::actions::InputAction;

/// Key code → control mapping. Serializable so it can live in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub thrust_forward: String,
    pub thrust_reverse: String,
    pub strafe_left: String,
    pub strafe_right: String,
    pub lift_up: String,
    pub lift_down: String,
    pub yaw_left: String,
    pub yaw_right: String,
    pub pitch_up: String,
    pub pitch_down: String,
    pub roll_left: String,
    pub roll_right: String,
    pub boost: String,
    pub fire: String,
    pub next_target: String,
    pub previous_target: String,
    pub clear_target: String,
    pub toggle_mining: String,
    pub toggle_dock: String,
    pub repair: String,
    pub sell_cargo: String,
    pub pause: String,
    pub skip_intro: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            thrust_forward: "KeyW".into(),
            thrust_reverse: "KeyS".into(),
            strafe_left: "KeyA".into(),
            strafe_right: "KeyD".into(),
            lift_up: "KeyR".into(),
            lift_down: "KeyF".into(),
            yaw_left: "ArrowLeft".into(),
            yaw_right: "ArrowRight".into(),
            pitch_up: "ArrowDown".into(),
            pitch_down: "ArrowUp".into(),
            roll_left: "KeyQ".into(),
            roll_right: "KeyE".into(),
            boost: "ShiftLeft".into(),
            fire: "Space".into(),
            next_target: "Tab".into(),
            previous_target: "Backquote".into(),
            clear_target: "KeyX".into(),
            toggle_mining: "KeyM".into(),
            toggle_dock: "KeyG".into(),
            repair: "KeyH".into(),
            sell_cargo: "KeyJ".into(),
            pause: "KeyP".into(),
            skip_intro: "Escape".into(),
        }
    }
}

impl KeyBindings {
    /// The action bound to `code`, if any.
    pub fn action_for(&self, code: &str) -> Option<InputAction> {
        let table = [
            (&self.next_target, InputAction::NextTarget),
            (&self.previous_target, InputAction::PreviousTarget),
            (&self.clear_target, InputAction::ClearTarget),
            (&self.toggle_mining, InputAction::ToggleMining),
            (&self.toggle_dock, InputAction::ToggleDock),
            (&self.repair, InputAction::Repair),
            (&self.sell_cargo, InputAction::SellCargo),
            (&self.pause, InputAction::TogglePause),
            (&self.skip_intro, InputAction::SkipIntro),
        ];
        table
            .into_iter()
            .find(|(key, _)| key.as_str() == code)
            .map(|(_, action)| action)
    }
}

/// Currently held keys plus queued one-shot actions.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    bindings: KeyBindings,
    held: HashSet<String>,
    pending: Vec<InputAction>,
}

impl KeyboardState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            pending: Vec::new(),
        }
    }

    /// Key went down. Auto-repeat presses of an already held key are ignored.
    pub fn press(&mut self, code: &str) {
        if !self.held.insert(code.to_string()) {
            return;
        }
        if let Some(action) = self.bindings.action_for(code) {
            log::trace!("key {code} -> {action:?}");
            self.pending.push(action);
        }
    }

    pub fn release(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Drop all held keys, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// Continuous control state from the held keys.
    pub fn controls(&self) -> ShipControls {
        let b = &self.bindings;
        ShipControls {
            thrust: self.axis(&b.thrust_forward, &b.thrust_reverse),
            strafe: self.axis(&b.strafe_right, &b.strafe_left),
            lift: self.axis(&b.lift_up, &b.lift_down),
            yaw: self.axis(&b.yaw_left, &b.yaw_right),
            pitch: self.axis(&b.pitch_up, &b.pitch_down),
            roll: self.axis(&b.roll_left, &b.roll_right),
            boost: self.is_held(&b.boost),
            fire: self.is_held(&b.fire),
        }
    }

    /// Take the actions triggered since the last call.
    pub fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.pending)
    }

    fn axis(&self, positive: &str, negative: &str) -> f64 {
        let mut value = 0.0;
        if self.is_held(positive) {
            value += 1.0;
        }
        if self.is_held(negative) {
            value -= 1.0;
        }
        value
    }
}
