//! Gamepad adapter for the "standard" controller layout (W3C Gamepad API).
//!
//! The front end polls the device once per frame and hands the raw axis and
//! button values to `GamepadState::update`.

use starwake_core::components::ShipControls;

use crate::actions::InputAction;

pub const DEFAULT_DEADZONE: f64 = 0.15;

/// Button value at or above which a button counts as pressed.
const PRESS_THRESHOLD: f64 = 0.5;

const BUTTON_COUNT: usize = 17;

// Standard layout indices.
const AXIS_LEFT_X: usize = 0;
const AXIS_LEFT_Y: usize = 1;
const AXIS_RIGHT_X: usize = 2;
const AXIS_RIGHT_Y: usize = 3;

const BUTTON_A: usize = 0;
const BUTTON_B: usize = 1;
const BUTTON_X: usize = 2;
const BUTTON_Y: usize = 3;
const BUMPER_LEFT: usize = 4;
const BUMPER_RIGHT: usize = 5;
const TRIGGER_LEFT: usize = 6;
const TRIGGER_RIGHT: usize = 7;
const BUTTON_BACK: usize = 8;
const BUTTON_START: usize = 9;
const STICK_LEFT: usize = 10;
const DPAD_UP: usize = 12;
const DPAD_DOWN: usize = 13;
const DPAD_LEFT: usize = 14;
const DPAD_RIGHT: usize = 15;

/// Latest polled gamepad state.
#[derive(Debug, Clone)]
pub struct GamepadState {
    pub deadzone: f64,
    axes: [f64; 4],
    buttons: [f64; BUTTON_COUNT],
    pending: Vec<InputAction>,
}

impl Default for GamepadState {
    fn default() -> Self {
        Self::new(DEFAULT_DEADZONE)
    }
}

/// Radial dead zone: inputs inside `deadzone` read as zero, the rest is
/// rescaled so the output still spans the full 0..1 magnitude.
pub fn apply_deadzone(x: f64, y: f64, deadzone: f64) -> (f64, f64) {
    let magnitude = x.hypot(y);
    if magnitude <= deadzone || magnitude == 0.0 {
        return (0.0, 0.0);
    }
    let scaled = ((magnitude - deadzone) / (1.0 - deadzone)).min(1.0);
    let k = scaled / magnitude;
    (x * k, y * k)
}

impl GamepadState {
    pub fn new(deadzone: f64) -> Self {
        Self {
            deadzone: deadzone.clamp(0.0, 0.95),
            axes: [0.0; 4],
            buttons: [0.0; BUTTON_COUNT],
            pending: Vec::new(),
        }
    }

    /// Store a new poll. Missing axes/buttons read as zero; extras are ignored.
    /// Buttons that went from released to pressed queue their actions.
    pub fn update(&mut self, axes: &[f64], buttons: &[f64]) {
        let mut next_axes = [0.0; 4];
        for (slot, value) in next_axes.iter_mut().zip(axes) {
            *slot = value.clamp(-1.0, 1.0);
        }
        let mut next_buttons = [0.0; BUTTON_COUNT];
        for (slot, value) in next_buttons.iter_mut().zip(buttons) {
            *slot = value.clamp(0.0, 1.0);
        }

        for (index, action) in Self::action_buttons() {
            let was = self.buttons[index] >= PRESS_THRESHOLD;
            let now = next_buttons[index] >= PRESS_THRESHOLD;
            if now && !was {
                self.pending.push(action);
            }
        }

        self.axes = next_axes;
        self.buttons = next_buttons;
    }

    /// Forget the device, e.g. on disconnect.
    pub fn reset(&mut self) {
        self.axes = [0.0; 4];
        self.buttons = [0.0; BUTTON_COUNT];
    }

    pub fn controls(&self) -> ShipControls {
        let (lx, ly) = apply_deadzone(self.axes[AXIS_LEFT_X], self.axes[AXIS_LEFT_Y], self.deadzone);
        let (rx, ry) = apply_deadzone(
            self.axes[AXIS_RIGHT_X],
            self.axes[AXIS_RIGHT_Y],
            self.deadzone,
        );

        ShipControls {
            // Gamepad Y axes report -1 when pushed up.
            thrust: (self.buttons[TRIGGER_RIGHT] - self.buttons[TRIGGER_LEFT] - ly).clamp(-1.0, 1.0),
            strafe: lx,
            lift: self.digital(DPAD_UP) - self.digital(DPAD_DOWN),
            yaw: -rx,
            // Pulling back on the stick raises the nose.
            pitch: ry,
            roll: self.digital(BUMPER_LEFT) - self.digital(BUMPER_RIGHT),
            boost: self.pressed(STICK_LEFT),
            fire: self.pressed(BUTTON_A),
        }
    }

    pub fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.pending)
    }

    fn pressed(&self, index: usize) -> bool {
        self.buttons[index] >= PRESS_THRESHOLD
    }

    fn digital(&self, index: usize) -> f64 {
        if self.pressed(index) {
            1.0
        } else {
            0.0
        }
    }

    fn action_buttons() -> [(usize, InputAction); 7] {
        [
            (BUTTON_B, InputAction::ToggleDock),
            (BUTTON_X, InputAction::ToggleMining),
            (BUTTON_Y, InputAction::NextTarget),
            (DPAD_LEFT, InputAction::PreviousTarget),
            (DPAD_RIGHT, InputAction::ClearTarget),
            (BUTTON_BACK, InputAction::SkipIntro),
            (BUTTON_START, InputAction::TogglePause),
        ]
    }
}
