//! Per-frame aggregation of every input device into player commands.

use starwake_core::commands::PlayerCommand;
use starwake_core::components::ShipControls;
use starwake_core::enums::GamePhase;

use crate::actions::ActionContext;
use crate::gamepad::GamepadState;
use crate::keyboard::{KeyBindings, KeyboardState};
use crate::pointer::PointerLook;
use crate::touch::TouchControls;

/// Owns all device adapters and turns them into commands once per frame.
#[derive(Debug, Clone, Default)]
pub struct InputHub {
    pub keyboard: KeyboardState,
    pub gamepad: GamepadState,
    pub touch: TouchControls,
    pub pointer: PointerLook,
    /// Controls last sent, with the phase and dock state they were sent in.
    last_sent: Option<(ShipControls, GamePhase, bool)>,
}

impl InputHub {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            keyboard: KeyboardState::new(bindings),
            ..Default::default()
        }
    }

    /// Commands for this frame, followed by one command per triggered
    /// action (keyboard first, then gamepad).
    ///
    /// `SetControls` goes out when the merged control state changed, and
    /// again whenever the phase or dock state moves: the engine drops
    /// controls outside `Playing` and zeroes them on docking, so held input
    /// has to be re-sent once it can apply.
    pub fn frame_commands(&mut self, ctx: &ActionContext) -> Vec<PlayerCommand> {
        let (look_yaw, look_pitch) = self.pointer.take();
        let look = ShipControls {
            yaw: look_yaw,
            pitch: look_pitch,
            ..Default::default()
        };

        let controls = crate::merge(&[
            self.keyboard.controls(),
            self.gamepad.controls(),
            self.touch.controls(),
            look,
        ]);

        let mut commands = Vec::new();
        let sent = (controls, ctx.phase, ctx.docked);
        if self.last_sent != Some(sent) {
            commands.push(PlayerCommand::SetControls { controls });
            self.last_sent = Some(sent);
        }

        let actions = self
            .keyboard
            .take_actions()
            .into_iter()
            .chain(self.gamepad.take_actions());
        commands.extend(actions.map(|action| action.to_command(ctx)));
        commands
    }

    /// Forget the last sent controls so the next frame sends them again.
    /// Call after issuing `Restart`, which rebuilds the ship with idle
    /// controls without leaving `Playing`.
    pub fn resync(&mut self) {
        self.last_sent = None;
    }
}
