//! Input adapters for STARWAKE.
//!
//! Translates raw device state (keyboard codes, gamepad axes, touch drags,
//! pointer-lock mouse deltas) into `ShipControls` and `PlayerCommand`s.
//! Device event plumbing belongs to the embedding front end; everything here
//! is plain data so it can be driven from any event source.

pub mod actions;
pub mod gamepad;
pub mod hub;
pub mod keyboard;
pub mod pointer;
pub mod touch;

pub use actions::{ActionContext, InputAction};
pub use hub::InputHub;
pub use keyboard::KeyBindings;

pub use starwake_core as core;

use starwake_core::components::ShipControls;

/// Combine control states from several devices: axes are summed and clamped
/// to [-1, 1], buttons are OR-ed.
pub fn merge(sources: &[ShipControls]) -> ShipControls {
    let mut out = ShipControls::default();
    for c in sources {
        out.thrust += c.thrust;
        out.strafe += c.strafe;
        out.lift += c.lift;
        out.yaw += c.yaw;
        out.pitch += c.pitch;
        out.roll += c.roll;
        out.boost |= c.boost;
        out.fire |= c.fire;
    }
    out.clamped()
}

#[cfg(test)]
mod tests;
