//! Player flight model.
//!
//! Turns `ShipControls` into rotation and acceleration. Docked ships do not
//! move and ignore their controls.

use hecs::World;

use starwake_core::components::{Docked, FlightModel, ShipControls};
use starwake_core::types::{Orientation, Velocity};

pub fn run(world: &mut World, dt: f64) {
    for (_entity, (controls, flight, orientation, velocity, docked)) in world.query_mut::<(
        &ShipControls,
        &FlightModel,
        &mut Orientation,
        &mut Velocity,
        Option<&Docked>,
    )>() {
        if docked.is_some() {
            *velocity = Velocity::default();
            continue;
        }
        apply_controls(controls, flight, orientation, velocity, dt);
    }
}

/// One integration step of the flight model for a single ship.
pub fn apply_controls(
    controls: &ShipControls,
    flight: &FlightModel,
    orientation: &mut Orientation,
    velocity: &mut Velocity,
    dt: f64,
) {
    let turn = flight.turn_rate * dt;
    if controls.yaw != 0.0 || controls.pitch != 0.0 || controls.roll != 0.0 {
        orientation.rotate_local(controls.yaw * turn, controls.pitch * turn, controls.roll * turn);
    }

    let boost = if controls.boost { flight.boost_factor } else { 1.0 };
    let mut v = velocity.to_dvec3();

    if controls.is_thrusting() {
        let accel = (orientation.forward() * controls.thrust
            + orientation.right() * controls.strafe
            + orientation.up() * controls.lift)
            * flight.thrust
            * boost;
        v += accel * dt;
    } else {
        v *= flight.damping.powf(dt);
    }

    let max_speed = flight.max_speed * boost;
    if v.length() > max_speed {
        v = v.normalize() * max_speed;
    }
    *velocity = Velocity::from_dvec3(v);
}
