//! Kinematic integration system.
//!
//! Updates Position from Velocity each frame: position += velocity * dt.

use hecs::World;

use starwake_core::components::Docked;
use starwake_core::types::{Position, Velocity};

/// Integrate every entity with Position + Velocity, skipping docked ships.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (pos, vel, docked)) in
        world.query_mut::<(&mut Position, &Velocity, Option<&Docked>)>()
    {
        if docked.is_some() {
            continue;
        }
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
        pos.z += vel.z * dt;
    }
}
