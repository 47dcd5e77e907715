//! NPC AI system: runs the behaviour FSM for every enemy each frame.
//!
//! Calls the FSM from starwake-ai, then writes the resulting state,
//! velocity, facing and fire request back into ECS components.

use glam::DVec3;
use hecs::World;

use starwake_ai::fsm::{evaluate, BrainContext};
use starwake_core::components::{AiBrain, Enemy, Health, Weapon};
use starwake_core::enums::AiState;
use starwake_core::types::{Orientation, Position, Velocity};

/// Run the AI for all enemies. `player_position` is `None` when the player
/// cannot be engaged (docked, destroyed or absent).
pub fn run(world: &mut World, player_position: Option<Position>, dt: f64) {
    // Collect first, apply after the query borrow ends
    let mut updates: Vec<(hecs::Entity, AiState, Velocity, Option<DVec3>, bool)> = Vec::new();

    {
        let mut query =
            world.query::<(&Enemy, &Position, &Velocity, &Health, &Weapon, &AiBrain)>();
        for (entity, (enemy, pos, vel, health, weapon, brain)) in query.iter() {
            let ctx = BrainContext {
                archetype: enemy.archetype,
                state: brain.state,
                position: *pos,
                velocity: *vel,
                player_position,
                health_fraction: health.fraction(),
                weapon_ready: weapon.ready(),
                elapsed_in_state_secs: brain.state_secs,
                dt,
            };

            let update = evaluate(&ctx);
            if update.state_changed {
                log::debug!(
                    "{:?} {:?}: {:?} -> {:?}",
                    enemy.archetype,
                    entity,
                    brain.state,
                    update.new_state
                );
            }
            updates.push((
                entity,
                update.new_state,
                update.new_velocity,
                update.facing,
                update.wants_fire,
            ));
        }
    }

    for (entity, new_state, new_velocity, facing, wants_fire) in updates {
        if let Ok(mut brain) = world.get::<&mut AiBrain>(entity) {
            if brain.state == new_state {
                brain.state_secs += dt;
            } else {
                brain.state = new_state;
                brain.state_secs = 0.0;
            }
            brain.wants_fire = wants_fire;
        }
        if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
            *vel = new_velocity;
        }
        if let Some(dir) = facing {
            if let Ok(mut orientation) = world.get::<&mut Orientation>(entity) {
                *orientation = Orientation::looking_along(dir);
            }
        }
    }
}
