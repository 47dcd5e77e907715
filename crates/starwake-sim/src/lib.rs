//! Simulation engine for STARWAKE.
//!
//! Owns the hecs ECS world and the message bus, runs systems in a fixed
//! per-frame order, and produces `GameStateSnapshot`s for the front end.

pub mod bus;
pub mod engine;
pub mod score;
pub mod systems;
pub mod world_setup;

pub use bus::{EventBus, SubscriptionId};
pub use engine::{SimConfig, SimulationEngine};
pub use starwake_core as core;

use starwake_core::components::EntityId;

/// Public id of an ECS entity.
pub fn entity_id(entity: hecs::Entity) -> EntityId {
    entity.to_bits().get()
}

/// ECS entity for a public id. `None` for ids that were never valid.
pub fn entity_from_id(id: EntityId) -> Option<hecs::Entity> {
    hecs::Entity::from_bits(id)
}
