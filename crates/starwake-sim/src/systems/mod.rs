//! ECS systems that operate on the simulation world each frame.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only work) plus whatever engine-owned state they need. Per-entity
//! state lives in components; cross-entity state (mining session, spawner
//! bookkeeping, intro timeline) lives in small structs owned by the engine.

pub mod ai;
pub mod cleanup;
pub mod collision;
pub mod combat;
pub mod docking;
pub mod effects;
pub mod flight;
pub mod intro;
pub mod loot;
pub mod mining;
pub mod movement;
pub mod snapshot;
pub mod spawner;
pub mod targeting;

use hecs::{Entity, World};

use starwake_core::components::Docked;

/// Whether `entity` is currently docked.
pub fn is_docked(world: &World, entity: Entity) -> bool {
    world.get::<&Docked>(entity).is_ok()
}
