//! NPC ship AI for STARWAKE.
//!
//! Implements the enemy behaviour state machine and archetype profiles.
//! Pure functions over plain data; the simulation crate applies the results
//! to ECS components.

pub mod fsm;
pub mod profiles;

pub use starwake_core as core;
