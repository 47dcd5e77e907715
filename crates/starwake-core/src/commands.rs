//! Player commands sent from input adapters / front end to the simulation.
//!
//! Commands are queued and applied at the start of the next frame, in
//! arrival order.

use serde::{Deserialize, Serialize};

use crate::components::{EntityId, ShipControls};
use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Intro ---
    /// Skip the remaining cinematic intro.
    SkipIntro,

    // --- Flight ---
    /// Replace the ship's current control state.
    SetControls { controls: ShipControls },

    // --- Combat ---
    /// Fire a single shot if the weapon is ready.
    Fire,

    // --- Targeting ---
    /// Select the next/previous target ordered by distance.
    CycleTarget { direction: CycleDirection },
    /// Select a specific entity.
    SelectTarget { id: EntityId },
    /// Drop the current target.
    ClearTarget,

    // --- Mining ---
    /// Start mining the targeted asteroid.
    StartMining,
    StopMining,

    // --- Docking ---
    /// Dock with the station in range.
    Dock,
    Undock,
    /// Spend credits to repair hull (docked only).
    Repair,
    /// Sell all cargo to the station (docked only).
    SellCargo,

    // --- Simulation control ---
    Pause,
    Resume,
    /// Rebuild the world and start playing again.
    Restart,
}
