//! STARWAKE headless runner.
//!
//! Wires the simulation engine to a game-loop thread, a scripted demo pilot
//! and JSON-lines snapshot output. A browser front end would replace the
//! demo pilot with real input events and consume the same snapshots.

pub mod autopilot;
pub mod config;
pub mod game_loop;
pub mod logging;
pub mod state;

pub use starwake_core as core;
