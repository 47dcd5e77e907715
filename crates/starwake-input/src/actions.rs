//! Discrete (edge-triggered) input actions and their command mapping.

use serde::{Deserialize, Serialize};

use starwake_core::commands::PlayerCommand;
use starwake_core::enums::{CycleDirection, GamePhase};

/// One-shot action produced when a bound key or button goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputAction {
    NextTarget,
    PreviousTarget,
    ClearTarget,
    /// Start mining, or stop if already mining.
    ToggleMining,
    /// Dock when undocked, undock when docked.
    ToggleDock,
    Repair,
    SellCargo,
    TogglePause,
    SkipIntro,
}

/// HUD state the toggle actions depend on. Taken from the latest snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActionContext {
    pub phase: GamePhase,
    pub mining: bool,
    pub docked: bool,
}

impl InputAction {
    /// The command this action issues given the current HUD state.
    pub fn to_command(self, ctx: &ActionContext) -> PlayerCommand {
        match self {
            InputAction::NextTarget => PlayerCommand::CycleTarget {
                direction: CycleDirection::Next,
            },
            InputAction::PreviousTarget => PlayerCommand::CycleTarget {
                direction: CycleDirection::Previous,
            },
            InputAction::ClearTarget => PlayerCommand::ClearTarget,
            InputAction::ToggleMining if ctx.mining => PlayerCommand::StopMining,
            InputAction::ToggleMining => PlayerCommand::StartMining,
            InputAction::ToggleDock if ctx.docked => PlayerCommand::Undock,
            InputAction::ToggleDock => PlayerCommand::Dock,
            InputAction::Repair => PlayerCommand::Repair,
            InputAction::SellCargo => PlayerCommand::SellCargo,
            InputAction::TogglePause if ctx.phase == GamePhase::Paused => PlayerCommand::Resume,
            InputAction::TogglePause => PlayerCommand::Pause,
            InputAction::SkipIntro => PlayerCommand::SkipIntro,
        }
    }
}
