//! Error types shared by the simulation crates.

use thiserror::Error;

use crate::enums::GamePhase;

/// Failure to load or validate a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Why a player command was rejected. Rejections never abort a frame; the
/// engine logs them and raises a HUD alert.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("not docked")]
    NotDocked,

    #[error("already docked")]
    AlreadyDocked,

    #[error("no station in docking range")]
    NoStationInRange,

    #[error("no target selected")]
    NoTarget,

    #[error("target out of range ({distance:.0} > {range:.0})")]
    TargetOutOfRange { distance: f64, range: f64 },

    #[error("target cannot be mined")]
    NotMineable,

    #[error("cargo hold full")]
    CargoFull,

    #[error("insufficient credits: need {needed}, have {available}")]
    InsufficientCredits { needed: u32, available: u32 },

    #[error("nothing to sell")]
    NothingToSell,

    #[error("hull already at full strength")]
    NothingToRepair,

    #[error("command not available during {phase:?}")]
    WrongPhase { phase: GamePhase },

    #[error("player ship missing")]
    PlayerMissing,

    #[error("unknown entity {0}")]
    UnknownEntity(u64),
}
