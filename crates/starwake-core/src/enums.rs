//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Cinematic intro is playing; player input is ignored.
    #[default]
    Intro,
    Playing,
    Paused,
    /// Player ship destroyed. Only `Restart` is accepted.
    GameOver,
}

/// Stage of the cinematic intro sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroStage {
    #[default]
    FadeIn,
    Title,
    /// Camera sweeps past the station toward the player ship.
    Flyby,
    /// Camera settles behind the ship and control is handed over.
    Handoff,
    Finished,
}

impl IntroStage {
    /// The stage that follows this one.
    pub fn next(self) -> Self {
        match self {
            IntroStage::FadeIn => IntroStage::Title,
            IntroStage::Title => IntroStage::Flyby,
            IntroStage::Flyby => IntroStage::Handoff,
            IntroStage::Handoff | IntroStage::Finished => IntroStage::Finished,
        }
    }
}

/// Mineable resource carried by asteroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    Iron,
    Nickel,
    Gold,
    Platinum,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Iron,
        ResourceType::Nickel,
        ResourceType::Gold,
        ResourceType::Platinum,
    ];

    /// Station buying price per unit.
    pub fn price(self) -> u32 {
        match self {
            ResourceType::Iron => PRICE_IRON,
            ResourceType::Nickel => PRICE_NICKEL,
            ResourceType::Gold => PRICE_GOLD,
            ResourceType::Platinum => PRICE_PLATINUM,
        }
    }
}

/// NPC ship archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Fast, fragile, short attack range.
    Scout,
    /// Balanced pirate fighter.
    Raider,
    /// Slow, armoured, hits hard.
    Gunship,
}

/// NPC behaviour state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Idle,
    Pursue,
    Attack,
    Retreat,
    Dead,
}

/// Mesh the external renderer should draw for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshKind {
    PlayerShip,
    Enemy(EnemyArchetype),
    Asteroid(ResourceType),
    Station,
    LootCrate,
    Effect(EffectKind),
}

/// Short-lived visual effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    MuzzleFlash,
    HitSpark,
    Explosion,
    MiningBeam,
    WarpFlash,
}

/// What kind of object a target is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Enemy,
    Asteroid,
    Station,
}

/// Direction for target cycling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleDirection {
    #[default]
    Next,
    Previous,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
