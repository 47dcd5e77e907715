//! Events published on the simulation message bus.
//!
//! Every frame's events are delivered to bus subscribers and then included
//! in the snapshot for audio/UI feedback.

use serde::{Deserialize, Serialize};

use crate::components::EntityId;
use crate::enums::*;

/// Channel an event is published on. Subscribers register per topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Combat,
    Mining,
    Docking,
    Targeting,
    Spawn,
    Intro,
    Game,
    /// Subscribers on this topic receive every event.
    All,
}

/// Simulation events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    // --- Combat ---
    ShotFired { shooter: EntityId },
    Hit { shooter: EntityId, target: EntityId, damage: f64 },
    Destroyed { entity: EntityId, by_player: bool },
    PlayerDamaged { amount: f64, remaining: f64 },

    // --- Mining ---
    MiningStarted { asteroid: EntityId, resource: ResourceType },
    ResourceMined { resource: ResourceType, cargo_total: u32 },
    MiningStopped { asteroid: EntityId },
    AsteroidDepleted { asteroid: EntityId },

    // --- Docking ---
    Docked { station: EntityId },
    Undocked { station: EntityId },
    Repaired { amount: f64, cost: u32 },
    CargoSold { units: u32, credits: u32 },

    // --- Targeting ---
    TargetAcquired { target: EntityId, kind: TargetKind },
    TargetLost { target: EntityId },

    // --- Spawning / loot ---
    EnemySpawned { entity: EntityId, archetype: EnemyArchetype },
    LootDropped { entity: EntityId },
    LootCollected { credits: u32, resource: Option<ResourceType> },

    // --- Intro ---
    IntroStageChanged { stage: IntroStage },
    IntroFinished,

    // --- Game ---
    PhaseChanged { phase: GamePhase },
    PlayerDestroyed,
}

impl GameEvent {
    /// The topic this event is published on.
    pub fn topic(&self) -> EventTopic {
        match self {
            GameEvent::ShotFired { .. }
            | GameEvent::Hit { .. }
            | GameEvent::Destroyed { .. }
            | GameEvent::PlayerDamaged { .. } => EventTopic::Combat,
            GameEvent::MiningStarted { .. }
            | GameEvent::ResourceMined { .. }
            | GameEvent::MiningStopped { .. }
            | GameEvent::AsteroidDepleted { .. } => EventTopic::Mining,
            GameEvent::Docked { .. }
            | GameEvent::Undocked { .. }
            | GameEvent::Repaired { .. }
            | GameEvent::CargoSold { .. } => EventTopic::Docking,
            GameEvent::TargetAcquired { .. } | GameEvent::TargetLost { .. } => {
                EventTopic::Targeting
            }
            GameEvent::EnemySpawned { .. }
            | GameEvent::LootDropped { .. }
            | GameEvent::LootCollected { .. } => EventTopic::Spawn,
            GameEvent::IntroStageChanged { .. } | GameEvent::IntroFinished => EventTopic::Intro,
            GameEvent::PhaseChanged { .. } | GameEvent::PlayerDestroyed => EventTopic::Game,
        }
    }
}

/// Alert for the HUD alert queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    pub tick: u64,
}
