//! ECS components for hecs entities.
//!
//! Components are plain data structs. The few helpers here only keep the
//! data self-consistent (health never exceeds max, cargo never exceeds
//! capacity); game logic lives in systems.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Stable numeric id of an entity, as exposed to front ends and commands.
/// This is the ECS entity handle encoded as bits, so a stale id can never
/// alias a newer entity.
pub type EntityId = u64;

/// Marks the player's ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// NPC hostile ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub archetype: EnemyArchetype,
}

/// Marks an asteroid. Mineable asteroids also carry a `ResourceDeposit`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Asteroid;

/// A station the player can dock with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
}

/// Floating crate dropped by a destroyed enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Loot {
    pub credits: u32,
    pub resource: Option<ResourceType>,
}

/// Visual effect entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
}

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

impl Health {
    pub fn new(max: f64) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Subtract `amount` (negative amounts are ignored). Returns damage applied.
    pub fn damage(&mut self, amount: f64) -> f64 {
        let before = self.current;
        self.current = (self.current - amount.max(0.0)).max(0.0);
        before - self.current
    }

    /// Add `amount`, never exceeding `max`. Returns the amount healed.
    pub fn heal(&mut self, amount: f64) -> f64 {
        let before = self.current;
        self.current = (self.current + amount.max(0.0)).min(self.max);
        self.current - before
    }

    pub fn missing(&self) -> f64 {
        self.max - self.current
    }

    pub fn fraction(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Drawable mesh reference consumed by the render system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Renderable {
    pub mesh: MeshKind,
    pub scale: f64,
    pub visible: bool,
}

impl Renderable {
    pub fn new(mesh: MeshKind, scale: f64) -> Self {
        Self {
            mesh,
            scale,
            visible: true,
        }
    }
}

/// Bounding sphere used for raycasts and collisions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f64,
}

/// Forward-firing hitscan laser.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weapon {
    pub cooldown_secs: f64,
    /// Time left before the weapon can fire again.
    pub remaining_secs: f64,
    pub damage: f64,
    pub range: f64,
}

impl Weapon {
    pub fn ready(&self) -> bool {
        self.remaining_secs <= 0.0
    }
}

/// Control inputs for a ship, produced by the input adapters.
/// Axes are in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipControls {
    /// Forward (+) / reverse (-) thrust.
    pub thrust: f64,
    /// Right (+) / left (-) strafe.
    pub strafe: f64,
    /// Up (+) / down (-) vertical thrust.
    pub lift: f64,
    /// Turn left (+) / right (-).
    pub yaw: f64,
    /// Nose up (+) / down (-).
    pub pitch: f64,
    /// Roll left (+) / right (-).
    pub roll: f64,
    pub boost: bool,
    /// Held trigger: fire whenever the weapon is ready.
    pub fire: bool,
}

impl ShipControls {
    pub fn is_thrusting(&self) -> bool {
        self.thrust != 0.0 || self.strafe != 0.0 || self.lift != 0.0
    }

    /// Copy with every axis forced into [-1, 1]. NaN axes become 0.
    pub fn clamped(self) -> Self {
        fn axis(value: f64) -> f64 {
            if value.is_nan() {
                0.0
            } else {
                value.clamp(-1.0, 1.0)
            }
        }
        Self {
            thrust: axis(self.thrust),
            strafe: axis(self.strafe),
            lift: axis(self.lift),
            yaw: axis(self.yaw),
            pitch: axis(self.pitch),
            roll: axis(self.roll),
            ..self
        }
    }
}

/// Ship handling parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlightModel {
    pub thrust: f64,
    pub max_speed: f64,
    pub boost_factor: f64,
    pub turn_rate: f64,
    /// Fraction of velocity kept per second while coasting.
    pub damping: f64,
}

/// Resources held by a ship.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cargo {
    pub items: BTreeMap<ResourceType, u32>,
    pub capacity: u32,
}

impl Cargo {
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            items: BTreeMap::new(),
            capacity,
        }
    }

    pub fn total(&self) -> u32 {
        self.items.values().sum()
    }

    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.total())
    }

    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Add up to `amount` units. Returns how many fit.
    pub fn add(&mut self, resource: ResourceType, amount: u32) -> u32 {
        let added = amount.min(self.free());
        if added > 0 {
            *self.items.entry(resource).or_insert(0) += added;
        }
        added
    }

    pub fn count(&self, resource: ResourceType) -> u32 {
        self.items.get(&resource).copied().unwrap_or(0)
    }
}

/// Player money.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Wallet {
    pub credits: u32,
}

/// Remaining time before the entity is removed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lifetime {
    pub remaining_secs: f64,
}

/// NPC behaviour state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AiBrain {
    pub state: AiState,
    /// Seconds spent in the current state.
    pub state_secs: f64,
    /// Set by the AI when it wants the combat system to fire this frame.
    pub wants_fire: bool,
}

/// Mineable material left in an asteroid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResourceDeposit {
    pub resource: ResourceType,
    pub remaining: u32,
}

/// Present while a ship is docked. Docked ships are invisible and immobile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Docked {
    pub station: EntityId,
}

/// Per-contact collision damage cooldowns, keyed by the other entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactCooldowns {
    pub entries: Vec<(EntityId, f64)>,
}
