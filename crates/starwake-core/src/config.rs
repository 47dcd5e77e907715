//! Tuning configuration.
//!
//! Every section defaults to the values in `constants`, so a config file only
//! needs the fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::ResourceType;
use crate::error::ConfigError;

/// All gameplay tuning knobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ship: ShipConfig,
    pub combat: CombatConfig,
    pub mining: MiningConfig,
    pub docking: DockingConfig,
    pub spawner: SpawnerConfig,
    pub intro: IntroConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub max_health: f64,
    pub thrust: f64,
    pub max_speed: f64,
    pub boost_factor: f64,
    pub turn_rate: f64,
    pub damping: f64,
    pub cargo_capacity: u32,
    pub start_credits: u32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            thrust: SHIP_THRUST,
            max_speed: SHIP_MAX_SPEED,
            boost_factor: SHIP_BOOST_FACTOR,
            turn_rate: SHIP_TURN_RATE,
            damping: SHIP_DAMPING,
            cargo_capacity: PLAYER_CARGO_CAPACITY,
            start_credits: PLAYER_START_CREDITS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub laser_cooldown_secs: f64,
    pub laser_damage: f64,
    pub laser_range: f64,
    pub targeting_range: f64,
    pub collision_min_damage: f64,
    pub collision_damage_per_speed: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            laser_cooldown_secs: LASER_COOLDOWN_SECS,
            laser_damage: LASER_DAMAGE,
            laser_range: LASER_RANGE,
            targeting_range: TARGETING_RANGE,
            collision_min_damage: COLLISION_MIN_DAMAGE,
            collision_damage_per_speed: COLLISION_DAMAGE_PER_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub range: f64,
    pub rate_iron: f64,
    pub rate_nickel: f64,
    pub rate_gold: f64,
    pub rate_platinum: f64,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            range: MINING_RANGE,
            rate_iron: MINING_RATE_IRON,
            rate_nickel: MINING_RATE_NICKEL,
            rate_gold: MINING_RATE_GOLD,
            rate_platinum: MINING_RATE_PLATINUM,
        }
    }
}

impl MiningConfig {
    /// Progress per second for `resource`.
    pub fn rate(&self, resource: ResourceType) -> f64 {
        match resource {
            ResourceType::Iron => self.rate_iron,
            ResourceType::Nickel => self.rate_nickel,
            ResourceType::Gold => self.rate_gold,
            ResourceType::Platinum => self.rate_platinum,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockingConfig {
    pub range: f64,
    pub undock_offset: [f64; 3],
    pub repair_cost_per_hp: f64,
}

impl Default for DockingConfig {
    fn default() -> Self {
        Self {
            range: DOCKING_RANGE,
            undock_offset: [UNDOCK_OFFSET.0, UNDOCK_OFFSET.1, UNDOCK_OFFSET.2],
            repair_cost_per_hp: REPAIR_COST_PER_HP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub enabled: bool,
    pub first_delay_secs: f64,
    pub interval_secs: f64,
    pub max_enemies: usize,
    pub min_distance: f64,
    pub max_distance: f64,
    pub cleanup_interval_secs: f64,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            first_delay_secs: SPAWN_FIRST_DELAY_SECS,
            interval_secs: SPAWN_INTERVAL_SECS,
            max_enemies: SPAWN_MAX_ENEMIES,
            min_distance: SPAWN_MIN_DISTANCE,
            max_distance: SPAWN_MAX_DISTANCE,
            cleanup_interval_secs: SPAWN_CLEANUP_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// When false the game starts directly in `Playing`.
    pub enabled: bool,
    pub fade_in_secs: f64,
    pub title_secs: f64,
    pub flyby_secs: f64,
    pub handoff_secs: f64,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fade_in_secs: INTRO_FADE_IN_SECS,
            title_secs: INTRO_TITLE_SECS,
            flyby_secs: INTRO_FLYBY_SECS,
            handoff_secs: INTRO_HANDOFF_SECS,
        }
    }
}

impl GameConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or break the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("ship.max_health", self.ship.max_health),
            ("ship.thrust", self.ship.thrust),
            ("ship.max_speed", self.ship.max_speed),
            ("ship.boost_factor", self.ship.boost_factor),
            ("ship.turn_rate", self.ship.turn_rate),
            ("combat.laser_cooldown_secs", self.combat.laser_cooldown_secs),
            ("combat.laser_range", self.combat.laser_range),
            ("combat.targeting_range", self.combat.targeting_range),
            ("mining.range", self.mining.range),
            ("mining.rate_iron", self.mining.rate_iron),
            ("mining.rate_nickel", self.mining.rate_nickel),
            ("mining.rate_gold", self.mining.rate_gold),
            ("mining.rate_platinum", self.mining.rate_platinum),
            ("docking.range", self.docking.range),
            ("spawner.interval_secs", self.spawner.interval_secs),
            ("spawner.cleanup_interval_secs", self.spawner.cleanup_interval_secs),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.ship.damping) {
            return Err(ConfigError::Invalid {
                field: "ship.damping",
                reason: format!("must be within 0..=1, got {}", self.ship.damping),
            });
        }
        if self.spawner.min_distance > self.spawner.max_distance {
            return Err(ConfigError::Invalid {
                field: "spawner.min_distance",
                reason: "must not exceed spawner.max_distance".into(),
            });
        }
        let durations = [
            self.intro.fade_in_secs,
            self.intro.title_secs,
            self.intro.flyby_secs,
            self.intro.handoff_secs,
        ];
        if durations.iter().any(|d| *d < 0.0) {
            return Err(ConfigError::Invalid {
                field: "intro",
                reason: "stage durations must not be negative".into(),
            });
        }
        Ok(())
    }
}
