//! Simulation constants and default tuning parameters.
//!
//! Most of these are defaults for `GameConfig`; a config file may override
//! them at startup.

/// Simulation frame rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per frame.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World ---

/// Entities further than this from the origin are removed (player excepted).
pub const WORLD_RADIUS: f64 = 20_000.0;

/// Number of asteroids in the initial field.
pub const ASTEROID_FIELD_COUNT: usize = 24;

/// Asteroid field inner/outer radius around the origin.
pub const ASTEROID_FIELD_MIN_RADIUS: f64 = 800.0;
pub const ASTEROID_FIELD_MAX_RADIUS: f64 = 4_000.0;

/// Station placement.
pub const STATION_POSITION: (f64, f64, f64) = (0.0, 0.0, -1_500.0);
pub const STATION_COLLIDER_RADIUS: f64 = 120.0;

// --- Player ship ---

pub const PLAYER_MAX_HEALTH: f64 = 100.0;
pub const PLAYER_COLLIDER_RADIUS: f64 = 8.0;
pub const PLAYER_START_CREDITS: u32 = 100;
pub const PLAYER_CARGO_CAPACITY: u32 = 40;

/// Acceleration at full thrust (units/s²).
pub const SHIP_THRUST: f64 = 120.0;
/// Top speed without boost (units/s).
pub const SHIP_MAX_SPEED: f64 = 220.0;
/// Multiplier on thrust and top speed while boosting.
pub const SHIP_BOOST_FACTOR: f64 = 1.8;
/// Turn rate at full stick deflection (rad/s).
pub const SHIP_TURN_RATE: f64 = 1.6;
/// Fraction of velocity kept per second when no thrust is applied.
pub const SHIP_DAMPING: f64 = 0.6;

// --- Combat ---

pub const LASER_COOLDOWN_SECS: f64 = 0.2;
pub const LASER_DAMAGE: f64 = 25.0;
pub const LASER_RANGE: f64 = 2_000.0;

/// Minimum damage dealt by any collision.
pub const COLLISION_MIN_DAMAGE: f64 = 2.0;
/// Damage per unit of closing speed on collision.
pub const COLLISION_DAMAGE_PER_SPEED: f64 = 0.1;
/// Fraction of the normal velocity component kept after a bounce.
pub const COLLISION_RESTITUTION: f64 = 0.4;
/// Seconds before the same pair can deal collision damage again.
pub const COLLISION_COOLDOWN_SECS: f64 = 0.5;

// --- Mining ---

pub const MINING_RANGE: f64 = 400.0;
/// Progress per second for each resource type (a unit is granted at 1.0).
pub const MINING_RATE_IRON: f64 = 0.8;
pub const MINING_RATE_NICKEL: f64 = 0.5;
pub const MINING_RATE_GOLD: f64 = 0.25;
pub const MINING_RATE_PLATINUM: f64 = 0.15;
/// Units contained in a freshly spawned asteroid.
pub const ASTEROID_MIN_DEPOSIT: u32 = 3;
pub const ASTEROID_MAX_DEPOSIT: u32 = 12;

// --- Docking ---

pub const DOCKING_RANGE: f64 = 300.0;
/// Where the ship reappears relative to the station when undocking.
pub const UNDOCK_OFFSET: (f64, f64, f64) = (0.0, 0.0, 250.0);
/// Credits per hit point repaired.
pub const REPAIR_COST_PER_HP: f64 = 2.0;

pub const PRICE_IRON: u32 = 5;
pub const PRICE_NICKEL: u32 = 9;
pub const PRICE_GOLD: u32 = 25;
pub const PRICE_PLATINUM: u32 = 40;

// --- Targeting ---

pub const TARGETING_RANGE: f64 = 5_000.0;

// --- Spawner ---

pub const SPAWN_INTERVAL_SECS: f64 = 12.0;
pub const SPAWN_FIRST_DELAY_SECS: f64 = 5.0;
pub const SPAWN_MAX_ENEMIES: usize = 6;
pub const SPAWN_MIN_DISTANCE: f64 = 1_500.0;
pub const SPAWN_MAX_DISTANCE: f64 = 2_500.0;
/// How often tracked enemy ids are checked for despawned entities.
pub const SPAWN_CLEANUP_INTERVAL_SECS: f64 = 2.0;

// --- Loot ---

pub const LOOT_LIFETIME_SECS: f64 = 30.0;
pub const LOOT_PICKUP_RADIUS: f64 = 40.0;
pub const LOOT_MIN_CREDITS: u32 = 10;
pub const LOOT_MAX_CREDITS: u32 = 50;
/// Probability that a loot drop also carries one resource unit.
pub const LOOT_RESOURCE_CHANCE: f64 = 0.5;

// --- Effects ---

pub const MUZZLE_FLASH_SECS: f64 = 0.08;
pub const HIT_SPARK_SECS: f64 = 0.3;
pub const EXPLOSION_SECS: f64 = 1.2;
pub const MINING_BEAM_SECS: f64 = 0.1;
pub const WARP_FLASH_SECS: f64 = 0.6;

// --- Intro ---

pub const INTRO_FADE_IN_SECS: f64 = 1.5;
pub const INTRO_TITLE_SECS: f64 = 3.0;
pub const INTRO_FLYBY_SECS: f64 = 6.0;
pub const INTRO_HANDOFF_SECS: f64 = 1.0;

// --- HUD ---

/// Maximum alerts kept in the HUD queue.
pub const MAX_ALERTS: usize = 8;
