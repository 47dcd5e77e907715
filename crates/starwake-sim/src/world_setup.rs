//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the player ship, the station, the asteroid field and NPC ships
//! with appropriate component bundles.

use glam::DVec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starwake_ai::profiles::get_profile;
use starwake_core::components::*;
use starwake_core::config::GameConfig;
use starwake_core::constants::*;
use starwake_core::enums::*;
use starwake_core::types::{Orientation, Position, Velocity};

/// Name of the station in the default sector.
pub const STATION_NAME: &str = "Kepler Relay";

/// Asteroids are kept at least this far from the station surface.
const STATION_CLEARANCE: f64 = 400.0;

/// Build the starting sector. Returns the player entity.
pub fn setup_world(world: &mut World, rng: &mut ChaCha8Rng, config: &GameConfig) -> hecs::Entity {
    spawn_station(world);
    let (x, y, z) = STATION_POSITION;
    spawn_asteroid_field(world, rng, ASTEROID_FIELD_COUNT, Position::new(x, y, z));
    spawn_player(world, config)
}

/// Spawn the player's ship at the origin, nose toward the station.
pub fn spawn_player(world: &mut World, config: &GameConfig) -> hecs::Entity {
    let ship = &config.ship;
    let combat = &config.combat;

    let flight = FlightModel {
        thrust: ship.thrust,
        max_speed: ship.max_speed,
        boost_factor: ship.boost_factor,
        turn_rate: ship.turn_rate,
        damping: ship.damping,
    };
    let weapon = Weapon {
        cooldown_secs: combat.laser_cooldown_secs,
        remaining_secs: 0.0,
        damage: combat.laser_damage,
        range: combat.laser_range,
    };
    let wallet = Wallet {
        credits: ship.start_credits,
    };

    world.spawn((
        Player,
        Position::new(0.0, 0.0, 0.0),
        Velocity::default(),
        Orientation::default(),
        Health::new(ship.max_health),
        Collider {
            radius: PLAYER_COLLIDER_RADIUS,
        },
        weapon,
        ShipControls::default(),
        flight,
        Cargo::with_capacity(ship.cargo_capacity),
        wallet,
        ContactCooldowns::default(),
        Renderable::new(MeshKind::PlayerShip, 1.0),
    ))
}

/// Spawn the trading station.
pub fn spawn_station(world: &mut World) -> hecs::Entity {
    let (x, y, z) = STATION_POSITION;
    world.spawn((
        Station {
            name: STATION_NAME.to_string(),
        },
        Position::new(x, y, z),
        Orientation::default(),
        Collider {
            radius: STATION_COLLIDER_RADIUS,
        },
        Renderable::new(MeshKind::Station, STATION_COLLIDER_RADIUS),
    ))
}

/// Scatter `count` asteroids in a shell around the origin, away from the station.
pub fn spawn_asteroid_field(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    count: usize,
    station: Position,
) {
    for _ in 0..count {
        let mut position = random_point_in_shell(
            rng,
            ASTEROID_FIELD_MIN_RADIUS,
            ASTEROID_FIELD_MAX_RADIUS,
        );
        // A few retries keep rocks off the station; the last sample is used regardless.
        for _ in 0..8 {
            if position.range_to(&station) > STATION_COLLIDER_RADIUS + STATION_CLEARANCE {
                break;
            }
            position = random_point_in_shell(
                rng,
                ASTEROID_FIELD_MIN_RADIUS,
                ASTEROID_FIELD_MAX_RADIUS,
            );
        }

        let resource = roll_resource(rng);
        let radius = rng.gen_range(20.0..60.0);
        let deposit = rng.gen_range(ASTEROID_MIN_DEPOSIT..=ASTEROID_MAX_DEPOSIT);
        spawn_asteroid(world, position, resource, radius, deposit);
    }
}

/// Spawn a single mineable asteroid.
pub fn spawn_asteroid(
    world: &mut World,
    position: Position,
    resource: ResourceType,
    radius: f64,
    deposit: u32,
) -> hecs::Entity {
    world.spawn((
        Asteroid,
        position,
        Orientation::default(),
        Collider { radius },
        ResourceDeposit {
            resource,
            remaining: deposit,
        },
        Renderable::new(MeshKind::Asteroid(resource), radius),
    ))
}

/// Spawn an NPC ship facing `facing` (world-space direction).
pub fn spawn_enemy(
    world: &mut World,
    archetype: EnemyArchetype,
    position: Position,
    facing: DVec3,
) -> hecs::Entity {
    let profile = get_profile(archetype);
    let weapon = Weapon {
        cooldown_secs: profile.weapon_cooldown_secs,
        remaining_secs: profile.weapon_cooldown_secs,
        damage: profile.weapon_damage,
        range: profile.weapon_range,
    };

    world.spawn((
        Enemy { archetype },
        position,
        Velocity::default(),
        Orientation::looking_along(facing),
        Health::new(profile.max_health),
        Collider {
            radius: profile.collider_radius,
        },
        weapon,
        AiBrain::default(),
        Renderable::new(MeshKind::Enemy(archetype), profile.collider_radius),
    ))
}

/// Uniformly distributed direction scaled to a distance in `[min, max)`.
pub fn random_point_in_shell(rng: &mut ChaCha8Rng, min: f64, max: f64) -> Position {
    let distance = if max > min {
        rng.gen_range(min..max)
    } else {
        min
    };
    Position::from_dvec3(random_unit_vector(rng) * distance)
}

pub fn random_unit_vector(rng: &mut ChaCha8Rng) -> DVec3 {
    let z: f64 = rng.gen_range(-1.0..1.0);
    let theta: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
    let r = (1.0 - z * z).sqrt();
    DVec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Common ores are far more frequent than precious metals.
fn roll_resource(rng: &mut ChaCha8Rng) -> ResourceType {
    match rng.gen_range(0..100) {
        0..=49 => ResourceType::Iron,
        50..=79 => ResourceType::Nickel,
        80..=94 => ResourceType::Gold,
        _ => ResourceType::Platinum,
    }
}
