//! Collision system: player ship against asteroids and NPC ships.
//!
//! Sphere-sphere overlap only. The player is pushed out along the contact
//! normal and its closing velocity is reflected and damped. Impact damage
//! scales with closing speed and is applied at most once per contact
//! cooldown window for each pair.

use glam::DVec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use starwake_core::components::*;
use starwake_core::config::CombatConfig;
use starwake_core::constants::{COLLISION_COOLDOWN_SECS, COLLISION_RESTITUTION};
use starwake_core::events::GameEvent;
use starwake_core::types::{Position, Velocity};

use super::{combat, is_docked};
use crate::bus::EventBus;
use crate::entity_id;
use crate::score::ScoreState;

#[derive(Debug, Clone, Copy)]
struct Obstacle {
    entity: Entity,
    center: DVec3,
    radius: f64,
    velocity: DVec3,
    is_enemy: bool,
}

/// Impact damage for a given closing speed.
pub fn impact_damage(config: &CombatConfig, closing_speed: f64) -> f64 {
    (closing_speed * config.collision_damage_per_speed).max(config.collision_min_damage)
}

pub fn run(
    world: &mut World,
    player: Option<Entity>,
    config: &CombatConfig,
    rng: &mut ChaCha8Rng,
    bus: &mut EventBus,
    score: &mut ScoreState,
    dt: f64,
) {
    let Some(player) = player else { return };
    if is_docked(world, player) {
        return;
    }

    if let Ok(mut cooldowns) = world.get::<&mut ContactCooldowns>(player) {
        for entry in cooldowns.entries.iter_mut() {
            entry.1 -= dt;
        }
        cooldowns.entries.retain(|(_, remaining)| *remaining > 0.0);
    }

    let mut obstacles: Vec<Obstacle> = Vec::new();
    for (entity, (_asteroid, pos, collider)) in world
        .query::<(&Asteroid, &Position, &Collider)>()
        .iter()
    {
        obstacles.push(Obstacle {
            entity,
            center: pos.to_dvec3(),
            radius: collider.radius,
            velocity: DVec3::ZERO,
            is_enemy: false,
        });
    }
    for (entity, (_enemy, pos, vel, collider, health)) in world
        .query::<(&Enemy, &Position, &Velocity, &Collider, &Health)>()
        .iter()
    {
        if health.is_dead() {
            continue;
        }
        obstacles.push(Obstacle {
            entity,
            center: pos.to_dvec3(),
            radius: collider.radius,
            velocity: vel.to_dvec3(),
            is_enemy: true,
        });
    }

    for obstacle in obstacles {
        let alive = world
            .get::<&Health>(player)
            .map(|health| !health.is_dead())
            .unwrap_or(false);
        if !alive {
            return;
        }
        resolve_contact(world, player, obstacle, config, rng, bus, score);
    }
}

fn resolve_contact(
    world: &mut World,
    player: Entity,
    obstacle: Obstacle,
    config: &CombatConfig,
    rng: &mut ChaCha8Rng,
    bus: &mut EventBus,
    score: &mut ScoreState,
) {
    let (player_pos, player_vel, player_radius) = {
        let Ok(mut query) = world.query_one::<(&Position, &Velocity, &Collider)>(player) else {
            return;
        };
        let Some((pos, vel, collider)) = query.get() else {
            return;
        };
        (pos.to_dvec3(), vel.to_dvec3(), collider.radius)
    };

    let offset = player_pos - obstacle.center;
    let distance = offset.length();
    let contact = player_radius + obstacle.radius;
    if distance >= contact {
        return;
    }
    let normal = if distance > 1e-9 {
        offset / distance
    } else {
        DVec3::Y
    };

    let closing_speed = -(player_vel - obstacle.velocity).dot(normal);
    let mut new_vel = player_vel;
    if closing_speed > 0.0 {
        new_vel += normal * closing_speed * (1.0 + COLLISION_RESTITUTION);
    }
    if let Ok(mut pos) = world.get::<&mut Position>(player) {
        *pos = Position::from_dvec3(obstacle.center + normal * contact);
    }
    if let Ok(mut vel) = world.get::<&mut Velocity>(player) {
        *vel = Velocity::from_dvec3(new_vel);
    }

    let other_id = entity_id(obstacle.entity);
    let cooling_down = world
        .get::<&ContactCooldowns>(player)
        .map(|cooldowns| cooldowns.entries.iter().any(|(id, _)| *id == other_id))
        .unwrap_or(false);
    if cooling_down {
        return;
    }
    if let Ok(mut cooldowns) = world.get::<&mut ContactCooldowns>(player) {
        cooldowns.entries.push((other_id, COLLISION_COOLDOWN_SECS));
    }

    let damage = impact_damage(config, closing_speed.max(0.0));
    let (applied, remaining) = match world.get::<&mut Health>(player) {
        Ok(mut health) => (health.damage(damage), health.current),
        Err(_) => return,
    };
    log::debug!("collision with {:?}: {:.1} damage", obstacle.entity, applied);
    bus.publish(GameEvent::PlayerDamaged {
        amount: applied,
        remaining,
    });

    if obstacle.is_enemy {
        let killed = match world.get::<&mut Health>(obstacle.entity) {
            Ok(mut health) => {
                health.damage(damage);
                health.is_dead()
            }
            Err(_) => false,
        };
        if killed {
            combat::on_enemy_destroyed(world, obstacle.entity, true, rng, bus, score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use starwake_core::config::GameConfig;
    use starwake_core::enums::ResourceType;

    use crate::world_setup::{spawn_asteroid, spawn_player};

    #[test]
    fn test_impact_damage_has_floor() {
        let config = CombatConfig::default();
        assert_eq!(impact_damage(&config, 0.0), config.collision_min_damage);
        let fast = impact_damage(&config, 200.0);
        assert!((fast - 200.0 * config.collision_damage_per_speed).abs() < 1e-9);
    }

    #[test]
    fn test_player_pushed_out_and_damaged_once() {
        let config = GameConfig::default();
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut bus = EventBus::new();
        let mut score = ScoreState::default();

        let player = spawn_player(&mut world, &config);
        spawn_asteroid(
            &mut world,
            Position::new(0.0, 0.0, -50.0),
            ResourceType::Iron,
            45.0,
            5,
        );
        *world.get::<&mut Velocity>(player).unwrap() = Velocity::new(0.0, 0.0, -100.0);

        run(&mut world, Some(player), &config.combat, &mut rng, &mut bus, &mut score, 1.0 / 60.0);

        let pos = *world.get::<&Position>(player).unwrap();
        assert!(
            pos.z >= 3.0 - 1e-9,
            "Player should be pushed clear of the asteroid, z = {}",
            pos.z
        );
        let vel = *world.get::<&Velocity>(player).unwrap();
        assert!(vel.z > 0.0, "Velocity should bounce away, got {}", vel.z);
        let health = *world.get::<&Health>(player).unwrap();
        assert!((health.current - (100.0 - 10.0)).abs() < 1e-9);

        // Still overlapping next frame: no second damage inside the cooldown
        *world.get::<&mut Position>(player).unwrap() = Position::new(0.0, 0.0, 0.0);
        run(&mut world, Some(player), &config.combat, &mut rng, &mut bus, &mut score, 1.0 / 60.0);
        let health_after = *world.get::<&Health>(player).unwrap();
        assert_eq!(health_after.current, health.current);
    }
}
