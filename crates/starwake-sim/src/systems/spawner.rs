//! Enemy spawner: keeps a trickle of NPC ships around the player.
//!
//! The spawner tracks the enemies it created. Enemies destroyed in combat
//! are despawned elsewhere, so the tracked set is swept periodically and
//! ids whose entity no longer exists are dropped (orphan cleanup).

use std::collections::HashSet;

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starwake_ai::profiles::spawn_table;
use starwake_core::config::SpawnerConfig;
use starwake_core::enums::EnemyArchetype;
use starwake_core::events::GameEvent;
use starwake_core::types::Position;

use crate::bus::EventBus;
use crate::entity_id;
use crate::world_setup::{random_point_in_shell, spawn_enemy};

#[derive(Debug, Clone, Default)]
pub struct SpawnerState {
    /// Enemies this spawner created that were alive at the last sweep.
    pub tracked: HashSet<Entity>,
    /// Seconds until the next spawn attempt.
    pub spawn_timer: f64,
    /// Seconds until the next orphan sweep.
    pub cleanup_timer: f64,
}

impl SpawnerState {
    pub fn new(config: &SpawnerConfig) -> Self {
        Self {
            tracked: HashSet::new(),
            spawn_timer: config.first_delay_secs,
            cleanup_timer: config.cleanup_interval_secs,
        }
    }

    /// Drop tracked ids whose entity no longer exists. Returns how many.
    pub fn remove_orphans(&mut self, world: &World) -> usize {
        let before = self.tracked.len();
        self.tracked.retain(|entity| world.contains(*entity));
        before - self.tracked.len()
    }
}

/// Weighted random archetype from the spawn table.
pub fn roll_archetype(rng: &mut ChaCha8Rng) -> EnemyArchetype {
    let table = spawn_table();
    let total: u32 = table.iter().map(|(_, weight)| weight).sum();
    let mut roll = rng.gen_range(0..total.max(1));
    for (archetype, weight) in table {
        if roll < weight {
            return archetype;
        }
        roll -= weight;
    }
    table[0].0
}

pub fn run(
    world: &mut World,
    state: &mut SpawnerState,
    player_position: Option<Position>,
    config: &SpawnerConfig,
    rng: &mut ChaCha8Rng,
    bus: &mut EventBus,
    dt: f64,
) {
    if !config.enabled {
        return;
    }

    state.cleanup_timer -= dt;
    if state.cleanup_timer <= 0.0 {
        state.cleanup_timer += config.cleanup_interval_secs;
        let removed = state.remove_orphans(world);
        if removed > 0 {
            log::debug!(
                "spawner dropped {} orphaned ids, {} tracked",
                removed,
                state.tracked.len()
            );
        }
    }

    state.spawn_timer -= dt;
    if state.spawn_timer > 0.0 {
        return;
    }
    state.spawn_timer += config.interval_secs;

    let Some(center) = player_position else { return };
    if state.tracked.len() >= config.max_enemies {
        return;
    }

    let archetype = roll_archetype(rng);
    let offset = random_point_in_shell(rng, config.min_distance, config.max_distance);
    let position = center.offset(offset.to_dvec3());
    let facing = (center.to_dvec3() - position.to_dvec3()).normalize_or(DVec3::NEG_Z);
    let entity = spawn_enemy(world, archetype, position, facing);
    state.tracked.insert(entity);

    log::debug!("spawned {:?} {:?} at {:?}", archetype, entity, position);
    bus.publish(GameEvent::EnemySpawned {
        entity: entity_id(entity),
        archetype,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use starwake_core::constants::DT;

    fn fast_config() -> SpawnerConfig {
        SpawnerConfig {
            first_delay_secs: 0.0,
            interval_secs: 1.0,
            max_enemies: 3,
            ..SpawnerConfig::default()
        }
    }

    #[test]
    fn test_spawns_up_to_max() {
        let config = fast_config();
        let mut world = World::new();
        let mut state = SpawnerState::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut bus = EventBus::new();

        for _ in 0..(60 * 10) {
            run(
                &mut world,
                &mut state,
                Some(Position::default()),
                &config,
                &mut rng,
                &mut bus,
                DT,
            );
        }
        assert_eq!(state.tracked.len(), 3);
        for entity in &state.tracked {
            let pos = *world.get::<&Position>(*entity).unwrap();
            let distance = pos.range_to(&Position::default());
            assert!(
                distance >= config.min_distance - 1e-6 && distance <= config.max_distance + 1e-6,
                "Spawn distance {} outside shell",
                distance
            );
        }
    }

    #[test]
    fn test_orphans_are_removed_and_replaced() {
        let config = fast_config();
        let mut world = World::new();
        let mut state = SpawnerState::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut bus = EventBus::new();

        for _ in 0..(60 * 4) {
            run(&mut world, &mut state, Some(Position::default()), &config, &mut rng, &mut bus, DT);
        }
        assert_eq!(state.tracked.len(), 3);

        let victim = *state.tracked.iter().next().unwrap();
        world.despawn(victim).unwrap();
        assert_eq!(state.remove_orphans(&world), 1);
        assert!(!state.tracked.contains(&victim));

        for _ in 0..(60 * 2) {
            run(&mut world, &mut state, Some(Position::default()), &config, &mut rng, &mut bus, DT);
        }
        assert_eq!(state.tracked.len(), 3, "Freed slot should be refilled");
    }

    #[test]
    fn test_disabled_spawner_does_nothing() {
        let config = SpawnerConfig {
            enabled: false,
            ..fast_config()
        };
        let mut world = World::new();
        let mut state = SpawnerState::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut bus = EventBus::new();
        for _ in 0..600 {
            run(&mut world, &mut state, Some(Position::default()), &config, &mut rng, &mut bus, DT);
        }
        assert!(state.tracked.is_empty());
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn test_archetype_roll_covers_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.insert(roll_archetype(&mut rng));
        }
        assert_eq!(seen.len(), 3);
    }
}
