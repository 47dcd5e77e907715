//! Cleanup system: removes destroyed ships and anything that drifted out of
//! the sector. The player is never removed here; its death is a phase change.

use hecs::{Entity, World};

use starwake_core::components::{Health, Player, Station};
use starwake_core::constants::WORLD_RADIUS;
use starwake_core::types::Position;

/// Despawn dead non-player entities and everything beyond `WORLD_RADIUS`.
/// Fills the engine's reusable despawn buffer.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    let radius_sq = WORLD_RADIUS * WORLD_RADIUS;

    for (entity, (health, player)) in world.query_mut::<(&Health, Option<&Player>)>() {
        if player.is_none() && health.is_dead() {
            despawn_buffer.push(entity);
        }
    }

    for (entity, (pos, player, station)) in
        world.query_mut::<(&Position, Option<&Player>, Option<&Station>)>()
    {
        if player.is_some() || station.is_some() {
            continue;
        }
        let range_sq = pos.to_dvec3().length_squared();
        if range_sq > radius_sq {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use starwake_core::config::GameConfig;
    use starwake_core::enums::EnemyArchetype;

    use crate::world_setup::{spawn_enemy, spawn_player};

    #[test]
    fn test_dead_enemy_removed_dead_player_kept() {
        let mut world = World::new();
        let mut buffer = Vec::new();
        let player = spawn_player(&mut world, &GameConfig::default());
        let enemy = spawn_enemy(
            &mut world,
            EnemyArchetype::Raider,
            Position::new(0.0, 0.0, -500.0),
            DVec3::Z,
        );
        world.get::<&mut Health>(enemy).unwrap().damage(1000.0);
        world.get::<&mut Health>(player).unwrap().damage(1000.0);

        run(&mut world, &mut buffer);
        assert!(!world.contains(enemy));
        assert!(world.contains(player));
    }

    #[test]
    fn test_out_of_bounds_removed() {
        let mut world = World::new();
        let mut buffer = Vec::new();
        let player = spawn_player(&mut world, &GameConfig::default());
        *world.get::<&mut Position>(player).unwrap() = Position::new(WORLD_RADIUS * 2.0, 0.0, 0.0);
        let stray = spawn_enemy(
            &mut world,
            EnemyArchetype::Scout,
            Position::new(0.0, WORLD_RADIUS + 1.0, 0.0),
            DVec3::Z,
        );

        run(&mut world, &mut buffer);
        assert!(!world.contains(stray));
        assert!(world.contains(player), "Player is never culled");
    }
}
