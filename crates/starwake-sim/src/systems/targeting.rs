//! Target selection and validation.

use hecs::{Entity, World};

use starwake_core::components::*;
use starwake_core::enums::{CycleDirection, TargetKind};
use starwake_core::error::CommandError;
use starwake_core::events::GameEvent;
use starwake_core::state::TargetView;
use starwake_core::types::Position;

use crate::bus::EventBus;
use crate::{entity_from_id, entity_id};

/// What kind of target `entity` is, if it can be targeted at all.
/// Destroyed enemies awaiting cleanup are not targetable.
pub fn kind_of(world: &World, entity: Entity) -> Option<TargetKind> {
    if world.get::<&Enemy>(entity).is_ok() {
        let alive = world
            .get::<&Health>(entity)
            .map(|health| !health.is_dead())
            .unwrap_or(false);
        return alive.then_some(TargetKind::Enemy);
    }
    if world.get::<&Asteroid>(entity).is_ok() {
        return Some(TargetKind::Asteroid);
    }
    if world.get::<&Station>(entity).is_ok() {
        return Some(TargetKind::Station);
    }
    None
}

/// Targetable entities within `range` of `origin`, nearest first.
/// Equal distances are ordered by id so cycling is stable.
pub fn candidates(world: &World, origin: &Position, range: f64) -> Vec<(Entity, f64)> {
    let mut found: Vec<(Entity, f64)> = world
        .query::<&Position>()
        .iter()
        .filter(|(entity, _)| kind_of(world, *entity).is_some())
        .map(|(entity, pos)| (entity, pos.range_to(origin)))
        .filter(|(_, distance)| *distance <= range)
        .collect();
    found.sort_by(|a, b| {
        a.1.total_cmp(&b.1)
            .then_with(|| entity_id(a.0).cmp(&entity_id(b.0)))
    });
    found
}

fn player_position(world: &World, player: Entity) -> Result<Position, CommandError> {
    world
        .get::<&Position>(player)
        .map(|pos| *pos)
        .map_err(|_| CommandError::PlayerMissing)
}

fn acquire(world: &World, target: Entity, bus: &mut EventBus) -> Result<Entity, CommandError> {
    let kind = kind_of(world, target).ok_or(CommandError::UnknownEntity(entity_id(target)))?;
    log::debug!("target {:?} ({:?})", target, kind);
    bus.publish(GameEvent::TargetAcquired {
        target: entity_id(target),
        kind,
    });
    Ok(target)
}

/// Step to the next or previous candidate, wrapping at either end.
/// With nothing selected, `Next` picks the nearest and `Previous` the farthest.
pub fn cycle(
    world: &World,
    player: Entity,
    current: Option<Entity>,
    direction: CycleDirection,
    range: f64,
    bus: &mut EventBus,
) -> Result<Entity, CommandError> {
    let origin = player_position(world, player)?;
    let list = candidates(world, &origin, range);
    if list.is_empty() {
        return Err(CommandError::NoTarget);
    }

    let len = list.len();
    let index = match current.and_then(|cur| list.iter().position(|(e, _)| *e == cur)) {
        Some(i) => match direction {
            CycleDirection::Next => (i + 1) % len,
            CycleDirection::Previous => (i + len - 1) % len,
        },
        None => match direction {
            CycleDirection::Next => 0,
            CycleDirection::Previous => len - 1,
        },
    };
    acquire(world, list[index].0, bus)
}

/// Select a specific entity by its public id.
pub fn select(
    world: &World,
    player: Entity,
    id: EntityId,
    range: f64,
    bus: &mut EventBus,
) -> Result<Entity, CommandError> {
    let target = entity_from_id(id)
        .filter(|entity| world.contains(*entity))
        .ok_or(CommandError::UnknownEntity(id))?;
    if kind_of(world, target).is_none() {
        return Err(CommandError::UnknownEntity(id));
    }
    let origin = player_position(world, player)?;
    let distance = world
        .get::<&Position>(target)
        .map(|pos| pos.range_to(&origin))
        .map_err(|_| CommandError::UnknownEntity(id))?;
    if distance > range {
        return Err(CommandError::TargetOutOfRange { distance, range });
    }
    acquire(world, target, bus)
}

/// Drop the current target, if any.
pub fn clear(target: &mut Option<Entity>, bus: &mut EventBus) {
    if let Some(lost) = target.take() {
        bus.publish(GameEvent::TargetLost {
            target: entity_id(lost),
        });
    }
}

/// Per-frame check that the target still exists and is in range.
pub fn validate(
    world: &World,
    player: Option<Entity>,
    target: &mut Option<Entity>,
    range: f64,
    bus: &mut EventBus,
) {
    let Some(current) = *target else { return };

    let origin = player.and_then(|p| world.get::<&Position>(p).ok().map(|pos| *pos));
    let in_range = match (origin, world.get::<&Position>(current)) {
        (Some(origin), Ok(pos)) => pos.range_to(&origin) <= range,
        _ => false,
    };
    if !in_range || kind_of(world, current).is_none() {
        log::debug!("target {:?} lost", current);
        clear(target, bus);
    }
}

/// HUD view of the current target.
pub fn view(world: &World, player: Option<Entity>, target: Option<Entity>) -> Option<TargetView> {
    let target = target?;
    let kind = kind_of(world, target)?;
    let position = *world.get::<&Position>(target).ok()?;
    let distance = player
        .and_then(|p| world.get::<&Position>(p).ok().map(|pos| pos.range_to(&position)))
        .unwrap_or(0.0);
    let health = world.get::<&Health>(target).ok().map(|h| *h);
    let deposit = world
        .get::<&ResourceDeposit>(target)
        .ok()
        .map(|d| (d.resource, d.remaining));

    Some(TargetView {
        id: entity_id(target),
        kind,
        position,
        distance,
        health: health.map(|h| h.current),
        max_health: health.map(|h| h.max),
        deposit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use starwake_core::config::GameConfig;
    use starwake_core::enums::{EnemyArchetype, ResourceType};

    use crate::world_setup::{spawn_asteroid, spawn_enemy, spawn_player};

    fn world_with_targets() -> (World, Entity, Entity, Entity, Entity) {
        let mut world = World::new();
        let player = spawn_player(&mut world, &GameConfig::default());
        let near = spawn_asteroid(
            &mut world,
            Position::new(0.0, 0.0, -100.0),
            ResourceType::Iron,
            20.0,
            5,
        );
        let mid = spawn_enemy(
            &mut world,
            EnemyArchetype::Scout,
            Position::new(300.0, 0.0, 0.0),
            DVec3::NEG_Z,
        );
        let far = spawn_asteroid(
            &mut world,
            Position::new(0.0, 900.0, 0.0),
            ResourceType::Gold,
            20.0,
            5,
        );
        // Beyond targeting range
        spawn_asteroid(
            &mut world,
            Position::new(0.0, 0.0, 9000.0),
            ResourceType::Nickel,
            20.0,
            5,
        );
        (world, player, near, mid, far)
    }

    #[test]
    fn test_candidates_sorted_by_distance() {
        let (world, _player, near, mid, far) = world_with_targets();
        let list = candidates(&world, &Position::default(), 5000.0);
        let order: Vec<Entity> = list.iter().map(|(e, _)| *e).collect();
        assert_eq!(order, vec![near, mid, far]);
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let (world, player, near, mid, far) = world_with_targets();
        let mut bus = EventBus::new();
        let range = 5000.0;

        let first = cycle(&world, player, None, CycleDirection::Next, range, &mut bus).unwrap();
        assert_eq!(first, near);
        let second =
            cycle(&world, player, Some(first), CycleDirection::Next, range, &mut bus).unwrap();
        assert_eq!(second, mid);
        let wrapped =
            cycle(&world, player, Some(far), CycleDirection::Next, range, &mut bus).unwrap();
        assert_eq!(wrapped, near);
        let back =
            cycle(&world, player, Some(near), CycleDirection::Previous, range, &mut bus).unwrap();
        assert_eq!(back, far);
        let last = cycle(&world, player, None, CycleDirection::Previous, range, &mut bus).unwrap();
        assert_eq!(last, far);
    }

    #[test]
    fn test_select_unknown_and_out_of_range() {
        let (world, player, _, _, _) = world_with_targets();
        let mut bus = EventBus::new();

        let unknown = select(&world, player, u64::MAX, 5000.0, &mut bus);
        assert!(matches!(unknown, Err(CommandError::UnknownEntity(_))));

        // The player itself is not a target
        let own = select(&world, player, entity_id(player), 5000.0, &mut bus);
        assert!(matches!(own, Err(CommandError::UnknownEntity(_))));
    }

    #[test]
    fn test_validate_drops_despawned_target() {
        let (mut world, player, near, _, _) = world_with_targets();
        let mut bus = EventBus::new();
        let mut target = Some(near);

        validate(&world, Some(player), &mut target, 5000.0, &mut bus);
        assert_eq!(target, Some(near));

        world.despawn(near).unwrap();
        validate(&world, Some(player), &mut target, 5000.0, &mut bus);
        assert_eq!(target, None);
        let events: Vec<_> = bus.queued().cloned().collect();
        assert!(events.contains(&GameEvent::TargetLost {
            target: entity_id(near)
        }));
    }

    #[test]
    fn test_validate_drops_out_of_range_target() {
        let (world, player, _, mid, _) = world_with_targets();
        let mut bus = EventBus::new();
        let mut target = Some(mid);
        *world.get::<&mut Position>(mid).unwrap() = Position::new(6000.0, 0.0, 0.0);
        validate(&world, Some(player), &mut target, 5000.0, &mut bus);
        assert!(target.is_none());
    }
}
