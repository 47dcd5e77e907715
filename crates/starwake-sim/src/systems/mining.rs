//! Mining system.
//!
//! One active session at a time, owned by the engine. Progress accumulates
//! at the asteroid resource's rate; every full unit moves one unit from the
//! deposit into the hold. The session ends on its own when the asteroid
//! drifts out of range, the hold fills up or the deposit runs dry.

use hecs::{Entity, World};

use starwake_core::components::{Asteroid, Cargo, ResourceDeposit};
use starwake_core::config::MiningConfig;
use starwake_core::enums::{EffectKind, ResourceType};
use starwake_core::error::CommandError;
use starwake_core::events::GameEvent;
use starwake_core::state::MiningView;
use starwake_core::types::{Orientation, Position};

use super::{effects, is_docked};
use crate::bus::EventBus;
use crate::entity_id;
use crate::score::ScoreState;

/// An active mining laser lock.
#[derive(Debug, Clone)]
pub struct MiningSession {
    pub asteroid: Entity,
    pub resource: ResourceType,
    /// Fraction of the next unit, in `[0, 1)`.
    pub progress: f64,
    /// Beam effect entity, refreshed every frame.
    pub beam: Option<Entity>,
}

impl MiningSession {
    pub fn view(&self) -> MiningView {
        MiningView {
            asteroid: entity_id(self.asteroid),
            resource: self.resource,
            progress: self.progress,
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Requested,
    OutOfRange,
    CargoFull,
    Depleted,
    Docked,
    PlayerLost,
}

/// Validate a `StartMining` request against the current target.
pub fn start(
    world: &World,
    player: Entity,
    target: Option<Entity>,
    config: &MiningConfig,
    bus: &mut EventBus,
) -> Result<MiningSession, CommandError> {
    if is_docked(world, player) {
        return Err(CommandError::AlreadyDocked);
    }
    let target = target.ok_or(CommandError::NoTarget)?;
    if world.get::<&Asteroid>(target).is_err() {
        return Err(CommandError::NotMineable);
    }
    let deposit = *world
        .get::<&ResourceDeposit>(target)
        .map_err(|_| CommandError::NotMineable)?;
    if deposit.remaining == 0 {
        return Err(CommandError::NotMineable);
    }

    let player_pos = *world
        .get::<&Position>(player)
        .map_err(|_| CommandError::PlayerMissing)?;
    let target_pos = *world
        .get::<&Position>(target)
        .map_err(|_| CommandError::UnknownEntity(entity_id(target)))?;
    let distance = player_pos.range_to(&target_pos);
    if distance > config.range {
        return Err(CommandError::TargetOutOfRange {
            distance,
            range: config.range,
        });
    }

    let hold_full = world
        .get::<&Cargo>(player)
        .map(|cargo| cargo.is_full())
        .unwrap_or(true);
    if hold_full {
        return Err(CommandError::CargoFull);
    }

    log::debug!("mining {:?} ({:?})", target, deposit.resource);
    bus.publish(GameEvent::MiningStarted {
        asteroid: entity_id(target),
        resource: deposit.resource,
    });
    Ok(MiningSession {
        asteroid: target,
        resource: deposit.resource,
        progress: 0.0,
        beam: None,
    })
}

/// End the session, if any, removing its beam.
pub fn stop(
    world: &mut World,
    session: &mut Option<MiningSession>,
    reason: StopReason,
    bus: &mut EventBus,
) {
    let Some(ended) = session.take() else { return };
    if let Some(beam) = ended.beam {
        let _ = world.despawn(beam);
    }
    log::debug!("mining stopped: {:?}", reason);
    bus.publish(GameEvent::MiningStopped {
        asteroid: entity_id(ended.asteroid),
    });
}

/// Advance the active session by `dt`.
pub fn run(
    world: &mut World,
    session: &mut Option<MiningSession>,
    player: Option<Entity>,
    config: &MiningConfig,
    bus: &mut EventBus,
    score: &mut ScoreState,
    dt: f64,
) {
    let Some(active) = session.as_mut() else { return };

    let Some(player) = player else {
        stop(world, session, StopReason::PlayerLost, bus);
        return;
    };
    if is_docked(world, player) {
        stop(world, session, StopReason::Docked, bus);
        return;
    }

    let Ok(player_pos) = world.get::<&Position>(player).map(|pos| *pos) else {
        stop(world, session, StopReason::PlayerLost, bus);
        return;
    };
    let Ok(asteroid_pos) = world.get::<&Position>(active.asteroid).map(|pos| *pos) else {
        stop(world, session, StopReason::Depleted, bus);
        return;
    };
    if player_pos.range_to(&asteroid_pos) > config.range {
        stop(world, session, StopReason::OutOfRange, bus);
        return;
    }
    let hold_full = world
        .get::<&Cargo>(player)
        .map(|cargo| cargo.is_full())
        .unwrap_or(true);
    if hold_full {
        stop(world, session, StopReason::CargoFull, bus);
        return;
    }

    let beam_dir = (asteroid_pos.to_dvec3() - player_pos.to_dvec3()).normalize_or_zero();
    let orientation = if beam_dir == glam::DVec3::ZERO {
        Orientation::default()
    } else {
        Orientation::looking_along(beam_dir)
    };
    active.beam = Some(effects::refresh(
        world,
        active.beam,
        EffectKind::MiningBeam,
        player_pos,
        orientation,
    ));

    active.progress += config.rate(active.resource) * dt;
    if active.progress < 1.0 {
        return;
    }
    active.progress = 0.0;

    let asteroid = active.asteroid;
    let resource = active.resource;
    let remaining = match world.get::<&mut ResourceDeposit>(asteroid) {
        Ok(mut deposit) => {
            deposit.remaining = deposit.remaining.saturating_sub(1);
            deposit.remaining
        }
        Err(_) => 0,
    };
    let (added, cargo_total, now_full) = match world.get::<&mut Cargo>(player) {
        Ok(mut cargo) => {
            let added = cargo.add(resource, 1);
            (added, cargo.total(), cargo.is_full())
        }
        Err(_) => (0, 0, true),
    };
    if added > 0 {
        score.resources_mined += added;
        bus.publish(GameEvent::ResourceMined {
            resource,
            cargo_total,
        });
    }

    if remaining == 0 {
        stop(world, session, StopReason::Depleted, bus);
        let _ = world.despawn(asteroid);
        log::debug!("asteroid {:?} depleted", asteroid);
        bus.publish(GameEvent::AsteroidDepleted {
            asteroid: entity_id(asteroid),
        });
    } else if now_full {
        stop(world, session, StopReason::CargoFull, bus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starwake_core::config::GameConfig;

    use crate::world_setup::{spawn_asteroid, spawn_player};

    fn setup(deposit: u32) -> (World, Entity, Entity) {
        let mut world = World::new();
        let player = spawn_player(&mut world, &GameConfig::default());
        let asteroid = spawn_asteroid(
            &mut world,
            Position::new(0.0, 0.0, -200.0),
            ResourceType::Iron,
            30.0,
            deposit,
        );
        (world, player, asteroid)
    }

    #[test]
    fn test_start_requires_target() {
        let (world, player, _) = setup(5);
        let mut bus = EventBus::new();
        let err = start(&world, player, None, &MiningConfig::default(), &mut bus).unwrap_err();
        assert_eq!(err, CommandError::NoTarget);
    }

    #[test]
    fn test_start_rejects_out_of_range() {
        let (world, player, asteroid) = setup(5);
        *world.get::<&mut Position>(asteroid).unwrap() = Position::new(0.0, 0.0, -5000.0);
        let mut bus = EventBus::new();
        let err = start(
            &world,
            player,
            Some(asteroid),
            &MiningConfig::default(),
            &mut bus,
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::TargetOutOfRange { .. }));
    }

    #[test]
    fn test_start_rejects_non_asteroid() {
        let (world, player, _) = setup(5);
        let mut bus = EventBus::new();
        let err = start(
            &world,
            player,
            Some(player),
            &MiningConfig::default(),
            &mut bus,
        )
        .unwrap_err();
        assert_eq!(err, CommandError::NotMineable);
    }

    #[test]
    fn test_mining_grants_units_and_depletes() {
        let (mut world, player, asteroid) = setup(2);
        let config = MiningConfig::default();
        let mut bus = EventBus::new();
        let mut score = ScoreState::default();
        let mut session =
            Some(start(&world, player, Some(asteroid), &config, &mut bus).unwrap());

        // Iron at 0.8/s needs 1.25 s per unit; 2 units fit in 3 s.
        for _ in 0..180 {
            run(
                &mut world,
                &mut session,
                Some(player),
                &config,
                &mut bus,
                &mut score,
                1.0 / 60.0,
            );
        }

        assert!(session.is_none(), "Session should end when the deposit runs dry");
        assert!(!world.contains(asteroid), "Depleted asteroid should despawn");
        let cargo = world.get::<&Cargo>(player).unwrap();
        assert_eq!(cargo.count(ResourceType::Iron), 2);
        assert_eq!(score.resources_mined, 2);

        let events: Vec<_> = bus.queued().cloned().collect();
        assert!(events.contains(&GameEvent::AsteroidDepleted {
            asteroid: entity_id(asteroid)
        }));
    }

    #[test]
    fn test_mining_stops_when_out_of_range() {
        let (mut world, player, asteroid) = setup(10);
        let config = MiningConfig::default();
        let mut bus = EventBus::new();
        let mut score = ScoreState::default();
        let mut session =
            Some(start(&world, player, Some(asteroid), &config, &mut bus).unwrap());

        *world.get::<&mut Position>(player).unwrap() = Position::new(0.0, 0.0, 1000.0);
        run(
            &mut world,
            &mut session,
            Some(player),
            &config,
            &mut bus,
            &mut score,
            1.0 / 60.0,
        );
        assert!(session.is_none());
        assert!(world.contains(asteroid));
    }

    #[test]
    fn test_mining_stops_when_asteroid_vanishes() {
        let (mut world, player, asteroid) = setup(10);
        let config = MiningConfig::default();
        let mut bus = EventBus::new();
        let mut score = ScoreState::default();
        let mut session =
            Some(start(&world, player, Some(asteroid), &config, &mut bus).unwrap());

        run(
            &mut world,
            &mut session,
            Some(player),
            &config,
            &mut bus,
            &mut score,
            1.0 / 60.0,
        );
        let beam = session.as_ref().and_then(|s| s.beam).unwrap();
        assert!(world.contains(beam));

        world.despawn(asteroid).unwrap();
        run(
            &mut world,
            &mut session,
            Some(player),
            &config,
            &mut bus,
            &mut score,
            1.0 / 60.0,
        );

        assert!(session.is_none(), "Session should end without its asteroid");
        assert!(!world.contains(beam), "Beam should be removed with the session");
        let events: Vec<_> = bus.queued().cloned().collect();
        assert!(events.contains(&GameEvent::MiningStopped {
            asteroid: entity_id(asteroid)
        }));
    }
}
