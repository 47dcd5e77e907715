//! Visual effects and lifetime expiry.
//!
//! Effects are short-lived render-only entities. Everything carrying a
//! `Lifetime` (effects and loot crates) is ticked down here and despawned
//! when it runs out.

use hecs::{Entity, World};

use starwake_core::components::{Effect, Lifetime, Renderable};
use starwake_core::constants::*;
use starwake_core::enums::{EffectKind, MeshKind};
use starwake_core::types::{Orientation, Position};

/// How long an effect of `kind` stays on screen.
pub fn duration(kind: EffectKind) -> f64 {
    match kind {
        EffectKind::MuzzleFlash => MUZZLE_FLASH_SECS,
        EffectKind::HitSpark => HIT_SPARK_SECS,
        EffectKind::Explosion => EXPLOSION_SECS,
        EffectKind::MiningBeam => MINING_BEAM_SECS,
        EffectKind::WarpFlash => WARP_FLASH_SECS,
    }
}

fn scale(kind: EffectKind) -> f64 {
    match kind {
        EffectKind::MuzzleFlash => 2.0,
        EffectKind::HitSpark => 3.0,
        EffectKind::Explosion => 25.0,
        EffectKind::MiningBeam => 1.0,
        EffectKind::WarpFlash => 40.0,
    }
}

/// Spawn a visual effect at `position`.
pub fn spawn(
    world: &mut World,
    kind: EffectKind,
    position: Position,
    orientation: Orientation,
) -> Entity {
    world.spawn((
        Effect { kind },
        position,
        orientation,
        Lifetime {
            remaining_secs: duration(kind),
        },
        Renderable::new(MeshKind::Effect(kind), scale(kind)),
    ))
}

/// Keep a persistent effect alive, spawning a fresh one if it has expired.
/// Returns the live effect entity.
pub fn refresh(
    world: &mut World,
    existing: Option<Entity>,
    kind: EffectKind,
    position: Position,
    orientation: Orientation,
) -> Entity {
    if let Some(entity) = existing {
        if world.get::<&Effect>(entity).is_ok() {
            if let Ok(mut lifetime) = world.get::<&mut Lifetime>(entity) {
                lifetime.remaining_secs = duration(kind);
            }
            if let Ok(mut pos) = world.get::<&mut Position>(entity) {
                *pos = position;
            }
            if let Ok(mut orient) = world.get::<&mut Orientation>(entity) {
                *orient = orientation;
            }
            return entity;
        }
    }
    spawn(world, kind, position, orientation)
}

/// Tick every lifetime down and despawn what has expired.
pub fn run(world: &mut World, dt: f64, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, lifetime) in world.query_mut::<&mut Lifetime>() {
        lifetime.remaining_secs -= dt;
        if lifetime.remaining_secs <= 0.0 {
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
    use starwake_core::constants::DT;

    #[test]
    fn test_effect_expires_after_duration() {
        let mut world = World::new();
        let mut buffer = Vec::new();
        let flash = spawn(
            &mut world,
            EffectKind::Explosion,
            Position::default(),
            Orientation::default(),
        );

        // Just under 1.2 s
        for _ in 0..70 {
            run(&mut world, DT, &mut buffer);
        }
        assert!(world.contains(flash), "Explosion should still be visible");

        for _ in 0..5 {
            run(&mut world, DT, &mut buffer);
        }
        assert!(!world.contains(flash), "Explosion should expire");
    }

    #[test]
    fn test_refresh_reuses_live_effect() {
        let mut world = World::new();
        let mut buffer = Vec::new();
        let beam = refresh(
            &mut world,
            None,
            EffectKind::MiningBeam,
            Position::default(),
            Orientation::default(),
        );

        for _ in 0..30 {
            run(&mut world, DT, &mut buffer);
            let again = refresh(
                &mut world,
                Some(beam),
                EffectKind::MiningBeam,
                Position::new(1.0, 0.0, 0.0),
                Orientation::default(),
            );
            assert_eq!(again, beam, "Refreshed beam should stay the same entity");
        }

        let pos = *world.get::<&Position>(beam).unwrap();
        assert_eq!(pos.x, 1.0);
    }

    #[test]
    fn test_refresh_respawns_expired_effect() {
        let mut world = World::new();
        let mut buffer = Vec::new();
        let beam = spawn(
            &mut world,
            EffectKind::MiningBeam,
            Position::default(),
            Orientation::default(),
        );
        for _ in 0..20 {
            run(&mut world, DT, &mut buffer);
        }
        assert!(!world.contains(beam));

        let fresh = refresh(
            &mut world,
            Some(beam),
            EffectKind::MiningBeam,
            Position::default(),
            Orientation::default(),
        );
        assert_ne!(fresh, beam);
        assert!(world.contains(fresh));
    }
}
