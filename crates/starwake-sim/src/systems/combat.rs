//! Combat system: weapon cooldowns, hitscan lasers and kills.
//!
//! Every shot is a single raycast from the shooter's nose along its forward
//! vector. The nearest sphere collider within weapon range takes the hit;
//! on an exact distance tie the entity seen first in query order wins.
//! Player shots can strike enemies, asteroids and the station (the latter
//! two absorb the shot without damage). NPC shots can only strike the
//! player, and never while the player is docked.

use glam::DVec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use starwake_ai::profiles::get_profile;
use starwake_core::components::*;
use starwake_core::enums::{AiState, EffectKind};
use starwake_core::events::GameEvent;
use starwake_core::types::{Orientation, Position};

use super::{effects, is_docked, loot};
use crate::bus::EventBus;
use crate::entity_id;
use crate::score::ScoreState;

/// A shot about to be resolved.
#[derive(Debug, Clone, Copy)]
struct Shot {
    shooter: Entity,
    origin: DVec3,
    direction: DVec3,
    orientation: Orientation,
    damage: f64,
    range: f64,
    by_player: bool,
}

/// A sphere that can stop a shot.
#[derive(Debug, Clone, Copy)]
struct RayTarget {
    entity: Entity,
    center: DVec3,
    radius: f64,
    /// Whether the hit deals damage (enemies, player) or is just absorbed.
    damageable: bool,
}

/// Result of a raycast: the entity struck and the distance along the ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f64,
}

/// Tick every weapon's cooldown down by `dt`.
pub fn tick_cooldowns(world: &mut World, dt: f64) {
    for (_entity, weapon) in world.query_mut::<&mut Weapon>() {
        if weapon.remaining_secs > 0.0 {
            weapon.remaining_secs = (weapon.remaining_secs - dt).max(0.0);
        }
    }
}

/// Distance along a normalized ray to the first intersection with a sphere,
/// or `None` if the ray misses. A ray starting inside the sphere hits at
/// the exit point.
pub fn ray_sphere(origin: DVec3, direction: DVec3, center: DVec3, radius: f64) -> Option<f64> {
    let oc = center - origin;
    let t_closest = oc.dot(direction);
    let d2 = oc.length_squared() - t_closest * t_closest;
    let r2 = radius * radius;
    if d2 > r2 {
        return None;
    }
    let half_chord = (r2 - d2).sqrt();
    let near = t_closest - half_chord;
    if near >= 0.0 {
        return Some(near);
    }
    let far = t_closest + half_chord;
    if far >= 0.0 {
        Some(far)
    } else {
        None
    }
}

/// Nearest target hit within `range`. Strict comparison keeps the first
/// candidate on exact ties.
fn nearest_hit(
    origin: DVec3,
    direction: DVec3,
    range: f64,
    candidates: &[RayTarget],
) -> Option<(RayTarget, f64)> {
    let mut best: Option<(RayTarget, f64)> = None;
    for candidate in candidates {
        let Some(distance) = ray_sphere(origin, direction, candidate.center, candidate.radius)
        else {
            continue;
        };
        if distance > range {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((*candidate, distance)),
        }
    }
    best
}

/// Cast a ray against everything a player shot can strike.
pub fn raycast_from_player(
    world: &World,
    origin: DVec3,
    direction: DVec3,
    range: f64,
) -> Option<RayHit> {
    let candidates = player_shot_candidates(world);
    nearest_hit(origin, direction, range, &candidates).map(|(target, distance)| RayHit {
        entity: target.entity,
        distance,
    })
}

fn player_shot_candidates(world: &World) -> Vec<RayTarget> {
    let mut candidates = Vec::new();
    for (entity, (_enemy, pos, collider, health)) in world
        .query::<(&Enemy, &Position, &Collider, &Health)>()
        .iter()
    {
        if health.is_dead() {
            continue;
        }
        candidates.push(RayTarget {
            entity,
            center: pos.to_dvec3(),
            radius: collider.radius,
            damageable: true,
        });
    }
    for (entity, (_asteroid, pos, collider)) in world
        .query::<(&Asteroid, &Position, &Collider)>()
        .iter()
    {
        candidates.push(RayTarget {
            entity,
            center: pos.to_dvec3(),
            radius: collider.radius,
            damageable: false,
        });
    }
    for (entity, (_station, pos, collider)) in world
        .query::<(&Station, &Position, &Collider)>()
        .iter()
    {
        candidates.push(RayTarget {
            entity,
            center: pos.to_dvec3(),
            radius: collider.radius,
            damageable: false,
        });
    }
    candidates
}

fn npc_shot_candidates(world: &World, player: Option<Entity>) -> Vec<RayTarget> {
    let Some(player) = player else {
        return Vec::new();
    };
    if is_docked(world, player) {
        return Vec::new();
    }
    let Ok(mut query) = world.query_one::<(&Position, &Collider, &Health)>(player) else {
        return Vec::new();
    };
    let candidates = match query.get() {
        Some((pos, collider, health)) if !health.is_dead() => vec![RayTarget {
            entity: player,
            center: pos.to_dvec3(),
            radius: collider.radius,
            damageable: true,
        }],
        _ => Vec::new(),
    };
    candidates
}

/// Run the combat system: cooldowns, then player and NPC fire.
/// `fire_requested` is the one-shot `Fire` command; a held trigger comes
/// through `ShipControls::fire`.
pub fn run(
    world: &mut World,
    player: Option<Entity>,
    fire_requested: bool,
    rng: &mut ChaCha8Rng,
    bus: &mut EventBus,
    score: &mut ScoreState,
    dt: f64,
) {
    tick_cooldowns(world, dt);

    let mut shots: Vec<Shot> = Vec::new();

    // Player trigger
    if let Some(player) = player {
        if !is_docked(world, player) {
            if let Ok(mut query) = world.query_one::<(
                &Position,
                &Orientation,
                &Collider,
                &Weapon,
                &Health,
                &ShipControls,
            )>(player)
            {
                if let Some((pos, orient, collider, weapon, health, controls)) = query.get() {
                    let wants = fire_requested || controls.fire;
                    if wants && weapon.ready() && !health.is_dead() {
                        shots.push(make_shot(player, pos, orient, collider, weapon, true));
                    }
                }
            }
        }
    }

    // NPC fire requests
    for (entity, (_enemy, pos, orient, collider, weapon, health, brain)) in world
        .query::<(
            &Enemy,
            &Position,
            &Orientation,
            &Collider,
            &Weapon,
            &Health,
            &AiBrain,
        )>()
        .iter()
    {
        if brain.wants_fire
            && brain.state != AiState::Dead
            && weapon.ready()
            && !health.is_dead()
        {
            shots.push(make_shot(entity, pos, orient, collider, weapon, false));
        }
    }

    for shot in shots {
        resolve_shot(world, player, shot, rng, bus, score);
    }
}

fn make_shot(
    shooter: Entity,
    pos: &Position,
    orient: &Orientation,
    collider: &Collider,
    weapon: &Weapon,
    by_player: bool,
) -> Shot {
    let direction = orient.forward();
    Shot {
        shooter,
        // Start at the nose so the shooter never hits itself
        origin: pos.to_dvec3() + direction * collider.radius,
        direction,
        orientation: *orient,
        damage: weapon.damage,
        range: weapon.range,
        by_player,
    }
}

fn resolve_shot(
    world: &mut World,
    player: Option<Entity>,
    shot: Shot,
    rng: &mut ChaCha8Rng,
    bus: &mut EventBus,
    score: &mut ScoreState,
) {
    // A shooter killed earlier this frame does not get its shot off
    let still_armed = world
        .get::<&Health>(shot.shooter)
        .map(|health| !health.is_dead())
        .unwrap_or(false);
    if !still_armed {
        return;
    }

    if let Ok(mut weapon) = world.get::<&mut Weapon>(shot.shooter) {
        weapon.remaining_secs = weapon.cooldown_secs;
    }
    bus.publish(GameEvent::ShotFired {
        shooter: entity_id(shot.shooter),
    });
    effects::spawn(
        world,
        EffectKind::MuzzleFlash,
        Position::from_dvec3(shot.origin),
        shot.orientation,
    );

    let candidates = if shot.by_player {
        player_shot_candidates(world)
    } else {
        npc_shot_candidates(world, player)
    };
    let Some((target, distance)) =
        nearest_hit(shot.origin, shot.direction, shot.range, &candidates)
    else {
        return;
    };

    let impact = Position::from_dvec3(shot.origin + shot.direction * distance);
    effects::spawn(world, EffectKind::HitSpark, impact, shot.orientation);
    if !target.damageable {
        return;
    }

    let (applied, remaining, killed) = match world.get::<&mut Health>(target.entity) {
        Ok(mut health) => {
            let applied = health.damage(shot.damage);
            (applied, health.current, health.is_dead())
        }
        Err(_) => return,
    };

    bus.publish(GameEvent::Hit {
        shooter: entity_id(shot.shooter),
        target: entity_id(target.entity),
        damage: applied,
    });

    if Some(target.entity) == player {
        bus.publish(GameEvent::PlayerDamaged {
            amount: applied,
            remaining,
        });
        // Player death is resolved by the engine after collisions
        return;
    }

    if killed {
        on_enemy_destroyed(world, target.entity, shot.by_player, rng, bus, score);
    }
}

/// Bookkeeping for an enemy reduced to zero health. The corpse is removed
/// by the cleanup system at the end of the frame.
pub fn on_enemy_destroyed(
    world: &mut World,
    entity: Entity,
    by_player: bool,
    rng: &mut ChaCha8Rng,
    bus: &mut EventBus,
    score: &mut ScoreState,
) {
    let (position, archetype) = match (world.get::<&Position>(entity), world.get::<&Enemy>(entity))
    {
        (Ok(pos), Ok(enemy)) => (*pos, enemy.archetype),
        _ => return,
    };

    if let Ok(mut brain) = world.get::<&mut AiBrain>(entity) {
        brain.state = AiState::Dead;
        brain.wants_fire = false;
    }
    if let Ok(mut renderable) = world.get::<&mut Renderable>(entity) {
        renderable.visible = false;
    }

    log::debug!("{:?} {:?} destroyed", archetype, entity);
    bus.publish(GameEvent::Destroyed {
        entity: entity_id(entity),
        by_player,
    });
    effects::spawn(world, EffectKind::Explosion, position, Orientation::default());
    loot::drop_loot(world, rng, position, bus);
    if by_player {
        score.record_kill(get_profile(archetype).bounty);
    }
}
