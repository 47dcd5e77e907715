//! NPC behaviour finite state machine.
//!
//! Pure functions that compute state transitions and steering for NPC ships
//! based on their archetype, current state and the player's whereabouts.
//! No ECS dependency; operates on plain data.
//!
//! ```text
//! Idle ──aggro──▶ Pursue ──in range──▶ Attack ──hurt──▶ Retreat
//!  ▲                │  ▲                  │                │
//!  └────leash───────┘  └──out of range────┘                │
//!  ▲                                                       │
//!  └──────────────────────beyond leash─────────────────────┘
//! ```

use glam::DVec3;

use starwake_core::enums::{AiState, EnemyArchetype};
use starwake_core::types::{Position, Velocity};

use crate::profiles::{get_profile, EnemyProfile};

/// Fraction of velocity kept per second while idling.
const IDLE_DAMPING: f64 = 0.5;

/// Inside this fraction of the attack range the ship backs away.
const ATTACK_MIN_RANGE_FRACTION: f64 = 0.4;

/// Input to the FSM for a single NPC.
#[derive(Debug, Clone, Copy)]
pub struct BrainContext {
    pub archetype: EnemyArchetype,
    pub state: AiState,
    pub position: Position,
    pub velocity: Velocity,
    /// `None` when the player cannot be engaged (docked, dead or absent).
    pub player_position: Option<Position>,
    pub health_fraction: f64,
    pub weapon_ready: bool,
    pub elapsed_in_state_secs: f64,
    pub dt: f64,
}

/// Output from the FSM.
#[derive(Debug, Clone, Copy)]
pub struct BrainUpdate {
    pub new_state: AiState,
    pub new_velocity: Velocity,
    /// Direction the ship's nose should point, if it should turn.
    pub facing: Option<DVec3>,
    pub wants_fire: bool,
    pub state_changed: bool,
}

/// Evaluate the FSM for one NPC.
pub fn evaluate(ctx: &BrainContext) -> BrainUpdate {
    if ctx.state == AiState::Dead {
        return stay_dead();
    }

    let profile = get_profile(ctx.archetype);

    if ctx.health_fraction <= 0.0 {
        return transition(ctx, AiState::Dead, Velocity::default(), None, false);
    }

    // Nothing to fight: every live ship settles down.
    let Some(player) = ctx.player_position else {
        return idle(ctx, AiState::Idle);
    };

    let range = ctx.position.range_to(&player);

    match ctx.state {
        AiState::Idle => evaluate_idle(ctx, &profile, player, range),
        AiState::Pursue => evaluate_pursue(ctx, &profile, player, range),
        AiState::Attack => evaluate_attack(ctx, &profile, player, range),
        AiState::Retreat => evaluate_retreat(ctx, &profile, player, range),
        AiState::Dead => stay_dead(),
    }
}

fn stay_dead() -> BrainUpdate {
    BrainUpdate {
        new_state: AiState::Dead,
        new_velocity: Velocity::default(),
        facing: None,
        wants_fire: false,
        state_changed: false,
    }
}

fn evaluate_idle(
    ctx: &BrainContext,
    profile: &EnemyProfile,
    player: Position,
    range: f64,
) -> BrainUpdate {
    if range <= profile.aggro_range {
        return pursue(ctx, profile, player, AiState::Pursue);
    }
    idle(ctx, AiState::Idle)
}

fn evaluate_pursue(
    ctx: &BrainContext,
    profile: &EnemyProfile,
    player: Position,
    range: f64,
) -> BrainUpdate {
    if range > profile.leash_range {
        return idle(ctx, AiState::Idle);
    }
    if range <= profile.attack_range {
        return attack(ctx, profile, player, range, AiState::Attack);
    }
    pursue(ctx, profile, player, AiState::Pursue)
}

fn evaluate_attack(
    ctx: &BrainContext,
    profile: &EnemyProfile,
    player: Position,
    range: f64,
) -> BrainUpdate {
    if ctx.health_fraction < profile.retreat_health {
        return retreat(ctx, profile, player, AiState::Retreat);
    }
    if range > profile.attack_range {
        return pursue(ctx, profile, player, AiState::Pursue);
    }
    attack(ctx, profile, player, range, AiState::Attack)
}

fn evaluate_retreat(
    ctx: &BrainContext,
    profile: &EnemyProfile,
    player: Position,
    range: f64,
) -> BrainUpdate {
    if range > profile.leash_range {
        return idle(ctx, AiState::Idle);
    }
    retreat(ctx, profile, player, AiState::Retreat)
}

/// Coast to a stop.
fn idle(ctx: &BrainContext, state: AiState) -> BrainUpdate {
    let keep = IDLE_DAMPING.powf(ctx.dt);
    let v = ctx.velocity.to_dvec3() * keep;
    transition(ctx, state, Velocity::from_dvec3(v), None, false)
}

/// Fly straight at the player.
fn pursue(
    ctx: &BrainContext,
    profile: &EnemyProfile,
    player: Position,
    state: AiState,
) -> BrainUpdate {
    let to_player = direction(ctx.position, player);
    let v = to_player * profile.cruise_speed;
    transition(ctx, state, Velocity::from_dvec3(v), Some(to_player), false)
}

/// Circle the player while keeping the nose on it; back off when too close.
fn attack(
    ctx: &BrainContext,
    profile: &EnemyProfile,
    player: Position,
    range: f64,
    state: AiState,
) -> BrainUpdate {
    let to_player = direction(ctx.position, player);

    let v = if range < profile.attack_range * ATTACK_MIN_RANGE_FRACTION {
        -to_player * profile.cruise_speed
    } else {
        // Orbit in the plane perpendicular to the line of sight.
        let mut side = to_player.cross(DVec3::Y);
        if side.length_squared() < 1e-9 {
            side = to_player.cross(DVec3::X);
        }
        side.normalize_or_zero() * profile.cruise_speed * 0.5
    };

    let wants_fire = ctx.weapon_ready && range <= profile.weapon_range;
    transition(ctx, state, Velocity::from_dvec3(v), Some(to_player), wants_fire)
}

/// Run directly away from the player.
fn retreat(
    ctx: &BrainContext,
    profile: &EnemyProfile,
    player: Position,
    state: AiState,
) -> BrainUpdate {
    let away = -direction(ctx.position, player);
    let v = away * profile.retreat_speed;
    transition(ctx, state, Velocity::from_dvec3(v), Some(away), false)
}

fn transition(
    ctx: &BrainContext,
    new_state: AiState,
    new_velocity: Velocity,
    facing: Option<DVec3>,
    wants_fire: bool,
) -> BrainUpdate {
    BrainUpdate {
        new_state,
        new_velocity,
        facing,
        wants_fire,
        state_changed: new_state != ctx.state,
    }
}

/// Unit vector from `from` to `to`; arbitrary axis when they coincide.
fn direction(from: Position, to: Position) -> DVec3 {
    let d = (to.to_dvec3() - from.to_dvec3()).normalize_or_zero();
    if d == DVec3::ZERO {
        DVec3::NEG_Z
    } else {
        d
    }
}
