//! Archetype-specific behavioural profiles.
//!
//! Consolidates per-archetype parameters for the NPC FSM and for spawning.

use starwake_core::enums::EnemyArchetype;

/// Behavioural and combat profile for an NPC archetype.
#[derive(Debug, Clone, Copy)]
pub struct EnemyProfile {
    pub max_health: f64,
    pub collider_radius: f64,
    /// Speed while pursuing or orbiting (units/s).
    pub cruise_speed: f64,
    /// Speed while fleeing (units/s).
    pub retreat_speed: f64,
    /// Player closer than this wakes an idle ship.
    pub aggro_range: f64,
    /// Ship starts its attack run inside this range.
    pub attack_range: f64,
    /// Beyond this range the ship gives up and idles.
    pub leash_range: f64,
    /// Health fraction below which the ship retreats.
    pub retreat_health: f64,
    pub weapon_damage: f64,
    pub weapon_cooldown_secs: f64,
    pub weapon_range: f64,
    /// Relative spawn frequency.
    pub spawn_weight: u32,
    /// Score awarded for a kill.
    pub bounty: u32,
}

/// Get the profile for a given archetype.
pub fn get_profile(archetype: EnemyArchetype) -> EnemyProfile {
    match archetype {
        EnemyArchetype::Scout => EnemyProfile {
            max_health: 40.0,
            collider_radius: 6.0,
            cruise_speed: 180.0,
            retreat_speed: 260.0,
            aggro_range: 2_500.0,
            attack_range: 600.0,
            leash_range: 4_000.0,
            retreat_health: 0.5,
            weapon_damage: 4.0,
            weapon_cooldown_secs: 0.6,
            weapon_range: 700.0,
            spawn_weight: 5,
            bounty: 50,
        },
        EnemyArchetype::Raider => EnemyProfile {
            max_health: 75.0,
            collider_radius: 9.0,
            cruise_speed: 140.0,
            retreat_speed: 200.0,
            aggro_range: 2_000.0,
            attack_range: 800.0,
            leash_range: 3_500.0,
            retreat_health: 0.25,
            weapon_damage: 6.0,
            weapon_cooldown_secs: 0.8,
            weapon_range: 900.0,
            spawn_weight: 3,
            bounty: 100,
        },
        EnemyArchetype::Gunship => EnemyProfile {
            max_health: 200.0,
            collider_radius: 18.0,
            cruise_speed: 80.0,
            retreat_speed: 100.0,
            aggro_range: 1_800.0,
            attack_range: 1_100.0,
            leash_range: 3_000.0,
            // Gunships fight to the death.
            retreat_health: 0.0,
            weapon_damage: 15.0,
            weapon_cooldown_secs: 1.5,
            weapon_range: 1_200.0,
            spawn_weight: 1,
            bounty: 250,
        },
    }
}

/// All archetypes with their spawn weights, in a fixed order.
pub fn spawn_table() -> [(EnemyArchetype, u32); 3] {
    [
        EnemyArchetype::Scout,
        EnemyArchetype::Raider,
        EnemyArchetype::Gunship,
    ]
    .map(|archetype| (archetype, get_profile(archetype).spawn_weight))
}
