//! Loot drops and pickup.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starwake_core::components::{Cargo, Collider, Lifetime, Loot, Renderable, Wallet};
use starwake_core::constants::*;
use starwake_core::enums::{MeshKind, ResourceType};
use starwake_core::events::GameEvent;
use starwake_core::types::{Orientation, Position};

use crate::bus::EventBus;
use crate::entity_id;
use crate::score::ScoreState;

/// Drop a loot crate where an enemy died.
pub fn drop_loot(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    position: Position,
    bus: &mut EventBus,
) -> Entity {
    let credits = rng.gen_range(LOOT_MIN_CREDITS..=LOOT_MAX_CREDITS);
    let resource = if rng.gen_bool(LOOT_RESOURCE_CHANCE) {
        let index = rng.gen_range(0..ResourceType::ALL.len());
        Some(ResourceType::ALL[index])
    } else {
        None
    };

    let entity = world.spawn((
        Loot { credits, resource },
        position,
        Orientation::default(),
        Lifetime {
            remaining_secs: LOOT_LIFETIME_SECS,
        },
        Renderable::new(MeshKind::LootCrate, 4.0),
    ));
    log::debug!("loot {:?}: {} cr, {:?}", entity, credits, resource);
    bus.publish(GameEvent::LootDropped {
        entity: entity_id(entity),
    });
    entity
}

/// Collect every crate within pickup radius of the player.
/// A full hold leaves the resource behind but still pays the credits.
pub fn run(
    world: &mut World,
    player: Option<Entity>,
    bus: &mut EventBus,
    score: &mut ScoreState,
    despawn_buffer: &mut Vec<Entity>,
) {
    let Some(player) = player else { return };
    if super::is_docked(world, player) {
        return;
    }
    let (player_pos, player_radius) = match (
        world.get::<&Position>(player),
        world.get::<&Collider>(player),
    ) {
        (Ok(pos), Ok(collider)) => (*pos, collider.radius),
        _ => return,
    };

    despawn_buffer.clear();
    let mut collected: Vec<Loot> = Vec::new();
    for (entity, (loot, pos)) in world.query_mut::<(&Loot, &Position)>() {
        if pos.range_to(&player_pos) <= LOOT_PICKUP_RADIUS + player_radius {
            collected.push(*loot);
            despawn_buffer.push(entity);
        }
    }

    for loot in collected {
        if let Ok(mut wallet) = world.get::<&mut Wallet>(player) {
            wallet.credits += loot.credits;
        }
        let stored = loot.resource.filter(|&resource| {
            world
                .get::<&mut Cargo>(player)
                .map(|mut cargo| cargo.add(resource, 1) > 0)
                .unwrap_or(false)
        });
        score.record_credits(loot.credits);
        bus.publish(GameEvent::LootCollected {
            credits: loot.credits,
            resource: stored,
        });
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
