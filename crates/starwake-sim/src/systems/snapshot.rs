//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only and never modifies the world. The render list
//! is the draw list for the scene graph: one item per visible `Renderable`,
//! ordered by entity id.

use hecs::{Entity, World};

use starwake_core::components::*;
use starwake_core::enums::GamePhase;
use starwake_core::events::{Alert, GameEvent};
use starwake_core::state::*;
use starwake_core::types::{Orientation, Position, SimTime, Velocity};

use crate::entity_id;

/// Engine-owned state that goes into the snapshot alongside the world.
#[derive(Debug, Clone)]
pub struct FrameInfo {
    pub time: SimTime,
    pub phase: GamePhase,
    pub intro: IntroView,
    pub player: Option<Entity>,
    pub target: Option<TargetView>,
    pub mining: Option<MiningView>,
    pub docking: DockingView,
    pub score: ScoreView,
    pub alerts: Vec<Alert>,
    pub events: Vec<GameEvent>,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(world: &World, frame: FrameInfo) -> GameStateSnapshot {
    GameStateSnapshot {
        time: frame.time,
        phase: frame.phase,
        intro: frame.intro,
        player: frame.player.and_then(|player| build_player(world, player)),
        target: frame.target,
        render: build_render_list(world),
        mining: frame.mining,
        docking: frame.docking,
        score: frame.score,
        alerts: frame.alerts,
        events: frame.events,
    }
}

/// Every visible renderable with a position, sorted by id.
pub fn build_render_list(world: &World) -> Vec<RenderItem> {
    let mut items: Vec<RenderItem> = world
        .query::<(&Renderable, &Position, Option<&Orientation>)>()
        .iter()
        .filter(|(_, (renderable, _, _))| renderable.visible)
        .map(|(entity, (renderable, pos, orientation))| RenderItem {
            id: entity_id(entity),
            mesh: renderable.mesh,
            position: *pos,
            orientation: orientation.copied().unwrap_or_default(),
            scale: renderable.scale,
        })
        .collect();
    items.sort_by_key(|item| item.id);
    items
}

fn build_player(world: &World, player: Entity) -> Option<PlayerView> {
    let mut query = world
        .query_one::<(
            &Position,
            &Velocity,
            &Orientation,
            &Health,
            &Wallet,
            &Cargo,
            &Weapon,
            Option<&Docked>,
        )>(player)
        .ok()?;
    let (pos, vel, orientation, health, wallet, cargo, weapon, docked) = query.get()?;
    let view = PlayerView {
        id: entity_id(player),
        position: *pos,
        velocity: *vel,
        orientation: *orientation,
        speed: vel.speed(),
        health: health.current,
        max_health: health.max,
        credits: wallet.credits,
        cargo: cargo.items.clone(),
        cargo_capacity: cargo.capacity,
        weapon_ready: weapon.ready(),
        weapon_cooldown: weapon.remaining_secs,
        docked: docked.is_some(),
    };
    Some(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use starwake_core::config::GameConfig;
    use starwake_core::enums::MeshKind;

    use crate::world_setup::{spawn_player, spawn_station};

    #[test]
    fn test_hidden_entities_not_rendered() {
        let mut world = World::new();
        let station = spawn_station(&mut world);
        let player = spawn_player(&mut world, &GameConfig::default());

        let items = build_render_list(&world);
        assert_eq!(items.len(), 2);
        assert!(items.windows(2).all(|w| w[0].id < w[1].id));

        world.get::<&mut Renderable>(player).unwrap().visible = false;
        let items = build_render_list(&world);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, entity_id(station));
        assert_eq!(items[0].mesh, MeshKind::Station);
    }

    #[test]
    fn test_player_view_reflects_components() {
        let mut world = World::new();
        let config = GameConfig::default();
        let player = spawn_player(&mut world, &config);
        let view = build_player(&world, player).unwrap();
        assert_eq!(view.health, config.ship.max_health);
        assert_eq!(view.credits, config.ship.start_credits);
        assert_eq!(view.cargo_capacity, config.ship.cargo_capacity);
        assert!(view.weapon_ready);
        assert!(!view.docked);
    }
}
