//! Docking and station services.
//!
//! A docked ship carries a `Docked` component: it is hidden, immobile and
//! out of the fight. Repairs and cargo sales are only offered while docked.

use glam::DVec3;
use hecs::{Entity, World};

use starwake_core::components::*;
use starwake_core::config::DockingConfig;
use starwake_core::enums::EffectKind;
use starwake_core::error::CommandError;
use starwake_core::events::GameEvent;
use starwake_core::state::DockingView;
use starwake_core::types::{Orientation, Position, Velocity};

use super::{effects, is_docked};
use crate::bus::EventBus;
use crate::score::ScoreState;
use crate::{entity_from_id, entity_id};

/// The station nearest to `position`, with its distance.
pub fn nearest_station(world: &World, position: &Position) -> Option<(Entity, f64)> {
    let mut best: Option<(Entity, f64)> = None;
    for (entity, (_station, pos)) in world.query::<(&Station, &Position)>().iter() {
        let distance = pos.range_to(position);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((entity, distance)),
        }
    }
    best
}

/// True when a station is within docking range and the player is in space.
pub fn can_dock(world: &World, player: Entity, config: &DockingConfig) -> bool {
    if is_docked(world, player) {
        return false;
    }
    let Ok(pos) = world.get::<&Position>(player) else {
        return false;
    };
    nearest_station(world, &pos)
        .map(|(_, distance)| distance <= config.range)
        .unwrap_or(false)
}

/// Credits needed to restore the hull to full.
pub fn repair_cost(health: &Health, config: &DockingConfig) -> u32 {
    (health.missing() * config.repair_cost_per_hp).ceil().max(0.0) as u32
}

/// Value of the whole hold at station prices.
pub fn cargo_value(cargo: &Cargo) -> u32 {
    cargo
        .items
        .iter()
        .map(|(resource, count)| resource.price() * count)
        .sum()
}

/// Dock at the nearest station. Returns the station entity.
pub fn dock(
    world: &mut World,
    player: Entity,
    config: &DockingConfig,
    bus: &mut EventBus,
) -> Result<Entity, CommandError> {
    if is_docked(world, player) {
        return Err(CommandError::AlreadyDocked);
    }
    let pos = *world
        .get::<&Position>(player)
        .map_err(|_| CommandError::PlayerMissing)?;
    let (station, distance) =
        nearest_station(world, &pos).ok_or(CommandError::NoStationInRange)?;
    if distance > config.range {
        return Err(CommandError::NoStationInRange);
    }

    let station_id = entity_id(station);
    world
        .insert_one(player, Docked { station: station_id })
        .map_err(|_| CommandError::PlayerMissing)?;
    if let Ok(mut vel) = world.get::<&mut Velocity>(player) {
        *vel = Velocity::default();
    }
    if let Ok(mut controls) = world.get::<&mut ShipControls>(player) {
        *controls = ShipControls::default();
    }
    if let Ok(mut renderable) = world.get::<&mut Renderable>(player) {
        renderable.visible = false;
    }

    log::info!("docked at station {:?}", station);
    bus.publish(GameEvent::Docked {
        station: station_id,
    });
    Ok(station)
}

/// Leave the station, reappearing at the undock point facing outward.
pub fn undock(
    world: &mut World,
    player: Entity,
    config: &DockingConfig,
    bus: &mut EventBus,
) -> Result<(), CommandError> {
    let station_id = world
        .get::<&Docked>(player)
        .map(|docked| docked.station)
        .map_err(|_| CommandError::NotDocked)?;
    let station_pos = entity_from_id(station_id)
        .and_then(|station| world.get::<&Position>(station).ok().map(|pos| *pos))
        .ok_or(CommandError::UnknownEntity(station_id))?;

    let [dx, dy, dz] = config.undock_offset;
    let offset = DVec3::new(dx, dy, dz);
    let exit = station_pos.offset(offset);

    world
        .remove_one::<Docked>(player)
        .map_err(|_| CommandError::NotDocked)?;
    if let Ok(mut pos) = world.get::<&mut Position>(player) {
        *pos = exit;
    }
    if let Ok(mut vel) = world.get::<&mut Velocity>(player) {
        *vel = Velocity::default();
    }
    if offset.length_squared() > 0.0 {
        if let Ok(mut orientation) = world.get::<&mut Orientation>(player) {
            *orientation = Orientation::looking_along(offset);
        }
    }
    if let Ok(mut renderable) = world.get::<&mut Renderable>(player) {
        renderable.visible = true;
    }

    log::info!("undocked from station {}", station_id);
    bus.publish(GameEvent::Undocked {
        station: station_id,
    });
    effects::spawn(world, EffectKind::WarpFlash, exit, Orientation::default());
    Ok(())
}

/// Repair as much hull as the wallet allows. Returns `(hp, cost)`.
pub fn repair(
    world: &mut World,
    player: Entity,
    config: &DockingConfig,
    bus: &mut EventBus,
) -> Result<(f64, u32), CommandError> {
    if !is_docked(world, player) {
        return Err(CommandError::NotDocked);
    }
    let mut query = world
        .query_one::<(&mut Health, &mut Wallet)>(player)
        .map_err(|_| CommandError::PlayerMissing)?;
    let (health, wallet) = query.get().ok_or(CommandError::PlayerMissing)?;

    if health.missing() <= 0.0 {
        return Err(CommandError::NothingToRepair);
    }
    let full_cost = repair_cost(health, config);
    let (amount, cost) = if wallet.credits >= full_cost {
        (health.heal(health.missing()), full_cost)
    } else if wallet.credits == 0 {
        return Err(CommandError::InsufficientCredits {
            needed: full_cost,
            available: 0,
        });
    } else {
        let affordable = f64::from(wallet.credits) / config.repair_cost_per_hp;
        let healed = health.heal(affordable);
        let cost = ((healed * config.repair_cost_per_hp).ceil() as u32).min(wallet.credits);
        (healed, cost)
    };
    wallet.credits -= cost;
    drop(query);

    log::info!("repaired {:.1} hp for {} cr", amount, cost);
    bus.publish(GameEvent::Repaired { amount, cost });
    Ok((amount, cost))
}

/// Sell the whole hold. Returns `(units, credits)`.
pub fn sell_cargo(
    world: &mut World,
    player: Entity,
    bus: &mut EventBus,
    score: &mut ScoreState,
) -> Result<(u32, u32), CommandError> {
    if !is_docked(world, player) {
        return Err(CommandError::NotDocked);
    }
    let mut query = world
        .query_one::<(&mut Cargo, &mut Wallet)>(player)
        .map_err(|_| CommandError::PlayerMissing)?;
    let (cargo, wallet) = query.get().ok_or(CommandError::PlayerMissing)?;

    let units = cargo.total();
    if units == 0 {
        return Err(CommandError::NothingToSell);
    }
    let credits = cargo_value(cargo);
    cargo.items.clear();
    wallet.credits += credits;
    drop(query);

    score.record_credits(credits);
    log::info!("sold {} units for {} cr", units, credits);
    bus.publish(GameEvent::CargoSold { units, credits });
    Ok((units, credits))
}

/// HUD docking panel.
pub fn view(world: &World, player: Option<Entity>, config: &DockingConfig) -> DockingView {
    let Some(player) = player else {
        return DockingView::default();
    };
    let Ok(pos) = world.get::<&Position>(player).map(|pos| *pos) else {
        return DockingView::default();
    };

    let docked = is_docked(world, player);
    let nearest = nearest_station(world, &pos);
    let station_name = nearest.and_then(|(station, _)| {
        world
            .get::<&Station>(station)
            .ok()
            .map(|station| station.name.clone())
    });
    let repair_cost = world
        .get::<&Health>(player)
        .map(|health| repair_cost(&health, config))
        .unwrap_or(0);
    let cargo_value = world
        .get::<&Cargo>(player)
        .map(|cargo| cargo_value(&cargo))
        .unwrap_or(0);

    DockingView {
        docked,
        can_dock: !docked && nearest.is_some_and(|(_, distance)| distance <= config.range),
        station: nearest.map(|(station, _)| entity_id(station)),
        station_name,
        station_distance: nearest.map(|(_, distance)| distance),
        repair_cost,
        cargo_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starwake_core::config::GameConfig;
    use starwake_core::constants::STATION_POSITION;
    use starwake_core::enums::ResourceType;

    use crate::world_setup::{spawn_player, spawn_station};

    fn docked_world() -> (World, Entity, Entity) {
        let mut world = World::new();
        let station = spawn_station(&mut world);
        let player = spawn_player(&mut world, &GameConfig::default());
        let (x, y, z) = STATION_POSITION;
        *world.get::<&mut Position>(player).unwrap() = Position::new(x, y, z + 200.0);
        (world, player, station)
    }

    #[test]
    fn test_dock_hides_and_freezes_ship() {
        let (mut world, player, station) = docked_world();
        let config = DockingConfig::default();
        let mut bus = EventBus::new();
        *world.get::<&mut Velocity>(player).unwrap() = Velocity::new(10.0, 0.0, 0.0);

        let docked_at = dock(&mut world, player, &config, &mut bus).unwrap();
        assert_eq!(docked_at, station);
        assert!(is_docked(&world, player));
        assert!(!world.get::<&Renderable>(player).unwrap().visible);
        assert_eq!(world.get::<&Velocity>(player).unwrap().speed(), 0.0);
        assert!(!can_dock(&world, player, &config));

        let again = dock(&mut world, player, &config, &mut bus);
        assert_eq!(again, Err(CommandError::AlreadyDocked));
    }

    #[test]
    fn test_dock_out_of_range_rejected() {
        let (mut world, player, _) = docked_world();
        *world.get::<&mut Position>(player).unwrap() = Position::new(5000.0, 0.0, 0.0);
        let mut bus = EventBus::new();
        let result = dock(&mut world, player, &DockingConfig::default(), &mut bus);
        assert_eq!(result, Err(CommandError::NoStationInRange));
    }

    #[test]
    fn test_undock_places_ship_at_offset() {
        let (mut world, player, _) = docked_world();
        let config = DockingConfig::default();
        let mut bus = EventBus::new();
        dock(&mut world, player, &config, &mut bus).unwrap();
        undock(&mut world, player, &config, &mut bus).unwrap();

        let pos = *world.get::<&Position>(player).unwrap();
        let (x, y, z) = STATION_POSITION;
        let [dx, dy, dz] = config.undock_offset;
        assert_eq!(pos, Position::new(x + dx, y + dy, z + dz));
        assert!(world.get::<&Renderable>(player).unwrap().visible);
        assert!(!is_docked(&world, player));
    }

    #[test]
    fn test_partial_repair_spends_all_credits() {
        let (mut world, player, _) = docked_world();
        let config = DockingConfig::default();
        let mut bus = EventBus::new();
        dock(&mut world, player, &config, &mut bus).unwrap();

        world.get::<&mut Health>(player).unwrap().damage(80.0);
        world.get::<&mut Wallet>(player).unwrap().credits = 50;

        // 2 cr/hp: 50 credits buy 25 hp of the 80 missing
        let (amount, cost) = repair(&mut world, player, &config, &mut bus).unwrap();
        assert!((amount - 25.0).abs() < 1e-9);
        assert_eq!(cost, 50);
        assert_eq!(world.get::<&Wallet>(player).unwrap().credits, 0);

        let broke = repair(&mut world, player, &config, &mut bus);
        assert!(matches!(
            broke,
            Err(CommandError::InsufficientCredits { available: 0, .. })
        ));
    }

    #[test]
    fn test_sell_cargo_pays_station_prices() {
        let (mut world, player, _) = docked_world();
        let config = DockingConfig::default();
        let mut bus = EventBus::new();
        let mut score = ScoreState::default();
        {
            let mut cargo = world.get::<&mut Cargo>(player).unwrap();
            cargo.add(ResourceType::Iron, 4);
            cargo.add(ResourceType::Gold, 1);
        }

        let undocked = sell_cargo(&mut world, player, &mut bus, &mut score);
        assert_eq!(undocked, Err(CommandError::NotDocked));

        dock(&mut world, player, &config, &mut bus).unwrap();
        let start = world.get::<&Wallet>(player).unwrap().credits;
        let (units, credits) = sell_cargo(&mut world, player, &mut bus, &mut score).unwrap();
        assert_eq!(units, 5);
        assert_eq!(credits, 4 * ResourceType::Iron.price() + ResourceType::Gold.price());
        assert_eq!(world.get::<&Wallet>(player).unwrap().credits, start + credits);
        assert_eq!(world.get::<&Cargo>(player).unwrap().total(), 0);
        assert_eq!(score.credits_earned, credits);
    }
}
