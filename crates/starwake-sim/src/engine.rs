//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and the message bus, processes
//! player commands, runs all systems in a fixed order, and produces
//! `GameStateSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starwake_core::commands::PlayerCommand;
use starwake_core::components::{Enemy, EntityId, Health, Renderable, ShipControls};
use starwake_core::config::GameConfig;
use starwake_core::constants::{DT, MAX_ALERTS};
use starwake_core::enums::{AlertLevel, EffectKind, GamePhase, IntroStage};
use starwake_core::error::CommandError;
use starwake_core::events::{Alert, EventTopic, GameEvent};
use starwake_core::state::GameStateSnapshot;
use starwake_core::types::{Orientation, Position, SimTime};

use crate::bus::{EventBus, SubscriptionId};
use crate::entity_id;
use crate::score::ScoreState;
use crate::systems;
use crate::systems::intro::IntroState;
use crate::systems::mining::{MiningSession, StopReason};
use crate::systems::snapshot::FrameInfo;
use crate::systems::spawner::SpawnerState;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Gameplay tuning.
    pub game: GameConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            game: GameConfig::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    config: GameConfig,
    time: SimTime,
    phase: GamePhase,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    bus: EventBus,
    alerts: VecDeque<Alert>,

    intro: IntroState,
    player: Option<Entity>,
    target: Option<Entity>,
    mining: Option<MiningSession>,
    spawner: SpawnerState,
    score: ScoreState,
    /// One-shot `Fire` command for the current frame.
    fire_requested: bool,
    /// Whether the player was within docking range last frame.
    dock_in_range: bool,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config. The sector is
    /// built immediately; the game opens on the intro unless it is disabled.
    pub fn new(config: SimConfig) -> Self {
        let intro_enabled = config.game.intro.enabled;
        let mut engine = Self {
            world: World::new(),
            spawner: SpawnerState::new(&config.game.spawner),
            config: config.game,
            time: SimTime::default(),
            phase: GamePhase::Intro,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            bus: EventBus::new(),
            alerts: VecDeque::new(),
            intro: IntroState::default(),
            player: None,
            target: None,
            mining: None,
            score: ScoreState::default(),
            fire_requested: false,
            dock_in_range: false,
        };
        engine.build_world();
        if !intro_enabled {
            engine.intro.stage = IntroStage::Finished;
            engine.phase = GamePhase::Playing;
        }
        engine
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Register a bus handler. Handlers run at the end of every frame.
    pub fn subscribe(
        &mut self,
        topic: EventTopic,
        handler: impl FnMut(&GameEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(topic, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Advance the simulation by one frame and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        match self.phase {
            GamePhase::Intro => {
                if systems::intro::run(&mut self.intro, &self.config.intro, DT, &mut self.bus) {
                    self.set_phase(GamePhase::Playing);
                }
                self.time.advance();
            }
            GamePhase::Playing => {
                self.run_systems();
                self.time.advance();
            }
            GamePhase::Paused | GamePhase::GameOver => {}
        }
        self.fire_requested = false;

        self.bus.dispatch();
        let events = self.bus.drain_delivered();
        self.build_snapshot(events)
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Public id of the player ship.
    pub fn player(&self) -> Option<EntityId> {
        self.player.map(entity_id)
    }

    /// Public id of the current target.
    pub fn target(&self) -> Option<EntityId> {
        self.target.map(entity_id)
    }

    /// Number of enemies the spawner is currently tracking.
    pub fn tracked_enemies(&self) -> usize {
        self.spawner.tracked.len()
    }

    /// Mutable world access for tests.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn an enemy outside the spawner (for tests).
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        archetype: starwake_core::enums::EnemyArchetype,
        position: Position,
    ) -> Entity {
        world_setup::spawn_enemy(&mut self.world, archetype, position, glam::DVec3::Z)
    }

    /// Create the sector and reset all per-session state.
    fn build_world(&mut self) {
        self.world = World::new();
        let player = world_setup::setup_world(&mut self.world, &mut self.rng, &self.config);
        self.player = Some(player);
        self.target = None;
        self.mining = None;
        self.spawner = SpawnerState::new(&self.config.spawner);
        self.score = ScoreState::default();
        self.alerts.clear();
        self.time = SimTime::default();
        self.fire_requested = false;
        self.dock_in_range = false;
        log::info!(
            "sector ready: {} entities, player {:?}",
            self.world.len(),
            player
        );
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        log::info!("phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.bus.publish(GameEvent::PhaseChanged { phase });
    }

    fn push_alert(&mut self, level: AlertLevel, message: impl Into<String>) {
        if self.alerts.len() >= MAX_ALERTS {
            self.alerts.pop_front();
        }
        self.alerts.push_back(Alert {
            level,
            message: message.into(),
            tick: self.time.tick,
        });
    }

    /// Process all queued commands. A rejected command is logged and
    /// surfaced as a HUD alert; it never aborts the frame.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(&command) {
                log::warn!("rejected {:?}: {}", command, err);
                self.push_alert(AlertLevel::Warning, err.to_string());
            }
        }
    }

    fn require_playing(&self) -> Result<Entity, CommandError> {
        if self.phase != GamePhase::Playing {
            return Err(CommandError::WrongPhase { phase: self.phase });
        }
        self.player.ok_or(CommandError::PlayerMissing)
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: &PlayerCommand) -> Result<(), CommandError> {
        match command {
            PlayerCommand::Restart => {
                log::info!("restart");
                self.build_world();
                self.intro.stage = IntroStage::Finished;
                // Always announced, even when restarting from Playing
                self.phase = GamePhase::Playing;
                self.bus.publish(GameEvent::PhaseChanged {
                    phase: GamePhase::Playing,
                });
            }
            PlayerCommand::SkipIntro => {
                if self.phase == GamePhase::Intro {
                    self.intro.skip(&mut self.bus);
                    self.set_phase(GamePhase::Playing);
                }
            }
            PlayerCommand::Pause => {
                if self.phase != GamePhase::Playing {
                    return Err(CommandError::WrongPhase { phase: self.phase });
                }
                self.set_phase(GamePhase::Paused);
            }
            PlayerCommand::Resume => {
                if self.phase != GamePhase::Paused {
                    return Err(CommandError::WrongPhase { phase: self.phase });
                }
                self.set_phase(GamePhase::Playing);
            }
            PlayerCommand::SetControls { controls } => {
                // Controls outside active play are dropped without complaint
                if self.phase != GamePhase::Playing {
                    return Ok(());
                }
                if let Some(player) = self.player {
                    if let Ok(mut current) = self.world.get::<&mut ShipControls>(player) {
                        *current = controls.clamped();
                    }
                }
            }
            PlayerCommand::Fire => {
                self.require_playing()?;
                self.fire_requested = true;
            }
            PlayerCommand::CycleTarget { direction } => {
                let player = self.require_playing()?;
                let target = systems::targeting::cycle(
                    &self.world,
                    player,
                    self.target,
                    *direction,
                    self.config.combat.targeting_range,
                    &mut self.bus,
                )?;
                self.target = Some(target);
            }
            PlayerCommand::SelectTarget { id } => {
                let player = self.require_playing()?;
                let target = systems::targeting::select(
                    &self.world,
                    player,
                    *id,
                    self.config.combat.targeting_range,
                    &mut self.bus,
                )?;
                self.target = Some(target);
            }
            PlayerCommand::ClearTarget => {
                self.require_playing()?;
                systems::targeting::clear(&mut self.target, &mut self.bus);
            }
            PlayerCommand::StartMining => {
                let player = self.require_playing()?;
                let session = systems::mining::start(
                    &self.world,
                    player,
                    self.target,
                    &self.config.mining,
                    &mut self.bus,
                )?;
                systems::mining::stop(
                    &mut self.world,
                    &mut self.mining,
                    StopReason::Requested,
                    &mut self.bus,
                );
                self.mining = Some(session);
            }
            PlayerCommand::StopMining => {
                self.require_playing()?;
                systems::mining::stop(
                    &mut self.world,
                    &mut self.mining,
                    StopReason::Requested,
                    &mut self.bus,
                );
            }
            PlayerCommand::Dock => {
                let player = self.require_playing()?;
                systems::docking::dock(&mut self.world, player, &self.config.docking, &mut self.bus)?;
                systems::mining::stop(
                    &mut self.world,
                    &mut self.mining,
                    StopReason::Docked,
                    &mut self.bus,
                );
                systems::targeting::clear(&mut self.target, &mut self.bus);
                self.push_alert(AlertLevel::Info, "Docked");
            }
            PlayerCommand::Undock => {
                let player = self.require_playing()?;
                systems::docking::undock(
                    &mut self.world,
                    player,
                    &self.config.docking,
                    &mut self.bus,
                )?;
            }
            PlayerCommand::Repair => {
                let player = self.require_playing()?;
                let (amount, cost) = systems::docking::repair(
                    &mut self.world,
                    player,
                    &self.config.docking,
                    &mut self.bus,
                )?;
                self.push_alert(
                    AlertLevel::Info,
                    format!("Repaired {:.0} hull for {} cr", amount, cost),
                );
            }
            PlayerCommand::SellCargo => {
                let player = self.require_playing()?;
                let (units, credits) = systems::docking::sell_cargo(
                    &mut self.world,
                    player,
                    &mut self.bus,
                    &mut self.score,
                )?;
                self.push_alert(
                    AlertLevel::Info,
                    format!("Sold {} units for {} cr", units, credits),
                );
            }
        }
        Ok(())
    }

    /// Player position as seen by NPCs: hidden while docked or dead.
    fn engageable_player_position(&self) -> Option<Position> {
        let player = self.player?;
        if systems::is_docked(&self.world, player) {
            return None;
        }
        let alive = self
            .world
            .get::<&Health>(player)
            .map(|health| !health.is_dead())
            .unwrap_or(false);
        if !alive {
            return None;
        }
        self.world.get::<&Position>(player).ok().map(|pos| *pos)
    }

    fn player_position(&self) -> Option<Position> {
        let player = self.player?;
        self.world.get::<&Position>(player).ok().map(|pos| *pos)
    }

    /// End the run if the player ship has been destroyed.
    /// Returns true if the game is over.
    fn check_player_destroyed(&mut self) -> bool {
        let Some(player) = self.player else {
            return false;
        };
        let dead = self
            .world
            .get::<&Health>(player)
            .map(|health| health.is_dead())
            .unwrap_or(false);
        if !dead {
            return false;
        }

        let position = self.player_position().unwrap_or_default();
        if let Ok(mut renderable) = self.world.get::<&mut Renderable>(player) {
            renderable.visible = false;
        }
        systems::effects::spawn(
            &mut self.world,
            EffectKind::Explosion,
            position,
            Orientation::default(),
        );
        systems::mining::stop(
            &mut self.world,
            &mut self.mining,
            StopReason::PlayerLost,
            &mut self.bus,
        );
        systems::targeting::clear(&mut self.target, &mut self.bus);

        log::info!("player destroyed at tick {}", self.time.tick);
        self.bus.publish(GameEvent::PlayerDestroyed);
        self.push_alert(AlertLevel::Critical, "Ship destroyed");
        self.set_phase(GamePhase::GameOver);
        true
    }

    /// Raise a HUD hint when the station comes into docking range.
    fn update_docking_proximity(&mut self) {
        let in_range = self
            .player
            .map(|player| {
                systems::docking::can_dock(&self.world, player, &self.config.docking)
            })
            .unwrap_or(false);
        if in_range && !self.dock_in_range {
            self.push_alert(AlertLevel::Info, "Docking available");
        }
        self.dock_in_range = in_range;
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Player flight
        systems::flight::run(&mut self.world, DT);
        // 2. NPC AI
        let engageable = self.engageable_player_position();
        systems::ai::run(&mut self.world, engageable, DT);
        // 3. Combat (cooldowns, player + NPC fire)
        systems::combat::run(
            &mut self.world,
            self.player,
            self.fire_requested,
            &mut self.rng,
            &mut self.bus,
            &mut self.score,
            DT,
        );
        // 4. Collision
        systems::collision::run(
            &mut self.world,
            self.player,
            &self.config.combat,
            &mut self.rng,
            &mut self.bus,
            &mut self.score,
            DT,
        );
        if self.check_player_destroyed() {
            return;
        }
        // 5. Mining
        systems::mining::run(
            &mut self.world,
            &mut self.mining,
            self.player,
            &self.config.mining,
            &mut self.bus,
            &mut self.score,
            DT,
        );
        // 6. Docking proximity
        self.update_docking_proximity();
        // 7. Target validation
        systems::targeting::validate(
            &self.world,
            self.player,
            &mut self.target,
            self.config.combat.targeting_range,
            &mut self.bus,
        );
        // 8. Spawner
        let center = self.player_position();
        systems::spawner::run(
            &mut self.world,
            &mut self.spawner,
            center,
            &self.config.spawner,
            &mut self.rng,
            &mut self.bus,
            DT,
        );
        // 9. Loot pickup
        systems::loot::run(
            &mut self.world,
            self.player,
            &mut self.bus,
            &mut self.score,
            &mut self.despawn_buffer,
        );
        // 10. Effect lifetimes
        systems::effects::run(&mut self.world, DT, &mut self.despawn_buffer);
        // 11. Movement integration
        systems::movement::run(&mut self.world, DT);
        // 12. Cleanup (destroyed, out of bounds)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn build_snapshot(&self, events: Vec<GameEvent>) -> GameStateSnapshot {
        let active_enemies = self
            .world
            .query::<(&Enemy, &Health)>()
            .iter()
            .filter(|(_, (_, health))| !health.is_dead())
            .count() as u32;

        let frame = FrameInfo {
            time: self.time,
            phase: self.phase,
            intro: self.intro.view(&self.config.intro),
            player: self.player,
            target: systems::targeting::view(&self.world, self.player, self.target),
            mining: self.mining.as_ref().map(MiningSession::view),
            docking: systems::docking::view(&self.world, self.player, &self.config.docking),
            score: self.score.view(active_enemies),
            alerts: self.alerts.iter().cloned().collect(),
            events,
        };
        systems::snapshot::build_snapshot(&self.world, frame)
    }
}
