//! Scripted demo pilot.
//!
//! Plays the game through the same input path a person would: it moves
//! the virtual gamepad's sticks and buttons every frame and lets the
//! `InputHub` turn that into commands. Steers toward the nearest enemy,
//! closes to gun range and fires when the nose is on target.

use glam::DVec3;

use starwake_core::commands::PlayerCommand;
use starwake_core::constants::LASER_RANGE;
use starwake_core::enums::{GamePhase, MeshKind};
use starwake_core::state::{GameStateSnapshot, PlayerView, RenderItem};
use starwake_input::{ActionContext, InputHub, KeyBindings};

/// Standard-mapping indices the pilot drives.
const AXIS_RIGHT_X: usize = 2;
const AXIS_RIGHT_Y: usize = 3;
const BUTTON_A: usize = 0;
const BUTTON_B: usize = 1;
const TRIGGER_RIGHT: usize = 7;
const BUTTON_COUNT: usize = 17;

/// Stick deflection per unit of off-axis direction.
const STEER_GAIN: f64 = 3.0;
/// Close in until this distance, then hold position.
const ENGAGE_DISTANCE: f64 = 700.0;
/// Cosine of the largest aim error that still pulls the trigger.
const FIRE_ALIGNMENT: f64 = 0.995;

#[derive(Debug, Clone)]
pub struct Autopilot {
    hub: InputHub,
    /// Issue `Restart` when the ship is destroyed.
    pub restart_on_game_over: bool,
}

impl Autopilot {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            hub: InputHub::new(bindings),
            restart_on_game_over: true,
        }
    }

    /// Commands for the next frame, given the last snapshot.
    pub fn commands(&mut self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        match snapshot.phase {
            GamePhase::Intro | GamePhase::Paused => return Vec::new(),
            GamePhase::GameOver => {
                return if self.restart_on_game_over {
                    log::info!("autopilot: restarting after game over");
                    self.hub.resync();
                    vec![PlayerCommand::Restart]
                } else {
                    Vec::new()
                };
            }
            GamePhase::Playing => {}
        }

        let mut axes = [0.0; 4];
        let mut buttons = [0.0; BUTTON_COUNT];

        if let Some(player) = &snapshot.player {
            if player.docked {
                buttons[BUTTON_B] = 1.0;
            } else if let Some(enemy) = nearest_enemy(player, &snapshot.render) {
                steer(player, enemy, &mut axes, &mut buttons);
            }
        }

        self.hub.gamepad.update(&axes, &buttons);
        let ctx = ActionContext {
            phase: snapshot.phase,
            mining: snapshot.mining.is_some(),
            docked: snapshot.docking.docked,
        };
        self.hub.frame_commands(&ctx)
    }
}

fn nearest_enemy<'a>(player: &PlayerView, render: &'a [RenderItem]) -> Option<&'a RenderItem> {
    render
        .iter()
        .filter(|item| matches!(item.mesh, MeshKind::Enemy(_)))
        .min_by(|a, b| {
            let da = a.position.range_to(&player.position);
            let db = b.position.range_to(&player.position);
            da.total_cmp(&db)
        })
}

fn steer(player: &PlayerView, enemy: &RenderItem, axes: &mut [f64; 4], buttons: &mut [f64]) {
    let offset = enemy.position.to_dvec3() - player.position.to_dvec3();
    let distance = offset.length();
    if distance <= f64::EPSILON {
        return;
    }
    // Target direction in ship space: -Z ahead, +X right, +Y up
    let local: DVec3 = player.orientation.0.inverse() * (offset / distance);

    let mut turn = (local.x * STEER_GAIN).clamp(-1.0, 1.0);
    if local.z > 0.0 && turn.abs() < 0.5 {
        // Target behind: commit to a hard turn
        turn = if local.x >= 0.0 { 1.0 } else { -1.0 };
    }
    axes[AXIS_RIGHT_X] = turn;
    axes[AXIS_RIGHT_Y] = (local.y * STEER_GAIN).clamp(-1.0, 1.0);

    if distance > ENGAGE_DISTANCE {
        buttons[TRIGGER_RIGHT] = 1.0;
    }
    if -local.z >= FIRE_ALIGNMENT && distance <= LASER_RANGE {
        buttons[BUTTON_A] = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starwake_core::components::ShipControls;
    use starwake_core::enums::EnemyArchetype;
    use starwake_core::types::{Orientation, Position, Velocity};

    fn player_view(docked: bool) -> PlayerView {
        PlayerView {
            id: 1,
            position: Position::default(),
            velocity: Velocity::default(),
            orientation: Orientation::default(),
            speed: 0.0,
            health: 100.0,
            max_health: 100.0,
            credits: 0,
            cargo: Default::default(),
            cargo_capacity: 40,
            weapon_ready: true,
            weapon_cooldown: 0.0,
            docked,
        }
    }

    fn snapshot_with_enemy(position: Position) -> GameStateSnapshot {
        GameStateSnapshot {
            phase: GamePhase::Playing,
            player: Some(player_view(false)),
            render: vec![RenderItem {
                id: 2,
                mesh: MeshKind::Enemy(EnemyArchetype::Raider),
                position,
                orientation: Orientation::default(),
                scale: 9.0,
            }],
            ..Default::default()
        }
    }

    fn controls_in(commands: &[PlayerCommand]) -> Option<ShipControls> {
        commands.iter().find_map(|c| match c {
            PlayerCommand::SetControls { controls } => Some(*controls),
            _ => None,
        })
    }

    #[test]
    fn test_fires_at_enemy_dead_ahead() {
        let mut pilot = Autopilot::new(KeyBindings::default());
        let snapshot = snapshot_with_enemy(Position::new(0.0, 0.0, -500.0));
        let controls = controls_in(&pilot.commands(&snapshot)).unwrap();
        assert!(controls.fire);
        assert_eq!(controls.yaw, 0.0);
        assert_eq!(controls.thrust, 0.0, "Already inside engagement distance");
    }

    #[test]
    fn test_turns_toward_enemy_on_the_right() {
        let mut pilot = Autopilot::new(KeyBindings::default());
        let snapshot = snapshot_with_enemy(Position::new(1500.0, 0.0, -1500.0));
        let controls = controls_in(&pilot.commands(&snapshot)).unwrap();
        assert!(controls.yaw < 0.0, "Negative yaw turns right, got {}", controls.yaw);
        assert!(controls.thrust > 0.0);
        assert!(!controls.fire);
    }

    #[test]
    fn test_idle_without_enemies() {
        let mut pilot = Autopilot::new(KeyBindings::default());
        let snapshot = GameStateSnapshot {
            phase: GamePhase::Playing,
            player: Some(player_view(false)),
            ..Default::default()
        };
        let controls = controls_in(&pilot.commands(&snapshot)).unwrap();
        assert_eq!(controls, ShipControls::default());
        // Unchanged controls are not resent
        assert!(pilot.commands(&snapshot).is_empty());
    }

    #[test]
    fn test_undocks_once() {
        let mut pilot = Autopilot::new(KeyBindings::default());
        let mut snapshot = GameStateSnapshot {
            phase: GamePhase::Playing,
            player: Some(player_view(true)),
            ..Default::default()
        };
        snapshot.docking.docked = true;

        let first = pilot.commands(&snapshot);
        assert!(first.contains(&PlayerCommand::Undock));
        let second = pilot.commands(&snapshot);
        assert!(!second.contains(&PlayerCommand::Undock), "Button is edge-triggered");
    }

    #[test]
    fn test_restarts_after_game_over() {
        let mut pilot = Autopilot::new(KeyBindings::default());
        let snapshot = GameStateSnapshot {
            phase: GamePhase::GameOver,
            ..Default::default()
        };
        assert_eq!(pilot.commands(&snapshot), vec![PlayerCommand::Restart]);

        pilot.restart_on_game_over = false;
        assert!(pilot.commands(&snapshot).is_empty());
    }
}
