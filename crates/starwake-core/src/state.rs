//! Game state snapshot: the complete visible state handed to the front end
//! after each frame.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::EntityId;
use crate::enums::*;
use crate::events::{Alert, GameEvent};
use crate::types::{Orientation, Position, SimTime, Velocity};

/// Complete game state produced by every `tick()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub intro: IntroView,
    pub player: Option<PlayerView>,
    pub target: Option<TargetView>,
    /// Draw list for the external renderer.
    pub render: Vec<RenderItem>,
    pub mining: Option<MiningView>,
    pub docking: DockingView,
    pub score: ScoreView,
    pub alerts: Vec<Alert>,
    pub events: Vec<GameEvent>,
}

/// One drawable object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderItem {
    pub id: EntityId,
    pub mesh: MeshKind,
    pub position: Position,
    pub orientation: Orientation,
    pub scale: f64,
}

/// Cinematic intro state for the camera/overlay.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IntroView {
    pub stage: IntroStage,
    /// Progress through the current stage (0.0 - 1.0).
    pub stage_progress: f64,
    /// Camera rig position while the intro drives the camera.
    pub camera: Option<Position>,
}

/// Player ship status for the HUD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: EntityId,
    pub position: Position,
    pub velocity: Velocity,
    pub orientation: Orientation,
    pub speed: f64,
    pub health: f64,
    pub max_health: f64,
    pub credits: u32,
    pub cargo: BTreeMap<ResourceType, u32>,
    pub cargo_capacity: u32,
    pub weapon_ready: bool,
    /// Seconds until the weapon can fire again.
    pub weapon_cooldown: f64,
    pub docked: bool,
}

/// The currently selected target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub id: EntityId,
    pub kind: TargetKind,
    pub position: Position,
    pub distance: f64,
    pub health: Option<f64>,
    pub max_health: Option<f64>,
    /// Resource and remaining units for asteroid targets.
    pub deposit: Option<(ResourceType, u32)>,
}

/// Active mining operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MiningView {
    pub asteroid: EntityId,
    pub resource: ResourceType,
    /// Progress toward the next unit (0.0 - 1.0).
    pub progress: f64,
}

/// Docking prompt/status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DockingView {
    pub docked: bool,
    pub can_dock: bool,
    pub station: Option<EntityId>,
    pub station_name: Option<String>,
    pub station_distance: Option<f64>,
    /// Credits needed for a full repair (only meaningful while docked).
    pub repair_cost: u32,
    /// Credits the current cargo would sell for.
    pub cargo_value: u32,
}

/// Running score.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u32,
    pub kills: u32,
    pub resources_mined: u32,
    pub credits_earned: u32,
    pub active_enemies: u32,
}
