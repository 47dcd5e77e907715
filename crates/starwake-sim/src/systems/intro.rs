//! Cinematic intro timeline.
//!
//! A fixed sequence of timed stages. During `Flyby` the camera rig sweeps
//! from a wide shot of the station to a chase position behind the player.
//! The renderer reads the camera from the snapshot; nothing here touches
//! the world.

use glam::DVec3;

use starwake_core::config::IntroConfig;
use starwake_core::constants::STATION_POSITION;
use starwake_core::enums::IntroStage;
use starwake_core::events::GameEvent;
use starwake_core::state::IntroView;
use starwake_core::types::Position;

use crate::bus::EventBus;

/// Camera offset from the station for the opening wide shot.
const WIDE_SHOT_OFFSET: DVec3 = DVec3::new(900.0, 300.0, -600.0);

/// Chase-camera position relative to the player at the origin.
const CHASE_OFFSET: DVec3 = DVec3::new(0.0, 12.0, 45.0);

#[derive(Debug, Clone, Default)]
pub struct IntroState {
    pub stage: IntroStage,
    /// Seconds spent in the current stage.
    pub stage_elapsed: f64,
}

impl IntroState {
    pub fn is_finished(&self) -> bool {
        self.stage == IntroStage::Finished
    }

    /// Jump straight to the end. Returns true if the intro was still running.
    pub fn skip(&mut self, bus: &mut EventBus) -> bool {
        if self.is_finished() {
            return false;
        }
        self.stage = IntroStage::Finished;
        self.stage_elapsed = 0.0;
        bus.publish(GameEvent::IntroStageChanged {
            stage: IntroStage::Finished,
        });
        bus.publish(GameEvent::IntroFinished);
        true
    }

    pub fn view(&self, config: &IntroConfig) -> IntroView {
        let duration = stage_duration(config, self.stage);
        let stage_progress = if self.is_finished() {
            1.0
        } else if duration <= 0.0 {
            0.0
        } else {
            (self.stage_elapsed / duration).clamp(0.0, 1.0)
        };
        let camera = camera_position(self.stage, stage_progress);
        IntroView {
            stage: self.stage,
            stage_progress,
            camera,
        }
    }
}

/// Advance the timeline by `dt`. Returns true on the frame the intro finishes.
/// Zero-length stages are passed through within the same frame.
pub fn run(state: &mut IntroState, config: &IntroConfig, dt: f64, bus: &mut EventBus) -> bool {
    if state.is_finished() {
        return false;
    }

    state.stage_elapsed += dt;
    while !state.is_finished() {
        let duration = stage_duration(config, state.stage);
        if state.stage_elapsed < duration {
            break;
        }
        state.stage_elapsed -= duration;
        state.stage = state.stage.next();
        log::debug!("intro stage -> {:?}", state.stage);
        bus.publish(GameEvent::IntroStageChanged { stage: state.stage });
    }

    if state.is_finished() {
        state.stage_elapsed = 0.0;
        bus.publish(GameEvent::IntroFinished);
        return true;
    }
    false
}

fn stage_duration(config: &IntroConfig, stage: IntroStage) -> f64 {
    match stage {
        IntroStage::FadeIn => config.fade_in_secs,
        IntroStage::Title => config.title_secs,
        IntroStage::Flyby => config.flyby_secs,
        IntroStage::Handoff => config.handoff_secs,
        IntroStage::Finished => 0.0,
    }
}

fn camera_position(stage: IntroStage, progress: f64) -> Option<Position> {
    let (sx, sy, sz) = STATION_POSITION;
    let wide = DVec3::new(sx, sy, sz) + WIDE_SHOT_OFFSET;
    match stage {
        IntroStage::FadeIn | IntroStage::Title => Some(Position::from_dvec3(wide)),
        IntroStage::Flyby => {
            // Smoothstep easing.
            let t = progress * progress * (3.0 - 2.0 * progress);
            Some(Position::from_dvec3(wide.lerp(CHASE_OFFSET, t)))
        }
        IntroStage::Handoff => Some(Position::from_dvec3(CHASE_OFFSET)),
        IntroStage::Finished => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> IntroConfig {
        IntroConfig {
            enabled: true,
            fade_in_secs: 1.0,
            title_secs: 1.0,
            flyby_secs: 2.0,
            handoff_secs: 0.0,
        }
    }

    #[test]
    fn test_stages_advance_in_order() {
        let config = short_config();
        let mut state = IntroState::default();
        let mut bus = EventBus::new();

        assert!(!run(&mut state, &config, 0.5, &mut bus));
        assert_eq!(state.stage, IntroStage::FadeIn);
        assert!(!run(&mut state, &config, 0.6, &mut bus));
        assert_eq!(state.stage, IntroStage::Title);
        assert!(!run(&mut state, &config, 1.0, &mut bus));
        assert_eq!(state.stage, IntroStage::Flyby);

        // Flyby ends and the zero-length handoff passes in the same frame.
        assert!(run(&mut state, &config, 2.0, &mut bus));
        assert!(state.is_finished());

        bus.dispatch();
        let events = bus.drain_delivered();
        assert_eq!(events.last(), Some(&GameEvent::IntroFinished));
        let stages: Vec<IntroStage> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::IntroStageChanged { stage } => Some(*stage),
                _ => None,
            })
            .collect();
        assert_eq!(
            stages,
            vec![
                IntroStage::Title,
                IntroStage::Flyby,
                IntroStage::Handoff,
                IntroStage::Finished
            ]
        );

        // Finished timelines stay finished.
        assert!(!run(&mut state, &config, 1.0, &mut bus));
    }

    #[test]
    fn test_flyby_camera_moves_toward_chase_position() {
        let config = short_config();
        let mut state = IntroState {
            stage: IntroStage::Flyby,
            stage_elapsed: 0.0,
        };
        let start = state.view(&config).camera.unwrap();
        state.stage_elapsed = 1.0;
        let middle = state.view(&config).camera.unwrap();
        state.stage_elapsed = 2.0;
        let end = state.view(&config).camera.unwrap();

        let chase = Position::from_dvec3(CHASE_OFFSET);
        assert!(start.range_to(&chase) > middle.range_to(&chase));
        assert!(end.range_to(&chase) < 1e-9);
    }

    #[test]
    fn test_skip() {
        let mut state = IntroState::default();
        let mut bus = EventBus::new();
        assert!(state.skip(&mut bus));
        assert!(state.is_finished());
        assert!(!state.skip(&mut bus));
        assert!(state.view(&short_config()).camera.is_none());
    }
}
