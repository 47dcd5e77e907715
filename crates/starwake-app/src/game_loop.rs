//! Game loop thread. Owns the simulation engine, ticks it at 60Hz and emits
//! snapshots.
//!
//! Commands arrive via `mpsc` channel. Snapshots are sent to the runner over a
//! second channel and stored in shared state for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use starwake_core::commands::PlayerCommand;
use starwake_core::constants::TICK_RATE;
use starwake_core::state::GameStateSnapshot;
use starwake_input::KeyBindings;
use starwake_sim::engine::{SimConfig, SimulationEngine};

use crate::autopilot::Autopilot;
use crate::state::GameLoopCommand;

/// Nominal duration of one frame.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// How the loop should run.
#[derive(Debug, Clone)]
pub struct LoopOptions {
    pub sim: SimConfig,
    /// Stop after this many frames. `None` runs until shutdown.
    pub frames: Option<u64>,
    /// Pace frames to wall-clock time instead of running flat out.
    pub realtime: bool,
    /// Let the demo pilot fly. `None` leaves the ship to external commands.
    pub autopilot: Option<KeyBindings>,
    /// Skip the intro before the first frame runs.
    pub skip_intro: bool,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and a handle yielding the number of frames run.
pub fn spawn_game_loop(
    options: LoopOptions,
    snapshot_tx: mpsc::Sender<GameStateSnapshot>,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<u64>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("starwake-game-loop".into())
        .spawn(move || run_game_loop(options, cmd_rx, snapshot_tx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until the frame limit is reached, a Shutdown command
/// arrives, or either channel disconnects.
fn run_game_loop(
    options: LoopOptions,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snapshot_tx: mpsc::Sender<GameStateSnapshot>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) -> u64 {
    let mut engine = SimulationEngine::new(options.sim);
    if options.skip_intro {
        engine.queue_command(PlayerCommand::SkipIntro);
    }
    let mut pilot = options.autopilot.map(Autopilot::new);
    let mut last_snapshot: Option<GameStateSnapshot> = None;
    let mut frames_run: u64 = 0;
    let mut next_tick_time = Instant::now();

    log::info!("game loop started");
    loop {
        if options.frames.is_some_and(|limit| frames_run >= limit) {
            log::info!("frame limit reached after {} frames", frames_run);
            return frames_run;
        }

        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => {
                    log::info!("shutdown after {} frames", frames_run);
                    return frames_run;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return frames_run,
            }
        }

        // 2. Demo pilot reacts to the previous frame
        if let (Some(pilot), Some(snapshot)) = (pilot.as_mut(), last_snapshot.as_ref()) {
            engine.queue_commands(pilot.commands(snapshot));
        }

        // 3. Advance one frame (engine handles phase semantics internally)
        let snapshot = engine.tick();
        frames_run += 1;

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        // 5. Hand the snapshot to the runner
        if snapshot_tx.send(snapshot.clone()).is_err() {
            return frames_run;
        }
        last_snapshot = Some(snapshot);

        // 6. Sleep until next frame
        if options.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind, skip the backlog
                next_tick_time = now;
            }
        }
    }
}
