use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use starwake_app::config::AppConfig;
use starwake_app::game_loop::{spawn_game_loop, LoopOptions};
use starwake_app::logging;
use starwake_app::state::{AppState, GameLoopCommand};
use starwake_core::enums::GamePhase;
use starwake_sim::engine::SimConfig;

/// Headless runner for the STARWAKE simulation. Streams snapshots as JSON lines.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with gameplay tuning and key bindings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed. Same seed, same run.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop after this many frames (runs until game over when omitted)
    #[arg(long)]
    frames: Option<u64>,

    /// Skip the opening cinematic
    #[arg(long)]
    skip_intro: bool,

    /// Print every Nth snapshot to stdout (0 disables output)
    #[arg(long, default_value_t = 60)]
    snapshot_every: u64,

    /// Pace frames to wall-clock time
    #[arg(long)]
    realtime: bool,

    /// Leave the ship idle instead of flying the demo pilot
    #[arg(long)]
    no_autopilot: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let options = LoopOptions {
        sim: SimConfig {
            seed: args.seed,
            game: config.game,
        },
        frames: args.frames,
        realtime: args.realtime,
        autopilot: (!args.no_autopilot).then_some(config.input),
        skip_intro: args.skip_intro,
    };

    let app = AppState::new();
    let (snapshot_tx, snapshot_rx) = mpsc::channel();
    let (command_tx, handle) =
        spawn_game_loop(options, snapshot_tx, Arc::clone(&app.latest_snapshot))
            .context("failed to spawn game loop thread")?;
    if let Ok(mut guard) = app.command_tx.lock() {
        *guard = Some(command_tx);
    }

    log::info!("starwake running with seed {}", args.seed);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for snapshot in snapshot_rx {
        let tick = snapshot.time.tick;
        if args.snapshot_every > 0 && tick % args.snapshot_every == 0 {
            serde_json::to_writer(&mut out, &snapshot).context("failed to encode snapshot")?;
            writeln!(out)?;
        }
        if snapshot.phase == GamePhase::GameOver && args.frames.is_none() {
            log::info!(
                "game over at tick {} with score {}",
                tick,
                snapshot.score.score
            );
            serde_json::to_writer(&mut out, &snapshot).context("failed to encode snapshot")?;
            writeln!(out)?;
            app.send(GameLoopCommand::Shutdown);
            break;
        }
    }
    out.flush()?;

    let frames = handle
        .join()
        .map_err(|_| anyhow::anyhow!("game loop thread panicked"))?;
    log::info!("simulation stopped after {} frames", frames);
    Ok(())
}
