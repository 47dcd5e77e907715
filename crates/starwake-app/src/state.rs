//! State shared between the runner and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use starwake_core::commands::PlayerCommand;
use starwake_core::state::GameStateSnapshot;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handles held by the runner while the loop is alive.
///
/// The sender sits behind a `Mutex` because `mpsc::Sender` is `Send` but not
/// `Sync`; the latest snapshot is shared with the loop thread for polling.
pub struct AppState {
    /// Channel to the game loop. `None` until the loop is started.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each frame.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a command to the loop. Returns false if the loop is not
    /// running or has already exited.
    pub fn send(&self, command: GameLoopCommand) -> bool {
        match self.command_tx.lock() {
            Ok(guard) => guard
                .as_ref()
                .map(|tx| tx.send(command).is_ok())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Copy of the most recent snapshot, if any frame has run.
    pub fn latest(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot
            .lock()
            .ok()
            .and_then(|lock| lock.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest().is_none());
    }

    #[test]
    fn test_send_without_loop_fails() {
        let state = AppState::new();
        assert!(!state.send(GameLoopCommand::Shutdown));

        let (tx, rx) = mpsc::channel();
        *state.command_tx.lock().unwrap() = Some(tx);
        assert!(state.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause)));
        assert!(matches!(
            rx.try_recv(),
            Ok(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
        ));

        drop(rx);
        assert!(!state.send(GameLoopCommand::Shutdown));
    }
}
