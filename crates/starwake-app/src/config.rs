//! Runner configuration file.
//!
//! One TOML file holds the gameplay tuning (`[ship]`, `[combat]`, ...) and
//! the key bindings (`[input]`). Every section is optional.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use starwake_core::config::GameConfig;
use starwake_input::KeyBindings;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub game: GameConfig,
    pub input: KeyBindings,
}

impl AppConfig {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents).context("failed to parse TOML")?;
        config.game.validate()?;
        Ok(config)
    }
}
