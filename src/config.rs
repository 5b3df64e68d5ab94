use crate::engine::{Board, BoardError};
use crate::game::Game;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}

/// Settings for a terminal session, read from TOML.
///
/// ```toml
/// seed = 7
/// log = "debug"
/// autostart = true
/// initial_board = [[2, 0, 0, 2], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayConfig {
    /// Seed for tile placement. Absent means OS entropy.
    pub seed: Option<u64>,
    /// Board to start from and return to on restart. Absent means empty.
    pub initial_board: Option<Board>,
    /// Tracing filter, e.g. "info" or "play_2048=debug".
    pub log: String,
    /// Start the game immediately instead of waiting for `start`.
    pub autostart: bool,
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayOverrides {
    pub seed: Option<u64>,
    pub initial_board: Option<Board>,
    pub log: Option<String>,
    pub autostart: bool,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            seed: None,
            initial_board: None,
            log: defaults::log(),
            autostart: defaults::autostart(),
        }
    }
}

impl PlayConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Read a board in the plain text layout accepted by `Board::from_str`.
    pub fn board_from_path<P: AsRef<Path>>(path: P) -> Result<Board, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(text.parse()?)
    }

    pub fn overlay(mut self, overrides: PlayOverrides) -> Self {
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if overrides.initial_board.is_some() {
            self.initial_board = overrides.initial_board;
        }
        if let Some(log) = overrides.log {
            self.log = log;
        }
        self.autostart |= overrides.autostart;
        self
    }

    pub fn build_game(&self) -> Game<StdRng> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Game::with_board(self.initial_board.unwrap_or(Board::EMPTY), rng)
    }
}

mod defaults {
    pub fn log() -> String { "warn".to_string() }
    pub fn autostart() -> bool { false }
}
