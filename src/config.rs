//! Settings: engine location and the per-move thinking budget.
//!
//! Read from `settings.json` in the platform config directory, e.g.
//! `~/.config/kingcap-chess/settings.json`. A missing or broken file means
//! defaults. `CHESS_ENGINE_PATH` and `CHESS_MOVE_TIME_MS` override the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

const SETTINGS_FILENAME: &str = "settings.json";
pub const ENGINE_PATH_ENV: &str = "CHESS_ENGINE_PATH";
pub const MOVE_TIME_ENV: &str = "CHESS_MOVE_TIME_MS";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Executable speaking UCI on stdin/stdout
    pub path: PathBuf,
    pub args: Vec<String>,
    /// Sent as `setoption` during the handshake, e.g. `"Skill Level": "5"`
    pub options: BTreeMap<String, String>,
    /// Thinking time handed to `go movetime`
    pub move_time_ms: u64,
    /// Extra wait on top of the thinking time before the engine counts as hung
    pub reply_grace_ms: u64,
    pub handshake_timeout_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockfish"),
            args: Vec::new(),
            options: BTreeMap::new(),
            move_time_ms: 100,
            reply_grace_ms: 2000,
            handshake_timeout_ms: 5000,
        }
    }
}

impl EngineSettings {
    pub fn move_time(&self) -> Duration {
        Duration::from_millis(self.move_time_ms)
    }

    pub fn reply_grace(&self) -> Duration {
        Duration::from_millis(self.reply_grace_ms)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    /// Starting position instead of the standard one
    pub start_fen: Option<String>,
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Settings file if present and valid, defaults otherwise, then the
    /// environment overrides.
    pub fn load() -> Self {
        let mut settings = match settings_path() {
            Some(path) if path.exists() => match Self::from_file(&path) {
                Ok(settings) => {
                    info!("loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("ignoring settings file {:?}: {}", path, e);
                    Self::default()
                }
            },
            _ => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var(ENGINE_PATH_ENV).filter(|p| !p.is_empty()) {
            self.engine.path = PathBuf::from(path);
        }
        if let Some(ms) = var(MOVE_TIME_ENV) {
            match ms.parse() {
                Ok(ms) => self.engine.move_time_ms = ms,
                Err(_) => warn!("{} is not a number of milliseconds: {:?}", MOVE_TIME_ENV, ms),
            }
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "kingcap-chess").map(|dirs| dirs.config_dir().join(SETTINGS_FILENAME))
}
