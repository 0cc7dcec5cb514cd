//! Application-level configuration loading: default team sizes and where the
//! session log lives.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::game::clamp_team_size;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MAFIA_MODERATOR_CONFIG_PATH";
/// Default location of the session log.
const DEFAULT_SESSIONS_PATH: &str = "data/mafia-sessions.json";
const DEFAULT_RED_PLAYERS: u32 = 7;
const DEFAULT_BLACK_PLAYERS: u32 = 3;
const DEFAULT_EVENTS_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    red_players: u32,
    black_players: u32,
    sessions_path: Option<PathBuf>,
    events_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        red = app_config.red_players,
                        black = app_config.black_players,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document; missing keys take their defaults.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Configuration that keeps the session log in memory.
    pub fn in_memory() -> Self {
        Self {
            sessions_path: None,
            ..Self::default()
        }
    }

    /// Red team size a new game starts with.
    pub fn red_players(&self) -> u32 {
        self.red_players
    }

    /// Black team size a new game starts with.
    pub fn black_players(&self) -> u32 {
        self.black_players
    }

    /// Session log file, or `None` to keep the log in memory.
    pub fn sessions_path(&self) -> Option<&PathBuf> {
        self.sessions_path.as_ref()
    }

    /// Capacity of the event broadcast channel.
    pub fn events_capacity(&self) -> usize {
        self.events_capacity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            red_players: DEFAULT_RED_PLAYERS,
            black_players: DEFAULT_BLACK_PLAYERS,
            sessions_path: Some(PathBuf::from(DEFAULT_SESSIONS_PATH)),
            events_capacity: DEFAULT_EVENTS_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    red_players: Option<i64>,
    #[serde(default)]
    black_players: Option<i64>,
    #[serde(default = "default_sessions_path")]
    sessions_path: Option<String>,
    #[serde(default)]
    events_capacity: Option<usize>,
}

fn default_sessions_path() -> Option<String> {
    Some(DEFAULT_SESSIONS_PATH.to_string())
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            red_players: value
                .red_players
                .map(clamp_team_size)
                .unwrap_or(DEFAULT_RED_PLAYERS),
            black_players: value
                .black_players
                .map(clamp_team_size)
                .unwrap_or(DEFAULT_BLACK_PLAYERS),
            sessions_path: value
                .sessions_path
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            events_capacity: value
                .events_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(DEFAULT_EVENTS_CAPACITY),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
