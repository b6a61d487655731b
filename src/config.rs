//! Configuration management with validation and defaults
//!
//! Layered: TOML file, then environment variables, then CLI flags in `main`.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Service configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuletaConfig {
    pub server: ServerConfig,
    pub game: GameConfig,
    pub storage: StorageConfig,
}

/// HTTP gateway configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

/// Game pacing and economy configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds between draws once a chat is armed
    pub round_interval_secs: u64,
    /// Chips granted on a player's first contact
    pub starting_balance: u64,
    /// Rows shown by the ranking command
    pub ranking_size: usize,
    /// The bot's own chat account id; admin grants must never credit it
    pub bot_player_id: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_interval_secs: 120,
            starting_balance: 1_000,
            ranking_size: 10,
            bot_player_id: None,
        }
    }
}

/// Storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./DB/ruleta_data".to_string(),
        }
    }
}

impl RuletaConfig {
    /// Load from a TOML file, then apply environment overrides
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path.as_ref())?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::LoadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(interval) = env::var("ROUND_INTERVAL_SECONDS") {
            self.game.round_interval_secs = interval.parse().map_err(|_| ConfigError::InvalidValue {
                field: "ROUND_INTERVAL_SECONDS".to_string(),
                value: interval,
                reason: "not a whole number of seconds".to_string(),
            })?;
        }
        if let Ok(data_dir) = env::var("RULETA_DB_PATH") {
            self.storage.data_dir = data_dir;
        }
        if let Ok(listen) = env::var("RULETA_LISTEN") {
            let (host, port) = listen.rsplit_once(':').ok_or_else(|| ConfigError::InvalidValue {
                field: "RULETA_LISTEN".to_string(),
                value: listen.clone(),
                reason: "expected host:port".to_string(),
            })?;
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                field: "RULETA_LISTEN".to_string(),
                value: listen.clone(),
                reason: "invalid port number".to_string(),
            })?;
            self.server.host = host.to_string();
        }
        Ok(())
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.round_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "game.round_interval_secs".to_string(),
                value: "0".to_string(),
                reason: "the wheel cannot spin continuously".to_string(),
            });
        }
        if self.game.ranking_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "game.ranking_size".to_string(),
                value: "0".to_string(),
                reason: "ranking must show at least one row".to_string(),
            });
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.request_timeout_secs".to_string(),
                value: "0".to_string(),
                reason: "requests need a nonzero deadline".to_string(),
            });
        }
        Ok(())
    }

    pub fn round_interval(&self) -> Duration {
        Duration::from_secs(self.game.round_interval_secs)
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}
