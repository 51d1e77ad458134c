use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::notifications::senders::telegram::DEFAULT_API_BASE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML from config file at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to load config from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub data_dir: String,
    pub log_dir: String,
    pub jwt_secret: String,
    pub admin_password: Option<String>,
    pub session_ttl_minutes: i64,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_base: String,
    pub notification_timeout_secs: u64,
    pub notification_queue_capacity: usize,
    pub notification_drain_secs: u64,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug)]
pub struct PartialServerConfig {
    pub bind_addr: Option<String>,
    pub data_dir: Option<String>,
    pub log_dir: Option<String>,
    pub jwt_secret: Option<String>,
    pub admin_password: Option<String>,
    pub session_ttl_minutes: Option<i64>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_base: Option<String>,
    pub notification_timeout_secs: Option<u64>,
    pub notification_queue_capacity: Option<usize>,
    pub notification_drain_secs: Option<u64>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_telegram_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

const DEFAULT_SESSION_TTL_MINUTES: i64 = 12 * 60;
const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 10;
const DEFAULT_NOTIFICATION_QUEUE_CAPACITY: usize = 256;
const DEFAULT_NOTIFICATION_DRAIN_SECS: u64 = 15;
/// One year.
const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Empty strings in `.env` files count as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config = match config_path {
            Some(path_str) => PartialServerConfig::from_file(Path::new(path_str))?,
            None => PartialServerConfig::default(),
        };

        // 2. Load from environment variables
        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()?;

        // 3. Merge: environment overrides file
        Self::merge(env_config, file_config)
    }

    pub fn merge(
        env_config: PartialServerConfig,
        file_config: PartialServerConfig,
    ) -> Result<Self, ConfigError> {
        let session_ttl_minutes = env_config
            .session_ttl_minutes
            .or(file_config.session_ttl_minutes)
            .unwrap_or(DEFAULT_SESSION_TTL_MINUTES);
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&session_ttl_minutes) {
            return Err(ConfigError::OutOfRange {
                name: "SESSION_TTL_MINUTES",
                value: session_ttl_minutes,
                min: 1,
                max: MAX_SESSION_TTL_MINUTES,
            });
        }

        Ok(ServerConfig {
            bind_addr: env_config.bind_addr.or(file_config.bind_addr)
                .unwrap_or_else(default_bind_addr),
            data_dir: env_config.data_dir.or(file_config.data_dir)
                .unwrap_or_else(default_data_dir),
            log_dir: env_config.log_dir.or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
            jwt_secret: non_empty(env_config.jwt_secret)
                .or(non_empty(file_config.jwt_secret))
                .ok_or(ConfigError::Missing("JWT_SECRET"))?,
            admin_password: non_empty(env_config.admin_password)
                .or(non_empty(file_config.admin_password)),
            session_ttl_minutes,
            telegram_bot_token: non_empty(env_config.telegram_bot_token)
                .or(non_empty(file_config.telegram_bot_token)),
            telegram_chat_id: non_empty(env_config.telegram_chat_id)
                .or(non_empty(file_config.telegram_chat_id)),
            telegram_api_base: env_config.telegram_api_base.or(file_config.telegram_api_base)
                .unwrap_or_else(default_telegram_api_base),
            notification_timeout_secs: env_config.notification_timeout_secs
                .or(file_config.notification_timeout_secs)
                .unwrap_or(DEFAULT_NOTIFICATION_TIMEOUT_SECS),
            notification_queue_capacity: env_config.notification_queue_capacity
                .or(file_config.notification_queue_capacity)
                .unwrap_or(DEFAULT_NOTIFICATION_QUEUE_CAPACITY)
                .max(1),
            notification_drain_secs: env_config.notification_drain_secs
                .or(file_config.notification_drain_secs)
                .unwrap_or(DEFAULT_NOTIFICATION_DRAIN_SECS),
        })
    }

    pub fn submissions_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("submissions.json")
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    pub fn notification_drain_deadline(&self) -> Duration {
        Duration::from_secs(self.notification_drain_secs)
    }
}

impl PartialServerConfig {
    /// A missing file yields an empty layer rather than an error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
