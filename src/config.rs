use std::time::Duration;

use crate::error::{config::ConfigError, AppError};

const DEFAULT_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_GATEWAY_CALL_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SYNC_MAX_ATTEMPTS: u32 = 4;
const DEFAULT_SYNC_BACKOFF_BASE_SECS: u64 = 2;
const DEFAULT_RESYNC_STALE_MINUTES: i64 = 30;

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    /// Discord channel that receives operator alerts. Alerts fall back to
    /// the log when unset.
    pub operator_channel_id: Option<u64>,

    /// Upper bound on waiting for a pooled database connection.
    pub pool_acquire_timeout: Duration,
    /// Deadline applied to every remote command-registration call.
    pub gateway_call_timeout: Duration,
    /// Sync attempts per server-available event before giving up.
    pub sync_max_attempts: u32,
    /// First retry delay; doubles on each subsequent attempt.
    pub sync_backoff_base: Duration,
    /// Age after which the resync sweep re-kicks an active server.
    pub resync_stale_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            discord_bot_token: std::env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            operator_channel_id: optional_parsed("OPERATOR_CHANNEL_ID")?,
            pool_acquire_timeout: Duration::from_secs(
                optional_parsed("POOL_ACQUIRE_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_POOL_ACQUIRE_TIMEOUT_SECS),
            ),
            gateway_call_timeout: Duration::from_secs(
                optional_parsed("GATEWAY_CALL_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_GATEWAY_CALL_TIMEOUT_SECS),
            ),
            sync_max_attempts: optional_parsed("SYNC_MAX_ATTEMPTS")?
                .unwrap_or(DEFAULT_SYNC_MAX_ATTEMPTS),
            sync_backoff_base: Duration::from_secs(
                optional_parsed("SYNC_BACKOFF_BASE_SECS")?
                    .unwrap_or(DEFAULT_SYNC_BACKOFF_BASE_SECS),
            ),
            resync_stale_minutes: optional_parsed("RESYNC_STALE_MINUTES")?
                .unwrap_or(DEFAULT_RESYNC_STALE_MINUTES),
        })
    }
}

/// Reads an optional environment variable and parses it, distinguishing
/// "unset" (fine, use the default) from "set but garbage" (config error).
fn optional_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
