//! Engine configuration
//!
//! Defaults mirror the classic bot: 10 second sweeps, two minutes per
//! multiplayer turn, 200 cities per game. Every value can be overridden
//! from the environment (the binary loads `.env` first).

use crate::error::ConfigError;
use crate::game::{GameRules, PlayerId};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CITIES_FILE: &str = "cities.txt";
pub const DEFAULT_ENGINE_ID: &str = "goroda-bot";
pub const DEFAULT_LOG_FILE: &str = "goroda.log";

/// Seconds between timeout sweeps
pub const DEFAULT_SWEEP_SECS: u64 = 10;

/// Seconds a multiplayer player has for one turn
pub const DEFAULT_MULTIPLAYER_TURN_SECS: u64 = 120;

/// Seconds an invitation waits for the invitee
pub const DEFAULT_INVITATION_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Optional external city list merged into the built-in one
    pub cities_file: PathBuf,
    /// The engine's own identity; it can never be invited
    pub engine_id: PlayerId,
    pub sweep_interval: Duration,
    pub multiplayer_turn_limit: Duration,
    pub invitation_limit: Duration,
    pub rules: GameRules,
    pub log_file: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cities_file: PathBuf::from(DEFAULT_CITIES_FILE),
            engine_id: PlayerId::from(DEFAULT_ENGINE_ID),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_SECS),
            multiplayer_turn_limit: Duration::from_secs(DEFAULT_MULTIPLAYER_TURN_SECS),
            invitation_limit: Duration::from_secs(DEFAULT_INVITATION_SECS),
            rules: GameRules::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `GORODA_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("GORODA_CITIES_FILE") {
            config.cities_file = PathBuf::from(path);
        }
        if let Some(id) = lookup("GORODA_ENGINE_ID") {
            let id = id.trim();
            if id.is_empty() {
                return Err(ConfigError::Empty {
                    key: "GORODA_ENGINE_ID",
                });
            }
            config.engine_id = PlayerId::from(id);
        }
        if let Some(value) = lookup("GORODA_SWEEP_SECS") {
            config.sweep_interval = seconds("GORODA_SWEEP_SECS", &value)?;
        }
        if let Some(value) = lookup("GORODA_MP_TURN_SECS") {
            config.multiplayer_turn_limit = seconds("GORODA_MP_TURN_SECS", &value)?;
        }
        if let Some(value) = lookup("GORODA_INVITE_SECS") {
            config.invitation_limit = seconds("GORODA_INVITE_SECS", &value)?;
        }
        if let Some(path) = lookup("GORODA_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }

        Ok(config)
    }
}

fn seconds(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidSeconds {
            key,
            value: value.to_string(),
        }),
    }
}
