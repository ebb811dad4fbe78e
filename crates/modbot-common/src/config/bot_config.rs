//! Bot configuration
//!
//! Loads typed configuration from environment variables (with an optional
//! `.env` file). Required keys fail fast at startup; numeric keys that do
//! not parse are reported separately from missing keys.

use serde::Deserialize;
use std::env;

use modbot_core::{EscalationThresholds, GovernedRoles, Snowflake};

/// Configuration errors - fatal at startup only
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Invalid escalation thresholds: {0}")]
    InvalidThresholds(String),
}

/// Main bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Command prefix, e.g. "!"
    pub prefix: String,
    /// Roles the reconciliation service governs
    pub roles: GovernedRoles,
    /// Warn-count thresholds for automatic moderation actions
    pub thresholds: EscalationThresholds,
    /// Channel commands are restricted to, if any
    pub command_channel: Option<Snowflake>,
    /// Channel to mirror moderation activity into, if any
    pub log_channel: Option<Snowflake>,
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file first if present (ignored when absent).
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let thresholds = EscalationThresholds {
            first_auto_mute: require_u32(&lookup, "MODBOT_AUTO_MUTE_FIRST")?,
            second_auto_mute: require_u32(&lookup, "MODBOT_AUTO_MUTE_SECOND")?,
            auto_ban: require_u32(&lookup, "MODBOT_AUTO_BAN")?,
        };

        if thresholds.first_auto_mute == 0 || thresholds.auto_ban <= thresholds.first_auto_mute {
            return Err(ConfigError::InvalidThresholds(format!(
                "auto-ban threshold ({}) must exceed the first auto-mute threshold ({})",
                thresholds.auto_ban, thresholds.first_auto_mute
            )));
        }

        Ok(Self {
            prefix: lookup("MODBOT_PREFIX").unwrap_or_else(|| "!".to_string()),
            roles: GovernedRoles {
                member_role: require_snowflake(&lookup, "MODBOT_MEMBER_ROLE")?,
                punished_role: require_snowflake(&lookup, "MODBOT_PUNISHED_ROLE")?,
            },
            thresholds,
            command_channel: optional_snowflake(&lookup, "MODBOT_COMMAND_CHANNEL")?,
            log_channel: optional_snowflake(&lookup, "MODBOT_LOG_CHANNEL")?,
        })
    }
}

fn require_var<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or(ConfigError::MissingVar(key))
}

fn require_u32<F>(lookup: &F, key: &'static str) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = require_var(lookup, key)?;
    raw.parse()
        .map_err(|_| ConfigError::InvalidValue(key, raw))
}

fn require_snowflake<F>(lookup: &F, key: &'static str) -> Result<Snowflake, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = require_var(lookup, key)?;
    Snowflake::parse(&raw).map_err(|_| ConfigError::InvalidValue(key, raw))
}

fn optional_snowflake<F>(lookup: &F, key: &'static str) -> Result<Option<Snowflake>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => Snowflake::parse(&raw)
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}
