//! Environment-sourced bot configuration.
//!
//! Loaded once at startup and passed into each component explicitly;
//! nothing reads the environment after [`BotConfig::from_env`] returns.

use std::path::PathBuf;

use crate::error::ConfigError;

/// Default directory for the append-only log files.
pub const DEFAULT_LOGS_DIR: &str = "logs";

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Discord bot token (secret, required).
    pub discord_token: String,
    /// Guild flagged as "(TEST SERVER)" in the connection banner.
    pub test_guild_id: u64,
    /// The only user whose magic-trigger messages are honored.
    pub magic_user_id: u64,
    /// Where `main.log`, `auth.log`, and `err.log` live.
    pub logs_dir: PathBuf,
}

impl BotConfig {
    /// Load and validate configuration from the environment.
    ///
    /// Id variables are parsed eagerly so a malformed value fails at
    /// startup with the variable named, instead of surfacing later as an
    /// unguarded parse inside an event handler.
    ///
    /// # Environment Variables
    ///
    /// - `DISCORD_TOKEN` -> discord_token (required)
    /// - `TEST_GUILD_ID` -> test_guild_id (required, numeric)
    /// - `MAGIC_USER_ID` -> magic_user_id (required, numeric)
    pub fn from_env() -> Result<Self, ConfigError> {
        let discord_token = require("DISCORD_TOKEN")?;
        let test_guild_id = parse_id("TEST_GUILD_ID", &require("TEST_GUILD_ID")?)?;
        let magic_user_id = parse_id("MAGIC_USER_ID", &require("MAGIC_USER_ID")?)?;

        Ok(Self {
            discord_token,
            test_guild_id,
            magic_user_id,
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
        })
    }
}

/// Read a required variable, treating empty values as missing.
fn require(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar { var })
}

/// Parse a numeric Discord id, rejecting rather than panicking on bad input.
fn parse_id(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidId {
        var,
        value: value.to_string(),
    })
}
