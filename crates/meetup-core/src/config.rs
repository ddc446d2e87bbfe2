//! Configuration model
//!
//! Resolution order: built-in defaults, then a TOML file, then `MEETUP_*`
//! environment variables, then validation. Environment keys map onto
//! `section.key` by splitting at the first underscore after the prefix, so
//! `MEETUP_RAFFLE_SERIALIZE_DRAWS` sets `raffle.serialize_draws`. Variables
//! that do not name a known key are skipped.

use crate::errors::{MeetupError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "MEETUP_";

/// Minimum accepted token secret length in bytes
pub const MIN_SECRET_LEN: usize = 16;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Keys accepted by [`MeetupConfig::set_from_string`]
pub const CONFIG_KEYS: [&str; 6] = [
    "auth.token_secret",
    "auth.token_ttl_secs",
    "raffle.serialize_draws",
    "raffle.max_winners_per_draw",
    "live.channel_capacity",
    "log.level",
];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetupConfig {
    /// Token signing
    pub auth: AuthConfig,
    /// Draw behaviour
    pub raffle: RaffleConfig,
    /// Live display channel
    pub live: LiveConfig,
    /// Logging
    pub log: LogConfig,
}

/// Token signing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret shared by issuer and verifier
    pub token_secret: String,
    /// Lifetime of issued tokens in seconds
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: String::new(),
            token_ttl_secs: 60 * 60 * 24,
        }
    }
}

/// Draw settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaffleConfig {
    /// Hold a per-meetup lock across read-select-append and count unclaimed
    /// wins against eligibility. Off by default: concurrent draws may pick the
    /// same ticket before either win is claimed.
    pub serialize_draws: bool,
    /// Upper bound for multi-winner draws
    pub max_winners_per_draw: u32,
}

impl Default for RaffleConfig {
    fn default() -> Self {
        Self {
            serialize_draws: false,
            max_winners_per_draw: 10,
        }
    }
}

/// Live display channel settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Events buffered per subscriber before lagging ones drop messages
    pub channel_capacity: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl MeetupConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| MeetupError::invalid(format!("Invalid TOML: {e}")))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MeetupError::invalid(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Full resolution: file (if given) or defaults, environment, validation
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MEETUP_*` overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `MEETUP_*` overrides from an explicit variable list
    pub fn merge_with_vars(&mut self, vars: impl IntoIterator<Item = (String, String)>) -> Result<()> {
        for (key, value) in vars {
            let Some(rest) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let Some((section, field)) = rest.split_once('_') else {
                continue;
            };
            let config_key = format!("{}.{}", section.to_lowercase(), field.to_lowercase());
            if !CONFIG_KEYS.contains(&config_key.as_str()) {
                tracing::warn!(variable = %key, "ignoring unknown environment override");
                continue;
            }
            tracing::debug!(key = %config_key, "applying environment override");
            self.set_from_string(&config_key, &value)?;
        }
        Ok(())
    }

    /// Set a configuration value from a `section.key` string
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "auth.token_secret" => self.auth.token_secret = value.to_string(),
            "auth.token_ttl_secs" => self.auth.token_ttl_secs = parse_value(key, value)?,
            "raffle.serialize_draws" => self.raffle.serialize_draws = parse_value(key, value)?,
            "raffle.max_winners_per_draw" => {
                self.raffle.max_winners_per_draw = parse_value(key, value)?;
            }
            "live.channel_capacity" => self.live.channel_capacity = parse_value(key, value)?,
            "log.level" => self.log.level = value.to_lowercase(),
            _ => return Err(MeetupError::invalid(format!("Unknown config key: {key}"))),
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.token_secret.len() < MIN_SECRET_LEN {
            return Err(MeetupError::invalid(format!(
                "auth.token_secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(MeetupError::invalid("auth.token_ttl_secs must be positive"));
        }
        if self.raffle.max_winners_per_draw == 0 {
            return Err(MeetupError::invalid(
                "raffle.max_winners_per_draw must be positive",
            ));
        }
        if self.live.channel_capacity == 0 {
            return Err(MeetupError::invalid("live.channel_capacity must be positive"));
        }
        if !LOG_LEVELS.contains(&self.log.level.as_str()) {
            return Err(MeetupError::invalid(format!(
                "log.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| MeetupError::invalid(format!("Invalid value for {key}: {e}")))
}
