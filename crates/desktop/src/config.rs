//! Start-up configuration.
//!
//! Built-in defaults, overridden by environment variables:
//!
//! - `STOCKROOM_SEED_SAMPLE_DATA`: load the demonstration records (`true`/`false`)
//! - `STOCKROOM_LOG`: fallback log filter when `RUST_LOG` is unset
//! - `STOCKROOM_LOG_FORMAT`: `json` or `pretty`
//! - `STOCKROOM_PROMPT`: console prompt

use serde::Deserialize;
use thiserror::Error;

use stockroom_observability::tracing::{LogFormat, LogSettings};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: expected a boolean, got `{value}`")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub seed_sample_data: bool,
    pub log: LogSettings,
    pub prompt: String,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
            log: LogSettings::default(),
            prompt: "> ".to_string(),
        }
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

impl DesktopConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("STOCKROOM_SEED_SAMPLE_DATA") {
            config.seed_sample_data = parse_bool("STOCKROOM_SEED_SAMPLE_DATA", &value)?;
        }
        if let Some(filter) = lookup("STOCKROOM_LOG") {
            config.log.filter = filter;
        }
        if let Some(format) = lookup("STOCKROOM_LOG_FORMAT") {
            config.log.format = format
                .parse::<LogFormat>()
                .map_err(|reason| ConfigError::Invalid {
                    var: "STOCKROOM_LOG_FORMAT",
                    reason,
                })?;
        }
        if let Some(prompt) = lookup("STOCKROOM_PROMPT") {
            config.prompt = prompt;
        }

        Ok(config)
    }
}
