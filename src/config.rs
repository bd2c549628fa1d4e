//! Gateway configuration
//!
//! Read from environment variables with built-in defaults:
//!
//! | Variable              | Default                                             |
//! |-----------------------|-----------------------------------------------------|
//! | `GEMINI_API_KEY`      | required                                            |
//! | `KRISHI_MODELS`       | [`DEFAULT_MODELS`], comma-separated                 |
//! | `KRISHI_BASE_URL`     | [`DEFAULT_BASE_URL`]                                |
//! | `KRISHI_TIMEOUT_SECS` | 30                                                  |

use crate::dispatch::DEFAULT_ATTEMPT_TIMEOUT;
use crate::error::ConfigError;
use crate::roster::ModelRoster;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default roster, tried in this order.
pub const DEFAULT_MODELS: &[&str] = &[
    "models/gemini-1.5-flash-latest",
    "models/gemini-1.5-flash",
    "models/gemini-1.5-pro-latest",
];

pub const DEFAULT_TIMEOUT_SECS: u64 = DEFAULT_ATTEMPT_TIMEOUT.as_secs();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub api_key: String,
    pub models: Vec<String>,
    pub base_url: String,
    pub attempt_timeout: Duration,
}

impl GatewayConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let models = match lookup("KRISHI_MODELS") {
            Some(list) => parse_model_list(&list)?,
            None => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        };

        let base_url = lookup("KRISHI_BASE_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match lookup("KRISHI_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "KRISHI_TIMEOUT_SECS",
                        value: raw,
                    });
                }
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            models,
            base_url,
            attempt_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Fresh roster over the configured models, cursor at the first one.
    pub fn roster(&self) -> Result<ModelRoster, ConfigError> {
        ModelRoster::new(self.models.iter().cloned())
    }
}

fn parse_model_list(list: &str) -> Result<Vec<String>, ConfigError> {
    let models: Vec<String> = list
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect();
    if models.is_empty() {
        return Err(ConfigError::EmptyRoster);
    }
    Ok(models)
}
