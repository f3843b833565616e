use serde::{Deserialize, Serialize};

use crate::protocol::{ASK_PATH, HEALTH_PATH};
use crate::schedule::DEFAULT_STAGGER_MS;

/// Upper bound for a page-supplied stagger.
pub const MAX_STAGGER_MS: u32 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    EmptyEndpoint { field: &'static str },
    #[error("{field} must start with `/` or http(s)://, got `{value}`")]
    InvalidEndpoint { field: &'static str, value: String },
    #[error("staggerMs must be greater than zero")]
    ZeroStagger,
    #[error("staggerMs must be at most {max}, got {value}")]
    StaggerTooLarge { value: u32, max: u32 },
    #[error("unknown log level `{0}`")]
    UnknownLogLevel(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ConfigError::UnknownLogLevel(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub ask_path: String,
    pub health_path: String,
    pub stagger_ms: u32,
    pub log_level: LogLevel,
    pub probe_health: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            ask_path: ASK_PATH.to_string(),
            health_path: HEALTH_PATH.to_string(),
            stagger_ms: DEFAULT_STAGGER_MS,
            log_level: LogLevel::default(),
            probe_health: true,
        }
    }
}

/// Raw page-supplied overrides. Every field is optional and validated on its
/// own; one bad field never discards the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub ask_path: Option<String>,
    pub health_path: Option<String>,
    pub stagger_ms: Option<u32>,
    pub log_level: Option<String>,
    pub probe_health: Option<bool>,
}

impl WidgetConfig {
    /// Applies overrides on top of `self`, keeping the current value for any
    /// field that fails validation. Rejected fields are returned so the
    /// caller can log them.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> (Self, Vec<ConfigError>) {
        let mut rejected = Vec::new();

        if let Some(raw) = overrides.ask_path {
            match normalize_endpoint("askPath", &raw) {
                Ok(path) => self.ask_path = path,
                Err(error) => rejected.push(error),
            }
        }
        if let Some(raw) = overrides.health_path {
            match normalize_endpoint("healthPath", &raw) {
                Ok(path) => self.health_path = path,
                Err(error) => rejected.push(error),
            }
        }
        match overrides.stagger_ms {
            Some(0) => rejected.push(ConfigError::ZeroStagger),
            Some(value) if value > MAX_STAGGER_MS => {
                rejected.push(ConfigError::StaggerTooLarge {
                    value,
                    max: MAX_STAGGER_MS,
                });
            }
            Some(stagger_ms) => self.stagger_ms = stagger_ms,
            None => {}
        }
        if let Some(raw) = overrides.log_level {
            match raw.parse() {
                Ok(level) => self.log_level = level,
                Err(error) => rejected.push(error),
            }
        }
        if let Some(probe_health) = overrides.probe_health {
            self.probe_health = probe_health;
        }

        (self, rejected)
    }
}

pub fn normalize_endpoint(field: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyEndpoint { field });
    }
    let absolute = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    if !(trimmed.starts_with('/') || absolute) {
        return Err(ConfigError::InvalidEndpoint {
            field,
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
