//! Engine configuration.
//!
//! Defaults cover Spanish and English clinic exports. A JSON file and
//! `VET_RECORDS_*` environment variables can override them; environment wins.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_CLINIC_HEADER_LINES: &str = "VET_RECORDS_CLINIC_HEADER_LINES";
pub const ENV_CLINIC_SKIP_KEYWORDS: &str = "VET_RECORDS_CLINIC_SKIP_KEYWORDS";
pub const ENV_LOG: &str = "VET_RECORDS_LOG";

/// Configuration errors. Raised at startup, never while extracting.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lines at the top of the document scanned for the clinic name and address
    pub clinic_header_lines: usize,
    /// Header lines containing any of these (case-insensitive) are not clinic lines
    pub clinic_skip_keywords: Vec<String>,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clinic_header_lines: 5,
            clinic_skip_keywords: ["fecha", "datos", "historial", "date", "record", "history"]
                .into_iter()
                .map(String::from)
                .collect(),
            log_filter: default_log_filter().to_string(),
        }
    }
}

pub fn default_log_filter() -> &'static str {
    "info"
}

impl EngineConfig {
    /// Load from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Layer the process environment over this config.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Layer overrides from `lookup` (keyed by the `VET_RECORDS_*` names).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_CLINIC_HEADER_LINES) {
            self.clinic_header_lines = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_CLINIC_HEADER_LINES,
                value: raw.clone(),
            })?;
        }

        if let Some(raw) = lookup(ENV_CLINIC_SKIP_KEYWORDS) {
            self.clinic_skip_keywords = raw
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(raw) = lookup(ENV_LOG) {
            let filter = raw.trim();
            if !filter.is_empty() {
                self.log_filter = filter.to_string();
            }
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.clinic_header_lines == 0 {
            return Err(ConfigError::InvalidValue {
                key: "clinic_header_lines",
                value: "0".into(),
            });
        }
        Ok(())
    }
}
