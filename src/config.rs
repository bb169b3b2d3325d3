//! # Unified Application Configuration
//!
//! Matching thresholds and logging settings, loaded from environment
//! variables with validated defaults.

use crate::errors::{error_logging, AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Tunables for material extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum fuzzy score (inclusive) for a candidate to be accepted, 0-100
    pub fuzzy_threshold: f64,
    /// Number of ranked candidates requested from the fuzzy matcher
    pub fuzzy_candidate_limit: usize,
    /// Maximum character-length difference for a containment match
    pub containment_max_length_difference: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 70.0,
            fuzzy_candidate_limit: 3,
            containment_max_length_difference: 2,
        }
    }
}

impl ExtractionConfig {
    /// Load extraction settings, falling back to defaults for unset variables
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();
        let config = Self {
            fuzzy_threshold: parse_env_or("MATERIAL_FUZZY_THRESHOLD", defaults.fuzzy_threshold)?,
            fuzzy_candidate_limit: parse_env_or(
                "MATERIAL_FUZZY_CANDIDATE_LIMIT",
                defaults.fuzzy_candidate_limit,
            )?,
            containment_max_length_difference: parse_env_or(
                "MATERIAL_CONTAINMENT_MAX_LENGTH_DIFF",
                defaults.containment_max_length_difference,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate extraction configuration
    pub fn validate(&self) -> AppResult<()> {
        if !self.fuzzy_threshold.is_finite() || !(0.0..=100.0).contains(&self.fuzzy_threshold) {
            return Err(AppError::Config(format!(
                "fuzzy_threshold must be between 0 and 100, got {}",
                self.fuzzy_threshold
            )));
        }

        if self.fuzzy_candidate_limit == 0 {
            return Err(AppError::Config(
                "fuzzy_candidate_limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level directive for this crate (`trace`, `debug`, `info`, `warn`, `error`)
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Load logging settings from `LOG_LEVEL` and `LOG_FORMAT`
    pub fn from_env() -> AppResult<Self> {
        let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(AppError::Config(format!(
                    "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                    other
                )))
            }
        };
        let config = Self { level, format };
        config.validate()?;
        Ok(config)
    }

    /// Validate logging configuration
    pub fn validate(&self) -> AppResult<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "Log level '{}' is invalid. Expected one of: {}",
                self.level,
                LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Material extraction configuration
    pub extraction: ExtractionConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            extraction: ExtractionConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.extraction.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: fuzzy_threshold={}, fuzzy_candidate_limit={}, containment_max_length_difference={}, log_level={}, log_format={:?}",
            self.extraction.fuzzy_threshold,
            self.extraction.fuzzy_candidate_limit,
            self.extraction.containment_max_length_difference,
            self.logging.level,
            self.logging.format
        )
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number", key)))
            .inspect_err(|e| error_logging::log_config_error(e, key, "parse_env")),
        Err(_) => Ok(default),
    }
}
