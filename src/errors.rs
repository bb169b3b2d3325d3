//! # Application Error Types
//!
//! This module defines the error types shared by the extraction and
//! recommendation engines. Extraction itself never fails: a lookup miss is
//! "no material found". Errors are reserved for malformed inputs and
//! invalid configuration.

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Malformed caller input (non-finite weather values, empty candidate pools)
    InvalidInput(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::InvalidInput(msg) => write!(f, "[INVALID_INPUT] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities
pub mod error_logging {
    use tracing::error;

    /// Log rejected caller input with the operation it was passed to
    pub fn log_invalid_input(
        error: &impl std::fmt::Display,
        operation: &str,
        input_type: &str,
        input_value: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            input_type = %input_type,
            input_value = ?input_value.map(|v| if v.chars().count() > 100 {
                format!("{}...", v.chars().take(100).collect::<String>())
            } else {
                v.to_string()
            }),
            "Invalid input rejected"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(error: &impl std::fmt::Display, config_key: &str, operation: &str) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_tags() {
        assert_eq!(
            AppError::Config("bad threshold".to_string()).to_string(),
            "[CONFIG] bad threshold"
        );
        assert_eq!(
            AppError::InvalidInput("temperature is NaN".to_string()).to_string(),
            "[INVALID_INPUT] temperature is NaN"
        );
        assert_eq!(
            AppError::Internal("oops".to_string()).to_string(),
            "[INTERNAL] oops"
        );
    }

    #[test]
    fn test_from_anyhow() {
        let err: AppError = anyhow::anyhow!("wrapped").into();
        assert_eq!(err, AppError::Internal("wrapped".to_string()));
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<Vec<String>, _> = serde_json::from_str("not json");
        let err: AppError = parse.unwrap_err().into();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
