//! Configuration validation rules.
//!
//! - The display name pattern and executable name must be non-empty
//! - The executable name must end in `.exe`
//! - Timeouts must be greater than zero

use crate::config::schema::ScoutConfig;
use crate::discovery::path::EXE_EXTENSION;
use crate::error::{Result, ScoutError};

/// Validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &ScoutConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let target = &config.target;

    if target.display_name_pattern.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-pattern",
            "target.display_name_pattern must not be empty",
        ));
    }

    let exe = target.exe_file_name.trim();
    if exe.is_empty() {
        errors.push(ValidationError::new(
            "empty-exe",
            "target.exe_file_name must not be empty",
        ));
    } else if !exe.to_ascii_lowercase().ends_with(EXE_EXTENSION) {
        errors.push(ValidationError::new(
            "exe-extension",
            format!("target.exe_file_name '{}' must end in {}", exe, EXE_EXTENSION),
        ));
    }

    let timeouts = [
        ("registry.timeout_secs", config.registry.timeout_secs),
        ("launch.start_timeout_secs", config.launch.start_timeout_secs),
        ("launch.stop_timeout_secs", config.launch.stop_timeout_secs),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::new(
                "zero-timeout",
                format!("{} must be greater than zero", field),
            ));
        }
    }

    errors
}

/// Validate and return an error if invalid.
pub fn validate(config: &ScoutConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(ScoutError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
