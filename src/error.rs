//! Error types for appscout operations.
//!
//! This module defines [`ScoutError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Transport errors (`RegistryTimeout`, `RegistryFailed`) always propagate
//!   to the immediate caller
//! - A missing key or value is not an error: readers return `Ok(None)` and
//!   existence probes return [`Presence::Absent`](crate::registry::Presence)
//! - `AssertionErrored` and `RunAborted` terminate a suite run
//! - Use `anyhow::Error` (via `ScoutError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Marker text `reg.exe` prints when the queried key or value does not exist.
const ABSENT_MARKER: &str = "unable to find";

/// Core error type for appscout operations.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// A registry query exceeded its deadline and the process was killed.
    #[error("Registry command timed out after {timeout_secs}s: {command}")]
    RegistryTimeout { command: String, timeout_secs: u64 },

    /// A registry command exited with a non-zero status.
    #[error("Registry command failed with exit code {code:?}: {command}: {stderr}")]
    RegistryFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A check raised instead of returning a verdict. Aborts the run.
    #[error("{check} threw: {message}")]
    AssertionErrored { check: String, message: String },

    /// The run was aborted by policy (missing app, version mismatch).
    #[error("Run aborted: {message}")]
    RunAborted { message: String },

    /// Starting or stopping the target application failed.
    #[error("Failed to launch '{target}': {message}")]
    LaunchFailed { target: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScoutError {
    /// Whether this error means "the key or value does not exist".
    ///
    /// Only a completed `reg.exe` run reporting the lookup miss counts.
    /// Timeouts, access denied and spawn failures are real failures.
    pub fn is_value_absent(&self) -> bool {
        match self {
            ScoutError::RegistryFailed { stderr, .. } => {
                stderr.to_ascii_lowercase().contains(ABSENT_MARKER)
            }
            _ => false,
        }
    }

    /// Whether this error should terminate a suite run.
    pub fn is_abort(&self) -> bool {
        matches!(
            self,
            ScoutError::AssertionErrored { .. } | ScoutError::RunAborted { .. }
        )
    }
}

/// Result type alias for appscout operations.
pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_timeout_displays_command_and_secs() {
        let err = ScoutError::RegistryTimeout {
            command: "reg query HKCU\\Software".into(),
            timeout_secs: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("HKCU\\Software"));
        assert!(msg.contains("10s"));
    }

    #[test]
    fn registry_failed_displays_stderr() {
        let err = ScoutError::RegistryFailed {
            command: "reg query HKLM\\X".into(),
            code: Some(1),
            stderr: "ERROR: Access is denied.".into(),
        };
        assert!(err.to_string().contains("Access is denied"));
    }

    #[test]
    fn absent_marker_is_value_absent() {
        let err = ScoutError::RegistryFailed {
            command: "reg query HKCU\\Nope".into(),
            code: Some(1),
            stderr: "ERROR: The system was unable to find the specified registry key or value."
                .into(),
        };
        assert!(err.is_value_absent());
    }

    #[test]
    fn access_denied_is_not_value_absent() {
        let err = ScoutError::RegistryFailed {
            command: "reg query HKLM\\Secret".into(),
            code: Some(1),
            stderr: "ERROR: Access is denied.".into(),
        };
        assert!(!err.is_value_absent());
    }

    #[test]
    fn timeout_is_not_value_absent() {
        let err = ScoutError::RegistryTimeout {
            command: "reg query HKCU".into(),
            timeout_secs: 10,
        };
        assert!(!err.is_value_absent());
    }

    #[test]
    fn assertion_errored_displays_check_and_message() {
        let err = ScoutError::AssertionErrored {
            check: "Demo: KeyExists".into(),
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "Demo: KeyExists threw: boom");
        assert!(err.is_abort());
    }

    #[test]
    fn run_aborted_is_abort() {
        let err = ScoutError::RunAborted {
            message: "app missing".into(),
        };
        assert!(err.is_abort());
        assert!(!ScoutError::ConfigValidationError {
            message: "x".into()
        }
        .is_abort());
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = ScoutError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ScoutError = io_err.into();
        assert!(matches!(err, ScoutError::Io(_)));
    }
}
