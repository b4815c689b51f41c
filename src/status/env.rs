//! User environment variables.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::registry::{paths, RegistryPort};

/// Value written when the caller has none.
pub const UNKNOWN_VALUE: &str = "unknown";

/// Destination for user-scoped environment variables.
pub trait EnvVarSink {
    /// Set `name` to `value`. A blank value is written as [`UNKNOWN_VALUE`].
    fn set(&self, name: &str, value: &str) -> Result<()>;
}

fn effective_value(value: &str) -> &str {
    if value.trim().is_empty() {
        UNKNOWN_VALUE
    } else {
        value
    }
}

/// Persists variables under `HKCU\Environment` and sets them for this process.
///
/// Both halves are best-effort: failures are logged and the call still
/// succeeds.
pub struct RegistryEnvSink<'a> {
    registry: &'a dyn RegistryPort,
}

impl<'a> RegistryEnvSink<'a> {
    pub fn new(registry: &'a dyn RegistryPort) -> Self {
        Self { registry }
    }
}

impl EnvVarSink for RegistryEnvSink<'_> {
    fn set(&self, name: &str, value: &str) -> Result<()> {
        let value = effective_value(value);

        if let Err(e) = self.registry.set_string(paths::HKCU_ENVIRONMENT, name, value) {
            tracing::warn!("Could not persist {}: {}", name, e);
        }

        // `set_var` panics on these.
        if name.is_empty() || name.contains(['=', '\0']) || value.contains('\0') {
            tracing::warn!("Skipping process variable with invalid name {:?}", name);
        } else {
            std::env::set_var(name, value);
        }
        Ok(())
    }
}

/// Records variables in memory, for tests.
#[derive(Debug, Default)]
pub struct RecordingEnvSink {
    vars: RefCell<BTreeMap<String, String>>,
}

impl RecordingEnvSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.borrow().get(name).cloned()
    }
}

impl EnvVarSink for RecordingEnvSink {
    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.vars
            .borrow_mut()
            .insert(name.to_string(), effective_value(value).to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MockRegistry;

    #[test]
    fn registry_sink_persists_and_sets_process_var() {
        let reg = MockRegistry::new();
        let sink = RegistryEnvSink::new(&reg);

        sink.set("APPSCOUT_TEST_SINK_VERSION", "1.95.0").unwrap();

        assert_eq!(
            reg.value(paths::HKCU_ENVIRONMENT, "APPSCOUT_TEST_SINK_VERSION")
                .as_deref(),
            Some("1.95.0")
        );
        assert_eq!(
            std::env::var("APPSCOUT_TEST_SINK_VERSION").as_deref(),
            Ok("1.95.0")
        );
    }

    #[test]
    fn blank_value_becomes_unknown() {
        let sink = RecordingEnvSink::new();
        sink.set("X", "  ").unwrap();
        assert_eq!(sink.get("X").as_deref(), Some(UNKNOWN_VALUE));
    }

    #[test]
    fn persistence_failure_is_not_fatal() {
        let reg = MockRegistry::new();
        reg.fail_with(paths::HKCU_ENVIRONMENT, "ERROR: Access is denied.");
        let sink = RegistryEnvSink::new(&reg);

        assert!(sink.set("APPSCOUT_TEST_SINK_DENIED", "1").is_ok());
        assert_eq!(
            std::env::var("APPSCOUT_TEST_SINK_DENIED").as_deref(),
            Ok("1")
        );
    }

    #[test]
    fn invalid_name_is_skipped() {
        let reg = MockRegistry::new();
        let sink = RegistryEnvSink::new(&reg);
        assert!(sink.set("A=B", "1").is_ok());
    }
}
