//! Persisted application status.

use crate::discovery::DiscoveryResult;
use crate::error::Result;
use crate::registry::RegistryPort;
use crate::status::env::EnvVarSink;

/// Variable value written when the application is missing.
pub const NOT_INSTALLED: &str = "notInstalled";

/// Writes the outcome of discovery under a status key and into an
/// environment variable.
pub struct AppStatusWriter<'a> {
    registry: &'a dyn RegistryPort,
    env: &'a dyn EnvVarSink,
    status_key: String,
    env_var_name: String,
}

impl<'a> AppStatusWriter<'a> {
    pub fn new(
        registry: &'a dyn RegistryPort,
        env: &'a dyn EnvVarSink,
        status_key: &str,
        env_var_name: &str,
    ) -> Self {
        Self {
            registry,
            env,
            status_key: status_key.to_string(),
            env_var_name: env_var_name.to_string(),
        }
    }

    pub fn status_key(&self) -> &str {
        &self.status_key
    }

    pub fn env_var_name(&self) -> &str {
        &self.env_var_name
    }

    /// Write `Installed`, `Version` and `LaunchPath` plus the variable.
    pub fn write(&self, app: &DiscoveryResult) -> Result<()> {
        if app.found {
            self.write_found(app)
        } else {
            self.write_missing()
        }
    }

    fn write_found(&self, app: &DiscoveryResult) -> Result<()> {
        let key = &self.status_key;
        self.registry.add_key(key)?;
        self.registry.set_string(key, "Installed", "Yes")?;
        self.registry
            .set_string(key, "Version", app.version_or_unknown())?;
        if app.has_launch_path() {
            self.registry.set_string(key, "LaunchPath", &app.launch_path)?;
        }
        self.env.set(&self.env_var_name, app.version_or_unknown())?;
        tracing::debug!("Status written to {}", key);
        Ok(())
    }

    fn write_missing(&self) -> Result<()> {
        let key = &self.status_key;
        self.registry.add_key(key)?;
        self.registry.set_string(key, "Installed", "No")?;
        self.delete_quietly("Version");
        self.delete_quietly("LaunchPath");
        self.env.set(&self.env_var_name, NOT_INSTALLED)?;
        tracing::debug!("Missing status written to {}", key);
        Ok(())
    }

    /// Delete a value, ignoring any failure.
    fn delete_quietly(&self, name: &str) {
        match self.registry.delete_value(&self.status_key, name) {
            Ok(()) => {}
            Err(e) if e.is_value_absent() => {}
            Err(e) => tracing::warn!("Could not delete {}\\{}: {}", self.status_key, name, e),
        }
    }
}
