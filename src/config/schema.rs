//! Configuration schema definitions.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file. Every section and field is optional; missing values
//! fall back to the defaults below.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::discovery::DEFAULT_KNOWN_PATHS;

/// Root configuration structure for `.appscout/config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoutConfig {
    /// The application to look for.
    pub target: TargetConfig,

    /// What a failed detection or version check does to a suite run.
    pub policy: PolicyConfig,

    /// Registry keys and subprocess limits.
    pub registry: RegistrySettings,

    /// Filesystem fallback locations.
    pub search: SearchConfig,

    /// Start/stop timing.
    pub launch: LaunchConfig,
}

/// Target application identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TargetConfig {
    /// Wildcard matched against uninstall `DisplayName` (`*` and `?`).
    pub display_name_pattern: String,

    /// Executable file name, e.g. `Code.exe`.
    pub exe_file_name: String,

    /// Process name used when stopping the application.
    pub process_name: String,

    /// Version the detected application must match; no check when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<String>,

    /// Optional main window title hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_title: Option<String>,

    /// Optional main window class hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_class: Option<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            display_name_pattern: "Visual Studio Code*".to_string(),
            exe_file_name: "Code.exe".to_string(),
            process_name: "code".to_string(),
            expected_version: Some("1.95.0".to_string()),
            window_title: None,
            window_class: None,
        }
    }
}

/// Abort policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PolicyConfig {
    /// Abort the run when the application cannot be found.
    pub abort_if_missing: bool,

    /// Abort the run when the detected version differs from the expected one.
    pub abort_if_version_mismatch: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            abort_if_missing: false,
            abort_if_version_mismatch: true,
        }
    }
}

/// Registry locations and the subprocess timeout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RegistrySettings {
    /// Seconds before a `reg.exe` call is killed.
    pub timeout_secs: u64,

    /// Per-user key everything else lives under.
    pub base_key: String,

    /// Demo key; defaults to `<base_key>\Demo`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_key: Option<String>,

    /// Status key; defaults to `<base_key>\AppStatus`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_key: Option<String>,

    /// User environment variable receiving the detected version.
    pub env_var_name: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            base_key: r"HKCU\Software\LoginVSI".to_string(),
            demo_key: None,
            status_key: None,
            env_var_name: "LOGINVSI_APP_VERSION".to_string(),
        }
    }
}

impl RegistrySettings {
    /// The demo key, explicit or derived from the base key.
    pub fn demo_key(&self) -> String {
        self.demo_key
            .clone()
            .unwrap_or_else(|| format!("{}\\Demo", self.base_key.trim_end_matches('\\')))
    }

    /// The status key, explicit or derived from the base key.
    pub fn status_key(&self) -> String {
        self.status_key
            .clone()
            .unwrap_or_else(|| format!("{}\\AppStatus", self.base_key.trim_end_matches('\\')))
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Filesystem fallback search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SearchConfig {
    /// Candidate paths tried in order. `%VAR%` is expanded from the
    /// environment, `{exe}` is the executable name and `{name}` the same
    /// without its extension.
    pub known_paths: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            known_paths: DEFAULT_KNOWN_PATHS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Start/stop timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LaunchConfig {
    /// Seconds to wait for the started process to come up.
    pub start_timeout_secs: u64,

    /// Seconds to wait for the process to exit after stopping it.
    pub stop_timeout_secs: u64,

    /// Seconds the application is left running between start and stop.
    pub settle_secs: u64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            start_timeout_secs: 30,
            stop_timeout_secs: 5,
            settle_secs: 2,
        }
    }
}

/// JSON Schema of the configuration file.
pub fn config_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(ScoutConfig)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sections_use_defaults() {
        let config: ScoutConfig = serde_yaml::from_str("target: {}").unwrap();
        assert_eq!(config, ScoutConfig::default());
        assert_eq!(config.target.exe_file_name, "Code.exe");
        assert_eq!(config.registry.timeout_secs, 10);
        assert_eq!(config.launch.start_timeout_secs, 30);
        assert!(config.policy.abort_if_version_mismatch);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let yaml = r#"
target:
  display_name_pattern: "Notepad++*"
  exe_file_name: notepad++.exe
registry:
  base_key: 'HKCU\Software\Acme'
"#;
        let config: ScoutConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.target.display_name_pattern, "Notepad++*");
        assert_eq!(config.target.process_name, "code");
        assert_eq!(config.registry.demo_key(), r"HKCU\Software\Acme\Demo");
        assert_eq!(config.registry.status_key(), r"HKCU\Software\Acme\AppStatus");
    }

    #[test]
    fn explicit_keys_override_derived_ones() {
        let settings = RegistrySettings {
            demo_key: Some(r"HKCU\Custom\Demo".to_string()),
            ..RegistrySettings::default()
        };
        assert_eq!(settings.demo_key(), r"HKCU\Custom\Demo");
        assert_eq!(settings.status_key(), r"HKCU\Software\LoginVSI\AppStatus");
    }

    #[test]
    fn null_expected_version_disables_check() {
        let config: ScoutConfig = serde_yaml::from_str("target:\n  expected_version: null").unwrap();
        assert_eq!(config.target.expected_version, None);
    }

    #[test]
    fn default_known_paths_are_populated() {
        let config = ScoutConfig::default();
        assert_eq!(config.search.known_paths.len(), DEFAULT_KNOWN_PATHS.len());
    }

    #[test]
    fn schema_describes_sections() {
        let schema = config_schema();
        let properties = &schema["properties"];
        for section in ["target", "policy", "registry", "search", "launch"] {
            assert!(properties.get(section).is_some(), "missing {}", section);
        }
    }
}
