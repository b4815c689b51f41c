//! The value produced by one locate call.

use std::fmt;

use serde::Serialize;

use crate::registry::RegistryView;

/// Which strategy produced a discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverySource {
    /// A child of an uninstall root.
    Uninstall,
    /// An `App Paths` entry keyed by the executable name.
    AppPaths,
    /// One of the filesystem fallback locations.
    KnownPath,
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoverySource::Uninstall => write!(f, "uninstall"),
            DiscoverySource::AppPaths => write!(f, "app_paths"),
            DiscoverySource::KnownPath => write!(f, "known_path"),
        }
    }
}

/// Identity of a located application.
///
/// Built fresh by every locate call; nothing carries over between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryResult {
    /// True only once a matching entry is confirmed.
    pub found: bool,
    /// Human-readable name; never empty when `found`.
    pub display_name: String,
    /// Version string; empty if unresolved.
    pub version: String,
    /// Executable path; existed on disk when it was set.
    pub launch_path: String,
    /// Directory read from the registry, may be empty.
    pub install_location: String,
    /// Registry key the match came from; empty for filesystem fallback.
    pub source_key: String,
    /// Strategy that produced the match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<DiscoverySource>,
    /// Registry view the match was read through.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_view")]
    pub view: Option<RegistryView>,
}

fn serialize_view<S>(view: &Option<RegistryView>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match view {
        Some(v) => serializer.serialize_str(&v.to_string()),
        None => serializer.serialize_none(),
    }
}

impl DiscoveryResult {
    /// The "nothing matched" result.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// A match identified only by its executable (App Paths or filesystem).
    pub fn from_executable(
        exe_file_name: &str,
        launch_path: String,
        source: DiscoverySource,
    ) -> Self {
        Self {
            found: true,
            display_name: exe_file_name.to_string(),
            launch_path,
            source: Some(source),
            ..Self::default()
        }
    }

    /// Whether a launch path was resolved.
    pub fn has_launch_path(&self) -> bool {
        !self.launch_path.trim().is_empty()
    }

    /// The version, or `unknown` when it could not be resolved.
    pub fn version_or_unknown(&self) -> &str {
        if self.version.trim().is_empty() {
            "unknown"
        } else {
            &self.version
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_empty() {
        let result = DiscoveryResult::not_found();
        assert!(!result.found);
        assert!(result.display_name.is_empty());
        assert!(!result.has_launch_path());
        assert_eq!(result.version_or_unknown(), "unknown");
    }

    #[test]
    fn from_executable_uses_exe_as_display_name() {
        let result = DiscoveryResult::from_executable(
            "Code.exe",
            r"C:\VSCode\Code.exe".to_string(),
            DiscoverySource::KnownPath,
        );
        assert!(result.found);
        assert_eq!(result.display_name, "Code.exe");
        assert!(result.source_key.is_empty());
        assert!(result.has_launch_path());
    }

    #[test]
    fn source_display_matches_json() {
        for source in [
            DiscoverySource::Uninstall,
            DiscoverySource::AppPaths,
            DiscoverySource::KnownPath,
        ] {
            let json = serde_json::to_value(source).unwrap();
            assert_eq!(json, source.to_string());
        }
    }

    #[test]
    fn serializes_view_as_text() {
        let result = DiscoveryResult {
            found: true,
            display_name: "App".to_string(),
            view: Some(RegistryView::Bits32),
            ..DiscoveryResult::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["view"], "32-bit");
        assert_eq!(json["found"], true);
        assert!(json.get("source").is_none());
    }
}
