//! Application discovery.
//!
//! Finds an installed application from a display-name wildcard and an
//! executable name by walking the uninstall registry roots, `App Paths`,
//! and a list of filesystem fallbacks, in that order.
//!
//! # Modules
//!
//! - [`locator`] - Strategy ordering and the [`AppLocator`] entry point
//! - [`wildcard`] - `*`-only, case-insensitive display name matching
//! - [`version`] - Version resolution and segment-wise comparison
//! - [`path`] - Launch path resolution from registry fields
//! - [`known_paths`] - Filesystem fallback templates
//! - [`files`] / [`metadata`] - Filesystem and version-resource probes
//! - [`result`] - The [`DiscoveryResult`] value

pub mod files;
pub mod known_paths;
pub mod locator;
pub mod metadata;
pub mod path;
pub mod result;
pub mod version;
pub mod wildcard;

pub use files::{FileProbe, LocalFiles, StaticFiles};
pub use known_paths::{expand_env_vars, expand_template, DEFAULT_KNOWN_PATHS};
pub use locator::{AppLocator, AppQuery, SearchPlan, SearchRoot, Strategy};
pub use metadata::{ExeMetadata, PowerShellMetadata, StaticMetadata};
pub use path::{combine_install_location, extract_executable_path};
pub use result::{DiscoveryResult, DiscoverySource};
pub use version::{parse_dword, registry_version, versions_equal, Version};
pub use wildcard::{wildcard_match, WildcardPattern};
