//! Version extraction and comparison.
//!
//! Installers record versions inconsistently: a `DisplayVersion` string,
//! separate `VersionMajor` / `VersionMinor` numbers, a bare `Version`, or
//! nothing at all. [`registry_version`] walks those fields in order and
//! [`exe_version`] falls back to the executable's own metadata.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::discovery::files::FileProbe;
use crate::discovery::metadata::ExeMetadata;
use crate::error::Result;
use crate::registry::{RegistryExt, RegistryPort, RegistryView};

/// Runs of digits; everything between them is a separator.
static SEGMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("SEGMENT_REGEX must compile"));

/// Maximum number of segments kept from a version string.
pub const MAX_SEGMENTS: usize = 4;

/// A version as a sequence of up to four integer segments.
///
/// Parsing never fails: anything without digits becomes `[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    segments: Vec<u64>,
}

impl Version {
    /// Parse `text`, splitting on runs of non-digit characters.
    ///
    /// Segments too large for `u64` saturate to `u64::MAX`, so every digit
    /// run keeps its position.
    pub fn parse(text: &str) -> Self {
        let mut segments: Vec<u64> = SEGMENT_REGEX
            .find_iter(text)
            .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
            .take(MAX_SEGMENTS)
            .collect();
        if segments.is_empty() {
            segments.push(0);
        }
        Self { segments }
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Segment-wise equality after zero-padding the shorter side.
    pub fn matches(&self, other: &Version) -> bool {
        let len = self.segments.len().max(other.segments.len());
        (0..len).all(|i| {
            self.segments.get(i).copied().unwrap_or(0)
                == other.segments.get(i).copied().unwrap_or(0)
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        f.write_str(&rendered.join("."))
    }
}

/// Whether `detected` and `expected` denote the same version.
///
/// `"1.95"` equals `"1.95.0"` but not `"1.95.1"`; an empty string equals `"0"`.
pub fn versions_equal(detected: &str, expected: &str) -> bool {
    Version::parse(detected).matches(&Version::parse(expected))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve a version from the fields of one uninstall entry.
///
/// Tries `DisplayVersion`, then `VersionMajor.VersionMinor` (both must be
/// present), then `Version`. Returns `None` when none of them is usable.
pub fn registry_version(
    registry: &dyn RegistryPort,
    key: &str,
    view: RegistryView,
) -> Result<Option<String>> {
    if let Some(display) = non_blank(registry.read_value(key, "DisplayVersion", view)?) {
        return Ok(Some(display));
    }

    let major = non_blank(registry.read_value(key, "VersionMajor", view)?);
    let minor = non_blank(registry.read_value(key, "VersionMinor", view)?);
    if let (Some(major), Some(minor)) = (major, minor) {
        return Ok(Some(format!(
            "{}.{}",
            numeric_field(&major),
            numeric_field(&minor)
        )));
    }

    Ok(non_blank(registry.read_value(key, "Version", view)?))
}

/// Render a `REG_DWORD` field (`0x1a`) as decimal; other text passes through.
fn numeric_field(data: &str) -> String {
    parse_dword(data)
        .map(|n| n.to_string())
        .unwrap_or_else(|| data.to_string())
}

/// Parse registry integer data given either as decimal or `0x` hexadecimal.
pub fn parse_dword(data: &str) -> Option<u32> {
    let data = data.trim();
    if let Ok(n) = data.parse::<u32>() {
        return Some(n);
    }
    let hex = data
        .strip_prefix("0x")
        .or_else(|| data.strip_prefix("0X"))?;
    u32::from_str_radix(hex, 16).ok()
}

/// Read the executable's embedded version: ProductVersion, then FileVersion.
///
/// Only consulted when the file exists.
pub fn exe_version(
    metadata: &dyn ExeMetadata,
    files: &dyn FileProbe,
    launch_path: &str,
) -> Option<String> {
    if launch_path.trim().is_empty() || !files.is_file(launch_path) {
        return None;
    }
    let path = Path::new(launch_path);
    non_blank(metadata.product_version(path)).or_else(|| non_blank(metadata.file_version(path)))
}
