//! Version metadata embedded in executables.
//!
//! The default [`PowerShellMetadata`] asks PowerShell for
//! `(Get-Item).VersionInfo`, the same data Explorer shows on the Details
//! tab. Any failure reads as "no metadata".

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::shell::{execute, DEFAULT_TIMEOUT};

/// Reads version fields from an executable's version resource.
pub trait ExeMetadata {
    /// The `ProductVersion` string, if any.
    fn product_version(&self, path: &Path) -> Option<String>;

    /// The `FileVersion` string, if any.
    fn file_version(&self, path: &Path) -> Option<String>;
}

/// Queries version info through a time-limited PowerShell process.
#[derive(Debug, Clone)]
pub struct PowerShellMetadata {
    program: String,
    timeout: Duration,
}

impl Default for PowerShellMetadata {
    fn default() -> Self {
        Self {
            program: "powershell".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PowerShellMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn query(&self, path: &Path, field: &str) -> Option<String> {
        match self.run_query(path, field) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("{} lookup failed for {}: {:#}", field, path.display(), e);
                None
            }
        }
    }

    fn run_query(&self, path: &Path, field: &str) -> anyhow::Result<Option<String>> {
        let args = vec![
            "-NoProfile".to_string(),
            "-NonInteractive".to_string(),
            "-Command".to_string(),
            version_info_script(path, field),
        ];
        let result = execute(&self.program, &args, self.timeout)
            .with_context(|| format!("failed to start {}", self.program))?;
        if result.timed_out {
            bail!("{} timed out after {:?}", self.program, self.timeout);
        }
        if !result.success {
            bail!("{} exited with {:?}", self.program, result.exit_code);
        }
        let value = result.stdout.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }
}

/// Build the one-line script reading `field` from the file's VersionInfo.
fn version_info_script(path: &Path, field: &str) -> String {
    // Single-quoted PowerShell strings escape a quote by doubling it.
    let literal = path.to_string_lossy().replace('\'', "''");
    format!(
        "(Get-Item -LiteralPath '{}').VersionInfo.{}",
        literal, field
    )
}

impl ExeMetadata for PowerShellMetadata {
    fn product_version(&self, path: &Path) -> Option<String> {
        self.query(path, "ProductVersion")
    }

    fn file_version(&self, path: &Path) -> Option<String> {
        self.query(path, "FileVersion")
    }
}

/// Fixed metadata keyed by path, for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    product: HashMap<String, String>,
    file: HashMap<String, String>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, path: &str, version: &str) -> Self {
        self.product.insert(path.to_lowercase(), version.to_string());
        self
    }

    pub fn with_file(mut self, path: &str, version: &str) -> Self {
        self.file.insert(path.to_lowercase(), version.to_string());
        self
    }
}

impl ExeMetadata for StaticMetadata {
    fn product_version(&self, path: &Path) -> Option<String> {
        self.product
            .get(&path.to_string_lossy().to_lowercase())
            .cloned()
    }

    fn file_version(&self, path: &Path) -> Option<String> {
        self.file.get(&path.to_string_lossy().to_lowercase()).cloned()
    }
}
