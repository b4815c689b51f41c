//! Registry access: the port trait, its `reg.exe` adapter, and text parsing.
//!
//! # Modules
//!
//! - [`port`] - [`RegistryPort`] capability and the parsed [`RegistryExt`] reads
//! - [`parser`] - Parsing of `reg.exe query` output
//! - [`reg_exe`] - Subprocess-backed [`RegExe`] implementation
//! - [`mock`] - In-memory [`MockRegistry`] for tests

pub mod mock;
pub mod parser;
pub mod port;
pub mod reg_exe;

pub use mock::MockRegistry;
pub use parser::{
    canonical_key, parse_default_data, parse_rows, parse_subkey_paths, parse_value_data,
    RegistryRow,
};
pub use port::{Presence, RegistryExt, RegistryPort, RegistryView};
pub use reg_exe::RegExe;

/// Well-known registry locations.
pub mod paths {
    /// Per-user uninstall entries.
    pub const HKCU_UNINSTALL: &str = r"HKCU\Software\Microsoft\Windows\CurrentVersion\Uninstall";

    /// Machine-wide uninstall entries (native view).
    pub const HKLM_UNINSTALL: &str = r"HKLM\Software\Microsoft\Windows\CurrentVersion\Uninstall";

    /// Machine-wide uninstall entries of 32-bit applications.
    pub const HKLM_UNINSTALL_WOW64: &str =
        r"HKLM\Software\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall";

    /// Executable name to path mapping.
    pub const HKLM_APP_PATHS: &str = r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\App Paths";

    /// Persisted per-user environment variables.
    pub const HKCU_ENVIRONMENT: &str = r"HKCU\Environment";
}
