//! appscout - locate installed Windows applications and assert on their
//! registry state.
//!
//! The crate finds an application by display-name wildcard and executable
//! name, resolves its version and launch path, records its status in the
//! registry, and runs a PASS/FAIL check suite around it. Registry access goes
//! through the [`registry::RegistryPort`] trait, implemented over `reg.exe`
//! and by an in-memory mock.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`discovery`] - The application locator and its strategies
//! - [`error`] - Error types and result aliases
//! - [`harness`] - Check reporting with named timers
//! - [`registry`] - Registry port, `reg.exe` adapter and output parsing
//! - [`shell`] - Time-limited subprocess execution
//! - [`status`] - App status and environment variable output
//! - [`suite`] - The end-to-end check suite
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use appscout::discovery::{AppLocator, AppQuery, StaticFiles, StaticMetadata};
//! use appscout::registry::{paths, MockRegistry};
//!
//! let registry = MockRegistry::new();
//! let key = format!("{}\\vscode", paths::HKCU_UNINSTALL);
//! registry.insert_string(&key, "DisplayName", "Visual Studio Code (User)");
//! registry.insert_string(&key, "DisplayVersion", "1.95.0");
//! registry.insert_string(&key, "InstallLocation", r"C:\VSCode");
//!
//! let files = StaticFiles::new([r"C:\VSCode\Code.exe"]);
//! let metadata = StaticMetadata::new();
//! let locator = AppLocator::new(&registry, &files, &metadata);
//!
//! let app = locator
//!     .locate(&AppQuery::new("Visual Studio Code*", "Code.exe"))
//!     .unwrap();
//! assert!(app.found);
//! assert_eq!(app.version, "1.95.0");
//! assert_eq!(app.launch_path, r"C:\VSCode\Code.exe");
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod harness;
pub mod registry;
pub mod shell;
pub mod status;
pub mod suite;
pub mod ui;

pub use error::{Result, ScoutError};
