//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use appscout::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".appscout");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "target:\n  exe_file_name: notepad.exe\n").unwrap();
//!
//! let loaded = load_config(temp.path(), None).unwrap();
//! validate(&loaded.config).unwrap();
//! assert_eq!(loaded.config.target.exe_file_name, "notepad.exe");
//! ```
//!
//! # Configuration File Location
//!
//! `--config <path>` (or `APPSCOUT_CONFIG`) wins. Otherwise the nearest
//! `.appscout/config.yml` at or above the working directory is used. With
//! neither, built-in defaults apply.

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    find_config, load_config, load_config_file, parse_config, LoadedConfig, CONFIG_DIR,
    CONFIG_FILE,
};
pub use schema::{
    config_schema, LaunchConfig, PolicyConfig, RegistrySettings, ScoutConfig, SearchConfig,
    TargetConfig,
};
pub use validator::{validate, validate_config, ValidationError};
