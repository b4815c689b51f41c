//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::config::{load_config, validate, LoadedConfig};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    working_dir: PathBuf,
    config_override: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher rooted at `working_dir`.
    pub fn new(working_dir: PathBuf, config_override: Option<PathBuf>) -> Self {
        Self {
            working_dir,
            config_override,
        }
    }

    /// Get the directory config discovery starts from.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Load and validate the configuration.
    pub fn load_config(&self) -> Result<LoadedConfig> {
        let loaded = load_config(&self.working_dir, self.config_override.as_deref())?;
        validate(&loaded.config)?;
        Ok(loaded)
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Locate(args) => {
                let cmd = super::locate::LocateCommand::new(self.load_config()?.config, args.clone());
                cmd.execute(ui)
            }
            Commands::Compare(args) => {
                let cmd = super::compare::CompareCommand::new(args.clone());
                cmd.execute(ui)
            }
            Commands::Query(args) => {
                let cmd = super::query::QueryCommand::new(self.load_config()?.config, args.clone());
                cmd.execute(ui)
            }
            Commands::Suite(args) => {
                let cmd = super::suite::SuiteCommand::new(self.load_config()?.config, args.clone());
                cmd.execute(ui)
            }
            Commands::Config(args) => {
                let cmd = super::config::ConfigCommand::new(self.load_config()?, args.clone());
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}
