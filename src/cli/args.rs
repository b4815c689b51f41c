//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// appscout - Locate installed applications and verify them through the registry.
#[derive(Debug, Parser)]
#[command(name = "appscout")]
#[command(
    author,
    version,
    about = "Locate installed applications and verify them through the registry",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides discovered .appscout/config.yml)
    #[arg(short, long, global = true, env = "APPSCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show per-check detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find the target application and print what was found
    Locate(LocateArgs),

    /// Compare two version strings segment by segment
    Compare(CompareArgs),

    /// Read a registry key, value or default value
    Query(QueryArgs),

    /// Run the registry and application check suite
    Suite(SuiteArgs),

    /// Show resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `locate` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LocateArgs {
    /// Display name wildcard (overrides target.display_name_pattern)
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Executable file name (overrides target.exe_file_name)
    #[arg(short, long)]
    pub exe: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `compare` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompareArgs {
    /// Detected version
    pub detected: String,

    /// Expected version
    pub expected: String,
}

/// Arguments for the `query` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct QueryArgs {
    /// Registry key, e.g. HKCU\Software\Vendor
    pub key: String,

    /// Print only the data of this value
    #[arg(long, value_name = "NAME", conflicts_with = "default")]
    pub value: Option<String>,

    /// Print only the default value
    #[arg(long)]
    pub default: bool,

    /// Registry view to read through
    #[arg(long, value_parser = ["32", "64"])]
    pub view: Option<String>,
}

/// Arguments for the `suite` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SuiteArgs {
    /// Print the summary and every report entry as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the JSON Schema of the config file
    #[arg(long, conflicts_with = "json")]
    pub schema: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
