//! Suite command implementation.
//!
//! The `appscout suite` command runs the full registry and application
//! suite and exits non-zero when any check failed or the run aborted.

use std::time::Duration;

use serde::Serialize;

use crate::cli::args::SuiteArgs;
use crate::config::ScoutConfig;
use crate::discovery::{LocalFiles, PowerShellMetadata};
use crate::error::{Result, ScoutError};
use crate::harness::{ConsoleReporter, RecordingReporter, ReportEntry};
use crate::registry::RegExe;
use crate::status::RegistryEnvSink;
use crate::suite::{SpawnLauncher, SuiteDeps, SuiteRunner, SuiteSummary};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The suite command implementation.
pub struct SuiteCommand {
    config: ScoutConfig,
    args: SuiteArgs,
}

#[derive(Serialize)]
struct SuiteReport<'a> {
    summary: &'a SuiteSummary,
    entries: &'a [ReportEntry],
}

impl SuiteCommand {
    /// Create a new suite command.
    pub fn new(config: ScoutConfig, args: SuiteArgs) -> Self {
        Self { config, args }
    }

    /// Run the suite against `deps`, expanding filesystem fallbacks with `env_lookup`.
    pub fn execute_with<'a, F>(
        &'a self,
        ui: &mut dyn UserInterface,
        deps: SuiteDeps<'a>,
        env_lookup: F,
    ) -> Result<CommandResult>
    where
        F: Fn(&str) -> Option<String> + 'a,
    {
        let mut runner = SuiteRunner::new(&self.config, deps).with_env(env_lookup);

        let summary = if self.args.json {
            let mut reporter = RecordingReporter::new();
            let summary = runner.run(&mut reporter);
            let report = SuiteReport {
                summary: &summary,
                entries: reporter.entries(),
            };
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| ScoutError::Other(e.into()))?;
            ui.output(&json);
            summary
        } else {
            let mut reporter = ConsoleReporter::new(ui);
            let summary = runner.run(&mut reporter);
            drop(reporter);
            show_summary(ui, &summary);
            summary
        };

        if summary.is_success() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

fn show_summary(ui: &mut dyn UserInterface, summary: &SuiteSummary) {
    let line = format!("{} passed, {} failed", summary.passed, summary.failed);
    match &summary.aborted {
        Some(reason) => ui.error(&format!("Aborted after {}: {}", line, reason)),
        None if summary.failed > 0 => ui.warning(&line),
        None => ui.success(&line),
    }
}

impl Command for SuiteCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let timeout = Duration::from_secs(self.config.registry.timeout_secs);
        let registry = RegExe::new().with_timeout(timeout);
        let metadata = PowerShellMetadata::new().with_timeout(timeout);
        let env = RegistryEnvSink::new(&registry);
        let mut launcher = SpawnLauncher::new();
        let deps = SuiteDeps {
            registry: &registry,
            files: &LocalFiles,
            metadata: &metadata,
            env: &env,
            launcher: &mut launcher,
        };
        self.execute_with(ui, deps, |key: &str| std::env::var(key).ok())
    }
}
