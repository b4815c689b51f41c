//! Locate command implementation.
//!
//! The `appscout locate` command runs discovery once and prints what it
//! found.

use std::time::Duration;

use crate::cli::args::LocateArgs;
use crate::config::ScoutConfig;
use crate::discovery::{
    AppLocator, AppQuery, DiscoveryResult, LocalFiles, PowerShellMetadata, SearchPlan,
};
use crate::error::{Result, ScoutError};
use crate::registry::RegExe;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The locate command implementation.
pub struct LocateCommand {
    config: ScoutConfig,
    args: LocateArgs,
}

impl LocateCommand {
    /// Create a new locate command.
    pub fn new(config: ScoutConfig, args: LocateArgs) -> Self {
        Self { config, args }
    }

    /// The query built from the flags, falling back to the configured target.
    pub fn query(&self) -> AppQuery {
        let pattern = self
            .args
            .pattern
            .as_deref()
            .unwrap_or(&self.config.target.display_name_pattern);
        let exe = self
            .args
            .exe
            .as_deref()
            .unwrap_or(&self.config.target.exe_file_name);
        AppQuery::new(pattern, exe)
    }

    /// The plan configured for this run.
    pub fn plan(&self) -> SearchPlan {
        SearchPlan::standard(self.config.search.known_paths.clone())
    }

    /// Run discovery through `locator` and report the result.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        locator: &AppLocator<'_>,
    ) -> Result<CommandResult> {
        let query = self.query();
        let result = locator.locate(&query)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&result)
                .map_err(|e| ScoutError::Other(e.into()))?;
            ui.output(&json);
        } else {
            show_result(ui, &query, &result);
        }

        if result.found {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

fn show_result(ui: &mut dyn UserInterface, query: &AppQuery, result: &DiscoveryResult) {
    if !result.found {
        ui.warning(&format!(
            "No installation matching '{}' ({}) was found",
            query.display_name, query.exe_file_name
        ));
        return;
    }

    ui.show_header(&result.display_name);
    let source = result.source.map(|s| s.to_string()).unwrap_or_default();
    let view = result.view.map(|v| v.to_string()).unwrap_or_default();
    ui.show_fields(&[
        ("Version", result.version_or_unknown()),
        ("Launch path", result.launch_path.as_str()),
        ("Install location", result.install_location.as_str()),
        ("Registry key", result.source_key.as_str()),
        ("Source", source.as_str()),
        ("View", view.as_str()),
    ]);
}

impl Command for LocateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let timeout = Duration::from_secs(self.config.registry.timeout_secs);
        let registry = RegExe::new().with_timeout(timeout);
        let metadata = PowerShellMetadata::new().with_timeout(timeout);
        let locator =
            AppLocator::new(&registry, &LocalFiles, &metadata).with_plan(self.plan());
        self.execute_with(ui, &locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{StaticFiles, StaticMetadata};
    use crate::registry::{paths, MockRegistry};
    use crate::ui::MockUI;

    fn install(reg: &MockRegistry) {
        let key = format!("{}\\vscode", paths::HKCU_UNINSTALL);
        reg.insert_string(&key, "DisplayName", "Visual Studio Code (User)");
        reg.insert_string(&key, "DisplayVersion", "1.95.0");
        reg.insert_string(&key, "InstallLocation", r"C:\VSCode");
    }

    fn run(reg: &MockRegistry, args: LocateArgs) -> (CommandResult, MockUI) {
        let cmd = LocateCommand::new(ScoutConfig::default(), args);
        let files = StaticFiles::new([r"C:\VSCode\Code.exe"]);
        let metadata = StaticMetadata::new();
        let locator = AppLocator::new(reg, &files, &metadata)
            .with_plan(cmd.plan())
            .with_env(|_: &str| None);
        let mut ui = MockUI::new();
        let result = cmd.execute_with(&mut ui, &locator).unwrap();
        (result, ui)
    }

    #[test]
    fn query_defaults_to_configured_target() {
        let cmd = LocateCommand::new(ScoutConfig::default(), LocateArgs::default());
        let query = cmd.query();
        assert_eq!(query.exe_file_name, "Code.exe");
        assert!(query.display_name.is_match("Visual Studio Code (User)"));
    }

    #[test]
    fn flags_override_target() {
        let args = LocateArgs {
            pattern: Some("Notepad++*".to_string()),
            exe: Some("notepad++.exe".to_string()),
            json: false,
        };
        let cmd = LocateCommand::new(ScoutConfig::default(), args);
        assert_eq!(cmd.query().exe_file_name, "notepad++.exe");
    }

    #[test]
    fn found_app_shows_fields() {
        let reg = MockRegistry::new();
        install(&reg);

        let (result, ui) = run(&reg, LocateArgs::default());

        assert!(result.success);
        assert_eq!(ui.headers(), ["Visual Studio Code (User)"]);
        assert_eq!(ui.field("Version"), Some("1.95.0"));
        assert_eq!(ui.field("Launch path"), Some(r"C:\VSCode\Code.exe"));
        assert_eq!(ui.field("Source"), Some("uninstall"));
    }

    #[test]
    fn json_output_is_parseable() {
        let reg = MockRegistry::new();
        install(&reg);

        let args = LocateArgs {
            json: true,
            ..LocateArgs::default()
        };
        let (_, ui) = run(&reg, args);

        let json: serde_json::Value = serde_json::from_str(&ui.outputs()[0]).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["version"], "1.95.0");
        assert_eq!(json["source"], "uninstall");
    }

    #[test]
    fn missing_app_warns_and_fails() {
        let reg = MockRegistry::new();

        let (result, ui) = run(&reg, LocateArgs::default());

        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.warnings().len(), 1);
        assert!(ui.headers().is_empty());
    }
}
