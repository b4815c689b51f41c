//! Config command implementation.
//!
//! The `appscout config` command shows the resolved configuration or its
//! JSON schema.

use crate::cli::args::ConfigArgs;
use crate::config::{config_schema, LoadedConfig};
use crate::error::{Result, ScoutError};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    loaded: LoadedConfig,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(loaded: LoadedConfig, args: ConfigArgs) -> Self {
        Self { loaded, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ConfigArgs {
        &self.args
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.schema {
            let json = serde_json::to_string_pretty(&config_schema())
                .map_err(|e| ScoutError::Other(e.into()))?;
            ui.output(&json);
            return Ok(CommandResult::success());
        }

        match &self.loaded.source {
            Some(path) => ui.message(&format!("# {}", path.display())),
            None => ui.message("# built-in defaults"),
        }

        let rendered = if self.args.json {
            serde_json::to_string_pretty(&self.loaded.config)
                .map_err(|e| ScoutError::Other(e.into()))?
        } else {
            serde_yaml::to_string(&self.loaded.config).map_err(|e| ScoutError::Other(e.into()))?
        };
        ui.output(&rendered);

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoutConfig;
    use crate::ui::MockUI;
    use std::path::PathBuf;

    fn defaults() -> LoadedConfig {
        LoadedConfig {
            config: ScoutConfig::default(),
            source: None,
        }
    }

    #[test]
    fn yaml_output_round_trips() {
        let cmd = ConfigCommand::new(defaults(), ConfigArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert_eq!(ui.messages(), ["# built-in defaults"]);
        let parsed: ScoutConfig = serde_yaml::from_str(&ui.outputs()[0]).unwrap();
        assert_eq!(parsed, ScoutConfig::default());
    }

    #[test]
    fn json_output_names_source() {
        let loaded = LoadedConfig {
            config: ScoutConfig::default(),
            source: Some(PathBuf::from("/work/.appscout/config.yml")),
        };
        let args = ConfigArgs {
            json: true,
            ..ConfigArgs::default()
        };
        let mut ui = MockUI::new();

        ConfigCommand::new(loaded, args).execute(&mut ui).unwrap();

        assert!(ui.messages()[0].contains("config.yml"));
        let json: serde_json::Value = serde_json::from_str(&ui.outputs()[0]).unwrap();
        assert_eq!(json["target"]["exe_file_name"], "Code.exe");
    }

    #[test]
    fn schema_describes_config() {
        let args = ConfigArgs {
            schema: true,
            ..ConfigArgs::default()
        };
        let mut ui = MockUI::new();

        ConfigCommand::new(defaults(), args).execute(&mut ui).unwrap();

        let schema: serde_json::Value = serde_json::from_str(&ui.outputs()[0]).unwrap();
        assert!(schema["properties"]["target"].is_object());
        assert!(ui.messages().is_empty());
    }
}
