//! Query command implementation.
//!
//! `appscout query <key>` prints a value, the default value, or every value
//! and child key of a registry key.

use std::time::Duration;

use crate::cli::args::QueryArgs;
use crate::config::ScoutConfig;
use crate::error::{Result, ScoutError};
use crate::registry::{parse_rows, RegExe, RegistryExt, RegistryPort, RegistryView};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The query command implementation.
pub struct QueryCommand {
    config: ScoutConfig,
    args: QueryArgs,
}

impl QueryCommand {
    /// Create a new query command.
    pub fn new(config: ScoutConfig, args: QueryArgs) -> Self {
        Self { config, args }
    }

    /// The view selected by `--view`.
    pub fn view(&self) -> Result<RegistryView> {
        let bits = self.args.view.as_deref().unwrap_or("");
        RegistryView::from_bits(bits).ok_or_else(|| ScoutError::ConfigValidationError {
            message: format!("Unknown registry view '{}'", bits),
        })
    }

    /// Run the query against `registry`.
    pub fn execute_with(
        &self,
        ui: &mut dyn UserInterface,
        registry: &dyn RegistryPort,
    ) -> Result<CommandResult> {
        let view = self.view()?;
        let key = self.args.key.as_str();

        if let Some(name) = &self.args.value {
            return Ok(match registry.read_value(key, name, view)? {
                Some(data) => {
                    ui.output(&data);
                    CommandResult::success()
                }
                None => {
                    ui.error(&format!("Value '{}' not found under {}", name, key));
                    CommandResult::failure(1)
                }
            });
        }

        if self.args.default {
            return Ok(match registry.read_default(key, view)? {
                Some(data) => {
                    ui.output(&data);
                    CommandResult::success()
                }
                None => {
                    ui.error(&format!("No default value under {}", key));
                    CommandResult::failure(1)
                }
            });
        }

        let output = match registry.query_key(key, view) {
            Ok(output) => output,
            Err(e) if e.is_value_absent() => {
                ui.error(&format!("Key not found: {}", key));
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        ui.show_header(key);
        let rows = parse_rows(&output, key);
        let fields: Vec<(&str, &str)> = rows
            .iter()
            .map(|row| (row.name.as_str(), row.data.as_str()))
            .collect();
        ui.show_fields(&fields);

        for child in registry.list_subkeys(key, view)? {
            ui.message(&child);
        }

        Ok(CommandResult::success())
    }
}

impl Command for QueryCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry =
            RegExe::new().with_timeout(Duration::from_secs(self.config.registry.timeout_secs));
        self.execute_with(ui, &registry)
    }
}
