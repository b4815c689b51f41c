//! Compare command implementation.
//!
//! `appscout compare <detected> <expected>` exits 0 when the versions are
//! equal after zero padding and 1 otherwise.

use crate::cli::args::CompareArgs;
use crate::discovery::{versions_equal, Version};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The compare command implementation.
pub struct CompareCommand {
    args: CompareArgs,
}

impl CompareCommand {
    /// Create a new compare command.
    pub fn new(args: CompareArgs) -> Self {
        Self { args }
    }
}

impl Command for CompareCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let detected = &self.args.detected;
        let expected = &self.args.expected;
        ui.detail(&format!(
            "{} -> {}, {} -> {}",
            detected,
            Version::parse(detected),
            expected,
            Version::parse(expected)
        ));

        if versions_equal(detected, expected) {
            ui.success(&format!("'{}' matches '{}'", detected, expected));
            Ok(CommandResult::success())
        } else {
            ui.error(&format!("'{}' does not match '{}'", detected, expected));
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;

    fn run(detected: &str, expected: &str) -> (CommandResult, MockUI) {
        let cmd = CompareCommand::new(CompareArgs {
            detected: detected.to_string(),
            expected: expected.to_string(),
        });
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        (result, ui)
    }

    #[test]
    fn equal_after_padding() {
        let (result, ui) = run("1.95.0", "1.95");
        assert!(result.success);
        assert_eq!(ui.successes(), ["'1.95.0' matches '1.95'"]);
    }

    #[test]
    fn different_versions_fail() {
        let (result, ui) = run("1.95.1", "1.95.0");
        assert_eq!(result.exit_code, 1);
        assert_eq!(ui.errors().len(), 1);
    }

    #[test]
    fn detail_shows_parsed_segments() {
        let (_, ui) = run("v1.2-beta3", "1.2.3");
        assert_eq!(ui.details(), ["v1.2-beta3 -> 1.2.3, 1.2.3 -> 1.2.3"]);
    }
}
