//! [`RegistryPort`] backed by the `reg.exe` command-line tool.

use crate::error::{Result, ScoutError};
use crate::registry::port::{RegistryPort, RegistryView};
use crate::shell::{display_command, execute, DEFAULT_TIMEOUT};
use std::time::Duration;

/// Drives `reg.exe` once per operation, with a per-call deadline.
#[derive(Debug, Clone)]
pub struct RegExe {
    program: String,
    timeout: Duration,
}

impl Default for RegExe {
    fn default() -> Self {
        Self::new()
    }
}

impl RegExe {
    /// Use `reg.exe` from PATH with the default ten second deadline.
    pub fn new() -> Self {
        Self {
            program: "reg.exe".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-call deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the program to run (a wrapper script, a full path).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Run the tool and return its stdout, mapping failures to errors.
    fn run(&self, args: Vec<String>) -> Result<String> {
        let command = display_command(&self.program, &args);
        tracing::debug!("{}", command);

        let result = execute(&self.program, &args, self.timeout).map_err(|e| {
            ScoutError::RegistryFailed {
                command: command.clone(),
                code: None,
                stderr: e.to_string(),
            }
        })?;

        if result.timed_out {
            return Err(ScoutError::RegistryTimeout {
                command,
                timeout_secs: self.timeout.as_secs(),
            });
        }
        if !result.success {
            return Err(ScoutError::RegistryFailed {
                command,
                code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }
        Ok(result.stdout)
    }
}

fn query_args(key: &str, view: RegistryView) -> Vec<String> {
    vec!["query".to_string(), key.to_string()]
        .into_iter()
        .chain(view.as_switch().map(str::to_string))
        .collect()
}

fn add_args(key: &str, rest: &[&str]) -> Vec<String> {
    ["add", key]
        .iter()
        .chain(rest.iter())
        .chain(["/f"].iter())
        .map(|s| s.to_string())
        .collect()
}

impl RegistryPort for RegExe {
    fn query_key(&self, key: &str, view: RegistryView) -> Result<String> {
        self.run(query_args(key, view))
    }

    fn query_value(&self, key: &str, name: &str, view: RegistryView) -> Result<String> {
        let mut args = vec![
            "query".to_string(),
            key.to_string(),
            "/v".to_string(),
            name.to_string(),
        ];
        args.extend(view.as_switch().map(str::to_string));
        self.run(args)
    }

    fn query_default(&self, key: &str, view: RegistryView) -> Result<String> {
        let mut args = vec!["query".to_string(), key.to_string(), "/ve".to_string()];
        args.extend(view.as_switch().map(str::to_string));
        self.run(args)
    }

    fn add_key(&self, key: &str) -> Result<()> {
        self.run(add_args(key, &[])).map(|_| ())
    }

    fn set_default(&self, key: &str, data: &str) -> Result<()> {
        self.run(add_args(key, &["/ve", "/t", "REG_SZ", "/d", data]))
            .map(|_| ())
    }

    fn set_string(&self, key: &str, name: &str, data: &str) -> Result<()> {
        self.run(add_args(key, &["/v", name, "/t", "REG_SZ", "/d", data]))
            .map(|_| ())
    }

    fn set_dword(&self, key: &str, name: &str, data: u32) -> Result<()> {
        let data = data.to_string();
        self.run(add_args(key, &["/v", name, "/t", "REG_DWORD", "/d", &data]))
            .map(|_| ())
    }

    fn delete_value(&self, key: &str, name: &str) -> Result<()> {
        let args = vec![
            "delete".to_string(),
            key.to_string(),
            "/v".to_string(),
            name.to_string(),
            "/f".to_string(),
        ];
        self.run(args).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_args_append_view_switch() {
        assert_eq!(
            query_args("HKLM\\Software", RegistryView::Bits32),
            vec!["query", "HKLM\\Software", "/reg:32"]
        );
        assert_eq!(
            query_args("HKCU\\Software", RegistryView::Native),
            vec!["query", "HKCU\\Software"]
        );
    }

    #[test]
    fn add_args_end_with_force() {
        assert_eq!(
            add_args("HKCU\\Demo", &["/v", "Name", "/t", "REG_SZ", "/d", "a b"]),
            vec!["add", "HKCU\\Demo", "/v", "Name", "/t", "REG_SZ", "/d", "a b", "/f"]
        );
    }

    #[test]
    fn missing_program_is_a_transport_failure() {
        let reg = RegExe::new().with_program("appscout-no-such-reg-tool");
        let err = reg
            .query_key("HKCU\\Software", RegistryView::Native)
            .unwrap_err();
        assert!(matches!(err, ScoutError::RegistryFailed { code: None, .. }));
        assert!(!err.is_value_absent());
    }
}
