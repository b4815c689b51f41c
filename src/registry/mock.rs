//! In-memory registry for tests.
//!
//! `MockRegistry` implements [`RegistryPort`] by rendering the same text
//! `reg.exe` prints, so the parser runs exactly as it does against the real
//! tool. Every call is recorded for later assertion, and failures can be
//! injected per key.
//!
//! # Example
//!
//! ```
//! use appscout::registry::{MockRegistry, RegistryExt, RegistryView};
//!
//! let reg = MockRegistry::new();
//! reg.insert_string("HKCU\\Software\\Demo", "Greeting", "hello there");
//!
//! let data = reg
//!     .read_value("HKCU\\Software\\Demo", "Greeting", RegistryView::Native)
//!     .unwrap();
//! assert_eq!(data.as_deref(), Some("hello there"));
//! assert_eq!(reg.calls().len(), 1);
//! ```

use std::cell::RefCell;

use crate::error::{Result, ScoutError};
use crate::registry::parser::canonical_key;
use crate::registry::port::{RegistryPort, RegistryView};

/// What `reg.exe` prints on stderr for a missing key or value.
pub const NOT_FOUND_STDERR: &str =
    "ERROR: The system was unable to find the specified registry key or value.";

#[derive(Debug, Clone)]
struct MockValue {
    name: String,
    value_type: String,
    data: String,
}

#[derive(Debug, Clone)]
struct MockKey {
    path: String,
    view: RegistryView,
    default: Option<String>,
    values: Vec<MockValue>,
}

impl MockKey {
    fn visible_in(&self, view: RegistryView) -> bool {
        self.view == RegistryView::Native || self.view == view
    }
}

#[derive(Debug, Clone)]
enum InjectedFailure {
    Timeout,
    Failed(String),
}

/// Mock registry implementation for testing.
///
/// Keys keep insertion order, which is the order child keys are reported.
/// A key inserted with [`RegistryView::Native`] is visible in every view;
/// one inserted with a specific view is visible only there.
#[derive(Debug, Default)]
pub struct MockRegistry {
    keys: RefCell<Vec<MockKey>>,
    failures: RefCell<Vec<(String, InjectedFailure)>>,
    calls: RefCell<Vec<String>>,
}

impl MockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `path` visible in every view.
    pub fn insert_key(&self, path: &str) {
        self.insert_key_in(path, RegistryView::Native);
    }

    /// Create `path` visible only in `view` (or everywhere for `Native`).
    ///
    /// Missing parents are created first, like `reg add` does.
    pub fn insert_key_in(&self, path: &str, view: RegistryView) {
        let path = path.trim_end_matches('\\');
        let mut keys = self.keys.borrow_mut();
        let ends = path
            .match_indices('\\')
            .map(|(idx, _)| idx)
            .chain(std::iter::once(path.len()));
        for end in ends {
            let prefix = &path[..end];
            let canonical = canonical_key(prefix);
            let exists = keys.iter().any(|k| {
                k.view == view && canonical_key(&k.path).eq_ignore_ascii_case(&canonical)
            });
            if !exists {
                keys.push(MockKey {
                    path: prefix.to_string(),
                    view,
                    default: None,
                    values: Vec::new(),
                });
            }
        }
    }

    /// Set a `REG_SZ` value, creating the key if needed.
    pub fn insert_string(&self, path: &str, name: &str, data: &str) {
        self.insert_value_in(path, RegistryView::Native, name, "REG_SZ", data);
    }

    /// Set a `REG_DWORD` value, rendered in hex like `reg.exe` does.
    pub fn insert_dword(&self, path: &str, name: &str, data: u32) {
        self.insert_value_in(
            path,
            RegistryView::Native,
            name,
            "REG_DWORD",
            &format!("0x{:x}", data),
        );
    }

    /// Set the default value of `path` in `view`.
    pub fn insert_default_in(&self, path: &str, view: RegistryView, data: &str) {
        self.insert_key_in(path, view);
        self.with_key_mut(path, view, |key| key.default = Some(data.to_string()));
    }

    /// Set a value of any type tag in a specific view.
    pub fn insert_value_in(
        &self,
        path: &str,
        view: RegistryView,
        name: &str,
        value_type: &str,
        data: &str,
    ) {
        self.insert_key_in(path, view);
        self.with_key_mut(path, view, |key| {
            key.values.retain(|v| !v.name.eq_ignore_ascii_case(name));
            key.values.push(MockValue {
                name: name.to_string(),
                value_type: value_type.to_string(),
                data: data.to_string(),
            });
        });
    }

    /// Make every call touching `path` time out.
    pub fn fail_with_timeout(&self, path: &str) {
        self.failures
            .borrow_mut()
            .push((canonical_key(path), InjectedFailure::Timeout));
    }

    /// Make every call touching `path` fail with `stderr`.
    pub fn fail_with(&self, path: &str, stderr: &str) {
        self.failures.borrow_mut().push((
            canonical_key(path),
            InjectedFailure::Failed(stderr.to_string()),
        ));
    }

    /// Every call made so far, rendered like a `reg` command line.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Whether any recorded call mentions `fragment` (case-insensitive).
    pub fn was_queried(&self, fragment: &str) -> bool {
        let fragment = fragment.to_ascii_lowercase();
        self.calls
            .borrow()
            .iter()
            .any(|c| c.to_ascii_lowercase().contains(&fragment))
    }

    /// Current data of a value, bypassing the text rendering.
    pub fn value(&self, path: &str, name: &str) -> Option<String> {
        let keys = self.keys.borrow();
        let canonical = canonical_key(path);
        keys.iter()
            .filter(|k| canonical_key(&k.path).eq_ignore_ascii_case(&canonical))
            .flat_map(|k| k.values.iter())
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .map(|v| v.data.clone())
    }

    fn with_key_mut(&self, path: &str, view: RegistryView, f: impl FnOnce(&mut MockKey)) {
        let canonical = canonical_key(path);
        let mut keys = self.keys.borrow_mut();
        if let Some(key) = keys
            .iter_mut()
            .find(|k| k.view == view && canonical_key(&k.path).eq_ignore_ascii_case(&canonical))
        {
            f(key);
        }
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn check_failure(&self, command: &str, path: &str) -> Result<()> {
        let canonical = canonical_key(path);
        for (failing, failure) in self.failures.borrow().iter() {
            if failing.eq_ignore_ascii_case(&canonical) {
                return Err(match failure {
                    InjectedFailure::Timeout => ScoutError::RegistryTimeout {
                        command: command.to_string(),
                        timeout_secs: 10,
                    },
                    InjectedFailure::Failed(stderr) => ScoutError::RegistryFailed {
                        command: command.to_string(),
                        code: Some(1),
                        stderr: stderr.clone(),
                    },
                });
            }
        }
        Ok(())
    }

    fn not_found(command: &str) -> ScoutError {
        ScoutError::RegistryFailed {
            command: command.to_string(),
            code: Some(1),
            stderr: NOT_FOUND_STDERR.to_string(),
        }
    }

    fn find_key(&self, path: &str, view: RegistryView) -> Option<MockKey> {
        let canonical = canonical_key(path);
        self.keys
            .borrow()
            .iter()
            .find(|k| {
                k.visible_in(view) && canonical_key(&k.path).eq_ignore_ascii_case(&canonical)
            })
            .cloned()
    }

    fn children(&self, path: &str, view: RegistryView) -> Vec<String> {
        let prefix = format!("{}\\", canonical_key(path)).to_ascii_lowercase();
        self.keys
            .borrow()
            .iter()
            .filter(|k| k.visible_in(view))
            .filter(|k| {
                let canonical = canonical_key(&k.path).to_ascii_lowercase();
                canonical
                    .strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('\\'))
            })
            .map(|k| k.path.clone())
            .collect()
    }
}

fn render_command(parts: &[&str], view: RegistryView) -> String {
    let mut command = format!("reg {}", parts.join(" "));
    if let Some(switch) = view.as_switch() {
        command.push(' ');
        command.push_str(switch);
    }
    command
}

fn render_row(name: &str, value_type: &str, data: &str) -> String {
    format!("    {}    {}    {}\r\n", name, value_type, data)
}

impl RegistryPort for MockRegistry {
    fn query_key(&self, key: &str, view: RegistryView) -> Result<String> {
        let command = render_command(&["query", key], view);
        self.record(command.clone());
        self.check_failure(&command, key)?;

        let found = self
            .find_key(key, view)
            .ok_or_else(|| Self::not_found(&command))?;

        let mut out = format!("\r\n{}\r\n", found.path);
        if let Some(default) = &found.default {
            out.push_str(&render_row("(Default)", "REG_SZ", default));
        }
        for value in &found.values {
            out.push_str(&render_row(&value.name, &value.value_type, &value.data));
        }
        out.push_str("\r\n");
        for child in self.children(key, view) {
            out.push_str(&child);
            out.push_str("\r\n");
        }
        Ok(out)
    }

    fn query_value(&self, key: &str, name: &str, view: RegistryView) -> Result<String> {
        let command = render_command(&["query", key, "/v", name], view);
        self.record(command.clone());
        self.check_failure(&command, key)?;

        let found = self
            .find_key(key, view)
            .ok_or_else(|| Self::not_found(&command))?;
        let value = found
            .values
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Self::not_found(&command))?;

        Ok(format!(
            "\r\n{}\r\n{}\r\n",
            found.path,
            render_row(&value.name, &value.value_type, &value.data)
        ))
    }

    fn query_default(&self, key: &str, view: RegistryView) -> Result<String> {
        let command = render_command(&["query", key, "/ve"], view);
        self.record(command.clone());
        self.check_failure(&command, key)?;

        let found = self
            .find_key(key, view)
            .ok_or_else(|| Self::not_found(&command))?;
        let data = found.default.as_deref().unwrap_or("(value not set)");
        Ok(format!(
            "\r\n{}\r\n{}\r\n",
            found.path,
            render_row("(Default)", "REG_SZ", data)
        ))
    }

    fn add_key(&self, key: &str) -> Result<()> {
        let command = render_command(&["add", key, "/f"], RegistryView::Native);
        self.record(command.clone());
        self.check_failure(&command, key)?;
        self.insert_key(key);
        Ok(())
    }

    fn set_default(&self, key: &str, data: &str) -> Result<()> {
        let command = render_command(&["add", key, "/ve", "/d", data, "/f"], RegistryView::Native);
        self.record(command.clone());
        self.check_failure(&command, key)?;
        self.insert_default_in(key, RegistryView::Native, data);
        Ok(())
    }

    fn set_string(&self, key: &str, name: &str, data: &str) -> Result<()> {
        let command = render_command(
            &["add", key, "/v", name, "/t", "REG_SZ", "/d", data, "/f"],
            RegistryView::Native,
        );
        self.record(command.clone());
        self.check_failure(&command, key)?;
        self.insert_string(key, name, data);
        Ok(())
    }

    fn set_dword(&self, key: &str, name: &str, data: u32) -> Result<()> {
        let rendered = data.to_string();
        let command = render_command(
            &["add", key, "/v", name, "/t", "REG_DWORD", "/d", &rendered, "/f"],
            RegistryView::Native,
        );
        self.record(command.clone());
        self.check_failure(&command, key)?;
        self.insert_dword(key, name, data);
        Ok(())
    }

    fn delete_value(&self, key: &str, name: &str) -> Result<()> {
        let command = render_command(&["delete", key, "/v", name, "/f"], RegistryView::Native);
        self.record(command.clone());
        self.check_failure(&command, key)?;

        let canonical = canonical_key(key);
        let mut removed = false;
        for k in self.keys.borrow_mut().iter_mut() {
            if canonical_key(&k.path).eq_ignore_ascii_case(&canonical) {
                let before = k.values.len();
                k.values.retain(|v| !v.name.eq_ignore_ascii_case(name));
                removed |= k.values.len() != before;
            }
        }
        if removed {
            Ok(())
        } else {
            Err(Self::not_found(&command))
        }
    }
}
