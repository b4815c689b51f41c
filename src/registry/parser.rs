//! Parsing of `reg.exe query` text output.
//!
//! The tool prints a header line echoing the queried key, then one row per
//! value (`name  type  data`), then the paths of child keys:
//!
//! ```text
//! HKEY_CURRENT_USER\Software\Demo
//!     DemoString    REG_SZ    Hello from Login Enterprise
//!     DemoDWORD    REG_DWORD    0x1
//!
//! HKEY_CURRENT_USER\Software\Demo\Child
//! ```
//!
//! The text comes from outside our control, so parsing never fails: lines
//! that do not fit the expected shape are skipped.

/// Data shown by `reg.exe` for a default value that was never written.
const VALUE_NOT_SET: &str = "(value not set)";

/// Hive spellings `reg.exe` accepts, long form first.
const HIVE_ALIASES: &[(&str, &str)] = &[
    ("HKEY_LOCAL_MACHINE", "HKLM"),
    ("HKEY_CURRENT_USER", "HKCU"),
    ("HKEY_CLASSES_ROOT", "HKCR"),
    ("HKEY_USERS", "HKU"),
    ("HKEY_CURRENT_CONFIG", "HKCC"),
];

/// One value row: name, type tag and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRow {
    /// Value name (`(Default)` for the unnamed value).
    pub name: String,
    /// Type tag such as `REG_SZ` or `REG_DWORD`.
    pub value_type: String,
    /// Data, with internal whitespace runs collapsed to single spaces.
    pub data: String,
}

/// Normalize a key path for comparison: short hive name, no trailing `\`.
///
/// `reg.exe` echoes keys with the long hive name even when queried with the
/// short one, so both spellings have to compare equal.
pub fn canonical_key(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('\\');
    for (long, short) in HIVE_ALIASES {
        if let Some(rest) = strip_prefix_ignore_case(trimmed, long) {
            if rest.is_empty() || rest.starts_with('\\') {
                return format!("{}{}", short, rest);
            }
        }
    }
    trimmed.to_string()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Whether `line` is the header echo of `key` (or of one of its children).
fn is_key_line(line: &str, key: &str) -> bool {
    let line = canonical_key(line);
    strip_prefix_ignore_case(&line, key).is_some()
}

/// Parse every value row in `output`, skipping header echoes of `key`.
pub fn parse_rows(output: &str, key: &str) -> Vec<RegistryRow> {
    let key = canonical_key(key);
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !is_key_line(line, &key))
        .filter_map(parse_row)
        .collect()
}

/// Split one line into a row; needs at least name, type and one data token.
fn parse_row(line: &str) -> Option<RegistryRow> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    let value_type = tokens.next()?;
    let data: Vec<&str> = tokens.collect();
    if data.is_empty() {
        return None;
    }
    Some(RegistryRow {
        name: name.to_string(),
        value_type: value_type.to_string(),
        data: data.join(" "),
    })
}

/// Extract the data of value `name` from a `query <key> /v <name>` output.
pub fn parse_value_data(output: &str, key: &str, name: &str) -> Option<String> {
    parse_rows(output, key)
        .into_iter()
        .find(|row| row.name.eq_ignore_ascii_case(name))
        .map(|row| row.data)
}

/// Extract the default value from a `query <key> /ve` output.
///
/// A default value that was never written yields `None`.
pub fn parse_default_data(output: &str, key: &str) -> Option<String> {
    parse_rows(output, key)
        .into_iter()
        .next()
        .map(|row| row.data)
        .filter(|data| data != VALUE_NOT_SET)
}

/// Extract immediate child key paths of `parent` from a `query <parent>` output.
///
/// Paths are returned exactly as the tool printed them, in its order.
pub fn parse_subkey_paths(output: &str, parent: &str) -> Vec<String> {
    let parent = canonical_key(parent);
    output
        .lines()
        .map(str::trim)
        .filter(|line| {
            let canonical = canonical_key(line);
            match strip_prefix_ignore_case(&canonical, &parent) {
                Some(rest) => rest.len() > 1 && rest.starts_with('\\'),
                None => false,
            }
        })
        .map(str::to_string)
        .collect()
}
