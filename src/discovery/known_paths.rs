//! Filesystem fallback locations.
//!
//! Templates use `%VAR%` environment references plus two placeholders:
//! `{exe}` (the executable file name) and `{name}` (the file name without
//! its extension).

use std::path::Path;

/// Default candidate locations, tried in order.
pub const DEFAULT_KNOWN_PATHS: &[&str] = &[
    r"%LOCALAPPDATA%\Programs\Microsoft VS Code\{exe}",
    r"%ProgramFiles%\Microsoft VS Code\{exe}",
    r"%ProgramFiles(x86)%\Microsoft VS Code\{exe}",
    r"%ProgramFiles%\{name}\{exe}",
    r"%ProgramFiles(x86)%\{name}\{exe}",
    r"%LOCALAPPDATA%\{name}\{exe}",
];

/// Expand `%VAR%` references using `lookup`.
///
/// Unknown variables are left in place, `%%` stays literal, and an
/// unterminated `%` is copied through, matching how Windows expands
/// environment strings.
pub fn expand_env_vars<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                match (!name.is_empty()).then(|| lookup(name)).flatten() {
                    Some(value) => {
                        out.push_str(&value);
                        rest = &after[end + 1..];
                    }
                    None => {
                        // Keep the first `%` and re-scan from the closing one,
                        // which may open the next reference.
                        out.push('%');
                        out.push_str(name);
                        rest = &after[end..];
                    }
                }
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// The executable name without its extension (`Code.exe` → `Code`).
pub fn exe_stem(exe_file_name: &str) -> String {
    Path::new(exe_file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Fill the placeholders of one template and expand its variables.
pub fn expand_template<F>(template: &str, exe_file_name: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let filled = template
        .replace("{exe}", exe_file_name)
        .replace("{name}", &exe_stem(exe_file_name));
    expand_env_vars(&filled, lookup)
}
