//! Launch-path resolution from registry fields.

use crate::discovery::files::FileProbe;

/// Extension marking the end of an executable path inside an icon reference.
pub const EXE_EXTENSION: &str = ".exe";

/// Join a directory read from the registry with a file name.
///
/// The separator follows the one the directory already uses, so a Windows
/// path read from the registry stays a Windows path on any host.
pub fn combine_install_location(dir: &str, file_name: &str) -> Option<String> {
    let dir = dir.trim().trim_matches('"');
    if dir.is_empty() {
        return None;
    }
    if dir.ends_with('\\') || dir.ends_with('/') {
        return Some(format!("{}{}", dir, file_name));
    }
    let separator = if dir.contains('\\') {
        '\\'
    } else if dir.contains('/') {
        '/'
    } else {
        std::path::MAIN_SEPARATOR
    };
    Some(format!("{}{}{}", dir, separator, file_name))
}

/// Pull the executable path out of a `DisplayIcon` style reference.
///
/// Handles `"C:\App\app.exe",0`, `C:\App\app.exe,1` and plain paths by
/// cutting after the first case-insensitive `.exe`. References without an
/// executable (a bare `.ico`) yield `None`.
pub fn extract_executable_path(icon: &str) -> Option<String> {
    let value = icon.trim().trim_matches('"');
    if value.is_empty() {
        return None;
    }
    let idx = value.to_ascii_lowercase().find(EXE_EXTENSION)?;
    let path = value[..idx + EXE_EXTENSION.len()].trim().trim_matches('"');
    (!path.is_empty()).then(|| path.to_string())
}

/// Strategy (a): `InstallLocation` + executable name, if that file exists.
pub fn path_from_install_location(
    files: &dyn FileProbe,
    install_location: &str,
    exe_file_name: &str,
) -> Option<String> {
    combine_install_location(install_location, exe_file_name).filter(|p| files.is_file(p))
}

/// Strategy (b): executable named by the icon reference, if it exists.
pub fn path_from_display_icon(files: &dyn FileProbe, icon: &str) -> Option<String> {
    extract_executable_path(icon).filter(|p| files.is_file(p))
}
