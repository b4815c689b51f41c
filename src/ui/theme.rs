//! Visual theme and styling.

use console::Style;

/// Terminal styles for command output.
#[derive(Debug, Clone)]
pub struct ScoutTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted text (bold).
    pub highlight: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for key labels in key-value displays (bold).
    pub key: Style,
}

impl Default for ScoutTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            key: Style::new().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            key: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!("{} {}", self.header.apply_to("◆"), self.highlight.apply_to(title))
    }

    /// Format one `key: value` line, keys padded to `width`.
    pub fn format_key_value(&self, key: &str, value: &str, width: usize) -> String {
        let label = format!("{:<width$}", format!("{}:", key), width = width + 1);
        let value = if value.is_empty() {
            self.dim.apply_to("-".to_string()).to_string()
        } else {
            value.to_string()
        };
        format!("  {} {}", self.key.apply_to(label), value)
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_status_lines() {
        let theme = ScoutTheme::plain();
        assert_eq!(theme.format_success("Complete"), "✓ Complete");
        assert_eq!(theme.format_warning("Caution"), "⚠ Caution");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
    }

    #[test]
    fn theme_formats_header() {
        let theme = ScoutTheme::plain();
        assert_eq!(theme.format_header("Suite"), "◆ Suite");
    }

    #[test]
    fn key_value_pads_and_marks_empty() {
        let theme = ScoutTheme::plain();
        assert_eq!(
            theme.format_key_value("Version", "1.95.0", 12),
            "  Version:      1.95.0"
        );
        assert_eq!(theme.format_key_value("Path", "", 4), "  Path: -");
    }

    #[test]
    fn default_impl_matches_new() {
        let default = ScoutTheme::default();
        let new = ScoutTheme::new();
        assert_eq!(default.format_success("test"), new.format_success("test"));
    }
}
