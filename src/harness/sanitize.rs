//! Timer name sanitization.

/// Longest timer name the reporting sink accepts.
pub const MAX_TIMER_NAME_LEN: usize = 32;

const TIMER_PREFIX: &str = "t_";

/// Turn an arbitrary check name into a valid timer name.
///
/// Characters other than letters, digits and `_` become `_`. A name that is
/// empty or does not start with a letter or digit gets a `t_` prefix. The
/// result is cut to [`MAX_TIMER_NAME_LEN`] characters.
///
/// ```
/// use appscout::harness::sanitize_timer_name;
///
/// assert_eq!(sanitize_timer_name("Demo: QueryKey"), "Demo__QueryKey");
/// assert_eq!(sanitize_timer_name(""), "t_");
/// ```
pub fn sanitize_timer_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if !sanitized.chars().next().is_some_and(char::is_alphanumeric) {
        sanitized.insert_str(0, TIMER_PREFIX);
    }

    sanitized.chars().take(MAX_TIMER_NAME_LEN).collect()
}
