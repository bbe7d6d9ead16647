/// Normalizes a typed percentage or count: trims whitespace, drops a trailing
/// `%` and removes commas (thousands separator).
pub fn normalize_field_input(s: &str) -> String {
    let trimmed = s.trim();
    trimmed
        .strip_suffix('%')
        .unwrap_or(trimmed)
        .trim_end()
        .replace(',', "")
}

/// Parses an on/off switch value.
pub fn parse_toggle(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => Some(true),
        "off" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Formats an optional value for display, using "—" when `None`.
pub fn opt_display(value: Option<&str>) -> &str {
    value.unwrap_or("—")
}
