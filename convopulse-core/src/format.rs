//! Formatting helpers shared by the report writers and the CLI.

/// Format a 0..1 fraction as a percentage (e.g., "12.5%").
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Format a duration in minutes (e.g., "8.3 min", "1.2 hr").
pub fn format_minutes(minutes: f64) -> String {
    if minutes >= 60.0 {
        format!("{:.1} hr", minutes / 60.0)
    } else {
        format!("{:.1} min", minutes)
    }
}

/// Format a float with one decimal place.
pub fn format_rate(value: f64) -> String {
    format!("{:.1}", value)
}

/// Format a count with thousands separators (e.g., "12,045").
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
