/// Format a metric reading for display: "10 km/h", "1012.5 hPa".
/// Missing values render as a bare dash.
pub fn format_metric(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0} {}", v, unit),
        Some(v) => format!("{:.1} {}", v, unit),
        None => "-".to_string(),
    }
}

/// Temperature for the timeline strip: "25°c" or "-"
pub fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}°c", v),
        Some(v) => format!("{:.1}°c", v),
        None => "-".to_string(),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
