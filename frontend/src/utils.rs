pub fn format_iso8601_date(iso_date: &str) -> String {
    if let Ok(datetime) = iso_date.parse::<chrono::DateTime<chrono::Utc>>() {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        iso_date.to_string()
    }
}

pub fn format_datetime(iso_date: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(iso_date) {
        Ok(datetime) => datetime.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => iso_date.to_string(),
    }
}

// Formats each x1000 step
pub fn format_number(number: u64) -> String {
    let num_str = number.to_string();
    let mut result = String::new();
    let len = num_str.len();

    for (i, c) in num_str.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

pub fn format_optional(number: Option<u64>) -> String {
    number.map(format_number).unwrap_or_else(|| "n/a".to_string())
}

pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let remaining_seconds = seconds % 60;
    if hours != 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, remaining_seconds)
    } else {
        format!("{:02}:{:02}", minutes, remaining_seconds)
    }
}

pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate)
}

pub fn format_score(score: u8) -> String {
    format!("{}/10", score.min(10))
}

/// Width of a CSS bar relative to the largest value, in percent.
pub fn bar_width(value: u64, max: u64) -> f64 {
    if max == 0 {
        return 0.0;
    }
    (value as f64 / max as f64 * 100.0).clamp(0.0, 100.0)
}

pub fn json_data_url(json: &str) -> String {
    format!(
        "data:application/json;charset=utf-8,{}",
        urlencoding::encode(json)
    )
}

/// Pulls the filename out of `Content-Disposition: attachment; filename="..."`.
pub fn attachment_filename(disposition: &str) -> Option<String> {
    let (_, rest) = disposition.split_once("filename=")?;
    let name = rest.trim().trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
