use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "a", "an",
    "is", "are", "was", "were", "how", "what", "when", "where", "why", "this", "that", "from",
    "your", "you", "into", "about",
];

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w+\b").expect("static regex"))
}

/// Parse ISO8601 duration string (PT1H2M3S) to total seconds
pub fn parse_iso8601_duration_to_seconds(duration_str: &str) -> Option<u64> {
    let duration_part = duration_str.strip_prefix("PT")?;
    let mut total_seconds = 0.0;
    let mut current_number = String::new();

    for ch in duration_part.chars() {
        if ch.is_ascii_digit() || ch == '.' {
            current_number.push(ch);
        } else {
            if let Ok(num) = current_number.parse::<f64>() {
                match ch {
                    'H' => total_seconds += num * 3600.0,
                    'M' => total_seconds += num * 60.0,
                    'S' => total_seconds += num,
                    _ => {}
                }
            }
            current_number.clear();
        }
    }

    Some(total_seconds as u64)
}

/// Parse "1:30" or "1:02:03" style clock durations.
pub fn parse_clock_duration(duration: &str) -> Option<u64> {
    let parts: Vec<u64> = duration
        .split(':')
        .map(|p| p.trim().parse::<u64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [m, s] => Some(m * 60 + s),
        [h, m, s] => Some(h * 3600 + m * 60 + s),
        _ => None,
    }
}

pub fn extract_youtube_video_id(url: &str) -> Option<String> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:youtube\.com/watch\?(?:.*&)?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/shorts/|youtube\.com/live/)([a-zA-Z0-9_-]{11})",
        )
        .ok()
    })
    .as_ref()?
    .captures(url)
    .and_then(|captures| captures.get(1))
    .map(|m| m.as_str().to_string())
}

/// Parse human counters such as "1.2M", "3,400" or "12K subscribers".
pub fn parse_count(count_str: &str) -> Option<u64> {
    let cleaned: String = count_str
        .trim()
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| *c != ',')
        .collect::<String>()
        .to_uppercase();

    let (number, multiplier) = match cleaned.chars().last()? {
        'K' => (&cleaned[..cleaned.len() - 1], 1_000.0),
        'M' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        'B' => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };

    let value = number.parse::<f64>().ok()?;
    if value < 0.0 {
        return None;
    }
    Some((value * multiplier).round() as u64)
}

/// Lowercased words longer than three characters, minus stop words, first-seen order.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let mut seen = BTreeSet::new();
    word_regex()
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(&w.as_str()))
        .filter(|w| seen.insert(w.clone()))
        .take(limit)
        .collect()
}

/// Percentage of all words taken by each word longer than three characters.
pub fn keyword_density(text: &str) -> BTreeMap<String, f64> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = word_regex().find_iter(&lowered).map(|m| m.as_str()).collect();
    if words.is_empty() {
        return BTreeMap::new();
    }

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for word in &words {
        if word.chars().count() > 3 {
            *counts.entry((*word).to_string()).or_default() += 1;
        }
    }

    let total = words.len() as f64;
    counts
        .into_iter()
        .map(|(word, count)| (word, count as f64 / total * 100.0))
        .collect()
}

/// Collapse whitespace and drop control characters.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    format!("{}...", text.chars().take(keep).collect::<String>())
}

pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let collapsed = cleaned
        .split('_')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    collapsed.chars().take(60).collect()
}

pub fn engagement_category(engagement_rate: f64) -> &'static str {
    match engagement_rate {
        r if r >= 10.0 => "Excellent",
        r if r >= 5.0 => "Good",
        r if r >= 2.0 => "Average",
        r if r >= 1.0 => "Below Average",
        _ => "Poor",
    }
}

pub fn optimization_category(score: u32) -> &'static str {
    match score {
        s if s >= 80 => "Excellent",
        s if s >= 60 => "Good",
        s if s >= 40 => "Needs Improvement",
        _ => "Poor",
    }
}
