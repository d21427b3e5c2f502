use crate::models::AnalysisResult;
use crate::utils::sanitize_filename;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

pub fn to_json(result: &AnalysisResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn from_json(json: &str) -> serde_json::Result<AnalysisResult> {
    serde_json::from_str(json)
}

/// `<kind>_analysis_<title>_<YYYYmmdd_HHMMSS>.json`, stamped with the analysis time.
pub fn export_filename(result: &AnalysisResult) -> String {
    let analyzed_at = DateTime::parse_from_rfc3339(&result.analyzed_at)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    let mut name = sanitize_filename(&result.record.title);
    if name.is_empty() {
        name = "untitled".to_string();
    }

    format!(
        "{}_analysis_{}_{}.json",
        result.record.kind,
        name,
        analyzed_at.format("%Y%m%d_%H%M%S")
    )
}

pub fn save(result: &AnalysisResult, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_filename(result));
    fs::write(&path, to_json(result)?).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub fn load(path: &Path) -> Result<AnalysisResult> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(from_json(&json)?)
}
