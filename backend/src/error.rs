use crate::models::ContentKind;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Why a single extraction strategy gave up. Never fatal on its own.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("could not parse response: {0}")]
    Parse(String),
    #[error("request blocked: {0}")]
    Blocked(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("does not handle {0} content")]
    Unsupported(ContentKind),
}

impl From<serde_json::Error> for StrategyError {
    fn from(e: serde_json::Error) -> Self {
        StrategyError::Parse(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub strategy: String,
    pub cause: String,
}

impl fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.cause)
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("all extraction strategies failed for {url}")]
    ExtractionFailed {
        url: String,
        causes: Vec<StrategyFailure>,
    },
    #[error("suggestions unavailable: {0}")]
    SuggestionUnavailable(String),
}

impl AnalysisError {
    pub fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Flattened diagnostics, one line per failed strategy.
    pub fn causes(&self) -> Vec<String> {
        match self {
            AnalysisError::ExtractionFailed { causes, .. } => {
                causes.iter().map(ToString::to_string).collect()
            }
            AnalysisError::InvalidUrl { reason, .. } => vec![reason.clone()],
            AnalysisError::SuggestionUnavailable(reason) => vec![reason.clone()],
        }
    }
}
