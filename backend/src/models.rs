use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::{response, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";

pub const MIN_ITEMS: usize = 5;
pub const MAX_ITEMS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    YoutubeVideo,
    YoutubeChannel,
    Website,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::YoutubeVideo => "youtube_video",
            ContentKind::YoutubeChannel => "youtube_channel",
            ContentKind::Website => "website",
        }
    }

    /// Title used when no extraction source yields one.
    pub fn placeholder_title(self) -> &'static str {
        match self {
            ContentKind::YoutubeChannel => UNKNOWN_CHANNEL,
            ContentKind::YoutubeVideo | ContentKind::Website => UNKNOWN_TITLE,
        }
    }

    pub fn is_youtube(self) -> bool {
        !matches!(self, ContentKind::Website)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a channel URL names its channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ChannelRef {
    Id(String),
    Handle(String),
    User(String),
    Custom(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub max_items: usize,
    pub include_shorts: bool,
    pub advanced_scraping: bool,
    pub ai_analysis: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            max_items: 10,
            include_shorts: true,
            advanced_scraping: false,
            ai_analysis: true,
        }
    }
}

impl AnalysisOptions {
    pub fn normalized(self) -> Self {
        AnalysisOptions {
            max_items: self.max_items.clamp(MIN_ITEMS, MAX_ITEMS),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentRequest {
    pub url: String,
    pub kind: ContentKind,
    pub options: AnalysisOptions,
    /// Set for videos discovered while analyzing a channel.
    pub batch_item: bool,
}

impl ContentRequest {
    pub fn new(url: impl Into<String>, kind: ContentKind, options: AnalysisOptions) -> Self {
        ContentRequest {
            url: url.into(),
            kind,
            options: options.normalized(),
            batch_item: false,
        }
    }

    /// Request for one video discovered while analyzing a channel.
    pub fn for_video(&self, url: impl Into<String>) -> Self {
        ContentRequest {
            url: url.into(),
            kind: ContentKind::YoutubeVideo,
            options: self.options,
            batch_item: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub subscribers: Option<u64>,
    pub video_count: Option<u64>,
    pub duration_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoDetails {
    pub video_id: String,
    pub channel_name: Option<String>,
    pub channel_id: Option<String>,
    pub published_at: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelDetails {
    pub channel_id: Option<String>,
    pub discovered_video_ids: Vec<String>,
    pub videos: Vec<VideoAnalysis>,
    pub batch: Option<BatchReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoReport {
    pub has_title: bool,
    pub title_length: usize,
    pub has_meta_description: bool,
    pub meta_description_length: usize,
    pub h1_count: usize,
    pub has_og_tags: bool,
    pub has_twitter_cards: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStructure {
    pub paragraphs: usize,
    pub lists: usize,
    pub tables: usize,
    pub forms: usize,
    pub scripts: usize,
    pub stylesheets: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteDetails {
    /// `h1`..`h6`, each key always present.
    pub headings: BTreeMap<String, Vec<String>>,
    pub seo: SeoReport,
    pub structure: ContentStructure,
    pub image_count: usize,
    pub link_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentDetails {
    Video(VideoDetails),
    Channel(ChannelDetails),
    Website(WebsiteDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub kind: ContentKind,
    pub url: String,
    pub title: String,
    pub description: String,
    pub metrics: Metrics,
    pub tags: Vec<String>,
    pub metadata: serde_json::Value,
    pub extracted_by: String,
    pub details: ContentDetails,
}

impl ContentRecord {
    pub fn new(kind: ContentKind, url: impl Into<String>, title: &str, details: ContentDetails) -> Self {
        let title = title.trim();
        ContentRecord {
            kind,
            url: url.into(),
            title: if title.is_empty() {
                kind.placeholder_title().to_string()
            } else {
                title.to_string()
            },
            description: String::new(),
            metrics: Metrics::default(),
            tags: Vec::new(),
            metadata: serde_json::Value::Null,
            extracted_by: String::new(),
            details,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_extracted_by(mut self, strategy: &str) -> Self {
        self.extracted_by = strategy.to_string();
        self
    }

    pub fn has_placeholder_title(&self) -> bool {
        self.title == self.kind.placeholder_title()
    }

    pub fn video_id(&self) -> Option<&str> {
        match &self.details {
            ContentDetails::Video(v) if !v.video_id.is_empty() => Some(&v.video_id),
            _ => None,
        }
    }

    pub fn channel(&self) -> Option<&ChannelDetails> {
        match &self.details {
            ContentDetails::Channel(c) => Some(c),
            _ => None,
        }
    }

    pub fn website(&self) -> Option<&WebsiteDetails> {
        match &self.details {
            ContentDetails::Website(w) => Some(w),
            _ => None,
        }
    }
}

/// A channel video together with its own basic analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    #[serde(flatten)]
    pub record: ContentRecord,
    pub insights: Insights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<SuggestionSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub url: String,
    pub causes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchReport {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: Vec<BatchFailure>,
    pub shorts_skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Real,
    Mock,
}

impl SuggestionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionSource::Real => "real",
            SuggestionSource::Mock => "mock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub source: SuggestionSource,
    pub title_candidates: Vec<String>,
    pub improved_description: String,
    pub content_ideas: Vec<String>,
    #[serde(default)]
    pub suggested_tags: Vec<String>,
    #[serde(default)]
    pub seo_analysis: SeoAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// Scores are on a 1 to 10 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoAnalysis {
    pub title_score: u8,
    pub description_score: u8,
    pub tags_score: u8,
    pub main_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

/// Long-form Markdown review of a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepAnalysis {
    pub source: SuggestionSource,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleAnalysis {
    pub length: usize,
    pub word_count: usize,
    pub has_numbers: bool,
    pub has_caps: bool,
    pub has_question: bool,
    pub has_exclamation: bool,
    pub keyword_density: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionAnalysis {
    pub length: usize,
    pub word_count: usize,
    pub has_links: bool,
    pub has_timestamps: bool,
    pub has_hashtags: bool,
    pub line_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagAnalysis {
    pub count: usize,
    pub total_characters: usize,
    pub avg_length: f64,
    pub unique_words: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
    pub video_id: String,
    pub title: String,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub total_views: u64,
    pub avg_engagement: f64,
    pub top_performing: Option<TopPerformer>,
    pub optimization_opportunities: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    /// Only computed when a view count is known.
    pub engagement_rate: Option<f64>,
    pub engagement_category: Option<String>,
    pub title: TitleAnalysis,
    pub description: DescriptionAnalysis,
    pub tags: TagAnalysis,
    pub optimization_score: u32,
    pub optimization_category: String,
    pub basic_suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_summary: Option<ChannelSummary>,
}

/// One finished analysis, as rendered by the dashboard and written by export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub session_id: String,
    pub analyzed_at: String,
    #[serde(flatten)]
    pub record: ContentRecord,
    pub insights: Insights,
    pub suggestions: Option<SuggestionSet>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    #[serde(default)]
    pub options: AnalysisOptions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ai_mode: String,
    pub youtube_api: bool,
    pub render_service: bool,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub causes: Vec<String>,
    #[serde(skip)]
    pub status: Status,
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).map_err(|_| Status::InternalServerError)?;
        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
