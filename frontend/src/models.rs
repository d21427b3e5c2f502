use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    YoutubeVideo,
    YoutubeChannel,
    Website,
}

impl ContentKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ContentKind::YoutubeVideo => "YouTube video",
            ContentKind::YoutubeChannel => "YouTube channel",
            ContentKind::Website => "Website",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    pub url: String,
    pub options: AnalysisOptions,
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    #[serde(flatten)]
    pub record: ContentRecord,
    pub insights: Insights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<SuggestionSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    pub source: String,
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoAnalysis {
    pub title_score: u8,
    pub description_score: u8,
    pub tags_score: u8,
    pub main_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeepAnalysis {
    pub source: String,
    pub markdown: String,
    #[serde(default)]
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub session_id: String,
    pub analyzed_at: String,
    #[serde(flatten)]
    pub record: ContentRecord,
    pub insights: Insights,
    pub suggestions: Option<SuggestionSet>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusResponse {
    pub ai_mode: String,
    pub youtube_api: bool,
    pub render_service: bool,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default)]
    pub causes: Vec<String>,
}
