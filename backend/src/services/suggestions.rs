use crate::config::AiSettings;
use crate::error::AnalysisError;
use crate::models::{ContentRecord, DeepAnalysis, SeoAnalysis, SuggestionSet, SuggestionSource};
use crate::services::insights::engagement_rate;
use crate::utils::{extract_keywords, truncate_text};
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_DESCRIPTION_CHARS: usize = 1000;
const MAX_SUGGESTED_TAGS: usize = 12;
const DEEP_ANALYSIS_MAX_TOKENS: u32 = 2500;

const POWER_WORDS: &[&str] = &["Ultimate", "Secret", "Proven", "Amazing", "Incredible", "Essential"];
const TRENDING_TAGS: &[&str] = &[
    "viral", "trending", "popular", "new", "latest", "best", "top", "guide", "tutorial", "tips",
];
const CALL_TO_ACTION: &str = "🔔 Don't forget to SUBSCRIBE for more amazing content!
👍 LIKE this video if it helped you!
💬 COMMENT below with your thoughts!

#trending #viral #tutorial";
const SEO_GAP_KEYWORDS: &[&str] = &["tutorial", "guide", "tips", "secrets"];

/// Whether suggestions come from the AI service. Resolved once at startup.
pub enum AiCapability {
    Real(AiClient),
    Mock,
}

pub struct SuggestionGenerator {
    capability: AiCapability,
}

impl SuggestionGenerator {
    pub fn from_settings(settings: &AiSettings, client: Client) -> Self {
        let capability = match &settings.api_key {
            Some(api_key) => {
                info!("AI suggestions enabled with model {}", settings.model);
                AiCapability::Real(AiClient::new(client, api_key.clone(), settings))
            }
            None => {
                info!("No AI credentials configured, using mock suggestions");
                AiCapability::Mock
            }
        };
        SuggestionGenerator { capability }
    }

    pub fn mock() -> Self {
        SuggestionGenerator {
            capability: AiCapability::Mock,
        }
    }

    pub fn mode(&self) -> SuggestionSource {
        match self.capability {
            AiCapability::Real(_) => SuggestionSource::Real,
            AiCapability::Mock => SuggestionSource::Mock,
        }
    }

    /// Never fails: any AI error degrades to mock suggestions carrying the reason.
    pub async fn suggest(&self, record: &ContentRecord) -> SuggestionSet {
        match &self.capability {
            AiCapability::Mock => mock_suggestions(record, None),
            AiCapability::Real(client) => match client.generate(record).await {
                Ok(suggestions) => suggestions,
                Err(e) => {
                    warn!("Falling back to mock suggestions for {}: {e}", record.url);
                    mock_suggestions(record, Some(e.to_string()))
                }
            },
        }
    }

    /// Markdown review of one record. Like [`Self::suggest`], degrades to the mock text.
    pub async fn deep_analysis(&self, record: &ContentRecord) -> DeepAnalysis {
        match &self.capability {
            AiCapability::Mock => DeepAnalysis {
                source: SuggestionSource::Mock,
                markdown: mock_deep_analysis(record),
                fallback_reason: None,
            },
            AiCapability::Real(client) => match client.deep_analysis(record).await {
                Ok(markdown) => DeepAnalysis {
                    source: SuggestionSource::Real,
                    markdown,
                    fallback_reason: None,
                },
                Err(e) => {
                    warn!("Falling back to mock deep analysis for {}: {e}", record.url);
                    DeepAnalysis {
                        source: SuggestionSource::Mock,
                        markdown: mock_deep_analysis(record),
                        fallback_reason: Some(e.to_string()),
                    }
                }
            },
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct AiReply {
    title_candidates: Vec<String>,
    improved_description: String,
    content_ideas: Vec<String>,
    #[serde(default)]
    suggested_tags: Vec<String>,
    #[serde(default)]
    seo_analysis: Option<SeoAnalysis>,
}

enum CallError {
    Transient(String),
    Permanent(String),
}

impl From<reqwest::Error> for CallError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            CallError::Transient(e.to_string())
        } else {
            CallError::Permanent(e.to_string())
        }
    }
}

/// Client for an Anthropic-style Messages API.
pub struct AiClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    timeout: Duration,
    max_tokens: u32,
}

impl AiClient {
    pub fn new(client: Client, api_key: String, settings: &AiSettings) -> Self {
        AiClient {
            client,
            api_key,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            timeout: settings.timeout,
            max_tokens: settings.max_tokens,
        }
    }

    pub async fn generate(&self, record: &ContentRecord) -> Result<SuggestionSet, AnalysisError> {
        let reply = self.call_with_retry(&build_prompt(record), self.max_tokens).await?;

        let parsed = parse_reply(&reply).map_err(AnalysisError::SuggestionUnavailable)?;
        let seo_analysis = match parsed.seo_analysis {
            Some(seo) => clamp_scores(seo),
            None => {
                warn!("AI reply for {} had no SEO section, using heuristics", record.url);
                mock_seo_analysis(record, &extract_keywords(&record.title, 10))
            }
        };

        Ok(SuggestionSet {
            source: SuggestionSource::Real,
            title_candidates: parsed.title_candidates,
            improved_description: parsed.improved_description,
            content_ideas: parsed.content_ideas,
            suggested_tags: parsed.suggested_tags,
            seo_analysis,
            fallback_reason: None,
        })
    }

    pub async fn deep_analysis(&self, record: &ContentRecord) -> Result<String, AnalysisError> {
        let reply = self
            .call_with_retry(&build_deep_prompt(record), self.max_tokens.max(DEEP_ANALYSIS_MAX_TOKENS))
            .await?;
        let markdown = reply.trim();
        if markdown.is_empty() {
            return Err(AnalysisError::SuggestionUnavailable("AI reply was empty".to_string()));
        }
        Ok(markdown.to_string())
    }

    async fn call_with_retry(&self, prompt: &str, max_tokens: u32) -> Result<String, AnalysisError> {
        match self.call(prompt, max_tokens).await {
            Err(CallError::Transient(first)) => {
                warn!("Transient AI failure, retrying once: {first}");
                self.call(prompt, max_tokens).await
            }
            other => other,
        }
        .map_err(|e| match e {
            CallError::Transient(reason) | CallError::Permanent(reason) => {
                AnalysisError::SuggestionUnavailable(reason)
            }
        })
    }

    async fn call(&self, prompt: &str, max_tokens: u32) -> Result<String, CallError> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_base))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .timeout(self.timeout)
            .json(&MessagesRequest {
                model: &self.model,
                max_tokens,
                messages: vec![Message {
                    role: "user",
                    content: prompt,
                }],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = format!("AI service returned {status}: {}", truncate_text(&body, 200));
            return Err(if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                CallError::Transient(reason)
            } else {
                CallError::Permanent(reason)
            });
        }

        let body: MessagesResponse = response.json().await?;
        Ok(body
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

fn build_prompt(record: &ContentRecord) -> String {
    let description: String = record.description.chars().take(MAX_DESCRIPTION_CHARS).collect();
    let metric = |value: Option<u64>| value.map_or_else(|| "unknown".to_string(), |v| v.to_string());

    format!(
        "You are a YouTube and SEO growth expert. Analyze this {kind} and suggest improvements.\n\n\
         Title: {title}\n\
         Description: {description}\n\
         Tags: {tags}\n\
         Views: {views}\nLikes: {likes}\nComments: {comments}\n\n\
         Reply with only a JSON object with these keys:\n\
         \"title_candidates\": 3 improved titles under 60 characters,\n\
         \"improved_description\": an SEO-friendly description with a hook and a call to action,\n\
         \"content_ideas\": 5 related video ideas,\n\
         \"suggested_tags\": up to 15 relevant tags,\n\
         \"seo_analysis\": an object with \"title_score\", \"description_score\" and \"tags_score\" \
         (integers from 1 to 10), \"main_keywords\" and \"missing_keywords\" (lists of strings).",
        kind = record.kind,
        title = record.title,
        tags = record.tags.join(", "),
        views = metric(record.metrics.views),
        likes = metric(record.metrics.likes),
        comments = metric(record.metrics.comments),
    )
}

fn build_deep_prompt(record: &ContentRecord) -> String {
    let description: String = record.description.chars().take(MAX_DESCRIPTION_CHARS).collect();
    let engagement = engagement_rate(&record.metrics)
        .map_or_else(|| "unknown".to_string(), |rate| format!("{rate:.2}%"));

    format!(
        "You are a world-class YouTube strategist. Write a detailed review of this video in Markdown.\n\n\
         Title: {title}\n\
         Description: {description}\n\
         Tags: {tags}\n\
         Views: {views}\n\
         Engagement rate: {engagement}\n\n\
         Use one `###` heading per section, in this order: Title, Description, Tags, Thumbnail, \
         Content & Pacing, Audience Persona, Engagement Strategy, Monetization, Overall Score & Summary. \
         Give concrete, actionable advice in each section and finish with a score out of 10.",
        title = record.title,
        tags = record.tags.join(", "),
        views = record.metrics.views.map_or_else(|| "unknown".to_string(), |v| v.to_string()),
    )
}

fn clamp_scores(seo: SeoAnalysis) -> SeoAnalysis {
    SeoAnalysis {
        title_score: seo.title_score.clamp(1, 10),
        description_score: seo.description_score.clamp(1, 10),
        tags_score: seo.tags_score.clamp(1, 10),
        ..seo
    }
}

/// The JSON object in a model reply, tolerating prose or code fences around it.
fn parse_reply(reply: &str) -> Result<AiReply, String> {
    let start = reply.find('{').ok_or("AI reply contained no JSON object")?;
    let end = reply.rfind('}').ok_or("AI reply contained no JSON object")?;
    if end < start {
        return Err("AI reply contained no JSON object".to_string());
    }

    let parsed: AiReply = serde_json::from_str(&reply[start..=end])
        .map_err(|e| format!("could not parse AI reply: {e}"))?;
    if parsed.title_candidates.is_empty() {
        return Err("AI reply had no title candidates".to_string());
    }
    Ok(parsed)
}

fn main_topic(keywords: &[String]) -> String {
    keywords
        .first()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .unwrap_or_else(|| "Content".to_string())
}

fn mock_titles(title: &str, topic: &str) -> Vec<String> {
    let lead = if title.chars().count() < 40 {
        format!("{} {title} - 7 Tips You Need!", POWER_WORDS[0])
    } else {
        format!("10 {} {} Revealed!", POWER_WORDS[1], truncate_text(title, 33))
    };
    vec![
        lead,
        format!("The {} Guide to {topic}", POWER_WORDS[5]),
        format!("{} {topic} Strategies That Actually Work", POWER_WORDS[2]),
    ]
}

fn mock_description(record: &ContentRecord, keywords: &[String]) -> String {
    let hook = "🔥 Get ready to transform your understanding!";
    let keyword_text = if keywords.is_empty() {
        "Learn everything you need to know!".to_string()
    } else {
        let top: Vec<&str> = keywords.iter().take(3).map(String::as_str).collect();
        format!("Learn about {} and more!", top.join(", "))
    };

    if record.description.chars().count() > 100 {
        format!(
            "{hook}\n\n{}\n\n{keyword_text}\n\n{CALL_TO_ACTION}",
            truncate_text(&record.description, 203)
        )
    } else {
        format!("{hook}\n\n{keyword_text}\n\nThis video covers everything you need to know!\n\n{CALL_TO_ACTION}")
    }
}

fn mock_tags(record: &ContentRecord, keywords: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    keywords
        .iter()
        .cloned()
        .chain(TRENDING_TAGS.iter().map(|t| t.to_string()))
        .chain(record.tags.iter().take(5).cloned())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .take(MAX_SUGGESTED_TAGS)
        .collect()
}

fn mock_seo_analysis(record: &ContentRecord, keywords: &[String]) -> SeoAnalysis {
    let present: BTreeSet<String> = keywords
        .iter()
        .chain(record.tags.iter())
        .map(|word| word.to_lowercase())
        .collect();

    SeoAnalysis {
        title_score: 7,
        description_score: 6,
        tags_score: 5,
        main_keywords: keywords.iter().take(5).cloned().collect(),
        missing_keywords: SEO_GAP_KEYWORDS
            .iter()
            .filter(|word| !present.contains(**word))
            .map(|word| word.to_string())
            .collect(),
    }
}

/// Fixed Markdown review built from the title and keywords.
fn mock_deep_analysis(record: &ContentRecord) -> String {
    let keywords = extract_keywords(&record.title, 10);
    let topic = keywords.first().map(String::as_str).unwrap_or("this topic");

    format!(
        "### 🧠 Deep Analysis & Suggestions for \"{title}\"\n\n\
         #### 🖼️ Thumbnail Analysis\n\
         - Use a close-up face with a strong emotion to draw attention.\n\
         - Keep the text overlay under five words in a bold, high-contrast font.\n\
         - Make the subject stand out against a simple background.\n\n\
         #### 🎬 Content Structure\n\
         - **Hook (0-15s):** open with the most surprising result or question.\n\
         - **Intro (15-45s):** say what the viewer will learn and why it matters.\n\
         - **Main content:** split the video into clear chapters with timestamps.\n\
         - **Call to action:** ask for a like and a subscribe at the moment of highest value.\n\
         - **Outro:** tease the next video and link to a related one.\n\n\
         #### 🎯 Audience Persona\n\
         Viewers interested in **{topic}** who want practical, step-by-step guidance \
         and quick wins they can apply right away.\n\n\
         #### 💬 Engagement Hooks\n\
         - Ask a specific question in the first minute and pin a comment that repeats it.\n\
         - Add a poll or community post that follows up on the video.\n\
         - Reply to early comments to start discussions.\n\n\
         #### 💰 Monetization Potential\n\
         - Affiliate links for the tools and products shown.\n\
         - A paid course or guide that goes deeper into {topic}.\n\
         - Consulting or coaching for viewers who want personal help.\n",
        title = record.title,
    )
}

fn mock_content_ideas(topic: &str) -> Vec<String> {
    vec![
        format!("Top 10 {topic} mistakes to avoid"),
        format!("Beginner's guide to {topic}"),
        format!("Advanced {topic} techniques revealed"),
        format!("{topic} vs alternatives comparison"),
        format!("The future of {topic}: what to expect next"),
    ]
}

/// Deterministic heuristic suggestions derived from the record's title and tags.
pub fn mock_suggestions(record: &ContentRecord, fallback_reason: Option<String>) -> SuggestionSet {
    let keywords = extract_keywords(&record.title, 10);
    let topic = main_topic(&keywords);

    SuggestionSet {
        source: SuggestionSource::Mock,
        title_candidates: mock_titles(&record.title, &topic),
        improved_description: mock_description(record, &keywords),
        content_ideas: mock_content_ideas(&topic),
        suggested_tags: mock_tags(record, &keywords),
        seo_analysis: mock_seo_analysis(record, &keywords),
        fallback_reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::strategies::testing::video_record;
    use httpmock::prelude::*;
    use serde_json::json;

    fn settings(server: &MockServer, api_key: Option<&str>) -> AiSettings {
        AiSettings {
            api_key: api_key.map(String::from),
            api_base: server.base_url(),
            model: "test-model".to_string(),
            timeout: Duration::from_secs(5),
            max_tokens: 500,
        }
    }

    fn record() -> ContentRecord {
        video_record("https://www.youtube.com/watch?v=dQw4w9WgXcQ", "Baking sourdough bread")
            .with_tags(vec!["bread".to_string(), "Baking".to_string()])
    }

    #[test]
    fn mock_mode_is_deterministic() {
        let first = mock_suggestions(&record(), None);
        let second = mock_suggestions(&record(), None);
        assert_eq!(first, second);
        assert_eq!(first.source, SuggestionSource::Mock);
        assert_eq!(first.title_candidates[0], "Ultimate Baking sourdough bread - 7 Tips You Need!");
        assert_eq!(first.content_ideas[0], "Top 10 Baking mistakes to avoid");
        assert!(first.improved_description.contains("Learn about baking, sourdough, bread and more!"));
    }

    #[test]
    fn mock_tags_are_unique_and_bounded() {
        let tags = mock_suggestions(&record(), None).suggested_tags;
        assert_eq!(tags.len(), MAX_SUGGESTED_TAGS);
        assert_eq!(&tags[..3], ["baking", "sourdough", "bread"]);
        let unique: BTreeSet<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        assert_eq!(unique.len(), tags.len());
    }

    #[test]
    fn long_titles_are_shortened_in_mock_candidates() {
        let long = video_record(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "A very long title about kitchen experiments that keeps going",
        );
        let candidate = &mock_suggestions(&long, None).title_candidates[0];
        assert!(candidate.starts_with("10 Secret A very long title"));
        assert!(candidate.ends_with("... Revealed!"));
    }

    #[test]
    fn parses_fenced_replies() {
        let reply = "Here you go:\n```json\n{\"title_candidates\":[\"A\"],\"improved_description\":\"B\",\"content_ideas\":[\"C\"]}\n```";
        let parsed = parse_reply(reply).unwrap();
        assert_eq!(parsed.title_candidates, vec!["A"]);
        assert!(parsed.suggested_tags.is_empty());
        assert!(parse_reply("no json here").is_err());
    }

    #[tokio::test]
    async fn missing_credentials_always_yield_mock() {
        let server = MockServer::start();
        let generator = SuggestionGenerator::from_settings(&settings(&server, None), Client::new());
        assert_eq!(generator.mode(), SuggestionSource::Mock);

        let suggestions = generator.suggest(&record()).await;
        assert_eq!(suggestions.source, SuggestionSource::Mock);
        assert!(suggestions.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn real_mode_returns_model_suggestions() {
        let server = MockServer::start();
        let text = "```json\n{\"title_candidates\":[\"Sourdough in 3 Steps!\"],\"improved_description\":\"Bake better bread.\",\"content_ideas\":[\"Starter care\"],\"suggested_tags\":[\"sourdough\"]}\n```";
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .header("x-api-key", "secret")
                .header("anthropic-version", ANTHROPIC_VERSION);
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": text}]}));
        });

        let generator = SuggestionGenerator::from_settings(&settings(&server, Some("secret")), Client::new());
        assert_eq!(generator.mode(), SuggestionSource::Real);

        let suggestions = generator.suggest(&record()).await;
        mock.assert();
        assert_eq!(suggestions.source, SuggestionSource::Real);
        assert_eq!(suggestions.title_candidates, vec!["Sourdough in 3 Steps!"]);
        assert_eq!(suggestions.suggested_tags, vec!["sourdough"]);
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once_then_mocked() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(503).body("overloaded");
        });

        let generator = SuggestionGenerator::from_settings(&settings(&server, Some("secret")), Client::new());
        let suggestions = generator.suggest(&record()).await;

        mock.assert_hits(2);
        assert_eq!(suggestions.source, SuggestionSource::Mock);
        assert!(suggestions.fallback_reason.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(401).body("invalid key");
        });

        let generator = SuggestionGenerator::from_settings(&settings(&server, Some("wrong")), Client::new());
        let suggestions = generator.suggest(&record()).await;

        mock.assert_hits(1);
        assert_eq!(suggestions.source, SuggestionSource::Mock);
    }

    #[test]
    fn mock_seo_analysis_lists_keyword_gaps() {
        let seo = mock_suggestions(&record().with_tags(vec!["Tips".to_string()]), None).seo_analysis;
        assert_eq!((seo.title_score, seo.description_score, seo.tags_score), (7, 6, 5));
        assert_eq!(seo.main_keywords, vec!["baking", "sourdough", "bread"]);
        assert_eq!(seo.missing_keywords, vec!["tutorial", "guide", "secrets"]);
    }

    #[tokio::test]
    async fn real_seo_scores_are_read_and_clamped() {
        let server = MockServer::start();
        let text = json!({
            "title_candidates": ["Sourdough in 3 Steps!"],
            "improved_description": "Bake better bread.",
            "content_ideas": ["Starter care"],
            "seo_analysis": {
                "title_score": 9,
                "description_score": 0,
                "tags_score": 14,
                "main_keywords": ["sourdough"],
                "missing_keywords": ["starter"]
            }
        })
        .to_string();
        server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": text}]}));
        });

        let generator = SuggestionGenerator::from_settings(&settings(&server, Some("secret")), Client::new());
        let seo = generator.suggest(&record()).await.seo_analysis;

        assert_eq!((seo.title_score, seo.description_score, seo.tags_score), (9, 1, 10));
        assert_eq!(seo.missing_keywords, vec!["starter"]);
    }

    #[tokio::test]
    async fn real_reply_without_seo_section_gets_heuristic_scores() {
        let server = MockServer::start();
        let text = "{\"title_candidates\":[\"A\"],\"improved_description\":\"B\",\"content_ideas\":[\"C\"]}";
        server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": text}]}));
        });

        let generator = SuggestionGenerator::from_settings(&settings(&server, Some("secret")), Client::new());
        let suggestions = generator.suggest(&record()).await;

        assert_eq!(suggestions.source, SuggestionSource::Real);
        assert_eq!(suggestions.seo_analysis.title_score, 7);
    }

    #[tokio::test]
    async fn mock_deep_analysis_covers_every_section() {
        let deep = SuggestionGenerator::mock().deep_analysis(&record()).await;
        assert_eq!(deep.source, SuggestionSource::Mock);
        assert!(deep.markdown.starts_with("### 🧠 Deep Analysis & Suggestions for \"Baking sourdough bread\""));
        for section in ["Thumbnail", "Content Structure", "Audience Persona", "Engagement Hooks", "Monetization"] {
            assert!(deep.markdown.contains(section), "missing {section}");
        }
        assert!(deep.markdown.contains("**baking**"));
    }

    #[tokio::test]
    async fn real_deep_analysis_returns_model_markdown() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/messages")
                .body_contains("Overall Score & Summary");
            then.status(200)
                .json_body(json!({"content": [{"type": "text", "text": "\n### Title\nStrong hook.\n"}]}));
        });

        let generator = SuggestionGenerator::from_settings(&settings(&server, Some("secret")), Client::new());
        let deep = generator.deep_analysis(&record()).await;

        mock.assert();
        assert_eq!(deep.source, SuggestionSource::Real);
        assert_eq!(deep.markdown, "### Title\nStrong hook.");
        assert!(deep.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn failed_deep_analysis_falls_back_with_reason() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/messages");
            then.status(401).body("invalid key");
        });

        let generator = SuggestionGenerator::from_settings(&settings(&server, Some("wrong")), Client::new());
        let deep = generator.deep_analysis(&record()).await;

        assert_eq!(deep.source, SuggestionSource::Mock);
        assert!(deep.fallback_reason.unwrap().contains("401"));
        assert!(deep.markdown.contains("Audience Persona"));
    }
}
