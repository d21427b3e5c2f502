use super::html::{discover_video_ids, like_count, subscriber_count};
use super::ExtractionStrategy;
use crate::error::StrategyError;
use crate::models::{
    ChannelDetails, ContentDetails, ContentKind, ContentRecord, ContentRequest, Metrics,
    VideoDetails,
};
use crate::services::classifier;
use crate::services::fetcher::HttpFetcher;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";
const INITIAL_DATA_MARKER: &str = "ytInitialData";

/// Reads the JSON blobs YouTube embeds in its pages for the client player.
pub struct EmbeddedMetadataStrategy {
    fetcher: Arc<HttpFetcher>,
}

impl EmbeddedMetadataStrategy {
    pub fn new(fetcher: Arc<HttpFetcher>) -> Self {
        EmbeddedMetadataStrategy { fetcher }
    }
}

#[async_trait]
impl ExtractionStrategy for EmbeddedMetadataStrategy {
    fn name(&self) -> &'static str {
        "embedded_metadata"
    }

    fn supports(&self, kind: ContentKind) -> bool {
        kind.is_youtube()
    }

    async fn extract(&self, request: &ContentRequest) -> Result<ContentRecord, StrategyError> {
        match request.kind {
            ContentKind::YoutubeVideo => {
                let html = self.fetcher.fetch_html(&request.url).await?;
                parse_player_response(&request.url, &html)
            }
            ContentKind::YoutubeChannel => {
                let html = self
                    .fetcher
                    .fetch_html(&classifier::channel_videos_url(&request.url))
                    .await?;
                parse_channel_data(&request.url, &html)
            }
            other => Err(StrategyError::Unsupported(other)),
        }
    }
}

/// The first JSON object that follows `marker` in the page source.
pub fn embedded_json(html: &str, marker: &'static str) -> Result<Value, StrategyError> {
    let start = html.find(marker).ok_or(StrategyError::MissingField(marker))?;
    let rest = &html[start + marker.len()..];
    let brace = rest.find('{').ok_or(StrategyError::MissingField(marker))?;

    let mut values = serde_json::Deserializer::from_str(&rest[brace..]).into_iter::<Value>();
    match values.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(e.into()),
        None => Err(StrategyError::MissingField(marker)),
    }
}

fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

fn count_at(value: &Value, pointer: &str) -> Option<u64> {
    match value.pointer(pointer)? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Space separated keywords where multi-word entries are quoted.
pub fn split_quoted_keywords(raw: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in raw.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    keywords.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        keywords.push(current);
    }
    keywords
}

pub fn parse_player_response(url: &str, html: &str) -> Result<ContentRecord, StrategyError> {
    let player = embedded_json(html, PLAYER_RESPONSE_MARKER)?;
    let video = player
        .get("videoDetails")
        .ok_or(StrategyError::MissingField("videoDetails"))?;

    let title = str_at(video, "/title").ok_or(StrategyError::MissingField("videoDetails.title"))?;
    let microformat = player.pointer("/microformat/playerMicroformatRenderer");

    let metrics = Metrics {
        views: count_at(video, "/viewCount"),
        likes: like_count(html),
        duration_seconds: count_at(video, "/lengthSeconds"),
        ..Default::default()
    };

    let tags = video
        .get("keywords")
        .and_then(Value::as_array)
        .map(|keywords| {
            keywords
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let thumbnail = video
        .pointer("/thumbnail/thumbnails")
        .and_then(Value::as_array)
        .and_then(|thumbs| thumbs.last())
        .and_then(|thumb| thumb.get("url"))
        .and_then(Value::as_str)
        .map(String::from);

    let details = VideoDetails {
        video_id: str_at(video, "/videoId")
            .map(String::from)
            .or_else(|| classifier::video_id(url))
            .unwrap_or_default(),
        channel_name: str_at(video, "/author").map(String::from),
        channel_id: str_at(video, "/channelId").map(String::from),
        published_at: microformat
            .and_then(|m| str_at(m, "/publishDate"))
            .map(String::from),
        thumbnail,
    };

    let metadata = json!({
        "category": microformat.and_then(|m| str_at(m, "/category")),
        "is_live_content": video.get("isLiveContent").and_then(Value::as_bool),
        "is_family_safe": microformat.and_then(|m| m.get("isFamilySafe")).and_then(Value::as_bool),
    });

    Ok(
        ContentRecord::new(ContentKind::YoutubeVideo, url, title, ContentDetails::Video(details))
            .with_description(str_at(video, "/shortDescription").unwrap_or_default())
            .with_metrics(metrics)
            .with_tags(tags)
            .with_metadata(metadata),
    )
}

pub fn parse_channel_data(url: &str, html: &str) -> Result<ContentRecord, StrategyError> {
    let data = embedded_json(html, INITIAL_DATA_MARKER)?;
    let channel = data
        .pointer("/metadata/channelMetadataRenderer")
        .ok_or(StrategyError::MissingField("channelMetadataRenderer"))?;

    let title = str_at(channel, "/title").ok_or(StrategyError::MissingField("channelMetadataRenderer.title"))?;

    let metrics = Metrics {
        subscribers: subscriber_count(html),
        ..Default::default()
    };

    let details = ChannelDetails {
        channel_id: str_at(channel, "/externalId").map(String::from),
        discovered_video_ids: discover_video_ids(html),
        ..Default::default()
    };

    Ok(
        ContentRecord::new(ContentKind::YoutubeChannel, url, title, ContentDetails::Channel(details))
            .with_description(str_at(channel, "/description").unwrap_or_default())
            .with_metrics(metrics)
            .with_tags(
                str_at(channel, "/keywords")
                    .map(split_quoted_keywords)
                    .unwrap_or_default(),
            )
            .with_metadata(json!({
                "vanity_url": str_at(channel, "/vanityChannelUrl"),
                "is_family_safe": channel.get("isFamilySafe").and_then(Value::as_bool),
            })),
    )
}
