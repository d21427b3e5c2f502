use super::embedded::split_quoted_keywords;
use super::ExtractionStrategy;
use crate::error::StrategyError;
use crate::models::{
    ChannelDetails, ChannelRef, ContentDetails, ContentKind, ContentRecord, ContentRequest,
    Metrics, VideoDetails,
};
use crate::services::classifier;
use crate::utils::parse_iso8601_duration_to_seconds;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

// Uploads listing is read in a single page.
const MAX_PLAYLIST_RESULTS: &str = "50";

/// YouTube Data API v3. Only registered when an API key is configured.
pub struct DataApiStrategy {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DataApiStrategy {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        DataApiStrategy {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // Documentation: https://developers.google.com/youtube/v3/docs
    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, StrategyError> {
        let response = self
            .client
            .get(format!("{}/{endpoint}", self.base_url))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StrategyError::Status(status.as_u16()));
        }
        Ok(response.json::<Value>().await?)
    }

    async fn first_item(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, StrategyError> {
        let mut response = self.get(endpoint, query).await?;
        match response.get_mut("items").and_then(|items| items.get_mut(0)) {
            Some(item) => Ok(item.take()),
            None => Err(StrategyError::MissingField("items")),
        }
    }

    async fn video(&self, request: &ContentRequest) -> Result<ContentRecord, StrategyError> {
        let video_id = classifier::video_id(&request.url).ok_or(StrategyError::MissingField("video id"))?;
        let item = self
            .first_item(
                "videos",
                &[("part", "snippet,statistics,contentDetails"), ("id", video_id.as_str())],
            )
            .await?;
        video_record(&request.url, &video_id, &item)
    }

    async fn resolve_channel_id(&self, custom_name: &str) -> Result<String, StrategyError> {
        let item = self
            .first_item(
                "search",
                &[("part", "snippet"), ("type", "channel"), ("q", custom_name), ("maxResults", "1")],
            )
            .await?;
        item["snippet"]["channelId"]
            .as_str()
            .or_else(|| item["id"]["channelId"].as_str())
            .map(String::from)
            .ok_or(StrategyError::MissingField("channelId"))
    }

    async fn channel(&self, request: &ContentRequest) -> Result<ContentRecord, StrategyError> {
        let reference = classifier::channel_ref(&request.url).ok_or(StrategyError::MissingField("channel reference"))?;

        let (filter, value) = match reference {
            ChannelRef::Id(id) => ("id", id),
            ChannelRef::Handle(handle) => ("forHandle", format!("@{handle}")),
            ChannelRef::User(user) => ("forUsername", user),
            ChannelRef::Custom(name) => ("id", self.resolve_channel_id(&name).await?),
        };

        let item = self
            .first_item(
                "channels",
                &[("part", "snippet,statistics,contentDetails,brandingSettings"), (filter, value.as_str())],
            )
            .await?;

        let video_ids = match item["contentDetails"]["relatedPlaylists"]["uploads"].as_str() {
            Some(uploads) => self.upload_ids(uploads).await?,
            None => Vec::new(),
        };
        debug!("Data API listed {} uploads for {}", video_ids.len(), request.url);

        channel_record(&request.url, &item, video_ids)
    }

    async fn upload_ids(&self, playlist_id: &str) -> Result<Vec<String>, StrategyError> {
        let response = self
            .get(
                "playlistItems",
                &[
                    ("part", "contentDetails"),
                    ("playlistId", playlist_id),
                    ("maxResults", MAX_PLAYLIST_RESULTS),
                ],
            )
            .await?;

        Ok(response["items"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item["contentDetails"]["videoId"].as_str())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl ExtractionStrategy for DataApiStrategy {
    fn name(&self) -> &'static str {
        "youtube_data_api"
    }

    fn supports(&self, kind: ContentKind) -> bool {
        kind.is_youtube()
    }

    async fn extract(&self, request: &ContentRequest) -> Result<ContentRecord, StrategyError> {
        match request.kind {
            ContentKind::YoutubeVideo => self.video(request).await,
            ContentKind::YoutubeChannel => self.channel(request).await,
            other => Err(StrategyError::Unsupported(other)),
        }
    }
}

// The API returns counters as decimal strings.
fn counter(value: &Value) -> Option<u64> {
    value.as_str().and_then(|s| s.parse().ok()).or_else(|| value.as_u64())
}

fn text(value: &Value) -> Option<String> {
    value.as_str().filter(|s| !s.is_empty()).map(String::from)
}

fn video_record(url: &str, video_id: &str, item: &Value) -> Result<ContentRecord, StrategyError> {
    let snippet = &item["snippet"];
    let title = snippet["title"].as_str().ok_or(StrategyError::MissingField("snippet.title"))?;
    let statistics = &item["statistics"];

    let metrics = Metrics {
        views: counter(&statistics["viewCount"]),
        likes: counter(&statistics["likeCount"]),
        comments: counter(&statistics["commentCount"]),
        duration_seconds: item["contentDetails"]["duration"]
            .as_str()
            .and_then(parse_iso8601_duration_to_seconds),
        ..Default::default()
    };

    let tags = snippet["tags"]
        .as_array()
        .map(|tags| tags.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default();

    let details = VideoDetails {
        video_id: video_id.to_string(),
        channel_name: text(&snippet["channelTitle"]),
        channel_id: text(&snippet["channelId"]),
        published_at: text(&snippet["publishedAt"]),
        thumbnail: text(&snippet["thumbnails"]["high"]["url"])
            .or_else(|| text(&snippet["thumbnails"]["default"]["url"])),
    };

    Ok(
        ContentRecord::new(ContentKind::YoutubeVideo, url, title, ContentDetails::Video(details))
            .with_description(snippet["description"].as_str().unwrap_or(""))
            .with_metrics(metrics)
            .with_tags(tags)
            .with_metadata(json!({
                "category_id": snippet["categoryId"],
                "default_language": snippet["defaultAudioLanguage"],
                "definition": item["contentDetails"]["definition"],
                "caption": item["contentDetails"]["caption"],
            })),
    )
}

fn channel_record(url: &str, item: &Value, video_ids: Vec<String>) -> Result<ContentRecord, StrategyError> {
    let snippet = &item["snippet"];
    let title = snippet["title"].as_str().ok_or(StrategyError::MissingField("snippet.title"))?;
    let statistics = &item["statistics"];

    let metrics = Metrics {
        views: counter(&statistics["viewCount"]),
        subscribers: counter(&statistics["subscriberCount"]),
        video_count: counter(&statistics["videoCount"]),
        ..Default::default()
    };

    let details = ChannelDetails {
        channel_id: text(&item["id"]),
        discovered_video_ids: video_ids,
        ..Default::default()
    };

    Ok(
        ContentRecord::new(ContentKind::YoutubeChannel, url, title, ContentDetails::Channel(details))
            .with_description(snippet["description"].as_str().unwrap_or(""))
            .with_metrics(metrics)
            .with_tags(
                item["brandingSettings"]["channel"]["keywords"]
                    .as_str()
                    .map(split_quoted_keywords)
                    .unwrap_or_default(),
            )
            .with_metadata(json!({
                "custom_url": snippet["customUrl"],
                "country": snippet["country"],
                "published_at": snippet["publishedAt"],
            })),
    )
}
