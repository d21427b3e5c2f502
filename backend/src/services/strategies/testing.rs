//! Scripted strategies for exercising the cascade without a network.

use super::ExtractionStrategy;
use crate::error::StrategyError;
use crate::models::{
    ChannelDetails, ContentDetails, ContentKind, ContentRecord, ContentRequest, Metrics,
    VideoDetails, WebsiteDetails,
};
use crate::services::classifier;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Script = Box<dyn Fn(&ContentRequest) -> Result<ContentRecord, StrategyError> + Send + Sync>;

enum Behaviour {
    Succeed(String),
    Fail,
    Slow(Duration),
    Script(Script),
}

pub struct FakeStrategy {
    name: &'static str,
    only: Option<ContentKind>,
    budget: Option<Duration>,
    behaviour: Behaviour,
    calls: AtomicUsize,
}

impl FakeStrategy {
    fn with(name: &'static str, behaviour: Behaviour) -> Self {
        FakeStrategy {
            name,
            only: None,
            budget: None,
            behaviour,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn succeeding(name: &'static str, title: &str) -> Self {
        Self::with(name, Behaviour::Succeed(title.to_string()))
    }

    pub fn failing(name: &'static str) -> Self {
        Self::with(name, Behaviour::Fail)
    }

    pub fn slow(name: &'static str, delay: Duration) -> Self {
        Self::with(name, Behaviour::Slow(delay))
    }

    pub fn scripted(
        name: &'static str,
        script: impl Fn(&ContentRequest) -> Result<ContentRecord, StrategyError> + Send + Sync + 'static,
    ) -> Self {
        Self::with(name, Behaviour::Script(Box::new(script)))
    }

    pub fn only_for(mut self, kind: ContentKind) -> Self {
        self.only = Some(kind);
        self
    }

    /// Overrides the cascade timeout for this strategy's attempts.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// A trimmed watch page with the meta tags and counters the parsers read.
pub const WATCH_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en"><head>
<title>Rick Astley - Never Gonna Give You Up (Official Music Video) - YouTube</title>
<meta name="title" content="Rick Astley - Never Gonna Give You Up (Official Music Video)">
<meta name="description" content="The official video for Never Gonna Give You Up by Rick Astley.">
<meta name="keywords" content="rick astley, Never Gonna Give You Up, rickroll">
<meta property="og:title" content="Rick Astley - Never Gonna Give You Up (Official Music Video)">
<meta property="og:image" content="https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg">
<meta itemprop="duration" content="PT3M33S">
<meta itemprop="datePublished" content="2009-10-24">
<meta itemprop="genre" content="Music">
</head><body>
<span itemprop="author"><link itemprop="name" content="Rick Astley"></span>
<script>var ytInitialData = {"viewCount":"1500000000","likeCount":"17000000","channelId":"UCuAXFkgsw1L7xaCfnd5JJOw"};</script>
</body></html>"#;

pub fn video_record(url: &str, title: &str) -> ContentRecord {
    ContentRecord::new(
        ContentKind::YoutubeVideo,
        url,
        title,
        ContentDetails::Video(VideoDetails {
            video_id: classifier::video_id(url).unwrap_or_default(),
            ..Default::default()
        }),
    )
    .with_metrics(Metrics {
        views: Some(1_000),
        likes: Some(50),
        comments: Some(10),
        duration_seconds: Some(213),
        ..Default::default()
    })
}

pub fn channel_record(url: &str, title: &str, video_ids: &[&str]) -> ContentRecord {
    ContentRecord::new(
        ContentKind::YoutubeChannel,
        url,
        title,
        ContentDetails::Channel(ChannelDetails {
            discovered_video_ids: video_ids.iter().map(|id| id.to_string()).collect(),
            ..Default::default()
        }),
    )
}

fn record_for(request: &ContentRequest, title: &str) -> ContentRecord {
    match request.kind {
        ContentKind::YoutubeVideo => video_record(&request.url, title),
        ContentKind::YoutubeChannel => channel_record(&request.url, title, &[]),
        ContentKind::Website => ContentRecord::new(
            ContentKind::Website,
            request.url.clone(),
            title,
            ContentDetails::Website(WebsiteDetails::default()),
        ),
    }
}

#[async_trait]
impl ExtractionStrategy for FakeStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, kind: ContentKind) -> bool {
        self.only.map_or(true, |only| only == kind)
    }

    fn attempt_budget(&self, default: Duration) -> Duration {
        self.budget.unwrap_or(default)
    }

    async fn extract(&self, request: &ContentRequest) -> Result<ContentRecord, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            Behaviour::Succeed(title) => Ok(record_for(request, title)),
            Behaviour::Fail => Err(StrategyError::Status(503)),
            Behaviour::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(record_for(request, "too late"))
            }
            Behaviour::Script(script) => script(request),
        }
    }
}
