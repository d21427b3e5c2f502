use crate::error::AnalysisError;
use crate::models::{
    AnalysisOptions, AnalysisResult, BatchFailure, BatchReport, ContentDetails, ContentKind,
    ContentRecord, ContentRequest, DeepAnalysis, Insights, SuggestionSet, SuggestionSource,
};
use crate::services::classifier;
use crate::services::insights;
use crate::services::strategies::{run_cascade, StrategyRegistry};
use crate::services::suggestions::SuggestionGenerator;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const SHORTS_MAX_SECONDS: u64 = 60;

static SESSION_SEQ: AtomicU64 = AtomicU64::new(1);

/// State for a single analysis request. Nothing outlives it.
#[derive(Debug)]
pub struct AnalysisSession {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub request: ContentRequest,
}

impl AnalysisSession {
    pub fn start(request: ContentRequest) -> Self {
        let started_at = Utc::now();
        AnalysisSession {
            id: format!("{}_{}", started_at.timestamp(), SESSION_SEQ.fetch_add(1, Ordering::Relaxed)),
            started_at,
            request,
        }
    }

    pub fn finish(
        self,
        record: ContentRecord,
        insights: Insights,
        suggestions: Option<SuggestionSet>,
    ) -> AnalysisResult {
        let elapsed = Utc::now() - self.started_at;
        info!(
            "Session {} finished in {}ms via {}",
            self.id,
            elapsed.num_milliseconds(),
            record.extracted_by
        );
        AnalysisResult {
            session_id: self.id,
            analyzed_at: self.started_at.to_rfc3339(),
            record,
            insights,
            suggestions,
        }
    }
}

/// Classification, extraction, insights and suggestions for one URL at a time.
pub struct Analyzer {
    registry: StrategyRegistry,
    suggestions: SuggestionGenerator,
    timeout: Duration,
}

impl Analyzer {
    pub fn new(registry: StrategyRegistry, suggestions: SuggestionGenerator, timeout: Duration) -> Self {
        Analyzer {
            registry,
            suggestions,
            timeout,
        }
    }

    pub fn suggestion_mode(&self) -> SuggestionSource {
        self.suggestions.mode()
    }

    pub async fn analyze(&self, url: &str, options: AnalysisOptions) -> Result<AnalysisResult, AnalysisError> {
        let kind = classifier::classify(url)?;
        let session = AnalysisSession::start(ContentRequest::new(url.trim(), kind, options));
        info!("Session {}: analyzing {} as {kind}", session.id, session.request.url);

        let record = self.extract(&session.request).await?;
        let insights = insights::analyze(&record);

        let suggestions = if session.request.options.ai_analysis {
            Some(self.suggestions.suggest(&record).await)
        } else {
            None
        };

        Ok(session.finish(record, insights, suggestions))
    }

    /// On-demand long-form review of an already extracted record.
    pub async fn deep_analysis(&self, record: &ContentRecord) -> DeepAnalysis {
        info!("Deep analysis requested for {}", record.url);
        self.suggestions.deep_analysis(record).await
    }

    /// Runs the cascade for `request`; channels also get their videos extracted.
    pub async fn extract(&self, request: &ContentRequest) -> Result<ContentRecord, AnalysisError> {
        let record = run_cascade(&self.registry.plan(request), request, self.timeout).await?;

        if request.kind == ContentKind::YoutubeChannel {
            Ok(self.extract_channel_videos(request, record).await)
        } else {
            Ok(record)
        }
    }

    async fn extract_channel_videos(&self, request: &ContentRequest, mut record: ContentRecord) -> ContentRecord {
        let video_ids = match record.channel() {
            Some(channel) => channel.discovered_video_ids.clone(),
            None => return record,
        };
        let options = request.options;

        let mut videos = Vec::new();
        let mut report = BatchReport::default();
        let limit = options.max_items.min(video_ids.len());

        // Skipped shorts still cost a cascade, so every attempt counts toward the limit.
        for (attempt, video_id) in video_ids.iter().take(limit).enumerate() {
            let video_request = request.for_video(classifier::watch_url(video_id));
            info!("Channel batch item {}/{limit}: {}", attempt + 1, video_request.url);

            match run_cascade(&self.registry.plan(&video_request), &video_request, self.timeout).await {
                Ok(video) => {
                    let is_short = video
                        .metrics
                        .duration_seconds
                        .is_some_and(|seconds| seconds <= SHORTS_MAX_SECONDS);
                    if is_short && !options.include_shorts {
                        report.shorts_skipped += 1;
                        continue;
                    }

                    let mut analyzed = insights::analyze_video(video);
                    if options.ai_analysis {
                        analyzed.suggestions = Some(self.suggestions.suggest(&analyzed.record).await);
                    }
                    videos.push(analyzed);
                }
                Err(e) => {
                    warn!("Skipping {}: {e}", video_request.url);
                    report.failed.push(BatchFailure {
                        url: video_request.url,
                        causes: e.causes(),
                    });
                }
            }
        }

        report.succeeded = videos.len();
        report.requested = limit;
        info!(
            "Channel batch for {}: {} of {} videos extracted, {} failed, {} shorts skipped",
            request.url,
            report.succeeded,
            report.requested,
            report.failed.len(),
            report.shorts_skipped
        );

        if let ContentDetails::Channel(channel) = &mut record.details {
            channel.videos = videos;
            channel.batch = Some(report);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderOrder;
    use crate::error::StrategyError;
    use crate::services::strategies::testing::{channel_record, video_record, FakeStrategy};
    use crate::services::strategies::ExtractionStrategy;
    use std::sync::Arc;

    const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    const CHANNEL_URL: &str = "https://www.youtube.com/@someone";

    fn analyzer_with(structured: Vec<Arc<dyn ExtractionStrategy>>, html: Arc<dyn ExtractionStrategy>) -> Analyzer {
        analyzer_with_timeout(structured, html, Duration::from_secs(1))
    }

    fn analyzer_with_timeout(
        structured: Vec<Arc<dyn ExtractionStrategy>>,
        html: Arc<dyn ExtractionStrategy>,
        timeout: Duration,
    ) -> Analyzer {
        let registry = StrategyRegistry::new(
            structured,
            html,
            Arc::new(FakeStrategy::failing("browser")),
            RenderOrder::AfterHtml,
        );
        Analyzer::new(registry, SuggestionGenerator::mock(), timeout)
    }

    /// A channel with `ids`; videos whose id starts with `x` fail, ids starting with `s` are shorts.
    fn channel_strategy(ids: &'static [&'static str]) -> FakeStrategy {
        FakeStrategy::scripted("scripted", move |request| match request.kind {
            ContentKind::YoutubeChannel => Ok(channel_record(&request.url, "Someone", ids)),
            _ => {
                let id = classifier::video_id(&request.url).unwrap_or_default();
                if id.starts_with('x') {
                    return Err(StrategyError::Status(404));
                }
                let mut video = video_record(&request.url, &format!("Video {id}"));
                if id.starts_with('s') {
                    video.metrics.duration_seconds = Some(45);
                }
                Ok(video)
            }
        })
    }

    fn channel_analyzer(ids: &'static [&'static str]) -> Analyzer {
        analyzer_with(vec![Arc::new(channel_strategy(ids))], Arc::new(FakeStrategy::failing("html")))
    }

    fn options(ai_analysis: bool) -> AnalysisOptions {
        AnalysisOptions {
            ai_analysis,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn malformed_input_is_rejected_before_any_extraction() {
        let structured = Arc::new(FakeStrategy::succeeding("structured", "never"));
        let analyzer = analyzer_with(
            vec![structured.clone() as Arc<dyn ExtractionStrategy>],
            Arc::new(FakeStrategy::failing("html")),
        );

        let err = analyzer.analyze("not a url", options(true)).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidUrl { .. }));
        assert_eq!(structured.calls(), 0);
    }

    #[tokio::test]
    async fn video_without_ai_has_no_suggestions() {
        let analyzer = analyzer_with(
            vec![Arc::new(FakeStrategy::succeeding("structured", "Never Gonna Give You Up"))],
            Arc::new(FakeStrategy::failing("html")),
        );

        let result = analyzer.analyze(VIDEO_URL, options(false)).await.unwrap();
        assert_eq!(result.record.title, "Never Gonna Give You Up");
        assert!(result.record.metrics.views.unwrap() > 0);
        assert!(result.suggestions.is_none());
        assert_eq!(result.insights.engagement_rate, Some(6.0));
    }

    #[tokio::test]
    async fn ai_without_credentials_yields_mock_suggestions() {
        let analyzer = analyzer_with(
            vec![Arc::new(FakeStrategy::succeeding("structured", "Sourdough basics"))],
            Arc::new(FakeStrategy::failing("html")),
        );

        let result = analyzer.analyze(VIDEO_URL, options(true)).await.unwrap();
        assert_eq!(result.suggestions.unwrap().source, SuggestionSource::Mock);
        assert_eq!(analyzer.suggestion_mode(), SuggestionSource::Mock);
    }

    #[tokio::test]
    async fn single_item_exhaustion_is_surfaced_with_causes() {
        let analyzer = analyzer_with(
            vec![Arc::new(FakeStrategy::failing("structured"))],
            Arc::new(FakeStrategy::failing("html")),
        );

        let err = analyzer.analyze(VIDEO_URL, options(false)).await.unwrap_err();
        assert_eq!(err.causes().len(), 2);
    }

    #[tokio::test]
    async fn website_fallback_never_errors() {
        let analyzer = analyzer_with(Vec::new(), Arc::new(FakeStrategy::succeeding("html", "")));
        let result = analyzer.analyze("https://example.com", options(false)).await.unwrap();
        assert_eq!(result.record.kind, ContentKind::Website);
        assert!(result.record.has_placeholder_title());
    }

    #[tokio::test]
    async fn channel_batch_reports_failures_and_keeps_successes() {
        let analyzer = channel_analyzer(&["aaaaaaaaaaa", "xxxxxxxxxx1", "bbbbbbbbbbb", "xxxxxxxxxx2", "ccccccccccc"]);

        let result = analyzer.analyze(CHANNEL_URL, options(false)).await.unwrap();
        let channel = result.record.channel().unwrap();
        let batch = channel.batch.as_ref().unwrap();

        assert_eq!(batch.requested, 5);
        assert_eq!(batch.succeeded, 3);
        assert_eq!(batch.failed.len(), 2);
        assert_eq!(batch.failed[0].url, classifier::watch_url("xxxxxxxxxx1"));
        assert_eq!(
            channel.videos.iter().filter_map(|v| v.record.video_id()).collect::<Vec<_>>(),
            vec!["aaaaaaaaaaa", "bbbbbbbbbbb", "ccccccccccc"]
        );
        assert!(channel.videos.iter().all(|v| v.record.extracted_by == "scripted"));
        assert_eq!(result.insights.channel_summary.unwrap().total_views, 3_000);
    }

    #[tokio::test]
    async fn channel_batch_is_bounded_by_max_items() {
        let analyzer = channel_analyzer(&[
            "aaaaaaaaaa1", "aaaaaaaaaa2", "aaaaaaaaaa3", "aaaaaaaaaa4", "aaaaaaaaaa5", "aaaaaaaaaa6",
            "aaaaaaaaaa7",
        ]);
        let options = AnalysisOptions {
            max_items: 5,
            ai_analysis: false,
            ..Default::default()
        };

        let result = analyzer.analyze(CHANNEL_URL, options).await.unwrap();
        let batch = result.record.channel().unwrap().batch.clone().unwrap();
        assert_eq!(batch.requested, 5);
        assert_eq!(batch.succeeded, 5);
    }

    #[tokio::test]
    async fn shorts_are_dropped_when_excluded() {
        let ids: &'static [&'static str] = &["sssssssss01", "aaaaaaaaaaa", "sssssssss02", "bbbbbbbbbbb"];
        let without = AnalysisOptions {
            include_shorts: false,
            ai_analysis: false,
            ..Default::default()
        };

        let result = channel_analyzer(ids).analyze(CHANNEL_URL, without).await.unwrap();
        let channel = result.record.channel().unwrap();
        let batch = channel.batch.as_ref().unwrap();
        assert_eq!(batch.shorts_skipped, 2);
        assert_eq!(batch.succeeded, 2);
        assert_eq!(batch.requested, 4);
        assert_eq!(channel.videos.len(), 2);

        let with = channel_analyzer(ids).analyze(CHANNEL_URL, options(false)).await.unwrap();
        assert_eq!(with.record.channel().unwrap().videos.len(), 4);
    }

    #[tokio::test]
    async fn skipped_shorts_count_toward_max_items() {
        let ids: &'static [&'static str] = &[
            "sssssssss01", "sssssssss02", "sssssssss03", "sssssssss04", "sssssssss05", "sssssssss06",
            "sssssssss07", "sssssssss08", "sssssssss09", "sssssssss10", "sssssssss11", "sssssssss12",
            "aaaaaaaaaaa",
        ];
        let strategy = Arc::new(channel_strategy(ids));
        let analyzer = analyzer_with(
            vec![strategy.clone() as Arc<dyn ExtractionStrategy>],
            Arc::new(FakeStrategy::failing("html")),
        );
        let options = AnalysisOptions {
            max_items: 5,
            include_shorts: false,
            ai_analysis: false,
            ..Default::default()
        };

        let result = analyzer.analyze(CHANNEL_URL, options).await.unwrap();
        let batch = result.record.channel().unwrap().batch.clone().unwrap();

        // one channel extraction plus five video attempts
        assert_eq!(strategy.calls(), 6);
        assert_eq!(batch.requested, 5);
        assert_eq!(batch.shorts_skipped, 5);
        assert_eq!(batch.succeeded, 0);
        assert!(batch.failed.is_empty());
    }

    #[tokio::test]
    async fn timed_out_batch_item_is_reported_next_to_successes() {
        let stall = FakeStrategy::slow("stall", Duration::from_secs(5)).only_for(ContentKind::YoutubeVideo);
        let analyzer = analyzer_with_timeout(
            vec![
                Arc::new(stall),
                Arc::new(channel_strategy(&["aaaaaaaaaaa", "xxxxxxxxxx1", "bbbbbbbbbbb"])),
            ],
            Arc::new(FakeStrategy::failing("html")),
            Duration::from_millis(50),
        );

        let result = analyzer.analyze(CHANNEL_URL, options(false)).await.unwrap();
        let channel = result.record.channel().unwrap();
        let batch = channel.batch.as_ref().unwrap();

        assert_eq!(batch.requested, 3);
        assert_eq!(batch.succeeded, 2);
        assert_eq!(batch.failed.len(), 1);
        let causes = &batch.failed[0].causes;
        assert!(causes[0].starts_with("stall: timed out"));
        assert!(causes.iter().any(|c| c.starts_with("scripted:")));
        assert!(channel.videos.iter().all(|v| v.record.extracted_by == "scripted"));
    }

    #[tokio::test]
    async fn every_batch_video_carries_its_own_analysis() {
        let analyzer = channel_analyzer(&["aaaaaaaaaaa", "bbbbbbbbbbb"]);

        let result = analyzer.analyze(CHANNEL_URL, options(true)).await.unwrap();
        let channel = result.record.channel().unwrap();

        assert_eq!(channel.videos.len(), 2);
        for video in &channel.videos {
            assert_eq!(video.insights.engagement_rate, Some(6.0));
            assert!(video.insights.channel_summary.is_none());
            let suggestions = video.suggestions.as_ref().unwrap();
            assert_eq!(suggestions.source, SuggestionSource::Mock);
            assert!(suggestions.title_candidates[0].contains(&video.record.title));
        }

        let without_ai = channel_analyzer(&["aaaaaaaaaaa"]).analyze(CHANNEL_URL, options(false)).await.unwrap();
        assert!(without_ai.record.channel().unwrap().videos[0].suggestions.is_none());
    }

    #[test]
    fn session_ids_are_unique() {
        let request = ContentRequest::new(VIDEO_URL, ContentKind::YoutubeVideo, AnalysisOptions::default());
        let first = AnalysisSession::start(request.clone());
        let second = AnalysisSession::start(request);
        assert_ne!(first.id, second.id);
    }
}
