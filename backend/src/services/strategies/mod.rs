pub mod browser;
pub mod data_api;
pub mod embedded;
pub mod html;

#[cfg(test)]
pub mod testing;

use crate::config::{AppConfig, RenderOrder};
use crate::error::{AnalysisError, StrategyError, StrategyFailure};
use crate::models::{ContentKind, ContentRecord, ContentRequest};
use crate::services::fetcher::HttpFetcher;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

/// One way of turning a URL into a [`ContentRecord`].
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, kind: ContentKind) -> bool;

    /// How long one attempt may take when the cascade default is `default`.
    fn attempt_budget(&self, default: Duration) -> Duration {
        default
    }

    async fn extract(&self, request: &ContentRequest) -> Result<ContentRecord, StrategyError>;
}

/// Try each strategy in order; the first success wins.
///
/// Every attempt is bounded by `timeout`, or by the strategy's own
/// [`ExtractionStrategy::attempt_budget`] when it needs longer. Failures are collected so that an
/// exhausted cascade can report all of them.
pub async fn run_cascade(
    strategies: &[Arc<dyn ExtractionStrategy>],
    request: &ContentRequest,
    timeout: Duration,
) -> Result<ContentRecord, AnalysisError> {
    let mut causes = Vec::new();

    for strategy in strategies {
        if !strategy.supports(request.kind) {
            debug!("Skipping {} for {} content", strategy.name(), request.kind);
            continue;
        }

        let budget = strategy.attempt_budget(timeout);
        let failure = match tokio::time::timeout(budget, strategy.extract(request)).await {
            Ok(Ok(record)) => {
                info!("Extracted {} via {}", request.url, strategy.name());
                return Ok(record.with_extracted_by(strategy.name()));
            }
            Ok(Err(e)) => e,
            Err(_) => StrategyError::Timeout(budget),
        };

        warn!("{} failed for {}: {failure}", strategy.name(), request.url);
        causes.push(StrategyFailure {
            strategy: strategy.name().to_string(),
            cause: failure.to_string(),
        });
    }

    Err(AnalysisError::ExtractionFailed {
        url: request.url.clone(),
        causes,
    })
}

/// The available strategies, and the order to try them in for a request.
pub struct StrategyRegistry {
    structured: Vec<Arc<dyn ExtractionStrategy>>,
    html: Arc<dyn ExtractionStrategy>,
    browser: Arc<dyn ExtractionStrategy>,
    channel_render_order: RenderOrder,
}

impl StrategyRegistry {
    pub fn new(
        structured: Vec<Arc<dyn ExtractionStrategy>>,
        html: Arc<dyn ExtractionStrategy>,
        browser: Arc<dyn ExtractionStrategy>,
        channel_render_order: RenderOrder,
    ) -> Self {
        StrategyRegistry {
            structured,
            html,
            browser,
            channel_render_order,
        }
    }

    pub fn from_config(config: &AppConfig, fetcher: Arc<HttpFetcher>) -> Self {
        let mut structured: Vec<Arc<dyn ExtractionStrategy>> = Vec::new();
        if let Some(api_key) = &config.youtube_api_key {
            structured.push(Arc::new(data_api::DataApiStrategy::new(
                fetcher.client().clone(),
                api_key.clone(),
                config.youtube_api_base.clone(),
            )));
        }
        structured.push(Arc::new(embedded::EmbeddedMetadataStrategy::new(fetcher.clone())));

        let browser = browser::BrowserRenderStrategy::new(
            fetcher.client().clone(),
            config.render_service_url.clone(),
            config.render_timeout,
        );

        StrategyRegistry::new(
            structured,
            Arc::new(html::HtmlStrategy::new(fetcher)),
            Arc::new(browser),
            config.channel_render_order,
        )
    }

    /// Ordered strategies for `request`.
    pub fn plan(&self, request: &ContentRequest) -> Vec<Arc<dyn ExtractionStrategy>> {
        if request.kind == ContentKind::Website {
            return vec![self.html.clone()];
        }

        let mut plan = self.structured.clone();
        let advanced = request.options.advanced_scraping;
        let channel_batch = request.kind == ContentKind::YoutubeChannel || request.batch_item;

        if advanced && channel_batch && self.channel_render_order == RenderOrder::BeforeHtml {
            plan.push(self.browser.clone());
            plan.push(self.html.clone());
        } else {
            plan.push(self.html.clone());
            if advanced {
                plan.push(self.browser.clone());
            }
        }
        plan
    }
}
