use super::html::parse_page;
use super::ExtractionStrategy;
use crate::error::StrategyError;
use crate::models::{ContentKind, ContentRecord, ContentRequest};
use crate::services::classifier;
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Room for the service to report its own timeout before the HTTP call gives up.
const RENDER_MARGIN: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct RenderRequest<'a> {
    cmd: &'static str,
    url: &'a str,
    #[serde(rename = "maxTimeout")]
    max_timeout: u64,
}

#[derive(Deserialize)]
struct RenderResponse {
    status: String,
    #[serde(default)]
    message: String,
    solution: Option<RenderSolution>,
}

#[derive(Deserialize)]
struct RenderSolution {
    #[serde(default)]
    status: u16,
    response: String,
}

/// Runs the page's scripts in a remote headless browser, then parses the result as HTML.
///
/// Talks to a FlareSolverr-compatible `/v1` endpoint. Without a configured
/// service every attempt fails with [`StrategyError::NotConfigured`].
pub struct BrowserRenderStrategy {
    client: Client,
    service_url: Option<String>,
    timeout: Duration,
}

impl BrowserRenderStrategy {
    pub fn new(client: Client, service_url: Option<String>, timeout: Duration) -> Self {
        BrowserRenderStrategy {
            client,
            service_url: service_url.map(|url| url.trim_end_matches('/').to_string()),
            timeout,
        }
    }

    async fn render(&self, service_url: &str, page_url: &str) -> Result<String, StrategyError> {
        info!("Rendering {page_url} through {service_url}");

        let response = self
            .client
            .post(format!("{service_url}/v1"))
            .json(&RenderRequest {
                cmd: "request.get",
                url: page_url,
                max_timeout: self.timeout.as_millis() as u64,
            })
            .timeout(self.timeout + RENDER_MARGIN)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StrategyError::Status(status.as_u16()));
        }

        let rendered: RenderResponse = response.json().await?;
        if rendered.status != "ok" {
            return Err(StrategyError::Blocked(format!(
                "render service returned `{}`: {}",
                rendered.status, rendered.message
            )));
        }

        let solution = rendered.solution.ok_or(StrategyError::MissingField("solution"))?;
        if solution.status >= 400 {
            return Err(StrategyError::Status(solution.status));
        }
        Ok(solution.response)
    }
}

#[async_trait]
impl ExtractionStrategy for BrowserRenderStrategy {
    fn name(&self) -> &'static str {
        "browser_render"
    }

    fn supports(&self, _kind: ContentKind) -> bool {
        true
    }

    fn attempt_budget(&self, default: Duration) -> Duration {
        default.max(self.timeout + RENDER_MARGIN)
    }

    async fn extract(&self, request: &ContentRequest) -> Result<ContentRecord, StrategyError> {
        let service_url = self
            .service_url
            .as_deref()
            .ok_or(StrategyError::NotConfigured("render service"))?;

        let page_url = match request.kind {
            ContentKind::YoutubeChannel => classifier::channel_videos_url(&request.url),
            _ => request.url.clone(),
        };
        let html = self.render(service_url, &page_url).await?;
        parse_page(request.kind, &request.url, &html)
    }
}
