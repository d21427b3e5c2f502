use crate::error::StrategyError;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE};
use reqwest::Client;
use std::time::Duration;

// Skips the EU consent interstitial, which otherwise replaces the watch page.
const YOUTUBE_CONSENT_COOKIE: &str = "CONSENT=YES+cb; SOCS=CAI";

/// Shared HTTP client for page fetches.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(HttpFetcher { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn fetch_html(&self, url: &str) -> Result<String, StrategyError> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9");
        if url.contains("youtube.com") {
            request = request.header(COOKIE, YOUTUBE_CONSENT_COOKIE);
        }

        let response = request.send().await?;

        if response
            .url()
            .host_str()
            .is_some_and(|host| host.starts_with("consent."))
        {
            return Err(StrategyError::Blocked("redirected to consent page".to_string()));
        }

        let status = response.status();
        if !status.is_success() {
            return Err(StrategyError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(StrategyError::MissingField("body"));
        }
        Ok(body)
    }
}
