use crate::services::analyzer::Analyzer;
use crate::services::fetcher::HttpFetcher;
use crate::services::strategies::StrategyRegistry;
use crate::services::suggestions::SuggestionGenerator;
use crate::AppState;
use anyhow::Result;
use env_logger::Builder;
use log::{info, LevelFilter};
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Where browser rendering goes in the channel cascade when advanced scraping is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOrder {
    AfterHtml,
    BeforeHtml,
}

impl RenderOrder {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "after_html" | "after" => Some(RenderOrder::AfterHtml),
            "before_html" | "before" => Some(RenderOrder::BeforeHtml),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiSettings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub youtube_api_base: String,
    pub ai: AiSettings,
    pub render_service_url: Option<String>,
    pub render_timeout: Duration,
    pub extraction_timeout: Duration,
    pub channel_render_order: RenderOrder,
    pub frontend_origin: String,
    pub user_agent: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |key: &str, default: u64| {
            non_empty(key)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(default)
        };

        let channel_render_order = match non_empty("CHANNEL_RENDER_ORDER") {
            Some(value) => RenderOrder::parse(&value).unwrap_or_else(|| {
                log::warn!("Unknown CHANNEL_RENDER_ORDER `{value}`, using after_html");
                RenderOrder::AfterHtml
            }),
            None => RenderOrder::AfterHtml,
        };

        AppConfig {
            youtube_api_key: non_empty("YOUTUBE_API_KEY"),
            youtube_api_base: non_empty("YOUTUBE_API_BASE")
                .unwrap_or_else(|| "https://www.googleapis.com/youtube/v3".to_string()),
            ai: AiSettings {
                api_key: non_empty("AI_API_KEY"),
                api_base: non_empty("AI_API_BASE")
                    .unwrap_or_else(|| "https://api.anthropic.com".to_string()),
                model: non_empty("AI_MODEL")
                    .unwrap_or_else(|| "claude-3-5-sonnet-20240620".to_string()),
                timeout: Duration::from_secs(number("AI_TIMEOUT_SECS", 30)),
                max_tokens: 1000,
            },
            render_service_url: non_empty("RENDER_SERVICE_URL"),
            render_timeout: Duration::from_millis(number("RENDER_TIMEOUT_MS", 60_000)),
            extraction_timeout: Duration::from_secs(number("EXTRACTION_TIMEOUT_SECS", 30)),
            channel_render_order,
            frontend_origin: non_empty("FRONTEND_ORIGIN")
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            user_agent: non_empty("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}

pub fn init_logger() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
    info!("Starting TubeLens backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_app_state(config: AppConfig) -> Result<AppState> {
    let fetcher = Arc::new(HttpFetcher::new(&config.user_agent, config.extraction_timeout)?);
    let registry = StrategyRegistry::from_config(&config, fetcher.clone());
    let suggestions = SuggestionGenerator::from_settings(&config.ai, fetcher.client().clone());

    info!(
        "YouTube Data API: {}; render service: {}; AI suggestions: {}",
        if config.youtube_api_key.is_some() { "enabled" } else { "disabled" },
        config.render_service_url.as_deref().unwrap_or("none"),
        suggestions.mode().as_str(),
    );

    let analyzer = Analyzer::new(registry, suggestions, config.extraction_timeout);

    Ok(AppState { analyzer, config })
}

pub fn create_cors(frontend_origin: &str) -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[frontend_origin]))
        .allowed_methods(
            vec![Method::Get, Method::Post, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        // export filename is read by the dashboard
        .expose_headers(["Content-Disposition".to_string()].into_iter().collect())
        .allow_credentials(false)
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
