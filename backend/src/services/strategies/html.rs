use super::ExtractionStrategy;
use crate::error::StrategyError;
use crate::models::{
    ChannelDetails, ContentDetails, ContentKind, ContentRecord, ContentRequest, ContentStructure,
    Metrics, SeoReport, VideoDetails, WebsiteDetails,
};
use crate::services::classifier;
use crate::services::fetcher::HttpFetcher;
use crate::utils::{clean_text, parse_count, parse_iso8601_duration_to_seconds, split_keywords};
use async_trait::async_trait;
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

const TITLE_SELECTORS: &[&str] = &[r#"meta[property="og:title"]"#, r#"meta[name="title"]"#, "title"];
const DESCRIPTION_SELECTORS: &[&str] = &[
    r#"meta[property="og:description"]"#,
    r#"meta[name="description"]"#,
    r#"meta[name="Description"]"#,
];

/// Plain page fetch plus meta tag and regex parsing.
pub struct HtmlStrategy {
    fetcher: Arc<HttpFetcher>,
}

impl HtmlStrategy {
    pub fn new(fetcher: Arc<HttpFetcher>) -> Self {
        HtmlStrategy { fetcher }
    }
}

#[async_trait]
impl ExtractionStrategy for HtmlStrategy {
    fn name(&self) -> &'static str {
        "html"
    }

    fn supports(&self, _kind: ContentKind) -> bool {
        true
    }

    async fn extract(&self, request: &ContentRequest) -> Result<ContentRecord, StrategyError> {
        let page_url = match request.kind {
            ContentKind::YoutubeChannel => classifier::channel_videos_url(&request.url),
            _ => request.url.clone(),
        };
        let html = self.fetcher.fetch_html(&page_url).await?;
        debug!("Fetched {} bytes from {}", html.len(), page_url);
        parse_page(request.kind, &request.url, &html)
    }
}

/// Parse an already fetched (or rendered) page for the given kind.
pub fn parse_page(kind: ContentKind, url: &str, html: &str) -> Result<ContentRecord, StrategyError> {
    match kind {
        ContentKind::YoutubeVideo => parse_video_page(url, html),
        ContentKind::YoutubeChannel => parse_channel_page(url, html),
        ContentKind::Website => Ok(parse_website(url, html)),
    }
}

fn views_regexes() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        [r#""viewCount":"(\d+)""#, r"(?i)(\d+(?:,\d+)*)\s*views?\b"]
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

fn likes_regexes() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            r#""likeCount":"(\d+)""#,
            r"(?i)along with (\d+(?:,\d+)*) other people",
            r"(?i)(\d+(?:,\d+)*)\s*likes?\b",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

fn subscribers_regexes() -> &'static [Regex] {
    static RE: OnceLock<Vec<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            r#"(?i)"subscriberCountText".*?"(\d+(?:\.\d+)?[KMB]?) subscribers?""#,
            r"(?i)(\d+(?:\.\d+)?[KMB]?)\s*subscribers?\b",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

fn video_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?:"videoId":"|/watch\?v=)([a-zA-Z0-9_-]{11})"#).expect("static regex"))
}

fn channel_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""(?:externalId|channelId)":"(UC[a-zA-Z0-9_-]{22})""#).expect("static regex"))
}

pub(super) fn like_count(html: &str) -> Option<u64> {
    first_count(likes_regexes(), html)
}

pub(super) fn subscriber_count(html: &str) -> Option<u64> {
    first_count(subscribers_regexes(), html)
}

fn first_count(regexes: &[Regex], haystack: &str) -> Option<u64> {
    regexes
        .iter()
        .filter_map(|re| re.captures(haystack))
        .find_map(|caps| caps.get(1).and_then(|m| parse_count(m.as_str())))
}

fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// `content` for meta tags, inner text for everything else.
fn element_value(element: ElementRef<'_>) -> String {
    match element.value().attr("content") {
        Some(content) => clean_text(content),
        None => element_text(element),
    }
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(e) => {
            debug!("Invalid selector `{css}`: {e}");
            Vec::new()
        }
    }
}

fn count(document: &Html, css: &str) -> usize {
    select_all(document, css).len()
}

fn first_value(document: &Html, selectors: &[&str], accept: impl Fn(&str) -> bool) -> Option<String> {
    selectors.iter().find_map(|css| {
        select_all(document, css)
            .into_iter()
            .map(element_value)
            .find(|value| !value.is_empty() && accept(value.as_str()))
    })
}

fn meta_attr(document: &Html, css: &str, attr: &str) -> Option<String> {
    select_all(document, css)
        .into_iter()
        .find_map(|el| el.value().attr(attr).map(clean_text))
        .filter(|value| !value.is_empty())
}

fn keywords(document: &Html) -> Vec<String> {
    meta_attr(document, r#"meta[name="keywords"]"#, "content")
        .map(|raw| split_keywords(&raw))
        .unwrap_or_default()
}

fn strip_youtube_suffix(title: &str) -> String {
    title.trim_end_matches(" - YouTube").trim().to_string()
}

pub fn parse_video_page(url: &str, html: &str) -> Result<ContentRecord, StrategyError> {
    let document = Html::parse_document(html);

    let title = first_value(&document, TITLE_SELECTORS, |v| v != "YouTube")
        .map(|t| strip_youtube_suffix(&t))
        .filter(|t| !t.is_empty())
        .ok_or(StrategyError::MissingField("title"))?;
    let description = first_value(&document, DESCRIPTION_SELECTORS, |_| true).unwrap_or_default();

    let metrics = Metrics {
        views: first_count(views_regexes(), html),
        likes: like_count(html),
        duration_seconds: meta_attr(&document, r#"meta[itemprop="duration"]"#, "content")
            .and_then(|d| parse_iso8601_duration_to_seconds(&d)),
        ..Default::default()
    };

    let details = VideoDetails {
        video_id: classifier::video_id(url)
            .or_else(|| meta_attr(&document, r#"meta[itemprop="identifier"]"#, "content"))
            .unwrap_or_default(),
        channel_name: meta_attr(&document, r#"span[itemprop="author"] link[itemprop="name"]"#, "content"),
        channel_id: meta_attr(&document, r#"meta[itemprop="channelId"]"#, "content")
            .or_else(|| channel_id_regex().captures(html).map(|c| c[1].to_string())),
        published_at: meta_attr(&document, r#"meta[itemprop="datePublished"]"#, "content")
            .or_else(|| meta_attr(&document, r#"meta[itemprop="uploadDate"]"#, "content")),
        thumbnail: meta_attr(&document, r#"meta[property="og:image"]"#, "content"),
    };

    let metadata = json!({
        "genre": meta_attr(&document, r#"meta[itemprop="genre"]"#, "content"),
        "family_friendly": meta_attr(&document, r#"meta[itemprop="isFamilyFriendly"]"#, "content")
            .map(|v| v.eq_ignore_ascii_case("true")),
    });

    Ok(
        ContentRecord::new(ContentKind::YoutubeVideo, url, &title, ContentDetails::Video(details))
            .with_description(description)
            .with_metrics(metrics)
            .with_tags(keywords(&document))
            .with_metadata(metadata),
    )
}

/// Unique video ids in page order, from watch links and embedded JSON.
pub fn discover_video_ids(html: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    video_id_regex()
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

pub fn parse_channel_page(url: &str, html: &str) -> Result<ContentRecord, StrategyError> {
    let document = Html::parse_document(html);

    let title = first_value(&document, TITLE_SELECTORS, |v| v != "YouTube")
        .map(|t| strip_youtube_suffix(&t))
        .filter(|t| !t.is_empty())
        .ok_or(StrategyError::MissingField("title"))?;
    let description = first_value(&document, DESCRIPTION_SELECTORS, |_| true).unwrap_or_default();

    let channel_id = meta_attr(&document, r#"meta[itemprop="identifier"]"#, "content")
        .or_else(|| meta_attr(&document, r#"meta[itemprop="channelId"]"#, "content"))
        .or_else(|| channel_id_regex().captures(html).map(|c| c[1].to_string()));

    let metrics = Metrics {
        subscribers: subscriber_count(html),
        ..Default::default()
    };

    let details = ChannelDetails {
        channel_id,
        discovered_video_ids: discover_video_ids(html),
        ..Default::default()
    };

    Ok(
        ContentRecord::new(ContentKind::YoutubeChannel, url, &title, ContentDetails::Channel(details))
            .with_description(description)
            .with_metrics(metrics)
            .with_tags(keywords(&document)),
    )
}

fn headings(document: &Html) -> BTreeMap<String, Vec<String>> {
    (1..=6)
        .map(|level| {
            let tag = format!("h{level}");
            let texts = select_all(document, &tag)
                .into_iter()
                .map(element_text)
                .filter(|text| !text.is_empty())
                .collect();
            (tag, texts)
        })
        .collect()
}

fn social_tags(document: &Html) -> Map<String, Value> {
    let mut tags = Map::new();
    for element in select_all(document, "meta[property], meta[name]") {
        let attrs = element.value();
        let Some(key) = attrs.attr("property").or_else(|| attrs.attr("name")) else {
            continue;
        };
        if key.starts_with("og:") || key.starts_with("twitter:") {
            if let Some(content) = attrs.attr("content") {
                tags.entry(key.to_string())
                    .or_insert_with(|| Value::String(clean_text(content)));
            }
        }
    }
    tags
}

/// SEO-oriented parse of an arbitrary page. Missing parts stay empty.
pub fn parse_website(url: &str, html: &str) -> ContentRecord {
    let document = Html::parse_document(html);

    let mut title_selectors = TITLE_SELECTORS.to_vec();
    title_selectors.push("h1");
    let title = first_value(&document, &title_selectors, |_| true).unwrap_or_default();
    let description = first_value(&document, DESCRIPTION_SELECTORS, |_| true).unwrap_or_default();

    let page_title = select_all(&document, "title").into_iter().next().map(element_text);
    let meta_description = meta_attr(&document, r#"meta[name="description"]"#, "content");
    let social = social_tags(&document);

    let seo = SeoReport {
        has_title: page_title.is_some(),
        title_length: page_title.as_deref().map_or(0, |t| t.chars().count()),
        has_meta_description: meta_description.is_some(),
        meta_description_length: meta_description.as_deref().map_or(0, |d| d.chars().count()),
        h1_count: count(&document, "h1"),
        has_og_tags: social.keys().any(|k| k.starts_with("og:")),
        has_twitter_cards: social.keys().any(|k| k.starts_with("twitter:")),
    };

    let structure = ContentStructure {
        paragraphs: count(&document, "p"),
        lists: count(&document, "ul, ol"),
        tables: count(&document, "table"),
        forms: count(&document, "form"),
        scripts: count(&document, "script"),
        stylesheets: count(&document, r#"link[rel="stylesheet"]"#),
    };

    let details = WebsiteDetails {
        headings: headings(&document),
        seo,
        structure,
        image_count: count(&document, "img[src]"),
        link_count: count(&document, "a[href]"),
    };

    let language = select_all(&document, "html")
        .into_iter()
        .find_map(|el| el.value().attr("lang").map(str::to_string));

    ContentRecord::new(ContentKind::Website, url, &title, ContentDetails::Website(details))
        .with_description(description)
        .with_tags(keywords(&document))
        .with_metadata(json!({
            "language": language,
            "canonical": meta_attr(&document, r#"link[rel="canonical"]"#, "href"),
            "social_tags": social,
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_TITLE;
    use crate::services::strategies::testing::WATCH_PAGE;
    use httpmock::prelude::*;
    use std::time::Duration;

    #[test]
    fn parses_watch_page_meta_and_counters() {
        let record = parse_video_page("https://www.youtube.com/watch?v=dQw4w9WgXcQ", WATCH_PAGE).unwrap();
        assert_eq!(record.title, "Rick Astley - Never Gonna Give You Up (Official Music Video)");
        assert_eq!(record.metrics.views, Some(1_500_000_000));
        assert_eq!(record.metrics.likes, Some(17_000_000));
        assert_eq!(record.metrics.duration_seconds, Some(213));
        assert_eq!(record.tags, vec!["rick astley", "Never Gonna Give You Up", "rickroll"]);
        assert_eq!(record.video_id(), Some("dQw4w9WgXcQ"));

        let ContentDetails::Video(details) = &record.details else {
            panic!("expected video details");
        };
        assert_eq!(details.channel_name.as_deref(), Some("Rick Astley"));
        assert_eq!(details.channel_id.as_deref(), Some("UCuAXFkgsw1L7xaCfnd5JJOw"));
        assert_eq!(record.metadata["genre"], "Music");
    }

    #[test]
    fn video_page_without_title_is_a_failure() {
        let err = parse_video_page(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "<html><head><title>YouTube</title></head></html>",
        )
        .unwrap_err();
        assert!(matches!(err, StrategyError::MissingField("title")));
    }

    #[test]
    fn falls_back_to_visible_view_text() {
        let html = r#"<html><head><meta property="og:title" content="Clip"></head>
            <body><span>12,345 views</span></body></html>"#;
        let record = parse_video_page("https://youtu.be/abcdefghijk", html).unwrap();
        assert_eq!(record.metrics.views, Some(12_345));
        assert_eq!(record.metrics.likes, None);
    }

    #[test]
    fn channel_page_discovers_unique_video_ids() {
        let html = r#"<html><head>
            <meta property="og:title" content="Some Creator">
            <meta itemprop="identifier" content="UC1234567890123456789012">
            </head><body>
            <a href="/watch?v=aaaaaaaaaaa">First upload</a>
            <a href="/watch?v=bbbbbbbbbbb">Second upload</a>
            <script>{"videoId":"aaaaaaaaaaa"},{"videoId":"ccccccccccc"}</script>
            <span>1.2M subscribers</span>
            </body></html>"#;
        let record = parse_channel_page("https://www.youtube.com/@creator", html).unwrap();
        assert_eq!(record.title, "Some Creator");
        assert_eq!(record.metrics.subscribers, Some(1_200_000));

        let channel = record.channel().unwrap();
        assert_eq!(channel.channel_id.as_deref(), Some("UC1234567890123456789012"));
        assert_eq!(
            channel.discovered_video_ids,
            vec!["aaaaaaaaaaa", "bbbbbbbbbbb", "ccccccccccc"]
        );
    }

    #[test]
    fn website_reports_seo_and_structure() {
        let html = r#"<html lang="en"><head>
            <title>Example Shop</title>
            <meta name="description" content="Hand made things">
            <meta name="keywords" content="shop, handmade">
            <meta property="og:title" content="Example Shop | Home">
            <meta name="twitter:card" content="summary">
            <link rel="stylesheet" href="/site.css">
            </head><body>
            <h1>Welcome</h1><h2>Products</h2><h2>  </h2>
            <p>One</p><p>Two</p><ul><li>a</li></ul>
            <img src="/a.png"><img alt="no source">
            <a href="/about">About</a><a>anchor</a>
            <form></form>
            </body></html>"#;
        let record = parse_website("https://shop.test/", html);
        assert_eq!(record.kind, ContentKind::Website);
        assert_eq!(record.title, "Example Shop | Home");
        assert_eq!(record.description, "Hand made things");
        assert_eq!(record.tags, vec!["shop", "handmade"]);

        let site = record.website().unwrap();
        assert_eq!(site.headings["h1"], vec!["Welcome"]);
        assert_eq!(site.headings["h2"], vec!["Products"]);
        assert!(site.seo.has_title);
        assert_eq!(site.seo.title_length, 12);
        assert!(site.seo.has_og_tags && site.seo.has_twitter_cards);
        assert_eq!(site.structure.paragraphs, 2);
        assert_eq!(site.structure.stylesheets, 1);
        assert_eq!(site.image_count, 1);
        assert_eq!(site.link_count, 1);
        assert_eq!(record.metadata["language"], "en");
    }

    #[test]
    fn bare_website_never_fails_and_keeps_every_heading_level() {
        let record = parse_website("https://example.com", "<html><body></body></html>");
        assert_eq!(record.title, UNKNOWN_TITLE);
        let site = record.website().unwrap();
        assert_eq!(site.headings.len(), 6);
        assert!(site.headings.values().all(Vec::is_empty));
        assert!(!site.seo.has_title);
    }

    #[tokio::test]
    async fn strategy_fetches_and_parses_websites() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .body("<html><head><title>Example Domain</title></head><body><h1>Example Domain</h1></body></html>");
        });

        let fetcher = Arc::new(HttpFetcher::new("tubelens-test", Duration::from_secs(5)).unwrap());
        let strategy = HtmlStrategy::new(fetcher);
        let request = ContentRequest::new(server.url("/"), ContentKind::Website, Default::default());
        let record = strategy.extract(&request).await.unwrap();

        mock.assert();
        assert_eq!(record.title, "Example Domain");
        assert_eq!(record.website().unwrap().headings["h1"], vec!["Example Domain"]);
    }
}
