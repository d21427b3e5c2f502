use crate::error::AnalysisError;
use crate::models::{ChannelRef, ContentKind};
use crate::utils::extract_youtube_video_id;
use url::Url;

const YOUTUBE_HOSTS: &[&str] = &[
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
];

// First path segments that belong to YouTube itself rather than to a channel.
const RESERVED_PATHS: &[&str] = &[
    "watch", "results", "feed", "playlist", "embed", "shorts", "live", "premium", "gaming",
    "account", "signin", "hashtag", "kids", "trending", "redirect", "about", "t", "s",
];

/// Parse and validate an absolute http(s) URL.
pub fn parse_url(url: &str) -> Result<Url, AnalysisError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::invalid_url(url, "empty input"));
    }

    let parsed = Url::parse(trimmed).map_err(|e| AnalysisError::invalid_url(url, e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AnalysisError::invalid_url(
                url,
                format!("unsupported scheme `{other}`"),
            ))
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(AnalysisError::invalid_url(url, "missing host"));
    }

    Ok(parsed)
}

pub fn classify(url: &str) -> Result<ContentKind, AnalysisError> {
    let parsed = parse_url(url)?;
    Ok(classify_parsed(&parsed))
}

fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

fn is_youtube_host(url: &Url) -> bool {
    url.host_str()
        .map(|host| YOUTUBE_HOSTS.contains(&host.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_short_link_host(url: &Url) -> bool {
    url.host_str()
        .map(|host| host.eq_ignore_ascii_case("youtu.be"))
        .unwrap_or(false)
}

/// The handle in an `@name` segment; a bare `@` names nobody.
fn handle(segment: &str) -> Option<&str> {
    Some(segment.trim_start_matches('@')).filter(|name| !name.is_empty())
}

fn classify_parsed(url: &Url) -> ContentKind {
    if is_short_link_host(url) {
        return if path_segments(url).is_empty() {
            ContentKind::Website
        } else {
            ContentKind::YoutubeVideo
        };
    }

    if !is_youtube_host(url) {
        return ContentKind::Website;
    }

    let segments = path_segments(url);
    match segments.as_slice() {
        ["watch", ..] if url.query_pairs().any(|(k, v)| k == "v" && !v.is_empty()) => {
            ContentKind::YoutubeVideo
        }
        ["shorts" | "embed" | "live", _id, ..] => ContentKind::YoutubeVideo,
        ["channel" | "c" | "user", _name, ..] => ContentKind::YoutubeChannel,
        [first, ..] if first.starts_with('@') => match handle(first) {
            Some(_) => ContentKind::YoutubeChannel,
            None => ContentKind::Website,
        },
        [first, ..] if !RESERVED_PATHS.contains(first) => ContentKind::YoutubeChannel,
        _ => ContentKind::Website,
    }
}

/// How the channel URL names its channel, if it is one.
pub fn channel_ref(url: &str) -> Option<ChannelRef> {
    let parsed = parse_url(url).ok()?;
    if classify_parsed(&parsed) != ContentKind::YoutubeChannel {
        return None;
    }

    let segments = path_segments(&parsed);
    let reference = match segments.as_slice() {
        ["channel", id, ..] => ChannelRef::Id((*id).to_string()),
        ["user", name, ..] => ChannelRef::User((*name).to_string()),
        ["c", name, ..] => ChannelRef::Custom((*name).to_string()),
        [first, ..] if first.starts_with('@') => ChannelRef::Handle(handle(first)?.to_string()),
        [first, ..] => ChannelRef::Custom((*first).to_string()),
        [] => return None,
    };
    Some(reference)
}

pub fn video_id(url: &str) -> Option<String> {
    extract_youtube_video_id(url)
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Root of the channel (`https://www.youtube.com/@name`), without tab suffixes.
pub fn channel_root(url: &str) -> String {
    let Ok(mut parsed) = parse_url(url) else {
        return url.to_string();
    };
    let segments = path_segments(&parsed);
    let keep = match segments.as_slice() {
        ["channel" | "c" | "user", ..] => 2,
        _ => 1,
    };
    let path = format!("/{}", segments.iter().take(keep).copied().collect::<Vec<_>>().join("/"));
    parsed.set_path(&path);
    parsed.set_query(None);
    parsed.set_fragment(None);
    parsed.to_string()
}

/// The channel's "Videos" tab, which lists uploads in the initial page data.
pub fn channel_videos_url(url: &str) -> String {
    format!("{}/videos", channel_root(url).trim_end_matches('/'))
}
