use crate::models::{
    ChannelSummary, ContentRecord, DescriptionAnalysis, Insights, Metrics, TagAnalysis,
    TitleAnalysis, TopPerformer, VideoAnalysis,
};
use crate::utils::{engagement_category, keyword_density, optimization_category};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

struct DescriptionPatterns {
    link: Regex,
    timestamp: Regex,
    hashtag: Regex,
}

fn patterns() -> &'static DescriptionPatterns {
    static PATTERNS: OnceLock<DescriptionPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DescriptionPatterns {
        link: Regex::new(r"https?://").expect("static regex"),
        timestamp: Regex::new(r"\d{1,2}:\d{2}").expect("static regex"),
        hashtag: Regex::new(r"#\w+").expect("static regex"),
    })
}

/// (likes + comments) per view, as a percentage. Needs a known view count.
pub fn engagement_rate(metrics: &Metrics) -> Option<f64> {
    let views = metrics.views?;
    let interactions = metrics.likes.unwrap_or(0) + metrics.comments.unwrap_or(0);
    Some(interactions as f64 / views.max(1) as f64 * 100.0)
}

pub fn analyze_title(title: &str) -> TitleAnalysis {
    TitleAnalysis {
        length: title.chars().count(),
        word_count: title.split_whitespace().count(),
        has_numbers: title.chars().any(|c| c.is_ascii_digit()),
        has_caps: title.chars().any(|c| c.is_ascii_uppercase()),
        has_question: title.contains('?'),
        has_exclamation: title.contains('!'),
        keyword_density: keyword_density(title),
    }
}

pub fn analyze_description(description: &str) -> DescriptionAnalysis {
    let patterns = patterns();
    DescriptionAnalysis {
        length: description.chars().count(),
        word_count: description.split_whitespace().count(),
        has_links: patterns.link.is_match(description),
        has_timestamps: patterns.timestamp.is_match(description),
        has_hashtags: patterns.hashtag.is_match(description),
        line_count: description.split('\n').count(),
    }
}

pub fn analyze_tags(tags: &[String]) -> TagAnalysis {
    let total_characters: usize = tags.iter().map(|t| t.chars().count()).sum();
    let unique_words: BTreeSet<String> = tags
        .iter()
        .flat_map(|t| t.split_whitespace())
        .map(str::to_lowercase)
        .collect();

    TagAnalysis {
        count: tags.len(),
        total_characters,
        avg_length: total_characters as f64 / tags.len().max(1) as f64,
        unique_words: unique_words.len(),
    }
}

/// Title is worth 40 points, description 35 and tags 25.
pub fn optimization_score(title: &TitleAnalysis, description: &DescriptionAnalysis, tags: &TagAnalysis) -> u32 {
    let mut score = 0;

    if (40..=60).contains(&title.length) {
        score += 15;
    }
    if title.has_numbers {
        score += 5;
    }
    if title.has_question || title.has_exclamation {
        score += 10;
    }
    if (6..=10).contains(&title.word_count) {
        score += 10;
    }

    if description.length >= 200 {
        score += 15;
    }
    for present in [
        description.has_links,
        description.has_timestamps,
        description.has_hashtags,
        description.line_count >= 3,
    ] {
        if present {
            score += 5;
        }
    }

    if tags.count >= 5 {
        score += 10;
    }
    if tags.count <= 15 {
        score += 10;
    }
    if (5.0..=20.0).contains(&tags.avg_length) {
        score += 5;
    }

    score.min(100)
}

pub fn basic_suggestions(title: &TitleAnalysis, description: &DescriptionAnalysis, tags: &TagAnalysis) -> Vec<String> {
    let mut suggestions = Vec::new();

    if title.length < 40 {
        suggestions.push("Consider making your title longer (40-60 characters) for better SEO");
    } else if title.length > 60 {
        suggestions.push("Consider shortening your title (40-60 characters) for better visibility");
    }
    if !title.has_numbers {
        suggestions.push("Adding numbers to titles often increases click-through rates");
    }
    if !(title.has_question || title.has_exclamation) {
        suggestions.push("Consider adding emotional triggers (? or !) to your title");
    }

    if description.length < 200 {
        suggestions.push("Write a more detailed description (at least 200 characters) for better SEO");
    }
    if !description.has_links {
        suggestions.push("Add relevant links in your description to increase engagement");
    }
    if !description.has_timestamps {
        suggestions.push("Consider adding timestamps for better user experience");
    }
    if !description.has_hashtags {
        suggestions.push("Add relevant hashtags to increase discoverability");
    }

    if tags.count < 5 {
        suggestions.push("Add more tags (5-15 recommended) to improve discoverability");
    } else if tags.count > 15 {
        suggestions.push("Reduce the number of tags to focus on most relevant keywords");
    }

    suggestions.into_iter().map(String::from).collect()
}

fn channel_summary(videos: &[VideoAnalysis]) -> ChannelSummary {
    let rates: Vec<(&ContentRecord, f64)> = videos
        .iter()
        .filter_map(|video| video.insights.engagement_rate.map(|rate| (&video.record, rate)))
        .collect();

    let avg_engagement = if rates.is_empty() {
        0.0
    } else {
        rates.iter().map(|(_, rate)| rate).sum::<f64>() / rates.len() as f64
    };

    let top_performing = rates
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(video, rate)| TopPerformer {
            video_id: video.video_id().unwrap_or_default().to_string(),
            title: video.title.clone(),
            engagement_rate: *rate,
        });

    ChannelSummary {
        total_views: videos.iter().filter_map(|v| v.record.metrics.views).sum(),
        avg_engagement,
        top_performing,
        optimization_opportunities: videos.iter().map(|v| v.insights.basic_suggestions.len()).sum(),
    }
}

/// Wraps a channel video with its own insights; suggestions are attached by the caller.
pub fn analyze_video(record: ContentRecord) -> VideoAnalysis {
    VideoAnalysis {
        insights: analyze(&record),
        record,
        suggestions: None,
    }
}

/// Heuristic scoring of a record's metadata. Channels also get a summary of their videos.
pub fn analyze(record: &ContentRecord) -> Insights {
    let title = analyze_title(&record.title);
    let description = analyze_description(&record.description);
    let tags = analyze_tags(&record.tags);

    let engagement_rate = engagement_rate(&record.metrics);
    let optimization_score = optimization_score(&title, &description, &tags);

    Insights {
        engagement_rate,
        engagement_category: engagement_rate.map(|rate| engagement_category(rate).to_string()),
        optimization_score,
        optimization_category: optimization_category(optimization_score).to_string(),
        basic_suggestions: basic_suggestions(&title, &description, &tags),
        channel_summary: record.channel().map(|channel| channel_summary(&channel.videos)),
        title,
        description,
        tags,
    }
}
