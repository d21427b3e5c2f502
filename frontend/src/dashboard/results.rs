use crate::dashboard::suggestions::{DeepAnalysisPanel, SuggestionsPanel};
use crate::models::{
    AnalysisResult, BatchReport, ChannelDetails, ChannelSummary, ContentDetails, ContentRecord,
    Insights, Metrics, VideoAnalysis, VideoDetails, WebsiteDetails,
};
use crate::utils::{
    bar_width, format_datetime, format_duration, format_iso8601_date, format_number,
    format_optional, format_percent,
};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ResultsViewProps {
    pub result: AnalysisResult,
}

#[derive(Properties, PartialEq)]
struct MetricsProps {
    metrics: Metrics,
}

#[derive(Properties, PartialEq)]
struct InsightsProps {
    insights: Insights,
}

#[derive(Properties, PartialEq)]
struct TagsProps {
    tags: Vec<String>,
}

#[derive(Properties, PartialEq)]
struct VideoProps {
    details: VideoDetails,
}

#[derive(Properties, PartialEq)]
struct ChannelProps {
    details: ChannelDetails,
}

#[derive(Properties, PartialEq)]
struct VideoRowProps {
    video: VideoAnalysis,
    max_views: u64,
}

#[derive(Properties, PartialEq)]
struct BatchProps {
    report: BatchReport,
}

#[derive(Properties, PartialEq)]
struct WebsiteProps {
    details: WebsiteDetails,
}

#[function_component(ResultsView)]
pub fn results_view(props: &ResultsViewProps) -> Html {
    let record = &props.result.record;

    html! {
        <div class="mt-6 space-y-6">
            <div>
                <p class="text-xs uppercase tracking-wide text-gray-500">
                    { format!("{} · via {}", record.kind.display_name(), record.extracted_by) }
                </p>
                <h2 class="text-2xl font-bold text-gray-800">
                    <a href={record.url.clone()} target="_blank" class="hover:underline">{ &record.title }</a>
                </h2>
                <p class="text-xs text-gray-400">
                    { format!("Session {} · {}", props.result.session_id, format_datetime(&props.result.analyzed_at)) }
                </p>
            </div>

            <MetricCards metrics={record.metrics.clone()} />
            <InsightsPanel insights={props.result.insights.clone()} />
            { description(record) }
            <TagList tags={record.tags.clone()} />

            {
                match &record.details {
                    ContentDetails::Video(details) => html! { <VideoInfo details={details.clone()} /> },
                    ContentDetails::Channel(details) => html! { <ChannelVideos details={details.clone()} /> },
                    ContentDetails::Website(details) => html! { <WebsiteReport details={details.clone()} /> },
                }
            }
        </div>
    }
}

fn description(record: &ContentRecord) -> Html {
    if record.description.is_empty() {
        return html! {};
    }
    html! {
        <div>
            <h3 class="text-lg font-semibold text-gray-800 mb-2">{"Description"}</h3>
            <p class="text-sm text-gray-700 whitespace-pre-line max-h-48 overflow-y-auto bg-gray-50 p-3 rounded">
                { &record.description }
            </p>
        </div>
    }
}

#[function_component(MetricCards)]
fn metric_cards(props: &MetricsProps) -> Html {
    let m = &props.metrics;
    let cards = [
        ("👁️ Views", m.views.map(format_number)),
        ("👍 Likes", m.likes.map(format_number)),
        ("💬 Comments", m.comments.map(format_number)),
        ("👥 Subscribers", m.subscribers.map(format_number)),
        ("📺 Videos", m.video_count.map(format_number)),
        ("⏱️ Duration", m.duration_seconds.map(format_duration)),
    ];

    html! {
        <div class="grid grid-cols-2 md:grid-cols-3 gap-3">
            { for cards.into_iter().filter_map(|(label, value)| value.map(|value| html! {
                <div class="bg-gray-100 rounded-lg p-3 text-center">
                    <p class="text-xs text-gray-500">{ label }</p>
                    <p class="text-lg font-semibold text-gray-800">{ value }</p>
                </div>
            })) }
        </div>
    }
}

#[function_component(InsightsPanel)]
fn insights_panel(props: &InsightsProps) -> Html {
    let insights = &props.insights;

    html! {
        <div class="bg-blue-50 rounded-lg p-4">
            <div class="flex flex-wrap gap-6 mb-3">
                <div>
                    <p class="text-xs text-gray-500">{"Optimization score"}</p>
                    <p class="text-xl font-bold text-gray-800">
                        { format!("{}/100 ", insights.optimization_score) }
                        <span class="text-sm font-normal text-gray-600">{ &insights.optimization_category }</span>
                    </p>
                </div>
                {
                    if let Some(rate) = insights.engagement_rate {
                        html! {
                            <div>
                                <p class="text-xs text-gray-500">{"Engagement rate"}</p>
                                <p class="text-xl font-bold text-gray-800">
                                    { format!("{} ", format_percent(rate)) }
                                    <span class="text-sm font-normal text-gray-600">
                                        { insights.engagement_category.clone().unwrap_or_default() }
                                    </span>
                                </p>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
                <div>
                    <p class="text-xs text-gray-500">{"Title"}</p>
                    <p class="text-sm text-gray-700">
                        { format!("{} chars, {} words", insights.title.length, insights.title.word_count) }
                    </p>
                </div>
            </div>
            {
                if let Some(summary) = &insights.channel_summary {
                    html! {
                        <p class="text-sm text-gray-700 mb-2">
                            { summary_line(summary) }
                            {
                                if let Some(top) = &summary.top_performing {
                                    html! { <span class="block">{ format!("Top performer: {} ({})", top.title, format_percent(top.engagement_rate)) }</span> }
                                } else {
                                    html! {}
                                }
                            }
                        </p>
                    }
                } else {
                    html! {}
                }
            }
            <ul class="list-disc ml-6 text-sm text-gray-700">
                { for insights.basic_suggestions.iter().map(|s| html! { <li>{ s }</li> }) }
            </ul>
        </div>
    }
}

fn summary_line(summary: &ChannelSummary) -> String {
    format!(
        "{} total views, {} average engagement, {} optimization opportunities",
        format_number(summary.total_views),
        format_percent(summary.avg_engagement),
        summary.optimization_opportunities
    )
}

#[function_component(TagList)]
fn tag_list(props: &TagsProps) -> Html {
    if props.tags.is_empty() {
        return html! {};
    }
    html! {
        <div class="flex flex-wrap gap-2">
            { for props.tags.iter().map(|tag| html! {
                <span class="px-2 py-1 bg-gray-200 text-gray-700 text-xs rounded">{ format!("#{tag}") }</span>
            }) }
        </div>
    }
}

#[function_component(VideoInfo)]
fn video_info(props: &VideoProps) -> Html {
    let details = &props.details;
    html! {
        <div class="bg-gray-50 p-4 text-sm flex flex-wrap gap-4 items-center">
            {
                if let Some(thumbnail) = &details.thumbnail {
                    html! { <img src={thumbnail.clone()} alt="thumbnail" class="w-40 rounded" /> }
                } else {
                    html! {}
                }
            }
            {
                match (&details.channel_name, &details.channel_id) {
                    (Some(name), Some(id)) => html! {
                        <p>{"📺 "}<a href={format!("https://www.youtube.com/channel/{id}")} target="_blank" class="text-blue-600 hover:underline">{ name }</a></p>
                    },
                    (Some(name), None) => html! { <p>{ format!("📺 {name}") }</p> },
                    _ => html! {},
                }
            }
            {
                if let Some(published) = &details.published_at {
                    html! { <p>{ format!("📅 {}", format_iso8601_date(published)) }</p> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

#[function_component(ChannelVideos)]
fn channel_videos(props: &ChannelProps) -> Html {
    let videos = &props.details.videos;
    let max_views = videos
        .iter()
        .filter_map(|v| v.record.metrics.views)
        .max()
        .unwrap_or(0);

    html! {
        <div>
            <h3 class="text-lg font-semibold text-gray-800 mb-2">
                { format!("Videos ({} discovered)", props.details.discovered_video_ids.len()) }
            </h3>
            {
                if let Some(report) = &props.details.batch {
                    html! { <BatchSummary report={report.clone()} /> }
                } else {
                    html! {}
                }
            }
            <table class="w-full text-sm">
                <thead>
                    <tr class="text-left text-gray-500">
                        <th class="py-1">{"Title"}</th>
                        <th class="py-1 w-1/3">{"Views"}</th>
                        <th class="py-1">{"Likes"}</th>
                        <th class="py-1">{"Length"}</th>
                        <th class="py-1">{"Engagement"}</th>
                        <th class="py-1">{"Score"}</th>
                    </tr>
                </thead>
                { for videos.iter().map(|video| html! {
                    <VideoRow video={video.clone()} max_views={max_views} />
                }) }
            </table>
        </div>
    }
}

/// One table body per video: the metrics row, then its own analysis behind a toggle.
#[function_component(VideoRow)]
fn video_row(props: &VideoRowProps) -> Html {
    let VideoAnalysis { record, insights, suggestions } = &props.video;
    let views = record.metrics.views.unwrap_or(0);

    html! {
        <tbody class="border-t border-gray-200">
            <tr>
                <td class="py-2 pr-2">
                    <a href={record.url.clone()} target="_blank" class="text-blue-600 hover:underline">{ &record.title }</a>
                </td>
                <td class="py-2 pr-2">
                    <div class="bg-gray-200 rounded h-3">
                        <div class="bg-blue-500 rounded h-3"
                             style={format!("width: {:.1}%", bar_width(views, props.max_views))}></div>
                    </div>
                    <span class="text-xs text-gray-500">{ format_optional(record.metrics.views) }</span>
                </td>
                <td class="py-2 pr-2">{ format_optional(record.metrics.likes) }</td>
                <td class="py-2 pr-2">{ record.metrics.duration_seconds.map(format_duration).unwrap_or_default() }</td>
                <td class="py-2 pr-2">{ insights.engagement_rate.map(format_percent).unwrap_or_default() }</td>
                <td class="py-2">{ format!("{}/100", insights.optimization_score) }</td>
            </tr>
            <tr>
                <td colspan="6" class="pb-2">
                    <details>
                        <summary class="cursor-pointer text-xs text-gray-500">{"Video analysis"}</summary>
                        <ul class="list-disc ml-6 text-xs text-gray-700 mt-1">
                            { for insights.basic_suggestions.iter().map(|s| html! { <li>{ s }</li> }) }
                        </ul>
                        {
                            if let Some(suggestions) = suggestions {
                                html! { <SuggestionsPanel suggestions={suggestions.clone()} /> }
                            } else {
                                html! {}
                            }
                        }
                        <DeepAnalysisPanel record={record.clone()} />
                    </details>
                </td>
            </tr>
        </tbody>
    }
}

#[function_component(BatchSummary)]
fn batch_summary(props: &BatchProps) -> Html {
    let report = &props.report;
    html! {
        <div class="text-sm text-gray-700 mb-3">
            <p>
                { format!("{} of {} videos analyzed", report.succeeded, report.requested) }
                {
                    if report.shorts_skipped > 0 {
                        format!(", {} shorts skipped", report.shorts_skipped)
                    } else {
                        String::new()
                    }
                }
            </p>
            {
                if report.failed.is_empty() {
                    html! {}
                } else {
                    html! {
                        <details class="mt-1">
                            <summary class="cursor-pointer text-red-600">
                                { format!("{} failed", report.failed.len()) }
                            </summary>
                            <ul class="list-disc ml-6 text-xs text-gray-600">
                                { for report.failed.iter().map(|failure| html! {
                                    <li>{ format!("{}: {}", failure.url, failure.causes.join("; ")) }</li>
                                }) }
                            </ul>
                        </details>
                    }
                }
            }
        </div>
    }
}

#[function_component(WebsiteReport)]
fn website_report(props: &WebsiteProps) -> Html {
    let details = &props.details;
    let seo = &details.seo;
    let structure = &details.structure;
    let check = |ok: bool| if ok { "✅" } else { "❌" };

    let counts = [
        ("Paragraphs", structure.paragraphs),
        ("Lists", structure.lists),
        ("Tables", structure.tables),
        ("Forms", structure.forms),
        ("Scripts", structure.scripts),
        ("Stylesheets", structure.stylesheets),
        ("Images", details.image_count),
        ("Links", details.link_count),
    ];
    let max_count = counts.iter().map(|(_, n)| *n as u64).max().unwrap_or(0);

    html! {
        <div class="space-y-4">
            <div>
                <h3 class="text-lg font-semibold text-gray-800 mb-2">{"SEO"}</h3>
                <ul class="text-sm text-gray-700 space-y-1">
                    <li>{ format!("{} Title ({} chars)", check(seo.has_title), seo.title_length) }</li>
                    <li>{ format!("{} Meta description ({} chars)", check(seo.has_meta_description), seo.meta_description_length) }</li>
                    <li>{ format!("{} Exactly one h1 ({} found)", check(seo.h1_count == 1), seo.h1_count) }</li>
                    <li>{ format!("{} Open Graph tags", check(seo.has_og_tags)) }</li>
                    <li>{ format!("{} Twitter cards", check(seo.has_twitter_cards)) }</li>
                </ul>
            </div>
            <div>
                <h3 class="text-lg font-semibold text-gray-800 mb-2">{"Structure"}</h3>
                { for counts.iter().map(|(label, count)| html! {
                    <div class="flex items-center text-sm mb-1">
                        <span class="w-28 text-gray-600">{ *label }</span>
                        <div class="flex-grow bg-gray-200 rounded h-3 mr-2">
                            <div class="bg-green-500 rounded h-3"
                                 style={format!("width: {:.1}%", bar_width(*count as u64, max_count))}></div>
                        </div>
                        <span class="w-10 text-right">{ *count }</span>
                    </div>
                }) }
            </div>
            <div>
                <h3 class="text-lg font-semibold text-gray-800 mb-2">{"Headings"}</h3>
                { for details.headings.iter().filter(|(_, texts)| !texts.is_empty()).map(|(level, texts)| html! {
                    <div class="mb-2">
                        <p class="text-xs uppercase text-gray-500">{ format!("{level} ({})", texts.len()) }</p>
                        <ul class="list-disc ml-6 text-sm text-gray-700">
                            { for texts.iter().map(|text| html! { <li>{ text }</li> }) }
                        </ul>
                    </div>
                }) }
            </div>
        </div>
    }
}
