use crate::dashboard::api::{deep_analysis, export_result};
use crate::models::{AnalysisResult, ContentRecord, DeepAnalysis, SeoAnalysis, SuggestionSet};
use crate::utils::{format_score, json_data_url};
use wasm_bindgen::JsCast;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SuggestionsPanelProps {
    pub suggestions: SuggestionSet,
}

#[derive(Properties, PartialEq)]
pub struct ExportButtonProps {
    pub result: AnalysisResult,
}

#[derive(Properties, PartialEq)]
pub struct DeepAnalysisPanelProps {
    pub record: ContentRecord,
}

#[derive(Properties, PartialEq)]
struct SeoSectionProps {
    seo: SeoAnalysis,
}

#[function_component(SuggestionsPanel)]
pub fn suggestions_panel(props: &SuggestionsPanelProps) -> Html {
    let suggestions = &props.suggestions;
    let (badge_class, badge_label) = if suggestions.source == "real" {
        ("bg-purple-100 text-purple-800", "AI generated")
    } else {
        ("bg-yellow-100 text-yellow-800", "Mock suggestions")
    };

    html! {
        <div class="mt-6 border border-gray-200 rounded-lg p-4">
            <div class="flex items-center justify-between mb-3">
                <h3 class="text-lg font-semibold text-gray-800">{"Suggestions"}</h3>
                <span class={classes!("px-2", "py-1", "text-xs", "rounded", badge_class)}>{ badge_label }</span>
            </div>
            {
                if let Some(reason) = &suggestions.fallback_reason {
                    html! { <p class="text-xs text-gray-500 mb-3">{ format!("AI unavailable: {reason}") }</p> }
                } else {
                    html! {}
                }
            }

            <h4 class="font-semibold text-gray-700">{"Title ideas"}</h4>
            <ol class="list-decimal ml-6 mb-3 text-sm text-gray-700">
                { for suggestions.title_candidates.iter().map(|t| html! { <li>{ t }</li> }) }
            </ol>

            <h4 class="font-semibold text-gray-700">{"Improved description"}</h4>
            <p class="text-sm text-gray-700 whitespace-pre-line bg-gray-50 p-3 rounded mb-3">
                { &suggestions.improved_description }
            </p>

            <h4 class="font-semibold text-gray-700">{"Content ideas"}</h4>
            <ul class="list-disc ml-6 mb-3 text-sm text-gray-700">
                { for suggestions.content_ideas.iter().map(|idea| html! { <li>{ idea }</li> }) }
            </ul>

            {
                if suggestions.suggested_tags.is_empty() {
                    html! {}
                } else {
                    html! {
                        <div class="flex flex-wrap gap-2">
                            { for suggestions.suggested_tags.iter().map(|tag| html! {
                                <span class="px-2 py-1 bg-purple-50 text-purple-700 text-xs rounded">{ tag }</span>
                            }) }
                        </div>
                    }
                }
            }

            <SeoSection seo={suggestions.seo_analysis.clone()} />
        </div>
    }
}

#[function_component(SeoSection)]
fn seo_section(props: &SeoSectionProps) -> Html {
    let seo = &props.seo;
    let scores = [
        ("Title", seo.title_score),
        ("Description", seo.description_score),
        ("Tags", seo.tags_score),
    ];

    html! {
        <div class="mt-4">
            <h4 class="font-semibold text-gray-700">{"SEO analysis"}</h4>
            <div class="flex gap-4 text-sm text-gray-700 mb-2">
                { for scores.into_iter().map(|(label, score)| html! {
                    <span>{ format!("{label}: {}", format_score(score)) }</span>
                }) }
            </div>
            <p class="text-xs text-gray-600">{ format!("Main keywords: {}", seo.main_keywords.join(", ")) }</p>
            <p class="text-xs text-gray-600">{ format!("Missing keywords: {}", seo.missing_keywords.join(", ")) }</p>
        </div>
    }
}

/// Fetches the long-form review on demand. The Markdown is shown as preformatted text.
#[function_component(DeepAnalysisPanel)]
pub fn deep_analysis_panel(props: &DeepAnalysisPanelProps) -> Html {
    let analysis = use_state(|| None::<DeepAnalysis>);
    let loading = use_state(|| false);
    let error_message = use_state(|| None::<String>);

    let on_click = {
        let record = props.record.clone();
        let analysis = analysis.clone();
        let loading = loading.clone();
        let error_message = error_message.clone();
        Callback::from(move |_: MouseEvent| {
            let record = record.clone();
            let analysis = analysis.clone();
            let loading = loading.clone();
            let error_message = error_message.clone();
            loading.set(true);
            error_message.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                match deep_analysis(&record).await {
                    Ok(result) => analysis.set(Some(result)),
                    Err(e) => {
                        web_sys::console::error_1(&e.clone().into());
                        error_message.set(Some(e));
                    }
                }
                loading.set(false);
            });
        })
    };

    html! {
        <div class="mt-4">
            <button
                onclick={on_click}
                disabled={*loading}
                class="px-4 py-2 text-sm bg-purple-600 text-white rounded hover:bg-purple-700 disabled:opacity-50"
            >
                { if *loading { "Analyzing..." } else { "🔬 Get deep analysis" } }
            </button>
            {
                if let Some(msg) = &*error_message {
                    html! { <p class="text-red-600 text-sm mt-2">{ msg }</p> }
                } else {
                    html! {}
                }
            }
            {
                if let Some(result) = &*analysis {
                    html! {
                        <div class="mt-3 border border-purple-200 rounded-lg p-4">
                            {
                                if let Some(reason) = &result.fallback_reason {
                                    html! { <p class="text-xs text-gray-500 mb-2">{ format!("AI unavailable: {reason}") }</p> }
                                } else if result.source == "mock" {
                                    html! { <p class="text-xs text-gray-500 mb-2">{"Mock analysis"}</p> }
                                } else {
                                    html! {}
                                }
                            }
                            <pre class="text-sm text-gray-700 whitespace-pre-wrap font-sans">{ &result.markdown }</pre>
                        </div>
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

/// Clicks a temporary `<a download>` pointing at a data URL.
fn trigger_download(filename: &str, body: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "No document available".to_string())?;

    let anchor = document
        .create_element("a")
        .map_err(|_| "Failed to create link".to_string())?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|_| "Failed to create link".to_string())?;
    anchor.set_href(&json_data_url(body));
    anchor.set_download(filename);
    anchor.click();
    Ok(())
}

#[function_component(ExportButton)]
pub fn export_button(props: &ExportButtonProps) -> Html {
    let exporting = use_state(|| false);
    let error_message = use_state(|| None::<String>);

    let on_click = {
        let result = props.result.clone();
        let exporting = exporting.clone();
        let error_message = error_message.clone();
        Callback::from(move |_: MouseEvent| {
            let result = result.clone();
            let exporting = exporting.clone();
            let error_message = error_message.clone();
            exporting.set(true);
            error_message.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                let outcome = export_result(&result)
                    .await
                    .and_then(|(filename, body)| trigger_download(&filename, &body));
                if let Err(e) = outcome {
                    web_sys::console::error_1(&e.clone().into());
                    error_message.set(Some(e));
                }
                exporting.set(false);
            });
        })
    };

    html! {
        <div class="flex items-center gap-3">
            <button
                onclick={on_click}
                disabled={*exporting}
                class="px-4 py-2 text-sm bg-green-600 text-white rounded hover:bg-green-700 disabled:opacity-50"
            >
                { if *exporting { "Exporting..." } else { "Export JSON" } }
            </button>
            {
                if let Some(msg) = &*error_message {
                    html! { <span class="text-red-600 text-sm">{ msg }</span> }
                } else {
                    html! {}
                }
            }
        </div>
    }
}
