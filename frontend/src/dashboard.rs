pub mod api;
pub mod components;
pub mod options;
pub mod results;
pub mod suggestions;

use crate::dashboard::api::{analyze_url, load_status};
use crate::dashboard::components::{ErrorPanel, StatusBar, UrlForm};
use crate::dashboard::options::OptionsPanel;
use crate::dashboard::results::ResultsView;
use crate::dashboard::suggestions::{DeepAnalysisPanel, ExportButton, SuggestionsPanel};
use crate::env_variable_utils::get_app_name;
use crate::models::{AnalysisOptions, AnalysisResult, ContentKind, ErrorResponse, StatusResponse};
use yew::prelude::*;

fn get_url_param() -> Option<String> {
    let href = web_sys::window()?.location().href().ok()?;
    let url = web_sys::Url::new(&href).ok()?;
    url.search_params().get("url").filter(|u| !u.is_empty())
}

fn update_url_param(target: &str) {
    if let Some(window) = web_sys::window() {
        let Ok(href) = window.location().href() else {
            return;
        };
        let Ok(url) = web_sys::Url::new(&href) else {
            return;
        };
        url.search_params().set("url", target);

        // Update the URL without reloading the page
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url.href()));
        }
    }
}

#[function_component(DashboardApp)]
pub fn dashboard_app() -> Html {
    let url = use_state(|| get_url_param().unwrap_or_default());
    let options = use_state(AnalysisOptions::default);
    let result = use_state(|| None::<AnalysisResult>);
    let error = use_state(|| None::<ErrorResponse>);
    let loading = use_state(|| false);
    let status = use_state(|| None::<StatusResponse>);

    {
        let status = status.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match load_status().await {
                    Ok(s) => status.set(Some(s)),
                    Err(e) => log::warn!("Backend status unavailable: {}", e),
                }
            });
            || ()
        });
    }

    let on_submit = {
        let url = url.clone();
        let options = options.clone();
        let result = result.clone();
        let error = error.clone();
        let loading = loading.clone();

        Callback::from(move |target: String| {
            url.set(target.clone());
            update_url_param(&target);

            let options = (*options).clone();
            let result = result.clone();
            let error = error.clone();
            let loading = loading.clone();
            loading.set(true);
            error.set(None);
            result.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                analyze_url(target, options, result, error, loading).await;
            });
        })
    };

    let on_options_change = {
        let options = options.clone();
        Callback::from(move |next: AnalysisOptions| options.set(next))
    };

    html! {
        <div class="min-h-screen flex flex-col items-center bg-gray-700 p-4">
            <div class="bg-white p-8 rounded-lg shadow-lg w-full max-w-4xl">
                <h1 class="text-3xl font-bold text-center text-gray-800 mb-2">
                    { get_app_name() }
                </h1>
                <StatusBar status={(*status).clone()} />

                <UrlForm url={(*url).clone()} loading={*loading} {on_submit} />
                <OptionsPanel
                    options={(*options).clone()}
                    disabled={*loading}
                    on_change={on_options_change}
                />

                {
                    if *loading {
                        html! { <p class="text-center text-gray-500">{"Extracting content, this can take a while for channels..."}</p> }
                    } else {
                        html! {}
                    }
                }

                {
                    if let Some(e) = &*error {
                        html! { <ErrorPanel error={e.clone()} /> }
                    } else {
                        html! {}
                    }
                }

                {
                    if let Some(analysis) = &*result {
                        html! {
                            <>
                                <div class="flex justify-end mt-4">
                                    <ExportButton result={analysis.clone()} />
                                </div>
                                <ResultsView result={analysis.clone()} />
                                {
                                    if let Some(suggestions) = &analysis.suggestions {
                                        html! { <SuggestionsPanel suggestions={suggestions.clone()} /> }
                                    } else {
                                        html! {}
                                    }
                                }
                                {
                                    if analysis.record.kind == ContentKind::YoutubeVideo {
                                        html! { <DeepAnalysisPanel record={analysis.record.clone()} /> }
                                    } else {
                                        html! {}
                                    }
                                }
                            </>
                        }
                    } else {
                        html! {}
                    }
                }
            </div>
        </div>
    }
}
