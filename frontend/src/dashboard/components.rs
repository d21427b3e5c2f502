use crate::models::{ErrorResponse, StatusResponse};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct UrlFormProps {
    pub url: String,
    pub loading: bool,
    pub on_submit: Callback<String>,
}

#[derive(Properties, PartialEq)]
pub struct StatusBarProps {
    pub status: Option<StatusResponse>,
}

#[derive(Properties, PartialEq)]
pub struct ErrorPanelProps {
    pub error: ErrorResponse,
}

#[function_component(UrlForm)]
pub fn url_form(props: &UrlFormProps) -> Html {
    let current_input = use_state(|| props.url.clone());

    let on_input = {
        let current_input = current_input.clone();
        Callback::from(move |e: InputEvent| {
            let input_value = e.target_unchecked_into::<HtmlInputElement>().value();
            current_input.set(input_value);
        })
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        let current_input = current_input.clone();
        Callback::from(move |e: web_sys::SubmitEvent| {
            e.prevent_default();
            let url = current_input.trim().to_string();
            if !url.is_empty() {
                on_submit.emit(url);
            }
        })
    };

    html! {
        <form onsubmit={on_submit} class="flex mb-4">
            <input
                type="text"
                class="flex-grow p-3 border border-gray-300 rounded-l-lg focus:outline-none focus:ring-2 focus:ring-blue-500"
                placeholder="Paste a YouTube channel, video or website URL..."
                value={(*current_input).clone()}
                oninput={on_input}
                disabled={props.loading}
            />
            <button
                type="submit"
                class="bg-blue-600 text-white p-3 rounded-r-lg hover:bg-blue-700 focus:outline-none focus:ring-2 focus:ring-blue-500 disabled:opacity-50"
                disabled={props.loading}
            >
                { if props.loading { "Analyzing..." } else { "Analyze" } }
            </button>
        </form>
    }
}

#[function_component(StatusBar)]
pub fn status_bar(props: &StatusBarProps) -> Html {
    let Some(status) = &props.status else {
        return html! {};
    };

    let badge = |label: &str, on: bool| {
        let classes = if on {
            "px-2 py-1 rounded bg-green-100 text-green-800"
        } else {
            "px-2 py-1 rounded bg-gray-200 text-gray-600"
        };
        html! { <span class={classes}>{ label.to_string() }</span> }
    };

    html! {
        <div class="flex flex-wrap justify-center gap-2 text-xs mb-4">
            { badge(&format!("AI: {}", status.ai_mode), status.ai_mode == "real") }
            { badge("YouTube Data API", status.youtube_api) }
            { badge("Render service", status.render_service) }
            <span class="px-2 py-1 text-gray-500">{ format!("v{}", status.version) }</span>
        </div>
    }
}

#[function_component(ErrorPanel)]
pub fn error_panel(props: &ErrorPanelProps) -> Html {
    html! {
        <div class="bg-red-50 border border-red-200 rounded-lg p-4 mb-4">
            <p class="text-red-600 font-semibold">{ format!("Error: {}", props.error.message) }</p>
            {
                if props.error.causes.is_empty() {
                    html! {}
                } else {
                    html! {
                        <ul class="list-disc ml-6 mt-2 text-sm text-red-700">
                            { for props.error.causes.iter().map(|cause| html! { <li>{ cause }</li> }) }
                        </ul>
                    }
                }
            }
        </div>
    }
}
