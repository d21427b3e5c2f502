use crate::models::AnalysisOptions;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub const MIN_ITEMS: usize = 5;
pub const MAX_ITEMS: usize = 50;

#[derive(Properties, PartialEq)]
pub struct OptionsPanelProps {
    pub options: AnalysisOptions,
    pub disabled: bool,
    pub on_change: Callback<AnalysisOptions>,
}

#[derive(Properties, PartialEq)]
struct ToggleProps {
    label: AttrValue,
    checked: bool,
    disabled: bool,
    on_toggle: Callback<bool>,
}

#[function_component(Toggle)]
fn toggle(props: &ToggleProps) -> Html {
    let onchange = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |e: Event| {
            on_toggle.emit(e.target_unchecked_into::<HtmlInputElement>().checked());
        })
    };

    html! {
        <label class="inline-flex items-center mr-6">
            <input
                type="checkbox"
                class="form-checkbox h-5 w-5 text-blue-600"
                checked={props.checked}
                disabled={props.disabled}
                {onchange}
            />
            <span class="ml-2 text-gray-700">{ props.label.clone() }</span>
        </label>
    }
}

#[function_component(OptionsPanel)]
pub fn options_panel(props: &OptionsPanelProps) -> Html {
    let options = props.options.clone();

    // Every control emits a full copy of the options with one field changed
    let update = |apply: fn(&mut AnalysisOptions, bool)| {
        let options = options.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |value: bool| {
            let mut next = options.clone();
            apply(&mut next, value);
            on_change.emit(next);
        })
    };

    let on_max_items = {
        let options = options.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            if let Ok(max_items) = value.parse::<usize>() {
                on_change.emit(AnalysisOptions {
                    max_items: max_items.clamp(MIN_ITEMS, MAX_ITEMS),
                    ..options.clone()
                });
            }
        })
    };

    html! {
        <div class="bg-gray-100 rounded-lg p-4 mb-4">
            <div class="flex flex-wrap items-center mb-3">
                <Toggle
                    label="Advanced scraping"
                    checked={options.advanced_scraping}
                    disabled={props.disabled}
                    on_toggle={update(|o, v| o.advanced_scraping = v)}
                />
                <Toggle
                    label="Include shorts"
                    checked={options.include_shorts}
                    disabled={props.disabled}
                    on_toggle={update(|o, v| o.include_shorts = v)}
                />
                <Toggle
                    label="AI analysis"
                    checked={options.ai_analysis}
                    disabled={props.disabled}
                    on_toggle={update(|o, v| o.ai_analysis = v)}
                />
            </div>
            <label class="flex items-center text-gray-700">
                <span class="mr-3">{"Max videos per channel"}</span>
                <input
                    type="range"
                    class="flex-grow"
                    min={MIN_ITEMS.to_string()}
                    max={MAX_ITEMS.to_string()}
                    value={options.max_items.to_string()}
                    disabled={props.disabled}
                    oninput={on_max_items}
                />
                <span class="ml-3 w-8 text-right font-semibold">{ options.max_items }</span>
            </label>
        </div>
    }
}
