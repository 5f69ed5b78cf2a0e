#![allow(dead_code)]

use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

// Plain `<select>`. Keeping the native element means keyboard and
// mobile behavior come for free.
#[allow(dead_code)]
#[component]
pub fn NativeSelect(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] disabled: bool,
    /// `(value, label)` pairs, rendered in order.
    options: Vec<(String, String)>,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "border-input dark:bg-input/30 flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-sm shadow-xs transition-[color,box-shadow] outline-none",
        "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2",
        "disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50",
        class
    );

    let handle_change = move |ev: web_sys::Event| {
        if let Some(target) = ev.target() {
            if let Some(select) = target.dyn_ref::<web_sys::HtmlSelectElement>() {
                on_change.run(select.value());
            }
        }
    };

    view! {
        <select
            data-name="NativeSelect"
            class=merged_class
            id=id
            disabled=disabled
            prop:value=move || value.get()
            on:change=handle_change
        >
            {options
                .into_iter()
                .map(|(option_value, option_label)| {
                    let current = option_value.clone();
                    view! {
                        <option
                            value=option_value
                            selected=move || value.get() == current
                        >
                            {option_label}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
    .into_any()
}
