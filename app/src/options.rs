//! Options header - the three preview controls
//!
//! Language and background color commit on Enter, the button state commits
//! on selection. Background color is applied to the image host right away;
//! the other two require a re-render.

use crate::preview;
use crate::state::AppState;
use dioxus::prelude::*;
use duiview_core::prelude::*;

/// Header row with the preview option controls
#[component]
pub fn OptionsHeader() -> Element {
    let state = use_context::<Signal<AppState>>();

    rsx! {
        div { class: "options-header",
            LanguageInput { state }
            BackgroundInput { state }
            ButtonStateSelect { state }
        }
    }
}

/// Language overlay input; Enter commits and re-renders
#[component]
fn LanguageInput(state: Signal<AppState>) -> Element {
    let mut state = state;
    let value = state.read().language.clone();

    rsx! {
        label { class: "option-label", r#for: "inputCommand", "Language:" }
        input {
            id: "inputCommand",
            class: "option-input",
            r#type: "text",
            placeholder: "language xml name",
            value: "{value}",
            oninput: move |evt| state.write().language = evt.value(),
            onkeydown: move |evt| {
                if evt.key() == Key::Enter {
                    let value = state.read().language.clone();
                    preview::apply_change(state, OptionChange::language(value));
                }
            },
        }
    }
}

/// Background color input; Enter applies it client-side and persists it
#[component]
fn BackgroundInput(state: Signal<AppState>) -> Element {
    let mut state = state;
    let mut draft = use_signal(|| state.read().bk_color.clone());

    rsx! {
        label { class: "option-label", r#for: "inputBackground", "Background:" }
        input {
            id: "inputBackground",
            class: "option-input",
            r#type: "text",
            placeholder: "css color",
            value: "{draft}",
            oninput: move |evt| draft.set(evt.value()),
            onkeydown: move |evt| {
                if evt.key() == Key::Enter {
                    let value = draft.read().clone();
                    // Applied to the viewport right away; the commit only
                    // persists it, no re-render.
                    state.write().bk_color = value.clone();
                    preview::apply_change(state, OptionChange::bk_color(value));
                }
            },
        }
    }
}

/// Button state dropdown; changing commits and re-renders
#[component]
fn ButtonStateSelect(state: Signal<AppState>) -> Element {
    let mut state = state;
    let current = state.read().button_state;

    rsx! {
        label { class: "option-label", r#for: "btnStateSelect", "Button state:" }
        select {
            id: "btnStateSelect",
            class: "option-select",
            value: "{current.as_str()}",
            onchange: move |evt| {
                match evt.value().parse::<ButtonState>() {
                    Ok(next) => {
                        state.write().button_state = next;
                        preview::apply_change(state, OptionChange::button_state(next));
                    }
                    Err(err) => tracing::warn!(%err, "unexpected button state from select"),
                }
            },

            for choice in ButtonState::all() {
                option {
                    value: "{choice.as_str()}",
                    selected: current == *choice,
                    "{choice.label()}"
                }
            }
        }
    }
}
