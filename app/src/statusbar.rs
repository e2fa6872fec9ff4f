//! Bottom status bar component

use crate::state::AppState;
use dioxus::prelude::*;

/// Application version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bottom status bar showing application state
#[component]
pub fn StatusBar() -> Element {
    let state = use_context::<Signal<AppState>>();

    let (status_text, file_label) = {
        let s = state.read();
        let status = if s.is_rendering {
            "Rendering..."
        } else if s.error_message.is_some() {
            "Render failed"
        } else if s.preview.is_some() {
            "Ready"
        } else {
            "No preview"
        };
        (status, s.file_label())
    };

    rsx! {
        div { class: "status-bar",
            span { class: "status-item", "{status_text}" }
            span { class: "status-item", "{file_label}" }
            span { class: "status-item version", "v{VERSION}" }
        }
    }
}
