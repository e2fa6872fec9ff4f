//! Top toolbar with file operations

use crate::preview;
use crate::state::AppState;
use dioxus::prelude::*;

/// Toolbar with Open/Reload and the current file name
#[component]
pub fn Toolbar() -> Element {
    let state = use_context::<Signal<AppState>>();
    let file_label = state.read().file_label();

    rsx! {
        div { class: "toolbar",
            button {
                class: "toolbar-button",
                title: "Open a skin file (also accepted as a command-line argument)",
                onclick: move |_| {
                    spawn(async move {
                        if let Some(file) = rfd::AsyncFileDialog::new()
                            .add_filter("DuiLib skins", &["xml"])
                            .pick_file()
                            .await
                        {
                            preview::open_file(state, file.path().to_path_buf());
                        }
                    });
                },
                "Open"
            }
            button {
                class: "toolbar-button",
                title: "Re-render the current skin",
                onclick: move |_| preview::refresh(state),
                "Reload"
            }
            span { class: "toolbar-title", "{file_label}" }
        }
    }
}
