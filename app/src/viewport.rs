//! Preview viewport - the image host

use crate::state::AppState;
use dioxus::prelude::*;

/// Image host showing the rendered skin over the configured background
#[component]
pub fn PreviewViewport() -> Element {
    let state = use_context::<Signal<AppState>>();

    let (data_uri, bk_color, error) = {
        let s = state.read();
        (
            s.preview.as_ref().map(|p| p.data_uri.clone()),
            s.bk_color.clone(),
            s.error_message.clone(),
        )
    };

    rsx! {
        div {
            class: "img-host",
            style: "background-color: {bk_color};",

            match error {
                Some(error) => rsx! {
                    div { class: "error-banner", "{error}" }
                },
                None => rsx! {},
            }

            match data_uri {
                Some(uri) => rsx! {
                    img { class: "preview-image", src: "{uri}" }
                },
                None => rsx! {
                    div { class: "placeholder",
                        "Open a skin XML file to preview it here."
                    }
                },
            }
        }
    }
}
