//! DuiView Studio - desktop live preview for DuiLib skin XML

mod options;
mod preview;
mod state;
mod statusbar;
mod toolbar;
mod viewport;

use dioxus::desktop::{Config, WindowBuilder};
use dioxus::prelude::*;
use state::AppState;
use std::path::PathBuf;

fn main() {
    tracing_subscriber::fmt::init();

    let window = WindowBuilder::new().with_title("DuiLib Preview");
    let config = Config::new().with_window(window);

    dioxus::LaunchBuilder::desktop().with_cfg(config).launch(App);
}

/// Skin file passed on the command line, if any
fn initial_file() -> Option<PathBuf> {
    std::env::args_os().nth(1).map(PathBuf::from)
}

#[component]
fn App() -> Element {
    use_context_provider(|| Signal::new(AppState::new()));
    let state = use_context::<Signal<AppState>>();

    // One-time startup work: preview the file given on the command line and
    // start draining watcher events.
    use_effect(move || {
        if let Some(path) = initial_file() {
            preview::open_file(state, path);
        }
        preview::spawn_watch_loop(state);
    });

    rsx! {
        style { {include_str!("../assets/style.css")} }

        div { class: "app-container",
            toolbar::Toolbar {}
            options::OptionsHeader {}
            viewport::PreviewViewport {}
            statusbar::StatusBar {}
        }
    }
}
