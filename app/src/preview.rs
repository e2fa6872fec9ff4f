//! Render orchestration - trigger paths and the watcher drain loop
//!
//! Renders block on the external process, so they run on a blocking worker
//! while the UI stays live. The shared coordinator mutex keeps renders from
//! independent trigger paths serialized.

use crate::state::AppState;
use dioxus::prelude::*;
use duiview_core::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinError;

/// How often the watcher channel is drained
const WATCH_POLL: Duration = Duration::from_millis(50);

/// Open a skin file: retarget the watcher, point the renderer at the file's
/// directory and render immediately.
pub fn open_file(mut state: Signal<AppState>, path: PathBuf) {
    spawn(async move {
        let path = path.canonicalize().unwrap_or(path);

        let xml = match tokio::fs::read_to_string(&path).await {
            Ok(xml) => xml,
            Err(err) => {
                tracing::error!(path = %path.display(), %err, "failed to read skin file");
                state.write().error_message =
                    Some(format!("Failed to read {}: {err}", path.display()));
                return;
            }
        };

        retarget_watcher(&state, &path);

        {
            let s = state.read();
            // Skin resources resolve relative to the previewed file.
            if let Some(dir) = path.parent() {
                s.coordinator.lock().renderer_mut().set_skin_dir(dir);
            }
        }
        state.write().current_file = Some(path);

        render_text(state, xml).await;
    });
}

/// Re-render the last content (Reload button).
pub fn refresh(mut state: Signal<AppState>) {
    spawn(async move {
        let coordinator = state.read().coordinator.clone();
        state.write().is_rendering = true;
        let result =
            tokio::task::spawn_blocking(move || coordinator.lock().refresh()).await;
        publish(state, result);
    });
}

/// Persist an option change and apply any resulting re-render.
pub fn apply_change(mut state: Signal<AppState>, change: OptionChange) {
    spawn(async move {
        let coordinator = state.read().coordinator.clone();
        if change.reload {
            state.write().is_rendering = true;
        }
        let result =
            tokio::task::spawn_blocking(move || coordinator.lock().apply_change(change)).await;
        publish(state, result);
    });
}

/// Drain debounced watch events and re-render the current file.
pub fn spawn_watch_loop(state: Signal<AppState>) {
    spawn(async move {
        loop {
            tokio::time::sleep(WATCH_POLL).await;

            let (watcher, current) = {
                let s = state.read();
                (s.watcher.clone(), s.current_file.clone())
            };
            let Some(watcher) = watcher else {
                // No platform watcher; nothing to drain, ever.
                break;
            };

            let events = watcher.lock().drain_events();
            for event in events {
                match event {
                    WatchEvent::Modified(path) => {
                        if current.as_deref() == Some(path.as_path()) {
                            tracing::debug!(path = %path.display(), "skin file changed");
                            // Re-read so the render uses the content of the
                            // last write in the burst.
                            match tokio::fs::read_to_string(&path).await {
                                Ok(xml) => render_text(state, xml).await,
                                Err(err) => {
                                    tracing::warn!(%err, "failed to re-read skin file");
                                }
                            }
                        }
                    }
                    WatchEvent::Error(detail) => tracing::warn!(%detail, "watch error"),
                }
            }
        }
    });
}

/// Render `xml` on a blocking worker and publish the result.
pub async fn render_text(mut state: Signal<AppState>, xml: String) {
    let coordinator = state.read().coordinator.clone();
    state.write().is_rendering = true;
    let result =
        tokio::task::spawn_blocking(move || coordinator.lock().preview(&xml)).await;
    publish(state, result.map(|r| r.map(Some)));
}

fn publish(
    mut state: Signal<AppState>,
    result: Result<duiview_core::Result<Option<RenderedPreview>>, JoinError>,
) {
    let mut s = state.write();
    s.is_rendering = false;
    match result {
        Ok(Ok(Some(preview))) => {
            s.bk_color = preview.bk_color.clone();
            s.preview = Some(preview);
            s.error_message = None;
        }
        Ok(Ok(None)) => {}
        Ok(Err(err)) => {
            // Previous image stays up; only the status line changes.
            tracing::error!(%err, "render failed");
            s.error_message = Some(err.to_string());
        }
        Err(err) => {
            tracing::error!(%err, "render task panicked");
            s.error_message = Some("Render task failed".to_string());
        }
    }
}

fn retarget_watcher(state: &Signal<AppState>, path: &Path) {
    let (watcher, previous) = {
        let s = state.read();
        (s.watcher.clone(), s.current_file.clone())
    };
    let Some(watcher) = watcher else { return };

    let mut watcher = watcher.lock();
    if let Some(old) = previous {
        if let Err(err) = watcher.unwatch(&old) {
            tracing::debug!(%err, "unwatch failed");
        }
    }
    if let Err(err) = watcher.watch(path) {
        tracing::warn!(path = %path.display(), %err, "could not watch skin file");
    }
}
