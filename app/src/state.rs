//! Application state shared across components

use duiview_core::prelude::*;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Render pipeline handle shared with background tasks; locked for the
/// duration of each render, which also serializes renders from independent
/// trigger paths
pub type SharedCoordinator = Arc<Mutex<PreviewCoordinator<XmlToPngRenderer>>>;

/// Watcher handle shared with the drain loop
pub type SharedWatcher = Arc<Mutex<SkinWatcher>>;

/// Global application state
pub struct AppState {
    pub coordinator: SharedCoordinator,
    /// `None` when the platform watcher could not be created; previews
    /// still work, they just don't follow file changes
    pub watcher: Option<SharedWatcher>,
    /// Skin file currently previewed (canonicalized)
    pub current_file: Option<PathBuf>,
    /// Image shown in the viewport; kept across failed re-renders
    pub preview: Option<RenderedPreview>,
    /// Background color behind the image, applied without a re-render
    pub bk_color: String,
    /// Uncommitted value of the language input
    pub language: String,
    /// Current selection of the button-state control
    pub button_state: ButtonState,
    /// Last failure, shown in the status bar
    pub error_message: Option<String>,
    pub is_rendering: bool,
}

impl AppState {
    pub fn new() -> Self {
        let prefs = PreferenceStore::load_default();
        let language = prefs.language().to_owned();
        let bk_color = prefs.bk_color().to_owned();
        let button_state = prefs.button_state().parse().unwrap_or_default();

        // The skin directory is retargeted when a file is opened.
        let skin_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let renderer = XmlToPngRenderer::discover(skin_dir);
        let coordinator = Arc::new(Mutex::new(PreviewCoordinator::new(renderer, prefs)));

        let watcher = match SkinWatcher::new(None) {
            Ok(watcher) => Some(Arc::new(Mutex::new(watcher))),
            Err(err) => {
                tracing::warn!(%err, "file watching unavailable");
                None
            }
        };

        Self {
            coordinator,
            watcher,
            current_file: None,
            preview: None,
            bk_color,
            language,
            button_state,
            error_message: None,
            is_rendering: false,
        }
    }

    /// File name shown in the toolbar and status bar
    pub fn file_label(&self) -> String {
        self.current_file
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "No skin open".to_string())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
