//! # DuiView Core
//!
//! Coordination pipeline for previewing DuiLib skin XML: prepare the
//! document, shell out to the external `XMLToPng` renderer, persist the
//! user's preview options and debounce file changes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use duiview_core::prelude::*;
//!
//! let prefs = PreferenceStore::load_default();
//! let renderer = XmlToPngRenderer::discover("skins/");
//! let mut coordinator = PreviewCoordinator::new(renderer, prefs);
//!
//! let preview = coordinator.preview(&std::fs::read_to_string("window.xml")?)?;
//! show_image(&preview.data_uri);
//! ```
//!
//! ## Conventions
//!
//! - **Preferences**: read on every render, written only on explicit commit
//! - **Rendering**: synchronous, bounded by a kill-on-expiry timeout
//! - **Debounce**: 250 ms trailing-edge quiet window on file changes

pub mod coordinator;
pub mod document;
pub mod message;
pub mod prefs;
pub mod renderer;
#[cfg(feature = "file-watcher")]
pub mod watcher;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coordinator::{PreviewCoordinator, RenderedPreview};

    pub use crate::document::inject_style_include;

    pub use crate::message::{OptionChange, OptionKind, RawMessage};

    pub use crate::prefs::{
        ButtonState, PreferenceStore, KEY_BKCOLOR, KEY_BUTTON_STATE, KEY_LANGUAGE,
    };

    pub use crate::renderer::{
        png_data_uri, RenderOptions, Renderer, XmlToPngRenderer, DEFAULT_RENDER_TIMEOUT,
    };

    #[cfg(feature = "file-watcher")]
    pub use crate::watcher::{SkinWatcher, WatchEvent, DEBOUNCE_WINDOW};

    pub use crate::{Error, Result};
}
