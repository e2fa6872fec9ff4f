//! The preview coordinator
//!
//! Owns the renderer, the preference store and the most recently rendered
//! document. Every trigger path (file opened, debounced change, explicit
//! reload) funnels into [`PreviewCoordinator::preview`]; option commits from
//! the display surface come in through [`PreviewCoordinator::apply_change`].

use crate::document;
use crate::message::{OptionChange, RawMessage};
use crate::prefs::PreferenceStore;
use crate::renderer::{png_data_uri, RenderOptions, Renderer};
use crate::Result;

/// Everything the display surface needs for one refresh
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedPreview {
    /// `data:image/png;base64,...` for the `img` element
    pub data_uri: String,
    /// Preference snapshot taken for this render, used to populate the
    /// options controls
    pub language: String,
    pub bk_color: String,
    pub button_state: String,
}

/// Coordinates document preparation, rendering and option persistence
pub struct PreviewCoordinator<R> {
    renderer: R,
    prefs: PreferenceStore,
    /// Most recently previewed raw XML; survives failed renders so an
    /// option change can retry it
    last_content: Option<String>,
}

impl<R: Renderer> PreviewCoordinator<R> {
    pub fn new(renderer: R, prefs: PreferenceStore) -> Self {
        Self {
            renderer,
            prefs,
            last_content: None,
        }
    }

    /// Render `xml` and remember it for later refreshes.
    pub fn preview(&mut self, xml: &str) -> Result<RenderedPreview> {
        // Remember the content before touching it: a later option change
        // re-renders from here even when this render fails.
        self.last_content = Some(xml.to_owned());
        self.render(xml)
    }

    /// Re-render the last previewed document.
    ///
    /// `Ok(None)` when nothing has been previewed yet.
    pub fn refresh(&mut self) -> Result<Option<RenderedPreview>> {
        match self.last_content.clone() {
            Some(content) => self.render(&content).map(Some),
            None => Ok(None),
        }
    }

    /// Persist an option change, then refresh when it affects the rendered
    /// output. A change with `reload == false` performs zero renders.
    pub fn apply_change(&mut self, change: OptionChange) -> Result<Option<RenderedPreview>> {
        tracing::debug!(
            key = change.kind.key(),
            value = change.kind.value(),
            reload = change.reload,
            "option committed"
        );
        self.prefs.set(change.kind.key(), change.kind.value())?;
        if change.reload {
            self.refresh()
        } else {
            Ok(None)
        }
    }

    /// Decode and apply a wire-shaped message.
    ///
    /// Messages outside the known preference set are logged and dropped.
    pub fn apply_raw_message(&mut self, raw: RawMessage) -> Result<Option<RenderedPreview>> {
        match OptionChange::try_from(raw) {
            Ok(change) => self.apply_change(change),
            Err(err) => {
                tracing::warn!(%err, "ignoring message from display surface");
                Ok(None)
            }
        }
    }

    /// Raw XML of the last preview, if any
    pub fn last_content(&self) -> Option<&str> {
        self.last_content.as_deref()
    }

    pub fn prefs(&self) -> &PreferenceStore {
        &self.prefs
    }

    pub fn prefs_mut(&mut self) -> &mut PreferenceStore {
        &mut self.prefs
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn render(&self, xml: &str) -> Result<RenderedPreview> {
        let prepared = document::inject_style_include(xml)?;
        let options = RenderOptions {
            language: self.prefs.language().to_owned(),
            button_state: self.prefs.button_state().to_owned(),
        };
        let png = self.renderer.render(&prepared, &options)?;
        Ok(RenderedPreview {
            data_uri: png_data_uri(&png),
            language: options.language,
            bk_color: self.prefs.bk_color().to_owned(),
            button_state: options.button_state,
        })
    }
}
