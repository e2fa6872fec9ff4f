//! Persistent user preferences
//!
//! A string-keyed store persisted as JSON under the user's config directory
//! (`{config_dir}/duiview/preferences.json`). Values are read on every
//! render and written only when an option is committed from the options
//! form or the CLI.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{Error, Result};

/// Preference key for the language overlay file
pub const KEY_LANGUAGE: &str = "language";

/// Preference key for the preview background color
pub const KEY_BKCOLOR: &str = "bkcolor";

/// Preference key for the rendered button state
pub const KEY_BUTTON_STATE: &str = "buttonState";

/// Button state assumed when none has been stored
pub const DEFAULT_BUTTON_STATE: &str = "normal";

/// State the renderer draws buttons in
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Hover,
    Push,
    Disable,
    Select,
}

impl ButtonState {
    /// Value as passed to the renderer and stored in preferences
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hover => "hover",
            Self::Push => "push",
            Self::Disable => "disable",
            Self::Select => "select",
        }
    }

    /// Human-readable label for the options form
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Hover => "Hover",
            Self::Push => "Pushed",
            Self::Disable => "Disabled",
            Self::Select => "Selected",
        }
    }

    /// All states in display order
    pub fn all() -> &'static [ButtonState] {
        &[
            Self::Normal,
            Self::Hover,
            Self::Push,
            Self::Disable,
            Self::Select,
        ]
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ButtonState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(Self::Normal),
            "hover" => Ok(Self::Hover),
            "push" => Ok(Self::Push),
            "disable" => Ok(Self::Disable),
            "select" => Ok(Self::Select),
            other => Err(Error::UnknownOption(format!("button state \"{other}\""))),
        }
    }
}

/// Get the path to the preference file
fn store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("duiview").join("preferences.json"))
}

/// String-keyed preference store backed by a JSON file
pub struct PreferenceStore {
    /// Backing file; `None` keeps the store in memory only
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl PreferenceStore {
    /// Load the installation-wide store from the user's config directory.
    ///
    /// Falls back to an in-memory store when no config directory exists.
    pub fn load_default() -> Self {
        match store_path() {
            Some(path) => Self::load_from(path),
            None => {
                tracing::warn!("no config directory, preferences will not persist");
                Self::in_memory()
            }
        }
    }

    /// Load a store from an explicit file path.
    ///
    /// A missing or unreadable file yields an empty store; the file is
    /// created on the first write.
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path: Some(path),
            values,
        }
    }

    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
        }
    }

    /// Raw value stored under `key`, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Store `value` under `key` and persist the store.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        tracing::debug!(%key, %value, "preference updated");
        self.values.insert(key, value);
        self.persist()
    }

    /// Language overlay file name; empty when unset
    pub fn language(&self) -> &str {
        self.get(KEY_LANGUAGE).unwrap_or("")
    }

    /// Preview background color; empty when unset
    pub fn bk_color(&self) -> &str {
        self.get(KEY_BKCOLOR).unwrap_or("")
    }

    /// Button state for the renderer; `"normal"` when unset
    pub fn button_state(&self) -> &str {
        self.get(KEY_BUTTON_STATE).unwrap_or(DEFAULT_BUTTON_STATE)
    }

    /// Backing file, if the store persists anywhere
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("creating {}: {e}", parent.display())))?;
        }

        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| Error::Storage(e.to_string()))?;
        fs::write(path, json).map_err(|e| Error::Storage(format!("writing {}: {e}", path.display())))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let mut store = PreferenceStore::in_memory();
        store.set("language", "lang_en.xml").expect("in-memory set");
        assert_eq!(store.get("language"), Some("lang_en.xml"));
    }

    #[test]
    fn unset_keys_use_documented_defaults() {
        let store = PreferenceStore::in_memory();
        assert_eq!(store.language(), "");
        assert_eq!(store.bk_color(), "");
        assert_eq!(store.button_state(), "normal");
    }

    #[test]
    fn values_survive_reload_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");

        {
            let mut store = PreferenceStore::load_from(&path);
            store.set(KEY_BUTTON_STATE, "hover").expect("persist");
            store.set(KEY_BKCOLOR, "#202020").expect("persist");
        }

        let reloaded = PreferenceStore::load_from(&path);
        assert_eq!(reloaded.button_state(), "hover");
        assert_eq!(reloaded.bk_color(), "#202020");
        assert_eq!(reloaded.language(), "");
    }

    #[test]
    fn corrupt_file_degrades_to_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json").expect("write");

        let store = PreferenceStore::load_from(&path);
        assert_eq!(store.button_state(), "normal");
    }

    #[test]
    fn button_state_parses_all_known_values() {
        for state in ButtonState::all() {
            assert_eq!(state.as_str().parse::<ButtonState>().expect("known"), *state);
        }
        assert!("pressed".parse::<ButtonState>().is_err());
    }
}
