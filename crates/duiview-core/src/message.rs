//! Messages from the options form
//!
//! The display surface posts `{type, value, reload}` objects when the user
//! commits a control. The wire shape is kept as [`RawMessage`], but the
//! coordinator only acts on the closed set of [`OptionChange`]s decoded from
//! it; anything else is rejected instead of being persisted under its
//! literal key.

use serde::{Deserialize, Serialize};

use crate::prefs::{ButtonState, KEY_BKCOLOR, KEY_BUTTON_STATE, KEY_LANGUAGE};
use crate::{Error, Result};

/// Wire shape of a message posted by the options form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Preference key the value belongs to
    #[serde(rename = "type")]
    pub kind: String,
    /// New value for that preference
    pub value: String,
    /// Whether a re-render must follow the persisted write
    pub reload: bool,
}

/// A validated option change from the display surface
#[derive(Clone, Debug, PartialEq)]
pub struct OptionChange {
    pub kind: OptionKind,
    /// Re-render after persisting; `false` means the surface already applied
    /// the change client-side (e.g. background color)
    pub reload: bool,
}

/// The three preference kinds the surface can change
#[derive(Clone, Debug, PartialEq)]
pub enum OptionKind {
    /// Language overlay file name
    Language(String),
    /// CSS-style background color behind the rendered image
    BkColor(String),
    /// Button state the renderer should draw
    ButtonState(ButtonState),
}

impl OptionKind {
    /// Preference key this change is stored under
    pub fn key(&self) -> &'static str {
        match self {
            Self::Language(_) => KEY_LANGUAGE,
            Self::BkColor(_) => KEY_BKCOLOR,
            Self::ButtonState(_) => KEY_BUTTON_STATE,
        }
    }

    /// Value as stored and as passed to the renderer
    pub fn value(&self) -> &str {
        match self {
            Self::Language(v) | Self::BkColor(v) => v,
            Self::ButtonState(state) => state.as_str(),
        }
    }
}

impl OptionChange {
    /// Language commit; the rendered text changes, so a reload follows.
    pub fn language(value: impl Into<String>) -> Self {
        Self {
            kind: OptionKind::Language(value.into()),
            reload: true,
        }
    }

    /// Background color commit; applied client-side, no reload.
    pub fn bk_color(value: impl Into<String>) -> Self {
        Self {
            kind: OptionKind::BkColor(value.into()),
            reload: false,
        }
    }

    /// Button state commit; the rendered image changes, so a reload follows.
    pub fn button_state(state: ButtonState) -> Self {
        Self {
            kind: OptionKind::ButtonState(state),
            reload: true,
        }
    }
}

impl TryFrom<RawMessage> for OptionChange {
    type Error = Error;

    fn try_from(raw: RawMessage) -> Result<Self> {
        let kind = match raw.kind.as_str() {
            KEY_LANGUAGE => OptionKind::Language(raw.value),
            KEY_BKCOLOR => OptionKind::BkColor(raw.value),
            KEY_BUTTON_STATE => OptionKind::ButtonState(raw.value.parse()?),
            _ => return Err(Error::UnknownOption(raw.kind)),
        };
        Ok(Self {
            kind,
            reload: raw.reload,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_decode() {
        let raw = RawMessage {
            kind: "buttonState".to_string(),
            value: "hover".to_string(),
            reload: true,
        };
        let change = OptionChange::try_from(raw).expect("known kind");
        assert_eq!(change.kind, OptionKind::ButtonState(ButtonState::Hover));
        assert!(change.reload);
        assert_eq!(change.kind.key(), KEY_BUTTON_STATE);
        assert_eq!(change.kind.value(), "hover");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let raw = RawMessage {
            kind: "fontSize".to_string(),
            value: "12".to_string(),
            reload: false,
        };
        assert!(matches!(
            OptionChange::try_from(raw),
            Err(Error::UnknownOption(kind)) if kind == "fontSize"
        ));
    }

    #[test]
    fn unknown_button_state_value_is_rejected() {
        let raw = RawMessage {
            kind: "buttonState".to_string(),
            value: "pressed".to_string(),
            reload: true,
        };
        assert!(OptionChange::try_from(raw).is_err());
    }

    #[test]
    fn wire_field_is_named_type() {
        let raw: RawMessage =
            serde_json::from_str(r##"{"type":"bkcolor","value":"#333","reload":false}"##)
                .expect("wire shape");
        assert_eq!(raw.kind, "bkcolor");

        let json = serde_json::to_string(&raw).expect("serialize");
        assert!(json.contains(r#""type":"bkcolor""#));
    }

    #[test]
    fn constructors_carry_the_surface_reload_flags() {
        assert!(OptionChange::language("lang_en.xml").reload);
        assert!(!OptionChange::bk_color("#333").reload);
        assert!(OptionChange::button_state(ButtonState::Push).reload);
    }
}
