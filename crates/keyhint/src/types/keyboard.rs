/*! Keyboard model: shortcuts, named actions and keyboard modes. */

use super::HintsMode;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A normalized key combination, as produced by keyboard capture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct Shortcut {
  pub key: String,
  #[serde(default)]
  pub alt: bool,
  #[serde(default)]
  pub cmd: bool,
  #[serde(default)]
  pub ctrl: bool,
  #[serde(default)]
  pub shift: bool,
}

impl Shortcut {
  pub fn new(key: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      ..Self::default()
    }
  }

  #[must_use]
  pub const fn with_alt(mut self) -> Self {
    self.alt = true;
    self
  }

  #[must_use]
  pub const fn with_ctrl(mut self) -> Self {
    self.ctrl = true;
    self
  }

  #[must_use]
  pub const fn with_shift(mut self) -> Self {
    self.shift = true;
    self
  }

  /// Shortcuts a fast typist cannot hit by accident while finishing a word.
  pub const fn is_safe_during_over_typing(&self) -> bool {
    self.alt || self.cmd || self.ctrl
  }
}

/// Named actions delivered by keyboard capture after shortcut mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "value")]
#[ts(export)]
pub enum KeyboardAction {
  EnterHintsMode(HintsMode),
  ExitHintsMode,
  RotateHintsForward,
  RotateHintsBackward,
  RefreshHints,
  TogglePeek,
  Escape,
  ActivateHint,
  ActivateHintAlt,
  Backspace,
}

/// A shortcut bound to an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KeyboardMapping {
  pub shortcut: Shortcut,
  pub action: KeyboardAction,
}

impl KeyboardMapping {
  pub const fn new(shortcut: Shortcut, action: KeyboardAction) -> Self {
    Self { shortcut, action }
  }
}

/// How frames should capture keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "PascalCase")]
#[ts(export)]
pub enum KeyboardMode {
  /// Only global shortcuts are captured.
  #[default]
  Normal,
  /// Hints are shown: printable keys and hint shortcuts are captured.
  Hints,
  /// Right after an activation: only shortcuts with modifiers are captured,
  /// and everything else is swallowed.
  PreventOverTyping,
}

/// A printable keypress while hints are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Keypress {
  /// The printable text of the key, usually a single character.
  pub key: String,
}

impl Keypress {
  pub fn new(key: impl Into<String>) -> Self {
    Self { key: key.into() }
  }
}

/// Default global shortcuts.
pub fn default_keyboard_shortcuts() -> Vec<KeyboardMapping> {
  use KeyboardAction::EnterHintsMode;
  vec![
    KeyboardMapping::new(Shortcut::new("j").with_alt(), EnterHintsMode(HintsMode::Click)),
    KeyboardMapping::new(
      Shortcut::new("k").with_alt(),
      EnterHintsMode(HintsMode::BackgroundTab),
    ),
    KeyboardMapping::new(
      Shortcut::new("l").with_alt(),
      EnterHintsMode(HintsMode::ForegroundTab),
    ),
    KeyboardMapping::new(
      Shortcut::new("J").with_alt().with_shift(),
      EnterHintsMode(HintsMode::ManyClick),
    ),
    KeyboardMapping::new(
      Shortcut::new("K").with_alt().with_shift(),
      EnterHintsMode(HintsMode::ManyTab),
    ),
    KeyboardMapping::new(
      Shortcut::new("L").with_alt().with_shift(),
      EnterHintsMode(HintsMode::Select),
    ),
  ]
}

/// Default shortcuts that apply while hints are shown.
pub fn default_hints_keyboard_shortcuts() -> Vec<KeyboardMapping> {
  use KeyboardAction as A;
  vec![
    KeyboardMapping::new(Shortcut::new("Enter"), A::ActivateHint),
    KeyboardMapping::new(Shortcut::new("Enter").with_alt(), A::ActivateHintAlt),
    KeyboardMapping::new(Shortcut::new("Backspace"), A::Backspace),
    KeyboardMapping::new(Shortcut::new("Tab"), A::RotateHintsForward),
    KeyboardMapping::new(Shortcut::new("Tab").with_shift(), A::RotateHintsBackward),
    KeyboardMapping::new(Shortcut::new("Enter").with_ctrl(), A::RefreshHints),
    KeyboardMapping::new(Shortcut::new("p").with_ctrl(), A::TogglePeek),
    KeyboardMapping::new(Shortcut::new("Escape"), A::ExitHintsMode),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_modified_shortcuts_are_safe() {
    assert!(Shortcut::new("j").with_alt().is_safe_during_over_typing());
    assert!(Shortcut::new("p").with_ctrl().is_safe_during_over_typing());
    assert!(!Shortcut::new("j").is_safe_during_over_typing());
    assert!(!Shortcut::new("J").with_shift().is_safe_during_over_typing());
  }

  #[test]
  fn default_global_shortcuts_are_all_safe() {
    assert!(default_keyboard_shortcuts()
      .iter()
      .all(|m| m.shortcut.is_safe_during_over_typing()));
  }

  #[test]
  fn action_wire_format() {
    let json = serde_json::to_value(KeyboardAction::EnterHintsMode(HintsMode::Select)).unwrap();
    assert_eq!(json["type"], "EnterHintsMode");
    assert_eq!(json["value"], "Select");

    let parsed: KeyboardAction = serde_json::from_str(r#"{"type":"Backspace"}"#).unwrap();
    assert_eq!(parsed, KeyboardAction::Backspace);
  }

  #[test]
  fn shortcut_modifiers_default_to_false() {
    let parsed: Shortcut = serde_json::from_str(r#"{"key":"x"}"#).unwrap();
    assert_eq!(parsed, Shortcut::new("x"));
  }
}
