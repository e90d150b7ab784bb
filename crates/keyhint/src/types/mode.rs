/*! Hinting modes. */

use super::{ElementReport, ElementType};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// What activating a hint does, and which elements get hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "PascalCase")]
#[ts(export)]
pub enum HintsMode {
  Click,
  BackgroundTab,
  ForegroundTab,
  ManyClick,
  ManyTab,
  Select,
}

const CLICK_TYPES: &[ElementType] = &[
  ElementType::Clickable,
  ElementType::ClickableEvent,
  ElementType::Label,
  ElementType::Link,
  ElementType::Scrollable,
  ElementType::Textarea,
  ElementType::Title,
];

const TAB_TYPES: &[ElementType] = &[ElementType::Link];

const SELECT_TYPES: &[ElementType] = &[
  ElementType::Clickable,
  ElementType::ClickableEvent,
  ElementType::Label,
  ElementType::Link,
  ElementType::Scrollable,
  ElementType::Selectable,
  ElementType::Textarea,
  ElementType::Title,
];

impl HintsMode {
  /// Element types frames should scan for in this mode.
  pub const fn element_types(self) -> &'static [ElementType] {
    match self {
      Self::Click | Self::ManyClick => CLICK_TYPES,
      Self::BackgroundTab | Self::ForegroundTab | Self::ManyTab => TAB_TYPES,
      Self::Select => SELECT_TYPES,
    }
  }

  /// Modes whose action is opening a URL.
  pub const fn opens_tabs(self) -> bool {
    matches!(
      self,
      Self::BackgroundTab | Self::ForegroundTab | Self::ManyTab
    )
  }

  /// Modes that keep hinting after an activation.
  pub const fn is_many(self) -> bool {
    matches!(self, Self::ManyClick | Self::ManyTab)
  }

  /// Whether a reported element can be hinted in this mode.
  pub fn is_eligible(self, report: &ElementReport) -> bool {
    if !self.element_types().contains(&report.element_type) {
      return false;
    }
    if self.opens_tabs() {
      return report.url.is_some();
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tab_modes_only_scan_links() {
    for mode in [
      HintsMode::BackgroundTab,
      HintsMode::ForegroundTab,
      HintsMode::ManyTab,
    ] {
      assert_eq!(mode.element_types(), &[ElementType::Link]);
      assert!(mode.opens_tabs());
    }
  }

  #[test]
  fn only_select_scans_selectable() {
    assert!(HintsMode::Select
      .element_types()
      .contains(&ElementType::Selectable));
    assert!(!HintsMode::Click
      .element_types()
      .contains(&ElementType::Selectable));
  }

  #[test]
  fn many_modes() {
    assert!(HintsMode::ManyClick.is_many());
    assert!(HintsMode::ManyTab.is_many());
    assert!(!HintsMode::Click.is_many());
    assert!(!HintsMode::Select.is_many());
  }

  #[test]
  fn serializes_as_pascal_case() {
    assert_eq!(
      serde_json::to_string(&HintsMode::ManyTab).unwrap(),
      "\"ManyTab\""
    );
  }
}
