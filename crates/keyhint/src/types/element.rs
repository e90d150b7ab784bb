/*! Element reports, from a single frame's scan up to a hinted element. */

use std::time::Instant;

use super::{FrameId, HintMeasurements};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Category of a discovered element. Decides which modes may hint it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum ElementType {
  Clickable,
  /// Clickable only because of a script-attached listener.
  ClickableEvent,
  Label,
  Link,
  Scrollable,
  Selectable,
  Textarea,
  Title,
}

/// One element as discovered and measured by one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ElementReport {
  #[serde(rename = "type")]
  pub element_type: ElementType,
  /// Index of the element within its frame.
  pub index: u32,
  pub hint_measurements: HintMeasurements,
  pub url: Option<String>,
  /// `url` plus the link target, so `_blank` and same-tab links differ.
  pub url_with_target: Option<String>,
  pub text: String,
  /// Whether `text` is the element's own content rather than derived
  /// (e.g. from a title or label).
  pub text_content: bool,
  pub text_weight: f64,
  pub is_text_input: bool,
  pub has_click_listener: bool,
}

impl ElementReport {
  /// Whether `url` (or, lacking it, `url_with_target`) carries a fragment.
  pub fn has_fragment(&self) -> bool {
    self
      .url
      .as_deref()
      .or(self.url_with_target.as_deref())
      .is_some_and(|url| url.contains('#'))
  }

  /// Whether the element text contains every word, case-insensitively.
  ///
  /// `words` must already be lowercase.
  pub fn matches_words(&self, words: &[String]) -> bool {
    if words.is_empty() {
      return true;
    }
    let text = self.text.to_lowercase();
    words.iter().all(|word| text.contains(word.as_str()))
  }
}

/// An element report tagged with the frame it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExtendedElementReport {
  #[serde(flatten)]
  pub report: ElementReport,
  pub frame_id: FrameId,
  /// Set when the element disappeared or moved off-screen since it was reported.
  pub hidden: bool,
}

impl ExtendedElementReport {
  pub const fn new(report: ElementReport, frame_id: FrameId) -> Self {
    Self {
      report,
      frame_id,
      hidden: false,
    }
  }
}

/// An element with its assigned hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ElementWithHint {
  #[serde(flatten)]
  pub element: ExtendedElementReport,
  /// Weight the hint coder saw for this element.
  pub weight: f64,
  pub hint: String,
  /// Position in the merged element sequence of the current hinting session.
  pub stable_index: usize,
}

impl ElementWithHint {
  /// Wrap an element that has not been coded yet.
  pub const fn unassigned(element: ExtendedElementReport, stable_index: usize) -> Self {
    Self {
      element,
      weight: 0.0,
      hint: String::new(),
      stable_index,
    }
  }

  pub const fn report(&self) -> &ElementReport {
    &self.element.report
  }

  pub const fn frame_id(&self) -> FrameId {
    self.element.frame_id
  }

  pub const fn is_hidden(&self) -> bool {
    self.element.hidden
  }

  pub fn highlight_key(&self) -> String {
    self
      .element
      .report
      .hint_measurements
      .highlight_key(&self.hint)
  }
}

/// A hint that was just matched and stays highlighted for a while.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedItem {
  pub since: Instant,
  pub element: ElementWithHint,
}

impl HighlightedItem {
  pub const fn new(since: Instant, element: ElementWithHint) -> Self {
    Self { since, element }
  }

  pub fn key(&self) -> String {
    self.element.highlight_key()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Align;

  fn report(text: &str, url: Option<&str>) -> ElementReport {
    ElementReport {
      element_type: ElementType::Link,
      index: 0,
      hint_measurements: HintMeasurements {
        x: 0.0,
        y: 0.0,
        align: Align::Left,
        max_x: 0.0,
        weight: 1.0,
      },
      url: url.map(String::from),
      url_with_target: url.map(String::from),
      text: text.to_string(),
      text_content: true,
      text_weight: 1.0,
      is_text_input: false,
      has_click_listener: false,
    }
  }

  fn words(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_lowercase).collect()
  }

  #[test]
  fn every_word_must_match() {
    let r = report("Download the Release Notes", None);
    assert!(r.matches_words(&words("release")));
    assert!(r.matches_words(&words("notes down")));
    assert!(!r.matches_words(&words("release blog")));
  }

  #[test]
  fn no_words_match_everything() {
    assert!(report("", None).matches_words(&[]));
  }

  #[test]
  fn fragment_detection() {
    assert!(report("", Some("https://x/#frag")).has_fragment());
    assert!(!report("", Some("https://x/")).has_fragment());
    assert!(!report("", None).has_fragment());
  }

  #[test]
  fn report_uses_camel_case_wire_names() {
    let json = serde_json::to_value(report("a", Some("https://x/"))).unwrap();
    assert_eq!(json["type"], "link");
    assert!(json.get("hintMeasurements").is_some());
    assert!(json.get("hasClickListener").is_some());
  }

  #[test]
  fn extended_report_flattens_inner_report() {
    let ext = ExtendedElementReport::new(report("a", None), FrameId(3));
    let json = serde_json::to_value(&ext).unwrap();
    assert_eq!(json["frameId"], 3);
    assert_eq!(json["text"], "a");
    assert_eq!(json["hidden"], false);
  }
}
