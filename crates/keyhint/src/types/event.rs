/*! Messages flowing into and out of a tab controller. */

use super::{
  ElementReport, ElementType, FrameId, HintMeasurements, KeyboardMapping, KeyboardMode, Rect,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Messages a frame sends about its elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "data")]
#[ts(export)]
pub enum FrameMessage {
  /// The frame received the scan request and is scanning.
  #[serde(rename = "frame:visible")]
  ReportVisibleFrame,

  /// The frame finished scanning.
  #[serde(rename = "frame:visible-elements", rename_all = "camelCase")]
  ReportVisibleElements {
    elements: Vec<ElementReport>,
    /// Visible child frames that were asked to scan in turn.
    num_frames: u32,
    duration_ms: f64,
  },

  /// Fresh measurements of the frame's known elements. Elements missing
  /// from the list are no longer visible.
  #[serde(rename = "frame:updated-elements")]
  ReportUpdatedElements { elements: Vec<ElementReport> },

  /// Rectangles of text matching the current filter words.
  #[serde(rename = "frame:text-rects")]
  ReportTextRects { rects: Vec<Rect> },
}

/// One hint overlay in a full render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ElementRender {
  pub hint: String,
  pub hint_measurements: HintMeasurements,
  pub highlighted: bool,
  pub frame_id: FrameId,
  /// Index into the session's element sequence. `None` for a highlight whose
  /// element is gone; it is drawn on top without an element of its own.
  pub element_index: Option<usize>,
}

/// Incremental change to one rendered hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type")]
#[ts(export)]
pub enum HintUpdate {
  /// The element no longer matches the filter text.
  Hide { index: usize, hidden: bool },
  #[serde(rename_all = "camelCase")]
  UpdateContent {
    index: usize,
    /// Position among the active hints.
    order: usize,
    matched_chars: String,
    rest_chars: String,
    highlighted: bool,
    /// The hint does not start with the entered characters.
    hidden: bool,
  },
  #[serde(rename_all = "camelCase")]
  UpdatePosition {
    index: usize,
    order: usize,
    hint: String,
    hint_measurements: HintMeasurements,
    highlighted: bool,
    hidden: bool,
  },
}

impl HintUpdate {
  pub const fn index(&self) -> usize {
    match self {
      Self::Hide { index, .. }
      | Self::UpdateContent { index, .. }
      | Self::UpdatePosition { index, .. } => *index,
    }
  }

  /// Whether the hint stays visible after this update.
  pub const fn is_visible(&self) -> bool {
    match self {
      Self::Hide { .. } => false,
      Self::UpdateContent { hidden, .. } | Self::UpdatePosition { hidden, .. } => !*hidden,
    }
  }

  pub const fn is_highlighted(&self) -> bool {
    match self {
      Self::Hide { .. } => false,
      Self::UpdateContent { highlighted, .. } | Self::UpdatePosition { highlighted, .. } => {
        *highlighted
      }
    }
  }
}

/// Outbound commands. Fire-and-forget: nothing waits for acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "command", content = "data")]
#[ts(export)]
pub enum Command {
  // Frames
  #[serde(rename = "frames:start-find-elements")]
  StartFindElements { types: Vec<ElementType> },
  #[serde(rename = "frames:update-elements")]
  UpdateElements,
  #[serde(rename = "frames:get-text-rects", rename_all = "camelCase")]
  GetTextRects {
    frame_id: FrameId,
    indexes: Vec<u32>,
    words: Vec<String>,
  },
  #[serde(rename = "frames:click-element", rename_all = "camelCase")]
  ClickElement { frame_id: FrameId, index: u32 },
  #[serde(rename = "frames:focus-element", rename_all = "camelCase")]
  FocusElement { frame_id: FrameId, index: u32 },
  #[serde(rename = "frames:select-element", rename_all = "camelCase")]
  SelectElement { frame_id: FrameId, index: u32 },
  #[serde(rename = "frames:copy-element", rename_all = "camelCase")]
  CopyElement { frame_id: FrameId, index: u32 },
  #[serde(rename = "frames:set-keyboard-mode")]
  SetKeyboardMode {
    mode: KeyboardMode,
    shortcuts: Vec<KeyboardMapping>,
  },
  #[serde(rename = "frames:clear-elements")]
  ClearElements,

  // Renderer
  #[serde(rename = "renderer:render", rename_all = "camelCase")]
  Render {
    elements: Vec<ElementRender>,
    case_sensitive: bool,
  },
  #[serde(rename = "renderer:unrender")]
  Unrender,
  #[serde(rename = "renderer:update-hints", rename_all = "camelCase")]
  UpdateHints {
    updates: Vec<HintUpdate>,
    entered_text: String,
  },
  #[serde(rename = "renderer:render-text-rects", rename_all = "camelCase")]
  RenderTextRects { rects: Vec<Rect>, frame_id: FrameId },
  #[serde(rename = "renderer:rotate-hints")]
  RotateHints { forward: bool },
  #[serde(rename = "renderer:remove-shruggie")]
  RemoveShruggie,
  #[serde(rename = "renderer:peek")]
  Peek,
  #[serde(rename = "renderer:unpeek")]
  Unpeek,

  // Browser
  #[serde(rename = "tab:open", rename_all = "camelCase")]
  OpenTab {
    url: String,
    foreground: bool,
    /// Frame and element the tab is opened from.
    frame_id: FrameId,
    index: u32,
  },
  #[serde(rename = "badge:set")]
  SetBadge { text: String },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn frame_message_wire_format() {
    let msg: FrameMessage = serde_json::from_str(
      r#"{"type":"frame:visible-elements","data":{"elements":[],"numFrames":2,"durationMs":4.5}}"#,
    )
    .unwrap();
    assert_eq!(
      msg,
      FrameMessage::ReportVisibleElements {
        elements: vec![],
        num_frames: 2,
        duration_ms: 4.5,
      }
    );

    let alive: FrameMessage = serde_json::from_str(r#"{"type":"frame:visible"}"#).unwrap();
    assert_eq!(alive, FrameMessage::ReportVisibleFrame);
  }

  #[test]
  fn command_wire_format() {
    let json = serde_json::to_value(Command::ClickElement {
      frame_id: FrameId(2),
      index: 7,
    })
    .unwrap();
    assert_eq!(json["command"], "frames:click-element");
    assert_eq!(json["data"]["frameId"], 2);
    assert_eq!(json["data"]["index"], 7);
  }

  #[test]
  fn hint_update_is_internally_tagged() {
    let json = serde_json::to_value(HintUpdate::UpdateContent {
      index: 1,
      order: 0,
      matched_chars: "f".into(),
      rest_chars: "j".into(),
      highlighted: true,
      hidden: false,
    })
    .unwrap();
    assert_eq!(json["type"], "UpdateContent");
    assert_eq!(json["matchedChars"], "f");
    assert_eq!(json["restChars"], "j");
  }

  #[test]
  fn hide_is_never_visible() {
    let hide = HintUpdate::Hide {
      index: 0,
      hidden: true,
    };
    assert!(!hide.is_visible());
    assert!(!hide.is_highlighted());
    assert_eq!(hide.index(), 0);
  }
}
