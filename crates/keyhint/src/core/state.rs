/*!
Hints state of one tab.

Exactly one of Idle, Collecting or Hinting. Fields only exist in the phase
where they mean something; highlights are carried across all three.
*/

use std::mem;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::collect::PendingElements;
use crate::types::{ElementWithHint, FrameStats, HighlightedItem, HintsMode, KeyboardMode, TimeTracker};

/// Refresh cycle while hinting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
  /// Idle until the next refresh tick. `since` is when the cycle started.
  WaitingForTimeout { since: Instant },
  /// Asked frames to re-measure; waiting for their answers.
  WaitingForResponse { since: Instant },
}

impl UpdateState {
  /// When the current refresh cycle started.
  pub const fn since(self) -> Instant {
    match self {
      Self::WaitingForTimeout { since } | Self::WaitingForResponse { since } => since,
    }
  }
}

/// Waiting for frames to report their elements.
#[derive(Debug, Clone)]
pub struct CollectingState {
  /// Mode being entered.
  pub mode: HintsMode,
  /// Reports and frame accounting so far.
  pub pending: PendingElements,
  /// When the shortcut was pressed.
  pub started: Instant,
  /// Phase timings for the debug log.
  pub time: TimeTracker,
  /// Per-frame report stats.
  pub stats: Vec<FrameStats>,
  /// Entered from Collecting or Hinting rather than Idle.
  pub refreshing: bool,
  /// Highlights carried over from the previous state.
  pub highlighted: Vec<HighlightedItem>,
}

/// Hints are shown and input is matched against them.
#[derive(Debug, Clone)]
pub struct HintingState {
  /// Active mode.
  pub mode: HintsMode,
  /// When collection for this session started.
  pub started: Instant,
  /// Phase timings for the debug log.
  pub time: TimeTracker,
  /// Per-frame report stats from collection.
  pub stats: Vec<FrameStats>,
  /// Typed hint characters.
  pub entered_chars: String,
  /// Typed filter text.
  pub entered_text: String,
  /// Every element of the session, ordered by stable index.
  pub elements: Vec<ElementWithHint>,
  /// Matched elements still highlighted.
  pub highlighted: Vec<HighlightedItem>,
  /// Where the refresh cycle is.
  pub update_state: UpdateState,
  /// Hints are temporarily hidden.
  pub peeking: bool,
}

impl HintingState {
  /// Whether there are elements and none of them is visible.
  pub fn all_hidden(&self) -> bool {
    !self.elements.is_empty() && self.elements.iter().all(ElementWithHint::is_hidden)
  }
}

/// Hints state of one tab.
#[derive(Debug, Clone)]
pub enum HintsState {
  /// No hints shown; highlights may still be fading out.
  Idle { highlighted: Vec<HighlightedItem> },
  /// Waiting for frames to report.
  Collecting(CollectingState),
  /// Hints shown, taking input.
  Hinting(HintingState),
}

impl Default for HintsState {
  fn default() -> Self {
    Self::Idle {
      highlighted: Vec::new(),
    }
  }
}

impl HintsState {
  /// Which state this is.
  pub const fn phase(&self) -> Phase {
    match self {
      Self::Idle { .. } => Phase::Idle,
      Self::Collecting(_) => Phase::Collecting,
      Self::Hinting(_) => Phase::Hinting,
    }
  }

  /// Mode of the session, if any.
  pub const fn mode(&self) -> Option<HintsMode> {
    match self {
      Self::Idle { .. } => None,
      Self::Collecting(c) => Some(c.mode),
      Self::Hinting(h) => Some(h.mode),
    }
  }

  /// Matched elements still highlighted.
  pub fn highlighted(&self) -> &[HighlightedItem] {
    match self {
      Self::Idle { highlighted } => highlighted,
      Self::Collecting(c) => &c.highlighted,
      Self::Hinting(h) => &h.highlighted,
    }
  }

  /// Mutable access to the highlights, whatever the state.
  pub fn highlighted_mut(&mut self) -> &mut Vec<HighlightedItem> {
    match self {
      Self::Idle { highlighted } => highlighted,
      Self::Collecting(c) => &mut c.highlighted,
      Self::Hinting(h) => &mut h.highlighted,
    }
  }

  /// Move the highlights out, leaving none.
  pub fn take_highlighted(&mut self) -> Vec<HighlightedItem> {
    mem::take(self.highlighted_mut())
  }
}

/// Which of the three states a tab is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Phase {
  /// No hints shown.
  Idle,
  /// Waiting for frames to report.
  Collecting,
  /// Hints shown, taking input.
  Hinting,
}

/// Read-only view of a tab, for debugging and the `state` RPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TabSnapshot {
  /// Current state.
  pub phase: Phase,
  /// Mode of the session, if any.
  pub mode: Option<HintsMode>,
  /// Typed hint characters.
  pub entered_chars: String,
  /// Typed filter text.
  pub entered_text: String,
  /// Elements in the session, hidden ones included.
  pub num_elements: usize,
  /// Highlighted items still showing.
  pub num_highlighted: usize,
  /// Keyboard capture mode.
  pub keyboard_mode: KeyboardMode,
  /// Hints are temporarily hidden.
  pub peeking: bool,
}

impl TabSnapshot {
  pub(crate) fn new(state: &HintsState, keyboard_mode: KeyboardMode) -> Self {
    let (entered_chars, entered_text, num_elements, peeking) = match state {
      HintsState::Hinting(h) => (
        h.entered_chars.clone(),
        h.entered_text.clone(),
        h.elements.len(),
        h.peeking,
      ),
      HintsState::Collecting(c) => (String::new(), String::new(), c.pending.elements().len(), false),
      HintsState::Idle { .. } => (String::new(), String::new(), 0, false),
    };
    Self {
      phase: state.phase(),
      mode: state.mode(),
      entered_chars,
      entered_text,
      num_elements,
      num_highlighted: state.highlighted().len(),
      keyboard_mode,
      peeking,
    }
  }
}
