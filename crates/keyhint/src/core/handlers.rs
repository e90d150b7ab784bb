/*!
Messages from frames.

Scan confirmations and reports feed the collection coordinator; once it is
satisfied the session switches to hinting. While hinting, frames answer
refresh requests with fresh measurements and text-rect requests with
rectangles.
*/

use std::collections::HashMap;
use std::mem;
use std::time::Instant;

use super::{HintingState, HintsState, TabController, UpdateState};
use crate::hints::{element_renders, update_hints, MatchPolicy, UpdateInput};
use crate::types::{
  Command, ElementReport, ElementWithHint, FrameId, FrameMessage, FrameStats, Rect,
};

impl TabController {
  /// Handle a message from `frame_id`.
  pub fn on_frame_message(&mut self, frame_id: FrameId, message: FrameMessage, now: Instant) {
    match message {
      FrameMessage::ReportVisibleFrame => self.on_frame_alive(frame_id, now),
      FrameMessage::ReportVisibleElements {
        elements,
        num_frames,
        duration_ms,
      } => self.on_visible_elements(frame_id, elements, num_frames, duration_ms, now),
      FrameMessage::ReportUpdatedElements { elements } => {
        self.on_updated_elements(frame_id, elements, now);
      }
      FrameMessage::ReportTextRects { rects } => self.on_text_rects(frame_id, rects),
    }
  }

  fn on_frame_alive(&mut self, frame_id: FrameId, now: Instant) {
    let HintsState::Collecting(collecting) = &mut self.state else {
      log::debug!("Frame {frame_id} is scanning, but we are not collecting");
      return;
    };
    collecting.pending.frame_alive(frame_id);
    self.maybe_start_hinting(now);
  }

  fn on_visible_elements(
    &mut self,
    frame_id: FrameId,
    elements: Vec<ElementReport>,
    num_frames: u32,
    duration_ms: f64,
    now: Instant,
  ) {
    let HintsState::Collecting(collecting) = &mut self.state else {
      log::debug!("Dropping {} elements from frame {frame_id}: not collecting", elements.len());
      return;
    };
    let num_elements = elements.len();
    if collecting
      .pending
      .frame_reported(frame_id, elements, num_frames, now)
    {
      collecting.stats.push(FrameStats {
        frame_id,
        num_elements,
        num_frames,
        duration_ms,
      });
    }
    self.maybe_start_hinting(now);
  }

  /// Start hinting if collection is complete, else wait for the next
  /// message or the frame timeout.
  pub(super) fn maybe_start_hinting(&mut self, now: Instant) {
    let HintsState::Collecting(collecting) = &self.state else {
      return;
    };
    let timeout = self.timings.frame_report_timeout;
    if collecting.pending.is_ready(now, timeout) {
      self.timers.collect = None;
      self.start_hinting(now);
    } else {
      self.timers.collect = collecting.pending.wait_deadline(timeout);
    }
  }

  fn start_hinting(&mut self, now: Instant) {
    let collecting = match mem::take(&mut self.state) {
      HintsState::Collecting(collecting) => collecting,
      other => {
        self.state = other;
        return;
      }
    };
    let mode = collecting.mode;
    let mut time = collecting.time;
    time.start("assign", now);

    let elements: Vec<ElementWithHint> = collecting
      .pending
      .into_elements()
      .into_iter()
      .filter(|element| mode.is_eligible(&element.report))
      .enumerate()
      .map(|(stable_index, element)| ElementWithHint::unassigned(element, stable_index))
      .collect();

    let result = update_hints(&UpdateInput {
      mode,
      entered_chars: "",
      entered_text: "",
      elements: &elements,
      highlighted: &collecting.highlighted,
      alphabet: &self.alphabet,
      auto_activate: self.options.auto_activate,
      match_policy: MatchPolicy::Never,
      update_positions: false,
    });
    let renders = element_renders(&result, &collecting.highlighted);
    time.start("render", now);

    log::debug!(
      "Hinting {mode:?}: {} of {} elements from {} frames",
      result.elements_with_hints.len(),
      result.all_elements.len(),
      collecting.stats.len(),
    );

    let num_candidates = result.num_candidates();
    self.state = HintsState::Hinting(HintingState {
      mode,
      started: collecting.started,
      time,
      stats: collecting.stats,
      entered_chars: String::new(),
      entered_text: String::new(),
      elements: result.all_elements,
      highlighted: collecting.highlighted,
      update_state: UpdateState::WaitingForTimeout { since: now },
      peeking: false,
    });

    self.emit(Command::Render {
      elements: renders,
      case_sensitive: self.alphabet.is_case_sensitive(),
    });
    self.timers.badge = None;
    self.timers.refresh = Some(now + self.timings.refresh_period());
    self.set_badge(num_candidates.to_string());
    self.schedule_unhighlight();
  }

  /// Fresh measurements from one frame. Its elements missing from the
  /// report are hidden.
  fn on_updated_elements(&mut self, frame_id: FrameId, reports: Vec<ElementReport>, now: Instant) {
    let HintsState::Hinting(hinting) = &mut self.state else {
      log::debug!("Dropping element update from frame {frame_id}: not hinting");
      return;
    };

    let mut by_index: HashMap<u32, ElementReport> =
      reports.into_iter().map(|report| (report.index, report)).collect();
    for element in hinting
      .elements
      .iter_mut()
      .filter(|element| element.frame_id() == frame_id)
    {
      match by_index.remove(&element.report().index) {
        Some(report) => {
          element.element.report = report;
          element.element.hidden = false;
        }
        None => element.element.hidden = true,
      }
    }

    let reschedule = match hinting.update_state {
      UpdateState::WaitingForResponse { since } => {
        hinting.update_state = UpdateState::WaitingForTimeout { since: now };
        Some(since)
      }
      UpdateState::WaitingForTimeout { .. } => None,
    };

    if let Some(result) = self.run_update(MatchPolicy::Never, true) {
      self.apply_update(result);
    }

    if let Some(since) = reschedule {
      let next = (since + self.timings.update_interval).max(now + self.timings.update_min_timeout);
      self.timers.refresh = Some(next);
    }
  }

  fn on_text_rects(&self, frame_id: FrameId, rects: Vec<Rect>) {
    if !matches!(self.state, HintsState::Hinting(_)) {
      log::debug!("Dropping text rects from frame {frame_id}: not hinting");
      return;
    }
    self.emit(Command::RenderTextRects { rects, frame_id });
  }
}
