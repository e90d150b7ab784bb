/*!
Multi-frame element collection.

Collecting starts by asking the top frame to scan. Every frame that scans
reports how many child frames it asked to scan in turn, so the set of frames
to wait for grows as reports arrive.

Two counts drive completion:

- `answering`: frames asked to scan that have not confirmed yet
- `collecting`: frames that confirmed and are still scanning

A confirmed frame is always waited for. An unconfirmed one is only waited
for until `frame_report_timeout` after the last frame announced children,
so a hung iframe cannot block hinting.

Accounting is per frame id and idempotent: duplicate or late messages
never move the counts twice, and counts never go below zero.
*/

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::types::{ElementReport, ExtendedElementReport, FrameId};

/// Frame bookkeeping for one collection cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFrames {
  answering: u32,
  collecting: u32,
  last_start_wait: Instant,
  alive: HashSet<FrameId>,
  finished: HashSet<FrameId>,
}

impl PendingFrames {
  /// Waiting for the top frame only.
  pub fn new(now: Instant) -> Self {
    Self {
      answering: 1,
      collecting: 0,
      last_start_wait: now,
      alive: HashSet::new(),
      finished: HashSet::new(),
    }
  }

  /// Frames asked to scan that have not confirmed yet.
  pub const fn answering(&self) -> u32 {
    self.answering
  }

  /// Frames that confirmed and are still scanning.
  pub const fn collecting(&self) -> u32 {
    self.collecting
  }

  /// When the last frame announced children.
  pub const fn last_start_wait(&self) -> Instant {
    self.last_start_wait
  }

  /// A frame confirmed it is scanning. Returns false if already counted.
  pub fn frame_alive(&mut self, frame_id: FrameId) -> bool {
    if self.finished.contains(&frame_id) || !self.alive.insert(frame_id) {
      log::trace!("Ignoring repeated alive message from frame {frame_id}");
      return false;
    }
    self.answering = self.answering.saturating_sub(1);
    self.collecting = self.collecting.saturating_add(1);
    true
  }

  /// A frame finished scanning and asked `num_frames` children to scan.
  /// Returns false for a repeated report.
  pub fn frame_finished(&mut self, frame_id: FrameId, num_frames: u32, now: Instant) -> bool {
    if !self.finished.insert(frame_id) {
      log::trace!("Ignoring repeated report from frame {frame_id}");
      return false;
    }
    if self.alive.remove(&frame_id) {
      self.collecting = self.collecting.saturating_sub(1);
    } else {
      self.answering = self.answering.saturating_sub(1);
    }
    self.answering = self.answering.saturating_add(num_frames);
    if num_frames > 0 {
      self.last_start_wait = now;
    }
    true
  }

  /// Whether collection is complete at `now`.
  pub fn is_ready(&self, now: Instant, timeout: Duration) -> bool {
    self.collecting == 0
      && (self.answering == 0 || now.saturating_duration_since(self.last_start_wait) >= timeout)
  }

  /// When a timed-out wait would complete collection, if that is what is
  /// holding it up.
  pub fn wait_deadline(&self, timeout: Duration) -> Option<Instant> {
    (self.collecting == 0 && self.answering > 0).then(|| self.last_start_wait + timeout)
  }
}

/// Reports received during one collection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingElements {
  elements: Vec<ExtendedElementReport>,
  frames: PendingFrames,
}

impl PendingElements {
  /// Empty, waiting for the top frame.
  pub fn new(now: Instant) -> Self {
    Self {
      elements: Vec::new(),
      frames: PendingFrames::new(now),
    }
  }

  /// Frame bookkeeping.
  pub const fn frames(&self) -> &PendingFrames {
    &self.frames
  }

  /// Reports received so far, in arrival order.
  pub fn elements(&self) -> &[ExtendedElementReport] {
    &self.elements
  }

  /// Consume into the received reports.
  pub fn into_elements(self) -> Vec<ExtendedElementReport> {
    self.elements
  }

  /// A frame confirmed it is scanning. Returns false if already counted.
  pub fn frame_alive(&mut self, frame_id: FrameId) -> bool {
    self.frames.frame_alive(frame_id)
  }

  /// Record a frame's report. Elements of a repeated report are dropped.
  pub fn frame_reported(
    &mut self,
    frame_id: FrameId,
    elements: Vec<ElementReport>,
    num_frames: u32,
    now: Instant,
  ) -> bool {
    if !self.frames.frame_finished(frame_id, num_frames, now) {
      return false;
    }
    self.elements.extend(
      elements
        .into_iter()
        .map(|report| ExtendedElementReport::new(report, frame_id)),
    );
    true
  }

  /// Whether collection is complete at `now`.
  pub fn is_ready(&self, now: Instant, timeout: Duration) -> bool {
    self.frames.is_ready(now, timeout)
  }

  /// See [`PendingFrames::wait_deadline`].
  pub fn wait_deadline(&self, timeout: Duration) -> Option<Instant> {
    self.frames.wait_deadline(timeout)
  }
}
