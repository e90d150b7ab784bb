/*! Performance bookkeeping for one hinting session. */

use std::time::{Duration, Instant};

use super::FrameId;

/// Labelled, consecutive durations. Starting a new label stops the previous one.
#[derive(Debug, Clone, Default)]
pub struct TimeTracker {
  finished: Vec<(&'static str, Duration)>,
  current: Option<(&'static str, Instant)>,
}

impl TimeTracker {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn start(&mut self, label: &'static str, now: Instant) {
    self.stop(now);
    self.current = Some((label, now));
  }

  pub fn stop(&mut self, now: Instant) {
    if let Some((label, started)) = self.current.take() {
      self
        .finished
        .push((label, now.saturating_duration_since(started)));
    }
  }

  pub fn export(&self) -> &[(&'static str, Duration)] {
    &self.finished
  }

  /// Human-readable summary, e.g. `collect=12ms assign=1ms`.
  pub fn summary(&self) -> String {
    self
      .finished
      .iter()
      .map(|(label, d)| format!("{label}={}ms", d.as_millis()))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// What one frame reported during collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
  pub frame_id: FrameId,
  pub num_elements: usize,
  pub num_frames: u32,
  pub duration_ms: f64,
}
