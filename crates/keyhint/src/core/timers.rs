/*!
Deadlines owned by the controller.

Each timer is an optional deadline. Firing a timer re-checks that the state
it was set for is still current; a timer that outlived its purpose does
nothing.
*/

use std::time::Instant;

use super::{HintsState, TabController, UpdateState, BADGE_BUSY};
use crate::types::{Command, KeyboardMode};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Timers {
  /// Show the busy badge while collecting.
  pub(crate) badge: Option<Instant>,
  /// Re-check collection completion once unconfirmed frames time out.
  pub(crate) collect: Option<Instant>,
  /// Next element refresh while hinting.
  pub(crate) refresh: Option<Instant>,
  /// Earliest highlight expiry.
  pub(crate) unhighlight: Option<Instant>,
  /// End of over-typing prevention.
  pub(crate) over_typing: Option<Instant>,
}

impl Timers {
  pub(crate) fn clear(&mut self) {
    *self = Self::default();
  }

  pub(crate) fn next(&self) -> Option<Instant> {
    [
      self.badge,
      self.collect,
      self.refresh,
      self.unhighlight,
      self.over_typing,
    ]
    .into_iter()
    .flatten()
    .min()
  }
}

/// Clear `slot` and return true if its deadline has passed.
fn take_due(slot: &mut Option<Instant>, now: Instant) -> bool {
  if slot.is_some_and(|deadline| deadline <= now) {
    *slot = None;
    true
  } else {
    false
  }
}

impl TabController {
  /// Earliest pending deadline, if any.
  pub fn next_deadline(&self) -> Option<Instant> {
    self.timers.next()
  }

  /// Fire every timer due at `now`.
  pub fn on_tick(&mut self, now: Instant) {
    if take_due(&mut self.timers.badge, now) {
      self.on_badge_timer();
    }
    if take_due(&mut self.timers.collect, now) {
      self.maybe_start_hinting(now);
    }
    if take_due(&mut self.timers.refresh, now) {
      self.on_refresh_timer(now);
    }
    if take_due(&mut self.timers.unhighlight, now) {
      self.on_unhighlight_timer(now);
    }
    if take_due(&mut self.timers.over_typing, now) {
      self.on_over_typing_timer();
    }
  }

  fn on_badge_timer(&mut self) {
    if matches!(self.state, HintsState::Collecting(_)) {
      self.set_badge(BADGE_BUSY.to_string());
    }
  }

  fn on_refresh_timer(&mut self, now: Instant) {
    let HintsState::Hinting(hinting) = &mut self.state else {
      return;
    };

    if hinting.all_hidden() {
      log::debug!("Every element is hidden, collecting again");
      let mode = hinting.mode;
      self.enter_hints_mode(mode, now);
      return;
    }

    let ask = match hinting.update_state {
      UpdateState::WaitingForTimeout { .. } => {
        hinting.update_state = UpdateState::WaitingForResponse { since: now };
        true
      }
      UpdateState::WaitingForResponse { since } => {
        log::debug!(
          "No element update after {:?}, trying again next tick",
          now.saturating_duration_since(since)
        );
        hinting.update_state = UpdateState::WaitingForTimeout { since: now };
        false
      }
    };

    if ask {
      self.emit(Command::UpdateElements);
    }
    self.timers.refresh = Some(now + self.timings.refresh_period());
  }

  /// Earliest expiry among the current highlights.
  pub(super) fn schedule_unhighlight(&mut self) {
    let duration = self.timings.match_highlight_duration;
    self.timers.unhighlight = self
      .state
      .highlighted()
      .iter()
      .map(|item| item.since + duration)
      .min();
  }

  fn on_unhighlight_timer(&mut self, now: Instant) {
    let duration = self.timings.match_highlight_duration;
    let highlighted = self.state.highlighted_mut();
    let before = highlighted.len();
    highlighted.retain(|item| now.saturating_duration_since(item.since) < duration);
    let expired = highlighted.len() < before;
    let empty = highlighted.is_empty();

    if expired {
      match self.state {
        HintsState::Idle { .. } | HintsState::Collecting(_) => {
          if empty {
            self.emit(Command::Unrender);
          }
        }
        HintsState::Hinting(_) => self.rerender(),
      }
    }
    self.schedule_unhighlight();
  }

  fn on_over_typing_timer(&mut self) {
    if self.keyboard_mode == KeyboardMode::PreventOverTyping {
      self.set_keyboard_mode(KeyboardMode::Normal);
    }
  }
}
