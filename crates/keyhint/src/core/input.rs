/*!
Keyboard input: entering and leaving hints mode, typing, shortcuts.

A printable key in the hint alphabet extends the entered hint characters.
Any other key extends the filter text, which reassigns hints and so clears
the entered characters.
*/

use std::collections::BTreeMap;
use std::time::Instant;

use super::{CollectingState, HintsState, TabController, BADGE_BUSY};
use crate::collect::PendingElements;
use crate::hints::{element_renders, update_hints, MatchPolicy, UpdateInput, UpdateResult};
use crate::types::{
  Command, FrameId, HintsMode, KeyboardAction, KeyboardMode, Keypress, TimeTracker,
};

impl TabController {
  /// Start (or restart) collecting elements for `mode`.
  pub fn enter_hints_mode(&mut self, mode: HintsMode, now: Instant) {
    let refreshing = !matches!(self.state, HintsState::Idle { .. });
    if let HintsState::Hinting(hinting) = &self.state {
      if hinting.elements.is_empty() {
        self.emit(Command::RemoveShruggie);
      }
    }

    let highlighted = self.state.take_highlighted();
    let mut time = TimeTracker::new();
    time.start("collect", now);
    self.state = HintsState::Collecting(CollectingState {
      mode,
      pending: PendingElements::new(now),
      started: now,
      time,
      stats: Vec::new(),
      refreshing,
      highlighted,
    });

    self.emit(Command::StartFindElements {
      types: mode.element_types().to_vec(),
    });
    if self.keyboard_mode != KeyboardMode::Hints {
      self.set_keyboard_mode(KeyboardMode::Hints);
    }

    self.timers.refresh = None;
    self.timers.collect = Some(now + self.timings.frame_report_timeout);
    if refreshing {
      self.timers.badge = None;
      self.set_badge(BADGE_BUSY.to_string());
    } else {
      self.timers.badge = Some(now + self.timings.badge_collecting_delay);
    }
  }

  /// Leave hints mode. Highlights survive until they expire.
  pub fn exit_hints_mode(&mut self) {
    let highlighted = self.state.take_highlighted();
    self.state = HintsState::Idle { highlighted };
    self.timers.badge = None;
    self.timers.collect = None;
    self.timers.refresh = None;

    self.emit(Command::Unrender);
    self.emit(Command::ClearElements);
    self.set_keyboard_mode(KeyboardMode::Normal);
    self.set_badge(String::new());
    self.schedule_unhighlight();
  }

  /// A printable key while hinting.
  pub fn on_keypress(&mut self, keypress: &Keypress, now: Instant) {
    let key = keypress.key.as_str();
    let HintsState::Hinting(hinting) = &mut self.state else {
      log::debug!("Ignoring keypress {key:?} outside hinting");
      return;
    };
    if key.is_empty() {
      return;
    }

    if self.alphabet.contains_key(key) {
      hinting.entered_chars.push_str(key);
    } else if key.chars().all(char::is_whitespace) {
      // Only single spaces between words.
      if hinting.entered_text.is_empty() || hinting.entered_text.ends_with(' ') {
        return;
      }
      hinting.entered_text.push(' ');
      hinting.entered_chars.clear();
    } else {
      hinting.entered_text.push_str(key);
      hinting.entered_chars.clear();
    }

    self.update_hinting(MatchPolicy::Normal, false, now);
  }

  /// A named shortcut.
  pub fn on_keyboard_action(&mut self, action: KeyboardAction, now: Instant) {
    match action {
      KeyboardAction::EnterHintsMode(mode) => {
        self.enter_hints_mode(mode, now);
        return;
      }
      KeyboardAction::ExitHintsMode | KeyboardAction::Escape => {
        self.exit_hints_mode();
        return;
      }
      KeyboardAction::RotateHintsForward
      | KeyboardAction::RotateHintsBackward
      | KeyboardAction::RefreshHints
      | KeyboardAction::TogglePeek
      | KeyboardAction::ActivateHint
      | KeyboardAction::ActivateHintAlt
      | KeyboardAction::Backspace => {}
    }

    let HintsState::Hinting(hinting) = &mut self.state else {
      log::debug!("Ignoring {action:?} outside hinting");
      return;
    };

    match action {
      KeyboardAction::RotateHintsForward => self.emit(Command::RotateHints { forward: true }),
      KeyboardAction::RotateHintsBackward => self.emit(Command::RotateHints { forward: false }),
      KeyboardAction::TogglePeek => {
        hinting.peeking = !hinting.peeking;
        let command = if hinting.peeking {
          Command::Peek
        } else {
          Command::Unpeek
        };
        self.emit(command);
      }
      KeyboardAction::RefreshHints => {
        let mode = hinting.mode;
        self.enter_hints_mode(mode, now);
      }
      KeyboardAction::ActivateHint => self.update_hinting(MatchPolicy::Highlighted, false, now),
      KeyboardAction::ActivateHintAlt => self.update_hinting(MatchPolicy::Highlighted, true, now),
      KeyboardAction::Backspace => {
        if hinting.entered_chars.pop().is_none() {
          hinting.entered_text.pop();
        }
        self.update_hinting(MatchPolicy::Never, false, now);
      }
      KeyboardAction::EnterHintsMode(_) | KeyboardAction::ExitHintsMode | KeyboardAction::Escape => {}
    }
  }

  /// Run the update engine over the current hinting session.
  pub(super) fn run_update(&self, policy: MatchPolicy, update_positions: bool) -> Option<UpdateResult> {
    let HintsState::Hinting(hinting) = &self.state else {
      return None;
    };
    Some(update_hints(&UpdateInput {
      mode: hinting.mode,
      entered_chars: &hinting.entered_chars,
      entered_text: &hinting.entered_text,
      elements: &hinting.elements,
      highlighted: &hinting.highlighted,
      alphabet: &self.alphabet,
      auto_activate: self.options.auto_activate,
      match_policy: policy,
      update_positions,
    }))
  }

  /// Store an update result and send it to the renderer.
  pub(super) fn apply_update(&mut self, result: UpdateResult) {
    let HintsState::Hinting(hinting) = &mut self.state else {
      return;
    };
    hinting.elements.clone_from(&result.all_elements);
    let entered_text = hinting.entered_text.clone();

    self.request_text_rects(&result);
    self.set_badge(result.num_candidates().to_string());
    self.emit(Command::UpdateHints {
      updates: result.updates,
      entered_text,
    });
  }

  /// Recompute after input; activate on a match.
  pub(super) fn update_hinting(&mut self, policy: MatchPolicy, alt: bool, now: Instant) {
    let Some(mut result) = self.run_update(policy, false) else {
      return;
    };
    match result.matched.take() {
      Some(matched) => self.activate(result, matched, alt, now),
      None => self.apply_update(result),
    }
  }

  /// Full render of the current session, followed by its state.
  pub(super) fn rerender(&mut self) {
    let Some(result) = self.run_update(MatchPolicy::Never, false) else {
      return;
    };
    let renders = element_renders(&result, self.state.highlighted());
    self.emit(Command::Render {
      elements: renders,
      case_sensitive: self.alphabet.is_case_sensitive(),
    });
    self.apply_update(result);
  }

  /// Ask frames where the filter words are, for visible elements only.
  fn request_text_rects(&self, result: &UpdateResult) {
    if result.words.is_empty() {
      return;
    }
    let mut by_frame: BTreeMap<FrameId, Vec<u32>> = BTreeMap::new();
    for (update, element) in result.updates.iter().zip(&result.all_elements) {
      if update.is_visible() {
        by_frame
          .entry(element.frame_id())
          .or_default()
          .push(element.report().index);
      }
    }
    for (frame_id, indexes) in by_frame {
      self.emit(Command::GetTextRects {
        frame_id,
        indexes,
        words: result.words.clone(),
      });
    }
  }
}
