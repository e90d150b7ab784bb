/*!
What a matched hint does, per mode.
*/

use std::time::Instant;

use super::{HintsState, TabController};
use crate::hints::{HintMatch, MatchPolicy, UpdateResult};
use crate::types::{
  Command, ElementWithHint, HighlightedItem, HintUpdate, HintsError, HintsMode, KeyboardMode,
};

/// Updates that hide everything except the matched hint, highlighted.
fn matched_only(result: &UpdateResult, hint: &str) -> Vec<HintUpdate> {
  result
    .updates
    .iter()
    .zip(&result.all_elements)
    .map(|(update, element)| match update {
      HintUpdate::UpdateContent { index, order, .. } | HintUpdate::UpdatePosition { index, order, .. }
        if update.is_visible() && element.hint == hint =>
      {
        HintUpdate::UpdateContent {
          index: *index,
          order: *order,
          matched_chars: element.hint.clone(),
          rest_chars: String::new(),
          highlighted: true,
          hidden: false,
        }
      }
      HintUpdate::Hide { .. } | HintUpdate::UpdateContent { .. } | HintUpdate::UpdatePosition { .. } => {
        HintUpdate::Hide {
          index: update.index(),
          hidden: true,
        }
      }
    })
    .collect()
}

/// Visible elements sharing the matched hint.
fn matched_elements<'r>(result: &'r UpdateResult, hint: &'r str) -> impl Iterator<Item = &'r ElementWithHint> {
  result
    .updates
    .iter()
    .zip(&result.all_elements)
    .filter(move |(update, element)| update.is_visible() && element.hint == hint)
    .map(|(_, element)| element)
}

impl TabController {
  /// Perform the action of `mode` on a matched hint.
  pub(super) fn activate(&mut self, result: UpdateResult, matched: HintMatch, alt: bool, now: Instant) {
    let Some(mode) = self.state.mode() else {
      return;
    };
    let element = &matched.element;
    let frame_id = element.frame_id();
    let index = element.report().index;
    log::debug!(
      "Activating {:?} in frame {frame_id} ({mode:?}{}{})",
      element.hint,
      if alt { ", alt" } else { "" },
      if matched.auto_activated { ", auto" } else { "" },
    );

    match mode {
      HintsMode::Click | HintsMode::ManyClick if element.report().is_text_input => {
        self.emit(Command::FocusElement { frame_id, index });
        self.finish_activation(&result, &matched, now);
      }
      HintsMode::Click => {
        self.emit(Command::ClickElement { frame_id, index });
        self.finish_activation(&result, &matched, now);
      }
      HintsMode::ManyClick => {
        self.emit(Command::ClickElement { frame_id, index });
        self.show_match(&result, &matched, now);
        self.enter_hints_mode(mode, now);
      }
      HintsMode::Select => {
        let command = if alt {
          Command::CopyElement { frame_id, index }
        } else {
          Command::SelectElement { frame_id, index }
        };
        self.emit(command);
        self.finish_activation(&result, &matched, now);
      }
      HintsMode::BackgroundTab | HintsMode::ForegroundTab => {
        let Some(url) = element.report().url.clone() else {
          self.missing_url(result, &matched);
          return;
        };
        let foreground = (mode == HintsMode::ForegroundTab) != alt;
        self.emit(Command::OpenTab {
          url,
          foreground,
          frame_id,
          index,
        });
        self.finish_activation(&result, &matched, now);
      }
      HintsMode::ManyTab => {
        let Some(url) = element.report().url.clone() else {
          self.missing_url(result, &matched);
          return;
        };
        self.emit(Command::OpenTab {
          url,
          foreground: alt,
          frame_id,
          index,
        });
        self.add_highlights(&result, &matched, now);
        if let HintsState::Hinting(hinting) = &mut self.state {
          hinting.entered_chars.clear();
        }
        if let Some(result) = self.run_update(MatchPolicy::Never, false) {
          self.apply_update(result);
        }
      }
    }
  }

  /// A tab activation without URL: log it and carry on hinting.
  fn missing_url(&mut self, result: UpdateResult, matched: &HintMatch) {
    let error = HintsError::MissingUrl {
      frame_id: matched.element.frame_id(),
      index: matched.element.report().index,
    };
    log::error!("{error}");
    self.apply_update(result);
  }

  fn add_highlights(&mut self, result: &UpdateResult, matched: &HintMatch, now: Instant) {
    let items: Vec<HighlightedItem> = matched_elements(result, &matched.element.hint)
      .map(|element| HighlightedItem::new(now, element.clone()))
      .collect();
    self.state.highlighted_mut().extend(items);
    self.schedule_unhighlight();
  }

  /// Keep only the matched hint on screen, highlighted.
  fn show_match(&mut self, result: &UpdateResult, matched: &HintMatch, now: Instant) {
    let entered_text = match &self.state {
      HintsState::Hinting(hinting) => hinting.entered_text.clone(),
      HintsState::Idle { .. } | HintsState::Collecting(_) => String::new(),
    };
    self.emit(Command::UpdateHints {
      updates: matched_only(result, &matched.element.hint),
      entered_text,
    });
    self.add_highlights(result, matched, now);
  }

  /// Back to Idle after an activation, guarding against over-typing.
  fn finish_activation(&mut self, result: &UpdateResult, matched: &HintMatch, now: Instant) {
    self.show_match(result, matched, now);

    let highlighted = self.state.take_highlighted();
    self.state = HintsState::Idle { highlighted };
    self.timers.badge = None;
    self.timers.collect = None;
    self.timers.refresh = None;

    self.emit(Command::ClearElements);
    self.set_badge(String::new());
    self.prevent_over_typing(now);
  }

  fn prevent_over_typing(&mut self, now: Instant) {
    let duration = self.options.over_typing_duration();
    if duration.is_zero() {
      self.set_keyboard_mode(KeyboardMode::Normal);
      return;
    }
    self.set_keyboard_mode(KeyboardMode::PreventOverTyping);
    self.timers.over_typing = Some(now + duration);
  }
}
