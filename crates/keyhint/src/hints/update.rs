/*!
Per-keystroke recomputation of the hint set.

Given what the user has typed so far, decide which elements are still
candidates, recompute their hints, find a unique match if there is one, and
describe the visual change as one [`HintUpdate`] per element.
*/

use std::collections::{HashMap, HashSet};

use super::assign::assign_hints;
use crate::config::Alphabet;
use crate::types::{ElementRender, ElementWithHint, HighlightedItem, HintUpdate, HintsMode};

/// When the update may resolve a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
  /// Exact hint match, or auto-activation from filter text.
  Normal,
  /// The activation key was pressed: the best candidate is the match.
  Highlighted,
  /// Never match (backspace, refreshes).
  Never,
}

/// Everything one update pass looks at.
#[derive(Debug, Clone, Copy)]
pub struct UpdateInput<'a> {
  /// Active mode.
  pub mode: HintsMode,
  /// Typed hint characters.
  pub entered_chars: &'a str,
  /// Typed filter text.
  pub entered_text: &'a str,
  /// Every element of the session, ordered by stable index.
  pub elements: &'a [ElementWithHint],
  /// Highlights to keep marked.
  pub highlighted: &'a [HighlightedItem],
  /// Hint alphabet.
  pub alphabet: &'a Alphabet,
  /// Activate a single remaining element when only filter text is typed.
  pub auto_activate: bool,
  /// When a match counts as unique.
  pub match_policy: MatchPolicy,
  /// Emit position updates (after a reflow) instead of content updates.
  pub update_positions: bool,
}

/// A resolved match.
#[derive(Debug, Clone, PartialEq)]
pub struct HintMatch {
  /// The matched element.
  pub element: ElementWithHint,
  /// Resolved from filter text alone.
  pub auto_activated: bool,
}

/// Outcome of one update pass.
#[derive(Debug, Clone)]
pub struct UpdateResult {
  /// Elements that still match the filter text, in hint order.
  pub elements_with_hints: Vec<ElementWithHint>,
  /// Every element, ordered by stable index. Filtered-out and hidden
  /// elements keep their previous hints.
  pub all_elements: Vec<ElementWithHint>,
  /// The unique match, if the input resolved one.
  pub matched: Option<HintMatch>,
  /// One update per element, ordered by stable index.
  pub updates: Vec<HintUpdate>,
  /// Lowercased filter words.
  pub words: Vec<String>,
}

impl UpdateResult {
  /// Number of hints still reachable with the entered characters.
  pub fn num_candidates(&self) -> usize {
    self.updates.iter().filter(|u| u.is_visible()).count()
  }
}

/// Split filter text into lowercase words.
pub fn filter_words(entered_text: &str) -> Vec<String> {
  entered_text
    .split_whitespace()
    .map(str::to_lowercase)
    .collect()
}

fn distinct_hints<'e>(elements: &[&'e ElementWithHint]) -> Vec<&'e str> {
  let mut seen = Vec::new();
  for element in elements {
    if !seen.contains(&element.hint.as_str()) {
      seen.push(element.hint.as_str());
    }
  }
  seen
}

fn resolve_match(
  input: &UpdateInput<'_>,
  chars: &str,
  words: &[String],
  candidates: &[&ElementWithHint],
) -> Option<HintMatch> {
  match input.match_policy {
    MatchPolicy::Never => None,
    MatchPolicy::Highlighted => candidates.first().map(|e| HintMatch {
      element: (*e).clone(),
      auto_activated: false,
    }),
    MatchPolicy::Normal => {
      if !chars.is_empty() {
        // Combined elements share a hint, so "unique" means one distinct hint.
        return candidates
          .iter()
          .find(|e| e.hint == chars)
          .map(|e| HintMatch {
            element: (*e).clone(),
            auto_activated: false,
          });
      }
      if input.auto_activate && !words.is_empty() && distinct_hints(candidates).len() == 1 {
        return candidates.first().map(|e| HintMatch {
          element: (*e).clone(),
          auto_activated: true,
        });
      }
      None
    }
  }
}

/// Recompute hints for the current input.
pub fn update_hints(input: &UpdateInput<'_>) -> UpdateResult {
  let words = filter_words(input.entered_text);
  let chars = input.alphabet.normalize(input.entered_chars);

  let mut visible = Vec::new();
  let mut kept = Vec::new();
  for element in input.elements {
    if element.report().matches_words(&words) && !element.is_hidden() {
      visible.push(element.clone());
    } else {
      kept.push(element.clone());
    }
  }

  let active = assign_hints(visible, input.mode, input.alphabet, !words.is_empty());

  let candidates: Vec<&ElementWithHint> = active
    .iter()
    .filter(|e| e.hint.starts_with(chars.as_str()))
    .collect();

  let matched = resolve_match(input, &chars, &words, &candidates);

  let best_hint = if chars.is_empty() && words.is_empty() {
    None
  } else {
    candidates.first().map(|e| e.hint.clone())
  };
  let matched_hint = matched.as_ref().map(|m| m.element.hint.clone());
  let highlighted_keys: HashSet<String> = input.highlighted.iter().map(HighlightedItem::key).collect();

  let order: HashMap<usize, usize> = active
    .iter()
    .enumerate()
    .map(|(order, e)| (e.stable_index, order))
    .collect();

  let mut all_elements: Vec<ElementWithHint> = active.iter().cloned().chain(kept).collect();
  all_elements.sort_by_key(|e| e.stable_index);

  let updates = all_elements
    .iter()
    .map(|element| {
      let index = element.stable_index;
      let Some(&order) = order.get(&index) else {
        return HintUpdate::Hide {
          index,
          hidden: true,
        };
      };

      let is_candidate = element.hint.starts_with(chars.as_str());
      let highlighted = matched_hint.as_deref() == Some(element.hint.as_str())
        || best_hint.as_deref() == Some(element.hint.as_str())
        || highlighted_keys.contains(&element.highlight_key());

      if input.update_positions {
        HintUpdate::UpdatePosition {
          index,
          order,
          hint: element.hint.clone(),
          hint_measurements: element.report().hint_measurements,
          highlighted,
          hidden: !is_candidate,
        }
      } else {
        let (matched_chars, rest_chars) = if is_candidate {
          (
            chars.clone(),
            element.hint.get(chars.len()..).unwrap_or_default().to_string(),
          )
        } else {
          (String::new(), element.hint.clone())
        };
        HintUpdate::UpdateContent {
          index,
          order,
          matched_chars,
          rest_chars,
          highlighted,
          hidden: !is_candidate,
        }
      }
    })
    .collect();

  UpdateResult {
    elements_with_hints: active,
    all_elements,
    matched,
    updates,
    words,
  }
}

/// Full render list for an update result.
///
/// Highlighted items whose hint is no longer on screen are appended without
/// an element of their own, so they stay visible on top until they expire.
pub fn element_renders(result: &UpdateResult, highlighted: &[HighlightedItem]) -> Vec<ElementRender> {
  let mut renders: Vec<ElementRender> = result
    .updates
    .iter()
    .filter(|update| !matches!(update, HintUpdate::Hide { .. }))
    .filter_map(|update| {
      let element = result
        .all_elements
        .binary_search_by_key(&update.index(), |e| e.stable_index)
        .ok()
        .and_then(|i| result.all_elements.get(i))?;
      Some(ElementRender {
        hint: element.hint.clone(),
        hint_measurements: element.report().hint_measurements,
        highlighted: update.is_highlighted(),
        frame_id: element.frame_id(),
        element_index: Some(element.stable_index),
      })
    })
    .collect();

  let active_keys: HashSet<String> = result
    .elements_with_hints
    .iter()
    .map(ElementWithHint::highlight_key)
    .collect();
  renders.extend(
    highlighted
      .iter()
      .filter(|item| !active_keys.contains(&item.key()))
      .map(|item| ElementRender {
        hint: item.element.hint.clone(),
        hint_measurements: item.element.report().hint_measurements,
        highlighted: true,
        frame_id: item.element.frame_id(),
        element_index: None,
      }),
  );
  renders
}
