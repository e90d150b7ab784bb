/*!
Combining elements that lead to the same place under one hint.
*/

use std::collections::HashMap;

use crate::types::{ElementReport, ElementWithHint, HintsMode};

/// Elements sharing one hint. Members are indexes into the combined slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
  /// Indexes into the combined slice, in input order.
  pub members: Vec<usize>,
  /// Heaviest member weight.
  pub weight: f64,
}

/// What two elements must share to be combined in `mode`, if anything.
fn combine_key(mode: HintsMode, report: &ElementReport) -> Option<&str> {
  match mode {
    // A click listener may do something other than follow the link, and a
    // fragment usually means an in-page control (carousel, expander).
    HintsMode::Click | HintsMode::ManyClick => {
      if report.has_click_listener || report.has_fragment() {
        None
      } else {
        report.url_with_target.as_deref()
      }
    }
    HintsMode::BackgroundTab | HintsMode::ForegroundTab | HintsMode::ManyTab => {
      report.url.as_deref()
    }
    HintsMode::Select => None,
  }
}

/// Partition `elements` into shared-hint groups.
///
/// Combined groups come first, in order of first appearance of their key,
/// followed by the remaining elements one per group in input order.
pub fn combine_by_href(elements: &[ElementWithHint], mode: HintsMode) -> Vec<Group> {
  let mut keyed: Vec<Vec<usize>> = Vec::new();
  let mut by_key: HashMap<&str, usize> = HashMap::new();
  let mut singles: Vec<usize> = Vec::new();

  for (i, element) in elements.iter().enumerate() {
    match combine_key(mode, element.report()) {
      Some(key) => match by_key.get(key) {
        Some(&slot) => {
          if let Some(members) = keyed.get_mut(slot) {
            members.push(i);
          }
        }
        None => {
          by_key.insert(key, keyed.len());
          keyed.push(vec![i]);
        }
      },
      None => singles.push(i),
    }
  }

  let mut combined = Vec::with_capacity(keyed.len());
  for members in keyed {
    if members.len() > 1 {
      combined.push(members);
    } else {
      singles.extend(members);
    }
  }
  singles.sort_unstable();

  combined
    .into_iter()
    .chain(singles.into_iter().map(|i| vec![i]))
    .map(|members| {
      let weight = members
        .iter()
        .filter_map(|&i| elements.get(i).map(|e| e.weight))
        .fold(f64::NEG_INFINITY, f64::max);
      Group { members, weight }
    })
    .collect()
}
