/*!
Hint assignment: weigh, order, combine, code.
*/

use std::cmp::Ordering;

use super::combine::combine_by_href;
use super::huffman::alphabet_code_words;
use crate::config::Alphabet;
use crate::types::{ElementWithHint, HintsMode};

/// Coding weight of each element.
///
/// With filter text, better text matches (lower `text_weight`) weigh more,
/// relative to the worst match present. Otherwise on-screen prominence counts.
fn assignment_weights(elements: &[ElementWithHint], has_entered_text: bool) -> Vec<f64> {
  if !has_entered_text {
    return elements
      .iter()
      .map(|e| e.report().hint_measurements.weight)
      .collect();
  }
  let largest = elements
    .iter()
    .map(|e| e.report().text_weight)
    .fold(1.0_f64, f64::max);
  elements
    .iter()
    .map(|e| largest - e.report().text_weight + 1.0)
    .collect()
}

/// Heavier first, then reading position, then stable index.
fn compare(a: &ElementWithHint, b: &ElementWithHint) -> Ordering {
  b.weight
    .total_cmp(&a.weight)
    .then_with(|| {
      a.report()
        .hint_measurements
        .cmp_position(&b.report().hint_measurements)
    })
    .then_with(|| a.stable_index.cmp(&b.stable_index))
}

/// Assign weights and hints to `elements`.
///
/// `elements` must already be narrowed to what may be hinted right now.
/// Returns the elements in hint order (best first). Identical input yields
/// identical hints, so refreshes don't scramble hints mid-typing.
pub fn assign_hints(
  mut elements: Vec<ElementWithHint>,
  mode: HintsMode,
  alphabet: &Alphabet,
  has_entered_text: bool,
) -> Vec<ElementWithHint> {
  let weights = assignment_weights(&elements, has_entered_text);
  for (element, weight) in elements.iter_mut().zip(weights) {
    element.weight = weight;
  }
  elements.sort_by(compare);

  let mut groups = combine_by_href(&elements, mode);
  // Combining moves groups ahead of singles; code in weight order again.
  groups.sort_by(|a, b| {
    b.weight
      .total_cmp(&a.weight)
      .then_with(|| a.members.first().cmp(&b.members.first()))
  });

  let group_weights: Vec<f64> = groups.iter().map(|g| g.weight).collect();
  let words = alphabet_code_words(&group_weights, alphabet);

  for (group, word) in groups.iter().zip(words) {
    for &member in &group.members {
      if let Some(element) = elements.get_mut(member) {
        element.hint.clone_from(&word);
      }
    }
  }

  elements
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::hints::combine::tests::link;

  fn hints(elements: &[ElementWithHint]) -> Vec<(usize, String)> {
    elements
      .iter()
      .map(|e| (e.stable_index, e.hint.clone()))
      .collect()
  }

  #[test]
  fn heaviest_element_gets_the_short_hint() {
    let alphabet = Alphabet::new("ab").unwrap();
    let elements = vec![
      link(0, "https://a/", 1.0),
      link(1, "https://b/", 3.0),
      link(2, "https://c/", 2.0),
    ];
    let assigned = assign_hints(elements, HintsMode::Click, &alphabet, false);
    assert_eq!(
      hints(&assigned),
      vec![(1, "a".into()), (2, "ba".into()), (0, "bb".into())]
    );
  }

  #[test]
  fn combined_links_share_a_hint() {
    let alphabet = Alphabet::new("ab").unwrap();
    let elements = vec![
      link(0, "https://x/", 1.0),
      link(1, "https://x/", 1.0),
      link(2, "https://x/#frag", 1.0),
    ];
    let assigned = assign_hints(elements, HintsMode::Click, &alphabet, false);
    let by_index = |i: usize| {
      assigned
        .iter()
        .find(|e| e.stable_index == i)
        .map(|e| e.hint.clone())
        .unwrap()
    };
    assert_eq!(by_index(0), by_index(1));
    assert_ne!(by_index(0), by_index(2));
    assert_eq!(by_index(0).len(), 1);
    assert_eq!(by_index(2).len(), 1);
  }

  #[test]
  fn position_breaks_weight_ties() {
    let alphabet = Alphabet::new("ab").unwrap();
    // Same weight: leftmost first.
    let mut elements = vec![link(0, "https://a/", 1.0), link(1, "https://b/", 1.0)];
    elements[0].element.report.hint_measurements.x = 50.0;
    elements[1].element.report.hint_measurements.x = 10.0;
    let assigned = assign_hints(elements, HintsMode::Click, &alphabet, false);
    assert_eq!(hints(&assigned), vec![(1, "a".into()), (0, "b".into())]);
  }

  #[test]
  fn stable_index_breaks_full_ties() {
    let alphabet = Alphabet::new("ab").unwrap();
    let mut elements = vec![link(5, "https://a/", 1.0), link(2, "https://b/", 1.0)];
    for e in &mut elements {
      e.element.report.hint_measurements.x = 0.0;
    }
    let assigned = assign_hints(elements, HintsMode::Click, &alphabet, false);
    assert_eq!(hints(&assigned), vec![(2, "a".into()), (5, "b".into())]);
  }

  #[test]
  fn entered_text_favors_better_text_matches() {
    let alphabet = Alphabet::new("ab").unwrap();
    let mut elements = vec![
      link(0, "https://a/", 10.0),
      link(1, "https://b/", 1.0),
      link(2, "https://c/", 1.0),
    ];
    elements[0].element.report.text_weight = 9.0;
    elements[1].element.report.text_weight = 1.0;
    elements[2].element.report.text_weight = 5.0;
    let assigned = assign_hints(elements, HintsMode::Click, &alphabet, true);
    assert_eq!(assigned[0].stable_index, 1);
    assert_eq!(assigned[0].weight, 9.0);
    assert_eq!(assigned[0].hint, "a");
  }

  #[test]
  fn combined_group_uses_max_weight() {
    let alphabet = Alphabet::new("ab").unwrap();
    let elements = vec![
      link(0, "https://x/", 5.0),
      link(1, "https://y/", 4.0),
      link(2, "https://y/", 1.0),
      link(3, "https://z/", 3.0),
    ];
    let assigned = assign_hints(elements, HintsMode::ForegroundTab, &alphabet, false);
    let hint_of = |i: usize| {
      assigned
        .iter()
        .find(|e| e.stable_index == i)
        .map(|e| e.hint.clone())
        .unwrap()
    };
    assert_eq!(hint_of(1), hint_of(2));
    assert!(hint_of(1).len() <= hint_of(3).len());
  }
}
