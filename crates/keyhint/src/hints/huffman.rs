/*!
n-ary Huffman coding over the hint alphabet.

Every branch uses the full alphabet, so with K characters each internal node
has up to K children. Only the first (deepest) merge may be smaller, which
keeps every other node full and the code optimal.
*/

use std::collections::VecDeque;

use crate::config::Alphabet;
use crate::types::{HintsError, HintsResult};

struct Node {
  weight: f64,
  /// Children in merge order (lightest first).
  children: Vec<usize>,
  /// Input index for leaves.
  leaf: Option<usize>,
}

fn sanitize(weight: f64) -> f64 {
  if weight.is_finite() && weight > 0.0 {
    weight
  } else {
    0.0
  }
}

fn weight_of(nodes: &[Node], id: usize) -> f64 {
  nodes.get(id).map_or(0.0, |node| node.weight)
}

/// Take the lightest node from the two queues. On ties merged nodes go
/// first, which keeps the tree shallow.
fn pop_lightest(
  nodes: &[Node],
  leaves: &mut VecDeque<usize>,
  merged: &mut VecDeque<usize>,
) -> Option<usize> {
  match (leaves.front(), merged.front()) {
    (Some(&leaf), Some(&node)) => {
      if weight_of(nodes, node) <= weight_of(nodes, leaf) {
        merged.pop_front()
      } else {
        leaves.pop_front()
      }
    }
    (Some(_), None) => leaves.pop_front(),
    (None, Some(_)) => merged.pop_front(),
    (None, None) => None,
  }
}

/// Assign a prefix-free code word to each weight.
///
/// Heavier items get shorter-or-equal words. Among equal weights, earlier
/// items get the shorter words and earlier alphabet characters, so callers
/// control tie-breaks through input order.
pub fn code_words(weights: &[f64], alphabet: &[char]) -> HintsResult<Vec<String>> {
  if alphabet.len() < 2 {
    return Err(HintsError::InvalidAlphabet(format!(
      "need at least 2 characters, got {}",
      alphabet.len()
    )));
  }
  Ok(build(weights, alphabet))
}

/// [`code_words`] over an already validated alphabet.
pub fn alphabet_code_words(weights: &[f64], alphabet: &Alphabet) -> Vec<String> {
  build(weights, alphabet.chars())
}

fn build(weights: &[f64], alphabet: &[char]) -> Vec<String> {
  let k = alphabet.len();
  debug_assert!(k >= 2, "alphabet must have at least 2 characters");

  let n = weights.len();
  match n {
    0 => return Vec::new(),
    1 => return alphabet.first().map(char::to_string).into_iter().collect(),
    _ => {}
  }

  let mut nodes: Vec<Node> = Vec::with_capacity(2 * n);

  // Lightest first; among equal weights the later input comes first so it
  // is merged earlier and ends up deeper.
  let mut order: Vec<(usize, f64)> = weights
    .iter()
    .map(|&w| sanitize(w))
    .enumerate()
    .rev()
    .collect();
  order.sort_by(|a, b| a.1.total_cmp(&b.1));

  let mut leaves: VecDeque<usize> = order
    .into_iter()
    .map(|(i, weight)| {
      nodes.push(Node {
        weight,
        children: Vec::new(),
        leaf: Some(i),
      });
      nodes.len() - 1
    })
    .collect();
  let mut merged: VecDeque<usize> = VecDeque::with_capacity(n);

  let mut group = 2 + (n - 2) % (k - 1);
  while leaves.len() + merged.len() > 1 {
    let take = group.min(leaves.len() + merged.len());
    let mut children = Vec::with_capacity(take);
    while children.len() < take {
      let Some(next) = pop_lightest(&nodes, &mut leaves, &mut merged) else {
        break;
      };
      children.push(next);
    }
    let weight = children.iter().map(|&c| weight_of(&nodes, c)).sum();
    nodes.push(Node {
      weight,
      children,
      leaf: None,
    });
    merged.push_back(nodes.len() - 1);
    group = k;
  }

  let mut codes = vec![String::new(); n];
  let mut stack = vec![(nodes.len() - 1, String::new())];
  while let Some((id, prefix)) = stack.pop() {
    let Some(node) = nodes.get(id) else {
      continue;
    };
    if let Some(item) = node.leaf {
      if let Some(code) = codes.get_mut(item) {
        *code = prefix;
      }
      continue;
    }
    debug_assert!(node.children.len() <= k, "node wider than the alphabet");
    for (c, &child) in alphabet.iter().zip(node.children.iter().rev()) {
      let mut word = prefix.clone();
      word.push(*c);
      stack.push((child, word));
    }
  }

  debug_assert!(codes.iter().all(|c| !c.is_empty()), "unassigned code word");
  codes
}


#[cfg(test)]
mod proptests {
  use super::*;
  use proptest::prelude::*;

  /// Integer-valued weights keep node sums exact.
  fn weights() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0u32..1000).prop_map(f64::from), 1..60)
  }

  fn alphabet() -> impl Strategy<Value = Vec<char>> {
    (2usize..10).prop_map(|k| "fjdkslaurieow".chars().take(k).collect())
  }

  proptest! {
    /// No code word is a prefix of another.
    #[test]
    fn prefix_free(weights in weights(), alphabet in alphabet()) {
      let codes = code_words(&weights, &alphabet).unwrap();
      prop_assert_eq!(codes.len(), weights.len());
      for (i, a) in codes.iter().enumerate() {
        for (j, b) in codes.iter().enumerate() {
          if i != j {
            prop_assert!(!b.starts_with(a.as_str()), "{a} is a prefix of {b}");
          }
        }
      }
    }

    /// Heavier items never get longer code words.
    #[test]
    fn weight_monotonic(weights in weights(), alphabet in alphabet()) {
      let codes = code_words(&weights, &alphabet).unwrap();
      for i in 0..weights.len() {
        for j in 0..weights.len() {
          if weights[i] > weights[j] {
            prop_assert!(
              codes[i].chars().count() <= codes[j].chars().count(),
              "weight {} got {:?}, weight {} got {:?}", weights[i], codes[i], weights[j], codes[j]
            );
          }
        }
      }
    }

    /// Same input, same output.
    #[test]
    fn deterministic(weights in weights(), alphabet in alphabet()) {
      prop_assert_eq!(
        code_words(&weights, &alphabet).unwrap(),
        code_words(&weights, &alphabet).unwrap()
      );
    }

    /// Code words only use alphabet characters.
    #[test]
    fn stays_within_alphabet(weights in weights(), alphabet in alphabet()) {
      let codes = code_words(&weights, &alphabet).unwrap();
      prop_assert!(codes.iter().all(|c| c.chars().all(|ch| alphabet.contains(&ch))));
    }
  }
}
