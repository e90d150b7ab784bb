/*!
Hint generation.

- [`huffman`]: prefix-free code words, shorter for heavier elements
- [`combine`]: elements leading to the same place share a hint
- [`assign`]: weigh, order, combine and code a set of elements
- [`update`]: recompute hints for each keystroke
*/

pub mod assign;
pub mod combine;
pub mod huffman;
pub mod update;

pub use assign::assign_hints;
pub use combine::{combine_by_href, Group};
pub use huffman::{alphabet_code_words, code_words};
pub use update::{element_renders, filter_words, update_hints, HintMatch, MatchPolicy, UpdateInput, UpdateResult};
