/*! Branded ID types for frames and elements. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Frame identifier within one tab. The top frame is always `0`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  TS,
  Display,
  From,
  Into,
)]
#[ts(export)]
pub struct FrameId(pub u32);

impl FrameId {
  /// The top-level frame of a tab.
  pub const TOP: Self = Self(0);
}

impl Default for FrameId {
  fn default() -> Self {
    Self::TOP
  }
}
