/*! Geometry types for hint placement and text rectangles. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which side of the element the hint is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Align {
  #[default]
  Left,
  Right,
}

impl Align {
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Left => "left",
      Self::Right => "right",
    }
  }
}

/// Where and how prominently a hint is placed, as measured by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct HintMeasurements {
  pub x: f64,
  pub y: f64,
  pub align: Align,
  /// Rightmost x the hint may extend to without leaving the element.
  pub max_x: f64,
  /// Relative prominence, derived from on-screen size.
  pub weight: f64,
}

impl HintMeasurements {
  /// Key identifying a rendered hint across rescans.
  ///
  /// DOM identity does not survive a frame rescan, so highlights are matched
  /// by where the hint sits and what it says. Two different elements with the
  /// same position, alignment and hint are indistinguishable here.
  pub fn highlight_key(&self, hint: &str) -> String {
    format!("{}:{}:{}:{}", self.x, self.y, self.align.as_str(), hint)
  }

  /// Reading order: left to right, then top to bottom.
  pub fn cmp_position(&self, other: &Self) -> std::cmp::Ordering {
    self
      .x
      .total_cmp(&other.x)
      .then_with(|| self.y.total_cmp(&other.y))
  }
}

/// Rectangle in frame viewport coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct Rect {
  pub x: f64,
  pub y: f64,
  pub w: f64,
  pub h: f64,
}

impl Rect {
  pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
    Self { x, y, w, h }
  }
}
