/*! Core types for keyhint.

Wire types derive `TS`; regenerate TypeScript bindings with `cargo test`.
*/

#![allow(missing_docs)]

mod element;
mod error;
mod event;
mod geometry;
mod ids;
mod keyboard;
mod mode;
mod timing;

pub use element::{
  ElementReport, ElementType, ElementWithHint, ExtendedElementReport, HighlightedItem,
};
pub use error::{HintsError, HintsResult};
pub use event::{Command, ElementRender, FrameMessage, HintUpdate};
pub use geometry::{Align, HintMeasurements, Rect};
pub use ids::FrameId;
pub use keyboard::{
  default_hints_keyboard_shortcuts, default_keyboard_shortcuts, KeyboardAction, KeyboardMapping,
  KeyboardMode, Keypress, Shortcut,
};
pub use mode::HintsMode;
pub use timing::{FrameStats, TimeTracker};
