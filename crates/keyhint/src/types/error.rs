/*! Error types for keyhint operations. */

/// Errors that can occur while configuring or driving hints mode.
#[derive(Debug, thiserror::Error)]
pub enum HintsError {
  #[error("Invalid hint alphabet: {0}")]
  InvalidAlphabet(String),

  #[error("Invalid options: {0}")]
  InvalidOptions(String),

  #[error("Element {index} in frame {frame_id} has no URL")]
  MissingUrl { frame_id: super::FrameId, index: u32 },
}

/// Result type for keyhint operations.
pub type HintsResult<T> = Result<T, HintsError>;

impl From<serde_json::Error> for HintsError {
  fn from(e: serde_json::Error) -> Self {
    Self::InvalidOptions(e.to_string())
  }
}
