/*!
Configuration for keyhint.

`Options` are the user-facing settings (read from the options store as
JSON). `Timings` are the internal tweakables; all have sensible defaults:

```
use keyhint::{Options, Timings};
use std::collections::HashSet;
use std::time::Duration;

let options = Options::from_json(r#"{ "chars": "asdfjkl", "autoActivate": true }"#)?;
assert_eq!(options.alphabet()?.chars().len(), 7);

let timings = Timings {
    update_interval: Duration::from_millis(250),
    ..Default::default()
};
# Ok::<(), keyhint::HintsError>(())
```
*/

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{
  default_hints_keyboard_shortcuts, default_keyboard_shortcuts, HintsError, HintsResult,
  KeyboardMapping,
};

/// Default hint characters: home row first, then the easiest reaches.
pub const DEFAULT_CHARS: &str = "fjdkslaurieowhgmvcn";

/// The characters hints are made of. At least two, no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
  chars: Vec<char>,
  case_sensitive: bool,
}

impl Alphabet {
  /// Validate `chars`: at least two, no whitespace, no duplicates.
  pub fn new(chars: &str) -> HintsResult<Self> {
    let list: Vec<char> = chars.chars().collect();
    if list.len() < 2 {
      return Err(HintsError::InvalidAlphabet(format!(
        "need at least 2 characters, got {}",
        list.len()
      )));
    }
    if let Some(c) = list.iter().find(|c| c.is_whitespace()) {
      return Err(HintsError::InvalidAlphabet(format!(
        "whitespace is reserved for filter text: {c:?}"
      )));
    }
    let mut seen = HashSet::with_capacity(list.len());
    if let Some(c) = list.iter().find(|&&c| !seen.insert(c)) {
      return Err(HintsError::InvalidAlphabet(format!(
        "duplicate character {c:?}"
      )));
    }
    let case_sensitive = list.iter().any(|c| c.is_uppercase());
    Ok(Self {
      chars: list,
      case_sensitive,
    })
  }

  /// Characters in preference order.
  pub fn chars(&self) -> &[char] {
    &self.chars
  }


  /// Uppercase characters in the alphabet make typing case-sensitive.
  pub const fn is_case_sensitive(&self) -> bool {
    self.case_sensitive
  }

  /// Normalize typed input for comparison with hints.
  pub fn normalize(&self, input: &str) -> String {
    if self.case_sensitive {
      input.to_string()
    } else {
      input.to_lowercase()
    }
  }

  /// Whether a typed key is a hint character (as opposed to filter text).
  pub fn contains_key(&self, key: &str) -> bool {
    let normalized = self.normalize(key);
    let mut chars = normalized.chars();
    match (chars.next(), chars.next()) {
      (Some(c), None) => self.chars.contains(&c),
      _ => false,
    }
  }
}

impl Default for Alphabet {
  fn default() -> Self {
    Self {
      chars: DEFAULT_CHARS.chars().collect(),
      case_sensitive: false,
    }
  }
}

const fn default_true() -> bool {
  true
}

const fn default_over_typing_duration_ms() -> u64 {
  300
}

fn default_chars() -> String {
  DEFAULT_CHARS.to_string()
}

/// User options, as stored by the options page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Options {
  /// Hint characters, best first.
  #[serde(default = "default_chars")]
  pub chars: String,
  /// Activate the only remaining element when filter text leaves just one.
  #[serde(default = "default_true")]
  pub auto_activate: bool,
  /// How long after an activation only modified shortcuts are processed.
  /// Zero disables over-typing prevention.
  #[serde(default = "default_over_typing_duration_ms")]
  pub over_typing_duration_ms: u64,
  /// Global shortcuts, always captured.
  #[serde(default = "default_keyboard_shortcuts")]
  pub keyboard_shortcuts: Vec<KeyboardMapping>,
  /// Extra shortcuts captured while hints are shown.
  #[serde(default = "default_hints_keyboard_shortcuts")]
  pub hints_keyboard_shortcuts: Vec<KeyboardMapping>,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      chars: default_chars(),
      auto_activate: true,
      over_typing_duration_ms: default_over_typing_duration_ms(),
      keyboard_shortcuts: default_keyboard_shortcuts(),
      hints_keyboard_shortcuts: default_hints_keyboard_shortcuts(),
    }
  }
}

impl Options {
  /// Parse and validate options from the options store.
  pub fn from_json(json: &str) -> HintsResult<Self> {
    let options: Self = serde_json::from_str(json)?;
    options.validate()?;
    Ok(options)
  }

  /// Check the alphabet.
  pub fn validate(&self) -> HintsResult<()> {
    self.alphabet().map(|_| ())
  }

  /// The validated hint alphabet.
  pub fn alphabet(&self) -> HintsResult<Alphabet> {
    Alphabet::new(&self.chars)
  }

  /// See `over_typing_duration_ms`.
  pub const fn over_typing_duration(&self) -> Duration {
    Duration::from_millis(self.over_typing_duration_ms)
  }
}

/// Internal timing tweakables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
  /// How long a matched hint stays highlighted.
  /// Default: 200ms.
  pub match_highlight_duration: Duration,

  /// Time between element refreshes while hinting.
  /// Default: 500ms.
  pub update_interval: Duration,

  /// Floor for the wait before the next refresh after a slow one.
  /// Default: 100ms.
  pub update_min_timeout: Duration,

  /// How long collecting may take before the badge shows a busy marker.
  /// Default: 300ms.
  pub badge_collecting_delay: Duration,

  /// How long to wait for frames that were asked to scan but never
  /// confirmed they are scanning.
  /// Default: 200ms.
  pub frame_report_timeout: Duration,
}

impl Default for Timings {
  fn default() -> Self {
    Self {
      match_highlight_duration: Duration::from_millis(200),
      update_interval: Duration::from_millis(500),
      update_min_timeout: Duration::from_millis(100),
      badge_collecting_delay: Duration::from_millis(300),
      frame_report_timeout: Duration::from_millis(200),
    }
  }
}

impl Timings {
  /// Refresh period, never below the floor.
  pub fn refresh_period(&self) -> Duration {
    self.update_interval.max(self.update_min_timeout)
  }
}
