/*!
Tab controller - owns the hints state of one tab and emits commands.

# Module Structure

- `mod.rs` - `TabController`, construction, command emission, options
- `state.rs` - `HintsState` (Idle / Collecting / Hinting) and snapshots
- `handlers.rs` - frame messages: collection, refresh answers, text rects
- `input.rs` - keypresses and keyboard actions while hinting
- `activation.rs` - what a matched hint does in each mode
- `timers.rs` - deadlines and `on_tick`

All methods take the current time. The controller never sleeps or spawns;
the driver asks for [`TabController::next_deadline`] and calls
[`TabController::on_tick`] when it is reached.

# Example

```
use keyhint::{Command, HintsMode, TabController};
use std::time::Instant;

let mut tab = TabController::builder().build()?;
let mut commands = tab.subscribe();

tab.enter_hints_mode(HintsMode::Click, Instant::now());
assert!(matches!(
    commands.try_recv(),
    Ok(Command::StartFindElements { .. })
));
# Ok::<(), keyhint::HintsError>(())
```
*/

mod activation;
mod handlers;
mod input;
mod state;
mod timers;


pub use state::{CollectingState, HintingState, HintsState, Phase, TabSnapshot, UpdateState};

use async_broadcast::{InactiveReceiver, Receiver, Sender};
use std::time::Instant;

use crate::config::{Alphabet, Options, Timings};
use crate::types::{Command, HintsResult, KeyboardMapping, KeyboardMode};
use timers::Timers;

const COMMAND_CHANNEL_CAPACITY: usize = 1000;

/// Badge text while collecting takes long.
const BADGE_BUSY: &str = "…";

/// Hints state machine for one tab.
///
/// One instance per tab, owned by whatever drives that tab. Outbound
/// commands are fire-and-forget; see [`TabController::subscribe`].
pub struct TabController {
  state: HintsState,
  options: Options,
  alphabet: Alphabet,
  timings: Timings,
  keyboard_mode: KeyboardMode,
  badge: String,
  timers: Timers,
  commands_tx: Sender<Command>,
  commands_keepalive: InactiveReceiver<Command>,
}

impl std::fmt::Debug for TabController {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TabController")
      .field("phase", &self.state.phase())
      .field("keyboard_mode", &self.keyboard_mode)
      .finish_non_exhaustive()
  }
}

/// Builder for configuring a `TabController`.
///
/// # Example
///
/// ```
/// use keyhint::{Options, TabController, Timings};
/// use std::time::Duration;
///
/// let tab = TabController::builder()
///     .options(Options { chars: "asdf".into(), ..Default::default() })
///     .timings(Timings { update_interval: Duration::from_millis(250), ..Default::default() })
///     .build()?;
/// # Ok::<(), keyhint::HintsError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct TabControllerBuilder {
  options: Options,
  timings: Timings,
  channel_capacity: usize,
}

impl Default for TabControllerBuilder {
  fn default() -> Self {
    Self {
      options: Options::default(),
      timings: Timings::default(),
      channel_capacity: COMMAND_CHANNEL_CAPACITY,
    }
  }
}

impl TabControllerBuilder {
  /// User options. Default: [`Options::default()`].
  pub fn options(mut self, options: Options) -> Self {
    self.options = options;
    self
  }

  /// Timing tweakables. Default: [`Timings::default()`].
  pub const fn timings(mut self, timings: Timings) -> Self {
    self.timings = timings;
    self
  }

  /// Outbound command buffer. When full, the oldest commands are dropped.
  /// Default: 1000.
  pub const fn channel_capacity(mut self, capacity: usize) -> Self {
    self.channel_capacity = capacity;
    self
  }

  /// Build the controller. Fails if the options carry an invalid alphabet.
  pub fn build(self) -> HintsResult<TabController> {
    let alphabet = self.options.alphabet()?;

    let (mut tx, rx) = async_broadcast::broadcast(self.channel_capacity.max(1));
    tx.set_overflow(true);

    Ok(TabController {
      state: HintsState::default(),
      options: self.options,
      alphabet,
      timings: self.timings,
      keyboard_mode: KeyboardMode::Normal,
      badge: String::new(),
      timers: Timers::default(),
      commands_tx: tx,
      commands_keepalive: rx.deactivate(),
    })
  }
}

impl TabController {
  /// Controller with the given options and default timings.
  pub fn new(options: Options) -> HintsResult<Self> {
    Self::builder().options(options).build()
  }

  /// Builder with default options and timings.
  pub fn builder() -> TabControllerBuilder {
    TabControllerBuilder::default()
  }

  /// Subscribe to outbound commands.
  pub fn subscribe(&self) -> Receiver<Command> {
    self.commands_keepalive.activate_cloned()
  }

  /// Current hints state.
  pub const fn state(&self) -> &HintsState {
    &self.state
  }

  /// Which of the three states the tab is in.
  pub const fn phase(&self) -> Phase {
    self.state.phase()
  }

  /// Serializable summary of the current state.
  pub fn snapshot(&self) -> TabSnapshot {
    TabSnapshot::new(&self.state, self.keyboard_mode)
  }

  /// Current options.
  pub const fn options(&self) -> &Options {
    &self.options
  }

  /// Timing tweakables.
  pub const fn timings(&self) -> &Timings {
    &self.timings
  }

  /// Keyboard mode last sent to frames.
  pub const fn keyboard_mode(&self) -> KeyboardMode {
    self.keyboard_mode
  }

  /// Last badge text sent.
  pub fn badge_text(&self) -> &str {
    &self.badge
  }

  /// Replace the options. Exits hinting if active and re-sends the
  /// keyboard shortcuts. Invalid options leave the controller unchanged.
  pub fn set_options(&mut self, options: Options) -> HintsResult<()> {
    let alphabet = options.alphabet()?;
    self.options = options;
    self.alphabet = alphabet;
    if matches!(self.state, HintsState::Idle { .. }) {
      self.set_keyboard_mode(self.keyboard_mode);
    } else {
      self.exit_hints_mode();
    }
    Ok(())
  }

  /// Tear down: cancel every timer and forget all state, highlights included.
  pub fn stop(&mut self) {
    self.timers.clear();
    self.state = HintsState::default();
    self.keyboard_mode = KeyboardMode::Normal;
    self.set_badge(String::new());
  }

  /// The renderer finished a full render.
  pub fn on_rendered(&mut self, now: Instant) {
    let HintsState::Hinting(hinting) = &mut self.state else {
      log::trace!("Render acknowledged outside hinting");
      return;
    };
    hinting.time.stop(now);
    let num_elements: usize = hinting.stats.iter().map(|s| s.num_elements).sum();
    log::debug!(
      "{:?}: {} elements from {} frames, {} ({:?} total)",
      hinting.mode,
      num_elements,
      hinting.stats.len(),
      hinting.time.summary(),
      now.saturating_duration_since(hinting.started),
    );
  }

  fn emit(&self, command: Command) {
    log::trace!("Emitting {command:?}");
    if let Err(e) = self.commands_tx.try_broadcast(command) {
      if e.is_full() {
        log::error!(
          "Command channel overflow - commands are being dropped. \
           Consider increasing the channel capacity or processing commands faster."
        );
      }
    }
  }

  fn set_badge(&mut self, text: String) {
    if self.badge != text {
      self.badge.clone_from(&text);
      self.emit(Command::SetBadge { text });
    }
  }

  fn shortcuts_for(&self, mode: KeyboardMode) -> Vec<KeyboardMapping> {
    match mode {
      KeyboardMode::Normal => self.options.keyboard_shortcuts.clone(),
      KeyboardMode::Hints => self
        .options
        .keyboard_shortcuts
        .iter()
        .chain(&self.options.hints_keyboard_shortcuts)
        .cloned()
        .collect(),
      KeyboardMode::PreventOverTyping => self
        .options
        .keyboard_shortcuts
        .iter()
        .filter(|m| m.shortcut.is_safe_during_over_typing())
        .cloned()
        .collect(),
    }
  }

  fn set_keyboard_mode(&mut self, mode: KeyboardMode) {
    if mode != KeyboardMode::PreventOverTyping {
      self.timers.over_typing = None;
    }
    self.keyboard_mode = mode;
    let shortcuts = self.shortcuts_for(mode);
    self.emit(Command::SetKeyboardMode { mode, shortcuts });
  }
}
