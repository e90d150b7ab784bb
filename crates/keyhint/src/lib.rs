/*!
keyhint - keyboard hints for every clickable thing on a page

```
use keyhint::{FrameId, FrameMessage, HintsMode, Options, TabController};
use std::time::Instant;

// One controller per tab
let mut tab = TabController::new(Options::default())?;
let mut commands = tab.subscribe();

// Shortcut pressed: ask frames to scan
let now = Instant::now();
tab.enter_hints_mode(HintsMode::Click, now);

// Frames answer; once all have, hints are rendered
tab.on_frame_message(FrameId::TOP, FrameMessage::ReportVisibleFrame, now);
tab.on_frame_message(
    FrameId::TOP,
    FrameMessage::ReportVisibleElements { elements: vec![], num_frames: 0, duration_ms: 1.0 },
    now,
);
assert_eq!(tab.phase(), keyhint::Phase::Hinting);

// Drive timers
if let Some(deadline) = tab.next_deadline() {
    tab.on_tick(deadline);
}

while let Ok(_command) = commands.try_recv() {
    // forward to frames / renderer / browser
}
# Ok::<(), keyhint::HintsError>(())
```
*/

mod collect;
mod config;
mod core;

pub mod hints;

mod types;
pub use types::*;

pub use crate::collect::{PendingElements, PendingFrames};
pub use crate::config::{Alphabet, Options, Timings, DEFAULT_CHARS};
pub use crate::core::{
  CollectingState, HintingState, HintsState, Phase, TabController, TabControllerBuilder,
  TabSnapshot, UpdateState,
};
