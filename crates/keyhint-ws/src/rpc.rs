/*!
RPC request/response types and dispatch.
*/

#![allow(missing_docs)]

use keyhint::{FrameId, FrameMessage, KeyboardAction, Keypress, Options, TabController, TabSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::time::Instant;
use ts_rs::TS;

/// RPC request.
#[derive(Debug, Deserialize, TS)]
#[serde(tag = "method", content = "args", rename_all = "snake_case")]
#[ts(export)]
pub enum RpcRequest {
  /// A message from one of the tab's frames.
  Frame {
    frame_id: FrameId,
    message: FrameMessage,
  },
  /// A mapped shortcut fired.
  KeyboardAction { action: KeyboardAction },
  /// A printable key while hints are shown.
  Keypress { key: String },
  /// The renderer finished a full render.
  Rendered,
  /// The options store changed.
  SetOptions { options: Options },
  /// Get a snapshot of the tab's state.
  State,
  /// The tab is going away.
  Stop,
}

/// RPC response.
#[derive(Debug, Serialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum RpcResponse {
  /// Tab state snapshot.
  State(TabSnapshot),
  /// No data.
  Null,
}

pub fn dispatch_json(
  tab: &mut TabController,
  method: &str,
  args: &JsonValue,
  now: Instant,
) -> JsonValue {
  let request_value = json!({ "method": method, "args": args });

  match serde_json::from_value::<RpcRequest>(request_value) {
    Ok(request) => match dispatch(tab, request, now) {
      Ok(response) => json!({ "result": response }),
      Err(e) => {
        log::warn!("[rpc] {method} failed: {e}");
        json!({ "error": e })
      }
    },
    Err(e) => {
      log::warn!("[rpc] Invalid request for {method}: {e}");
      json!({ "error": format!("Invalid request: {e}") })
    }
  }
}

pub fn dispatch(
  tab: &mut TabController,
  request: RpcRequest,
  now: Instant,
) -> Result<RpcResponse, String> {
  match request {
    RpcRequest::Frame { frame_id, message } => {
      tab.on_frame_message(frame_id, message, now);
      Ok(RpcResponse::Null)
    }

    RpcRequest::KeyboardAction { action } => {
      tab.on_keyboard_action(action, now);
      Ok(RpcResponse::Null)
    }

    RpcRequest::Keypress { key } => {
      tab.on_keypress(&Keypress::new(key), now);
      Ok(RpcResponse::Null)
    }

    RpcRequest::Rendered => {
      tab.on_rendered(now);
      Ok(RpcResponse::Null)
    }

    RpcRequest::SetOptions { options } => {
      tab.set_options(options).map_err(|e| e.to_string())?;
      Ok(RpcResponse::Null)
    }

    RpcRequest::State => Ok(RpcResponse::State(tab.snapshot())),

    RpcRequest::Stop => {
      tab.stop();
      Ok(RpcResponse::Null)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use keyhint::{Command, Phase};

  fn tab() -> TabController {
    TabController::new(Options::default()).unwrap()
  }

  #[test]
  fn state_returns_a_snapshot() {
    let mut tab = tab();
    let response = dispatch_json(&mut tab, "state", &JsonValue::Null, Instant::now());
    assert_eq!(response["result"]["phase"], json!("Idle"));
    assert!(response.get("error").is_none());
  }

  #[test]
  fn keyboard_action_enters_hints_mode() {
    let mut tab = tab();
    let mut commands = tab.subscribe();
    let args = json!({ "action": { "type": "EnterHintsMode", "value": "Click" } });

    let response = dispatch_json(&mut tab, "keyboard_action", &args, Instant::now());

    assert_eq!(response, json!({ "result": null }));
    assert_eq!(tab.phase(), Phase::Collecting);
    assert!(matches!(
      commands.try_recv(),
      Ok(Command::StartFindElements { .. })
    ));
  }

  #[test]
  fn frame_messages_reach_the_controller() {
    let mut tab = tab();
    let now = Instant::now();
    tab.on_keyboard_action(KeyboardAction::EnterHintsMode(keyhint::HintsMode::Click), now);

    let visible = json!({ "frame_id": 0, "message": { "type": "frame:visible" } });
    let elements = json!({
      "frame_id": 0,
      "message": {
        "type": "frame:visible-elements",
        "data": { "elements": [], "numFrames": 0, "durationMs": 1.5 }
      }
    });
    dispatch_json(&mut tab, "frame", &visible, now);
    dispatch_json(&mut tab, "frame", &elements, now);

    assert_eq!(tab.phase(), Phase::Hinting);
  }

  #[test]
  fn keypress_outside_hinting_is_ignored() {
    let mut tab = tab();
    let response = dispatch_json(&mut tab, "keypress", &json!({ "key": "f" }), Instant::now());
    assert_eq!(response, json!({ "result": null }));
    assert_eq!(tab.phase(), Phase::Idle);
  }

  #[test]
  fn invalid_options_are_reported_and_ignored() {
    let mut tab = tab();
    let before = tab.options().clone();
    let args = json!({ "options": { "chars": "a" } });

    let response = dispatch_json(&mut tab, "set_options", &args, Instant::now());

    assert!(response["error"].is_string());
    assert_eq!(tab.options(), &before);
  }

  #[test]
  fn unknown_method_is_an_error() {
    let mut tab = tab();
    let response = dispatch_json(&mut tab, "explode", &JsonValue::Null, Instant::now());
    let error = response["error"].as_str().unwrap();
    assert!(error.starts_with("Invalid request"));
  }

  #[test]
  fn stop_returns_to_idle() {
    let mut tab = tab();
    let now = Instant::now();
    tab.enter_hints_mode(keyhint::HintsMode::Select, now);

    dispatch(&mut tab, RpcRequest::Stop, now).unwrap();

    assert_eq!(tab.phase(), Phase::Idle);
    assert_eq!(tab.next_deadline(), None);
  }
}
