/*!
WebSocket server implementation.

Each connection is one tab: it owns a `TabController`, feeds it requests,
wakes it at its deadlines and pushes every emitted command to the client.
*/

use async_broadcast::{Receiver, RecvError};
use axum::{
  extract::{
    ws::{Message, WebSocket, WebSocketUpgrade},
    State,
  },
  response::Response,
  routing::get,
  Router,
};
use keyhint::{Command, Options, TabController, Timings};
use log::error;
use serde_json::{json, Value};
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

/// Default WebSocket server port.
pub const DEFAULT_WS_PORT: u16 = 3030;

/// WebSocket state: what every new tab starts with.
#[derive(Clone)]
pub struct WebSocketState {
  options: Options,
  timings: Timings,
  port: u16,
}

impl std::fmt::Debug for WebSocketState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WebSocketState")
      .field("port", &self.port)
      .finish_non_exhaustive()
  }
}

impl WebSocketState {
  /// Create with default port.
  pub fn new(options: Options) -> Self {
    Self::with_port(options, DEFAULT_WS_PORT)
  }

  /// Create with custom port.
  pub fn with_port(options: Options, port: u16) -> Self {
    Self {
      options,
      timings: Timings::default(),
      port,
    }
  }

  /// Override the controller timings.
  #[must_use]
  pub const fn with_timings(mut self, timings: Timings) -> Self {
    self.timings = timings;
    self
  }

  fn tab(&self) -> keyhint::HintsResult<TabController> {
    TabController::builder()
      .options(self.options.clone())
      .timings(self.timings)
      .build()
  }
}

/// Start the WebSocket server.
pub async fn start_server(ws_state: WebSocketState) {
  let port = ws_state.port;

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods(Any)
    .allow_headers(Any);

  let app = Router::new()
    .route("/ws", get(websocket_handler))
    .layer(cors)
    .with_state(ws_state);

  let addr = format!("127.0.0.1:{port}");
  let listener = match tokio::net::TcpListener::bind(&addr).await {
    Ok(l) => l,
    Err(e) => {
      error!("Failed to bind WebSocket server to {addr}: {e}");
      std::process::exit(1);
    }
  };

  log::info!("WebSocket server: ws://{addr}/ws");

  if let Err(e) = axum::serve(listener, app).await {
    error!("WebSocket server failed: {e}");
    std::process::exit(1);
  }
}

async fn websocket_handler(
  ws: WebSocketUpgrade,
  State(ws_state): State<WebSocketState>,
) -> Response {
  ws.on_upgrade(|socket| handle_websocket(socket, ws_state))
}

async fn handle_websocket(mut socket: WebSocket, ws_state: WebSocketState) {
  let mut tab = match ws_state.tab() {
    Ok(tab) => tab,
    Err(e) => {
      error!("[ws] Cannot start tab: {e}");
      return;
    }
  };
  let mut rx = tab.subscribe();
  log::debug!("[client] connected");

  loop {
    let deadline = tab.next_deadline();

    tokio::select! {
        msg = socket.recv() => {
            match msg {
                Some(Ok(Message::Text(text))) => {
                    let response = handle_request(&text, &mut tab);
                    if flush_commands(&mut socket, &mut rx).await.is_err() {
                        break;
                    }
                    if socket.send(Message::Text(response)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    log::debug!("[client] closed connection");
                    break;
                }
                Some(Err(e)) => {
                    log::warn!("WebSocket error: {e}");
                    break;
                }
                None => {
                    log::debug!("[client] disconnected");
                    break;
                }
                _ => {}
            }
        }

        command = rx.recv() => {
            match command {
                Ok(command) => {
                    if send_command(&mut socket, &command).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Overflowed(n)) => {
                    log::warn!("[ws] Client lagged, dropped {n} commands");
                }
                Err(RecvError::Closed) => break,
            }
        }

        () = sleep_until(deadline) => {
            tab.on_tick(Instant::now());
        }
    }
  }

  tab.stop();
}

/// Wait for the controller's next deadline, or forever if it has none.
async fn sleep_until(deadline: Option<Instant>) {
  match deadline {
    Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
    None => std::future::pending().await,
  }
}

/// Push every command emitted so far, so they arrive before the response.
async fn flush_commands(socket: &mut WebSocket, rx: &mut Receiver<Command>) -> Result<(), axum::Error> {
  while let Ok(command) = rx.try_recv() {
    send_command(socket, &command).await?;
  }
  Ok(())
}

async fn send_command(socket: &mut WebSocket, command: &Command) -> Result<(), axum::Error> {
  match serde_json::to_string(command) {
    Ok(json) => socket.send(Message::Text(json)).await,
    Err(e) => {
      error!("[ws] Cannot serialize {command:?}: {e}");
      Ok(())
    }
  }
}

fn handle_request(request: &str, tab: &mut TabController) -> String {
  let parsed: Result<Value, _> = serde_json::from_str(request);

  let req = match parsed {
    Ok(v) => v,
    Err(e) => return json!({ "error": format!("Invalid JSON: {e}") }).to_string(),
  };

  let id = req.get("id").cloned().unwrap_or(Value::Null);
  let method = req.get("method").and_then(Value::as_str).unwrap_or("");
  let args = req.get("args").cloned().unwrap_or(Value::Null);

  let mut response = crate::rpc::dispatch_json(tab, method, &args, Instant::now());
  if let Some(obj) = response.as_object_mut() {
    obj.insert("id".to_string(), id);
  }
  response.to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use keyhint::Phase;

  fn tab() -> TabController {
    WebSocketState::new(Options::default()).tab().unwrap()
  }

  #[test]
  fn response_carries_request_id() {
    let mut tab = tab();
    let response = handle_request(r#"{"id":7,"method":"state"}"#, &mut tab);
    let response: Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["id"], json!(7));
    assert_eq!(response["result"]["phase"], json!("Idle"));
  }

  #[test]
  fn malformed_json_is_an_error() {
    let mut tab = tab();
    let response = handle_request("{nope", &mut tab);
    let response: Value = serde_json::from_str(&response).unwrap();
    assert!(response["error"].as_str().unwrap().starts_with("Invalid JSON"));
  }

  #[test]
  fn requests_drive_the_controller() {
    let mut tab = tab();
    handle_request(
      r#"{"id":1,"method":"keyboard_action","args":{"action":{"type":"EnterHintsMode","value":"Click"}}}"#,
      &mut tab,
    );
    assert_eq!(tab.phase(), Phase::Collecting);
    assert!(tab.next_deadline().is_some());
  }

  #[test]
  fn state_defaults_to_default_timings() {
    let state = WebSocketState::with_port(Options::default(), 4040);
    assert_eq!(state.port, 4040);
    assert_eq!(state.timings, Timings::default());
  }
}
