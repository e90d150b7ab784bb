/*!
keyhint-ws - serve tab controllers over WebSocket.

Environment:
- `KEYHINT_WS_PORT` - port to listen on (default 3030)
- `KEYHINT_OPTIONS` - path to an options JSON file (default: built-in options)
- `RUST_LOG` - log filter, see `env_logger`
*/

use keyhint::Options;
use keyhint_ws::{start_server, WebSocketState, DEFAULT_WS_PORT};

fn port() -> u16 {
  match std::env::var("KEYHINT_WS_PORT") {
    Ok(port) => port.parse().unwrap_or_else(|e| {
      log::error!("Invalid KEYHINT_WS_PORT {port:?}: {e}");
      std::process::exit(1);
    }),
    Err(_) => DEFAULT_WS_PORT,
  }
}

fn options() -> Options {
  let Ok(path) = std::env::var("KEYHINT_OPTIONS") else {
    return Options::default();
  };
  let loaded = std::fs::read_to_string(&path)
    .map_err(|e| e.to_string())
    .and_then(|json| Options::from_json(&json).map_err(|e| e.to_string()));
  match loaded {
    Ok(options) => {
      log::info!("Loaded options from {path}");
      options
    }
    Err(e) => {
      log::error!("Failed to load options from {path}: {e}");
      std::process::exit(1);
    }
  }
}

#[tokio::main]
async fn main() {
  env_logger::init();
  start_server(WebSocketState::with_port(options(), port())).await;
}
