//! Request handlers for the server endpoint

pub mod websocket;

// Re-export the websocket handler
pub use websocket::{handle_ws_client, ws_route};
