//! Sprite Sync - an authoritative shared-world server over WebSocket
//!
//! Every connected client owns one player. Any change a client makes is
//! applied to the server's player table and the full table is broadcast to
//! every client.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;

// Re-export main components
pub use config::*;
pub use constants::*;
