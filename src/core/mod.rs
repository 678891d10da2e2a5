//! Core functionality for the shared world server

pub mod broadcast;
pub mod connection;
pub mod message_handler;
pub mod message_timer;
pub mod message_types;
pub mod player;
pub mod player_table;
pub mod registry;
pub mod server;
pub mod session;

// Re-export main components for convenience
pub use broadcast::{broadcast_game_state, BroadcastStats};
pub use connection::Connection;
pub use message_handler::{DispatchOutcome, MessageHandler};
pub use message_timer::MessageClearTimer;
pub use message_types::{ClientMessage, ServerMessage};
pub use player::Player;
pub use player_table::{GameSnapshot, PlayerTable};
pub use registry::ConnectionRegistry;
pub use server::{create_server_manager, ServerManager, SharedServerManager};
pub use session::{run_session, SessionGuard, SessionReport};
