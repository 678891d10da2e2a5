//! Full-state broadcasting
//!
//! One snapshot, one serialization, the same frame for every connection.
//! The player table lock is released before the registry lock is taken.

use warp::ws::Message as WsMessage;

use crate::core::message_types::ServerMessage;
use crate::core::player_table::PlayerTable;
use crate::core::registry::ConnectionRegistry;
use crate::error::Result;

/// Outcome of one broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BroadcastStats {
    pub total_recipients: usize,
    pub sent_count: usize,
    pub failed_count: usize,
}

impl BroadcastStats {
    pub fn success_rate(&self) -> f64 {
        if self.total_recipients == 0 {
            1.0
        } else {
            self.sent_count as f64 / self.total_recipients as f64
        }
    }
}

/// Serialize the current player table into a `gameState` frame
pub fn render_game_state(players: &PlayerTable) -> Result<String> {
    let snapshot = players.snapshot()?;
    ServerMessage::GameState(snapshot).to_json()
}

/// Push the current game state to every registered connection.
/// Failed writes (closed writer or full queue) are logged and counted;
/// the connection stays registered.
pub fn broadcast_game_state(
    players: &PlayerTable,
    connections: &ConnectionRegistry,
) -> Result<BroadcastStats> {
    let frame = WsMessage::text(render_game_state(players)?);

    let (mut sent_count, mut failed_count) = (0, 0);
    let total_recipients = connections.for_each(|connection| {
        match connection.send(frame.clone()) {
            Ok(()) => sent_count += 1,
            Err(_) => failed_count += 1,
        }
    })?;
    let stats = BroadcastStats {
        total_recipients,
        sent_count,
        failed_count,
    };

    if stats.failed_count > 0 {
        log::warn!(
            "Game state delivered to {}/{} connections",
            stats.sent_count,
            stats.total_recipients
        );
    } else {
        log::trace!("Game state delivered to {} connections", stats.sent_count);
    }

    Ok(stats)
}
