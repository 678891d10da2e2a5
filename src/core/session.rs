//! Per-connection session lifecycle
//!
//! `Connecting -> Active -> Terminated`. Joining spawns the player and
//! registers the output channel; the read loop dispatches one frame at a time
//! in arrival order; termination is owned by [`SessionGuard`], whose `Drop`
//! unregisters, removes the player and broadcasts. Because the guard runs on
//! drop, cleanup also happens when the loop panics or the session future is
//! cancelled.

use futures_util::stream::{Stream, StreamExt};
use std::fmt::Display;
use tokio::sync::mpsc;
use warp::ws::Message as WsMessage;

use crate::core::message_handler::{DispatchOutcome, MessageHandler};
use crate::core::message_timer::MessageClearTimer;
use crate::core::server::SharedServerManager;
use crate::error::Result;

/// Releases a session's place in the world exactly once
pub struct SessionGuard {
    server: SharedServerManager,
    connection_id: String,
    player_id: String,
    released: bool,
}

impl SessionGuard {
    pub fn new(server: SharedServerManager, connection_id: String, player_id: String) -> Self {
        Self {
            server,
            connection_id,
            player_id,
            released: false,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Run cleanup now and report the result
    pub fn release(mut self) -> Result<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.server.leave(&self.connection_id, &self.player_id)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if let Err(e) = self.release_inner() {
            log::error!("Failed to clean up session for player {}: {}", self.player_id, e);
        }
    }
}

/// Summary of a finished session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub player_id: String,
    pub messages_applied: usize,
    pub messages_rejected: usize,
}

/// Drive one client from join to termination.
///
/// `incoming` yields inbound frames; `sender` is the outbound channel that
/// gets registered for broadcasts. The loop ends on a close frame, end of
/// stream or the first read error.
pub async fn run_session<S, E>(
    mut incoming: S,
    sender: mpsc::Sender<WsMessage>,
    server: SharedServerManager,
) -> Result<SessionReport>
where
    S: Stream<Item = std::result::Result<WsMessage, E>> + Unpin,
    E: Display,
{
    let connection = server.join(sender)?;
    let guard = SessionGuard::new(server.clone(), connection.id.clone(), connection.player_id.clone());
    drop(connection);

    let handler = MessageHandler::new(server.clone());
    let mut report = SessionReport {
        player_id: guard.player_id().to_string(),
        ..SessionReport::default()
    };
    let mut pending_clears: Vec<MessageClearTimer> = Vec::new();

    while let Some(result) = incoming.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                log::warn!("WebSocket error for player {}: {}", guard.player_id(), e);
                break;
            }
        };

        if msg.is_close() {
            log::debug!("Close frame from player {}", guard.player_id());
            break;
        }
        if !msg.is_text() && !msg.is_binary() {
            continue;
        }

        match handler.handle_client_message(guard.player_id(), msg.as_bytes()) {
            Ok(DispatchOutcome::MessageSet(timer)) => {
                pending_clears.retain(|t| !t.is_finished());
                pending_clears.push(timer);
                report.messages_applied += 1;
            }
            Ok(DispatchOutcome::Applied) => report.messages_applied += 1,
            Ok(DispatchOutcome::PlayerMissing) | Ok(DispatchOutcome::Ignored) => {}
            Err(e) => {
                log::warn!("Dropping message from player {}: {}", guard.player_id(), e);
                report.messages_rejected += 1;
            }
        }
    }

    // Pending clears outlive the session and fire against a missing player
    drop(pending_clears);
    guard.release()?;

    Ok(report)
}
