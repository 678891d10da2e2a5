//! Message handler that applies client messages to the caller's own player

use log::debug;

use crate::core::message_timer::MessageClearTimer;
use crate::core::message_types::{ChatPayload, ClientMessage, PlayerInfoPayload, PositionPayload};
use crate::core::server::SharedServerManager;
use crate::error::Result;

/// What a dispatched message did to the world
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The caller's player was updated and the new state broadcast
    Applied,
    /// The caller's player no longer exists; nothing changed
    PlayerMissing,
    /// A chat message was set and its expiry scheduled
    MessageSet(MessageClearTimer),
    /// Tag not handled by this server
    Ignored,
}

/// Handles incoming client messages and routes them to the matching mutation
pub struct MessageHandler {
    server: SharedServerManager,
}

impl MessageHandler {
    /// Create a new message handler
    pub fn new(server: SharedServerManager) -> Self {
        Self { server }
    }

    /// Decode one raw frame and apply it on behalf of `player_id`
    pub fn handle_client_message(&self, player_id: &str, frame: &[u8]) -> Result<DispatchOutcome> {
        let message = ClientMessage::from_slice(frame)?;
        self.dispatch(player_id, message)
    }

    pub fn dispatch(&self, player_id: &str, message: ClientMessage) -> Result<DispatchOutcome> {
        match message {
            ClientMessage::SetPlayerInfo(info) => self.handle_set_player_info(player_id, info),
            ClientMessage::UpdatePosition(position) => {
                self.handle_update_position(player_id, position)
            }
            ClientMessage::SendMessage(chat) => self.handle_send_message(player_id, chat),
            ClientMessage::Unknown(kind) => {
                debug!("Ignoring unknown message type '{}' from {}", kind, player_id);
                Ok(DispatchOutcome::Ignored)
            }
        }
    }

    fn handle_set_player_info(&self, player_id: &str, info: PlayerInfoPayload) -> Result<DispatchOutcome> {
        let PlayerInfoPayload { name, sprite_type } = info;
        let applied = self.server.players().mutate(player_id, |player| {
            player.name = name;
            player.sprite_type = sprite_type;
        })?;
        self.server.broadcast_safe("setPlayerInfo");
        Ok(outcome(applied))
    }

    fn handle_update_position(&self, player_id: &str, position: PositionPayload) -> Result<DispatchOutcome> {
        let applied = self.server.players().mutate(player_id, |player| {
            player.x = position.x;
            player.y = position.y;
        })?;
        self.server.broadcast_safe("updatePosition");
        Ok(outcome(applied))
    }

    fn handle_send_message(&self, player_id: &str, chat: ChatPayload) -> Result<DispatchOutcome> {
        let applied = self
            .server
            .players()
            .mutate(player_id, |player| player.message = chat.message)?;
        self.server.broadcast_safe("sendMessage");

        // Scheduled even when the player is gone; the clear then degrades to a no-op
        let timer = MessageClearTimer::schedule(
            self.server.clone(),
            player_id.to_string(),
            self.server.settings().message_ttl,
        );

        if applied {
            Ok(DispatchOutcome::MessageSet(timer))
        } else {
            Ok(DispatchOutcome::PlayerMissing)
        }
    }
}

fn outcome(applied: bool) -> DispatchOutcome {
    if applied {
        DispatchOutcome::Applied
    } else {
        DispatchOutcome::PlayerMissing
    }
}
