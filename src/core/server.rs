//! Shared world state that coordinates the player table and the connection registry

use std::sync::Arc;
use tokio::sync::mpsc;
use warp::ws::Message as WsMessage;

use crate::config::WorldSettings;
use crate::core::broadcast::{broadcast_game_state, BroadcastStats};
use crate::core::connection::Connection;
use crate::core::player::Player;
use crate::core::player_table::PlayerTable;
use crate::core::registry::ConnectionRegistry;
use crate::error::Result;

/// Owns both guarded resources. Operations never hold the two locks at once.
pub struct ServerManager {
    players: PlayerTable,
    connections: ConnectionRegistry,
    settings: WorldSettings,
}

impl ServerManager {
    /// Create a new server manager
    pub fn new(settings: WorldSettings) -> Self {
        Self {
            players: PlayerTable::new(),
            connections: ConnectionRegistry::new(),
            settings,
        }
    }

    pub fn players(&self) -> &PlayerTable {
        &self.players
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Bring a new client into the world: spawn its player, register its
    /// output channel, then broadcast so everyone (itself included) sees it.
    pub fn join(&self, sender: mpsc::Sender<WsMessage>) -> Result<Connection> {
        let player = self.players.spawn(&Player::generate_id(), &self.settings)?;
        let connection = Connection::new(player.id.clone(), sender);

        if let Err(e) = self.connections.register(connection.clone()) {
            // Keep one player per live connection even when registration fails
            if let Err(remove_err) = self.players.remove(&player.id) {
                log::error!("Failed to roll back player {}: {}", player.id, remove_err);
            }
            return Err(e);
        }

        log::info!(
            "Player {} joined at ({}, {}) on connection {}",
            player.id,
            player.x,
            player.y,
            connection.id
        );
        self.broadcast_safe("join");

        Ok(connection)
    }

    /// Remove a client from the world and broadcast its departure
    pub fn leave(&self, connection_id: &str, player_id: &str) -> Result<()> {
        let unregistered = self.connections.unregister(connection_id);
        let removed = self.players.remove(player_id);
        self.broadcast_safe("leave");

        unregistered?;
        removed?;
        log::info!("Player {} left (connection {})", player_id, connection_id);
        Ok(())
    }

    /// Send the full game state to every connection
    pub fn broadcast(&self) -> Result<BroadcastStats> {
        broadcast_game_state(&self.players, &self.connections)
    }

    /// Broadcast with error logging, for callers that cannot act on a failure
    pub fn broadcast_safe(&self, context: &str) {
        match self.broadcast() {
            Ok(stats) => log::debug!(
                "Broadcast game state after {} to {} connections",
                context,
                stats.sent_count
            ),
            Err(e) => log::error!("Failed to broadcast game state after {}: {}", context, e),
        }
    }

    pub fn player_count(&self) -> Result<usize> {
        self.players.len()
    }

    pub fn connection_count(&self) -> Result<usize> {
        self.connections.client_count()
    }
}

impl Default for ServerManager {
    fn default() -> Self {
        Self::new(WorldSettings::default())
    }
}

// Shared reference to server manager
pub type SharedServerManager = Arc<ServerManager>;

pub fn create_server_manager(settings: WorldSettings) -> SharedServerManager {
    Arc::new(ServerManager::new(settings))
}
