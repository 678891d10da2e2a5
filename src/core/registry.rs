use std::collections::HashMap;
use std::sync::RwLock;

use crate::core::connection::Connection;
use crate::error::Result;

// Tracks every live output channel and the player it belongs to.
// Guarded independently of the player table; the two locks are never nested.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<String, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    // Register a new client connection
    pub fn register(&self, connection: Connection) -> Result<()> {
        let mut connections = self.connections.write()?;
        connections.insert(connection.id.clone(), connection);
        Ok(())
    }

    // Remove a client connection
    pub fn unregister(&self, connection_id: &str) -> Result<Option<Connection>> {
        let mut connections = self.connections.write()?;
        Ok(connections.remove(connection_id))
    }

    /// Invoke `f` once per live connection under shared access, returning how many were visited
    pub fn for_each<F>(&self, mut f: F) -> Result<usize>
    where
        F: FnMut(&Connection),
    {
        let connections = self.connections.read()?;
        for connection in connections.values() {
            f(connection);
        }
        Ok(connections.len())
    }

    // Get current clients count
    pub fn client_count(&self) -> Result<usize> {
        Ok(self.connections.read()?.len())
    }

    pub fn player_ids(&self) -> Result<Vec<String>> {
        let connections = self.connections.read()?;
        Ok(connections.values().map(|c| c.player_id.clone()).collect())
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
