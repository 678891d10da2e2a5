//! Authoritative table of active players
//!
//! Every operation takes the table lock for exactly one read or mutation and
//! releases it before returning. Callers never perform network I/O while the
//! lock is held.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::config::WorldSettings;
use crate::core::player::Player;
use crate::error::Result;

/// Immutable copy of the table, ordered by player id
pub type GameSnapshot = BTreeMap<String, Player>;

pub struct PlayerTable {
    players: RwLock<HashMap<String, Player>>,
}

impl PlayerTable {
    pub fn new() -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
        }
    }

    /// Return the player stored under `id`, inserting `defaults(count)` first if
    /// there is none. `count` is the number of players present before the insert,
    /// read under the same write lock, so concurrent callers never see the same count.
    pub fn upsert<F>(&self, id: &str, defaults: F) -> Result<Player>
    where
        F: FnOnce(usize) -> Player,
    {
        let mut players = self.players.write()?;
        let count = players.len();
        let player = players
            .entry(id.to_string())
            .or_insert_with(|| defaults(count));
        Ok(player.clone())
    }

    /// Insert a default player for `id`, positioned from the number of players already present
    pub fn spawn(&self, id: &str, settings: &WorldSettings) -> Result<Player> {
        self.upsert(id, |count| {
            let (x, y) = settings.spawn_position(count);
            Player::new(id.to_string(), x, y, settings)
        })
    }

    /// Apply `f` to the player with `id`. Returns `Ok(false)` if the player is gone.
    pub fn mutate<F>(&self, id: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&mut Player),
    {
        let mut players = self.players.write()?;
        match players.get_mut(id) {
            Some(player) => {
                f(player);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&self, id: &str) -> Result<Option<Player>> {
        let mut players = self.players.write()?;
        Ok(players.remove(id))
    }

    /// Consistent copy of the whole table taken under shared access
    pub fn snapshot(&self) -> Result<GameSnapshot> {
        let players = self.players.read()?;
        Ok(players
            .iter()
            .map(|(id, player)| (id.clone(), player.clone()))
            .collect())
    }

    pub fn get(&self, id: &str) -> Result<Option<Player>> {
        let players = self.players.read()?;
        Ok(players.get(id).cloned())
    }

    pub fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.players.read()?.contains_key(id))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.players.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for PlayerTable {
    fn default() -> Self {
        Self::new()
    }
}
