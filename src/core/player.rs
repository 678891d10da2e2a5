use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::WorldSettings;

/// Server-authoritative record of one connected player's visible state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Transient chat bubble, omitted from the wire while empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(rename = "spriteType")]
    pub sprite_type: String,
    pub name: String,
}

impl Player {
    /// Create a player with default appearance at the given position
    pub fn new(id: String, x: f64, y: f64, settings: &WorldSettings) -> Self {
        Self {
            id,
            x,
            y,
            message: String::new(),
            sprite_type: settings.default_sprite_type.clone(),
            name: settings.default_name.clone(),
        }
    }

    /// Allocate a fresh player identifier
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}
