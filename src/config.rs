//! Server configuration module
//! Handles the listen address and the world tuning parameters

use crate::constants::{
    DEFAULT_HOST, DEFAULT_MESSAGE_TTL_SECS, DEFAULT_PLAYER_NAME, DEFAULT_PORT,
    DEFAULT_SPRITE_TYPE, SPAWN_ORIGIN_X, SPAWN_ORIGIN_Y, SPAWN_SPACING,
};
use crate::error::{Result, SyncError};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long a chat message stays attached to its player
    pub message_ttl: Duration,
}

/// Parameters that shape the shared world: where players spawn and what they look like
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSettings {
    pub spawn_origin_x: f64,
    pub spawn_origin_y: f64,
    /// Horizontal offset applied per already-present player
    pub spawn_spacing: f64,
    pub default_name: String,
    pub default_sprite_type: String,
    pub message_ttl: Duration,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            spawn_origin_x: SPAWN_ORIGIN_X,
            spawn_origin_y: SPAWN_ORIGIN_Y,
            spawn_spacing: SPAWN_SPACING,
            default_name: DEFAULT_PLAYER_NAME.to_string(),
            default_sprite_type: DEFAULT_SPRITE_TYPE.to_string(),
            message_ttl: Duration::from_secs(DEFAULT_MESSAGE_TTL_SECS),
        }
    }
}

impl WorldSettings {
    /// Spawn position for a player joining when `existing` players are present
    pub fn spawn_position(&self, existing: usize) -> (f64, f64) {
        (
            self.spawn_origin_x + existing as f64 * self.spawn_spacing,
            self.spawn_origin_y,
        )
    }
}

impl ServerConfig {
    /// Fixed configuration for tests
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            message_ttl: Duration::from_secs(DEFAULT_MESSAGE_TTL_SECS),
        }
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SPRITE_SYNC_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_var(&lookup, "SPRITE_SYNC_PORT", DEFAULT_PORT)?;
        let ttl_secs = parse_var(&lookup, "SPRITE_SYNC_MESSAGE_TTL_SECS", DEFAULT_MESSAGE_TTL_SECS)?;

        if ttl_secs == 0 {
            return Err(SyncError::ConfigError(
                "SPRITE_SYNC_MESSAGE_TTL_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            message_ttl: Duration::from_secs(ttl_secs),
        })
    }

    /// World settings derived from this configuration
    pub fn world_settings(&self) -> WorldSettings {
        WorldSettings {
            message_ttl: self.message_ttl,
            ..WorldSettings::default()
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            SyncError::ConfigError(format!("{} has invalid value '{}': {}", key, raw, e))
        }),
        None => Ok(default),
    }
}
