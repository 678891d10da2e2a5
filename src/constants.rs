// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const WS_PATH: &str = "ws";

// Player defaults
pub const DEFAULT_PLAYER_NAME: &str = "Player";
pub const DEFAULT_SPRITE_TYPE: &str = "ghost";

// Spawn layout: each new player is shifted right by the current player count
pub const SPAWN_ORIGIN_X: f64 = 100.0;
pub const SPAWN_ORIGIN_Y: f64 = 100.0;
pub const SPAWN_SPACING: f64 = 50.0;

// Chat bubbles disappear after this many seconds
pub const DEFAULT_MESSAGE_TTL_SECS: u64 = 5;

// Frames queued per connection before new broadcasts are dropped for it
pub const OUTBOUND_QUEUE_CAPACITY: usize = 64;
