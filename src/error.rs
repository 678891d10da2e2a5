use std::error::Error;
use std::fmt;
use std::sync::PoisonError;

#[derive(Debug)]
pub enum SyncError {
    // Shared state errors
    StateLock(String),

    // Connections errors
    ConnectionError(String),
    ConnectionClosed,

    // Messages errors
    MessageParseError(String),
    PayloadError { kind: String, reason: String },
    SerializationError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateLock(msg) => write!(f, "State lock error: {}", msg),
            Self::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            Self::ConnectionClosed => write!(f, "Connection closed unexpectedly"),
            Self::MessageParseError(msg) => write!(f, "Message parse error: {}", msg),
            Self::PayloadError { kind, reason } => {
                write!(f, "Invalid payload for '{}': {}", kind, reason)
            }
            Self::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for SyncError {}

// Converting from PoisonError to facilitate poisoned lock handling
impl<T> From<PoisonError<T>> for SyncError {
    fn from(err: PoisonError<T>) -> Self {
        SyncError::StateLock(format!("Lock poisoned: {}", err))
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::SerializationError(err.to_string())
    }
}

// Generic result type for sprite-sync
pub type Result<T> = std::result::Result<T, SyncError>;
