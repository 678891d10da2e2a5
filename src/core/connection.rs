//! WebSocket connection handle
//! The outbound half of one client session

use log::warn;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;
use warp::ws::Message;

use crate::error::{Result, SyncError};

/// Represents the output channel of a single WebSocket connection
#[derive(Clone)]
pub struct Connection {
    pub id: String,
    /// Player owned by this connection
    pub player_id: String,
    pub sender: mpsc::Sender<Message>,
}

impl Connection {
    /// Create a new connection with a unique ID
    pub fn new(player_id: String, sender: mpsc::Sender<Message>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            player_id,
            sender,
        }
    }

    /// Queue a prepared frame on this connection without waiting.
    /// A full queue drops the frame; the next broadcast carries the whole state again.
    pub fn send(&self, message: Message) -> Result<()> {
        match self.sender.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(
                    "Outbound queue full for connection {} (player {}), dropping frame",
                    self.id, self.player_id
                );
                Err(SyncError::ConnectionError(format!(
                    "outbound queue full for connection {}",
                    self.id
                )))
            }
            Err(TrySendError::Closed(_)) => {
                warn!(
                    "Failed to send message to connection {} (player {})",
                    self.id, self.player_id
                );
                Err(SyncError::ConnectionClosed)
            }
        }
    }

    /// Send a text message through this connection
    pub fn send_text(&self, text: &str) -> Result<()> {
        self.send(Message::text(text))
    }

    /// Whether the writer side of this connection has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_text_reaches_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let connection = Connection::new("p1".to_string(), tx);

        connection.send_text("hello").unwrap();
        let received = rx.try_recv().unwrap();
        assert_eq!(received.to_str().unwrap(), "hello");
    }

    #[test]
    fn test_send_fails_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(4);
        let connection = Connection::new("p1".to_string(), tx);
        drop(rx);

        assert!(connection.is_closed());
        assert!(matches!(
            connection.send_text("lost"),
            Err(SyncError::ConnectionClosed)
        ));
    }

    #[test]
    fn test_full_queue_drops_frame() {
        let (tx, mut rx) = mpsc::channel(1);
        let connection = Connection::new("p1".to_string(), tx);

        connection.send_text("first").unwrap();
        assert!(matches!(
            connection.send_text("second"),
            Err(SyncError::ConnectionError(_))
        ));
        assert!(!connection.is_closed());

        assert_eq!(rx.try_recv().unwrap().to_str().unwrap(), "first");
        assert!(rx.try_recv().is_err());
        connection.send_text("third").unwrap();
        assert_eq!(rx.try_recv().unwrap().to_str().unwrap(), "third");
    }
}
