//! Deferred clearing of chat messages
//!
//! Each `sendMessage` schedules one timer. When it fires it blanks the
//! player's message and broadcasts, whether or not a newer message arrived in
//! between. If the player has already left, the clear is a no-op but the
//! broadcast still happens.

use std::time::Duration;
use tokio::task::JoinHandle;

use crate::core::server::SharedServerManager;

#[derive(Debug)]
pub struct MessageClearTimer {
    player_id: String,
    handle: JoinHandle<()>,
}

impl MessageClearTimer {
    /// Start a timer that clears `player_id`'s message after `delay`
    pub fn schedule(server: SharedServerManager, player_id: String, delay: Duration) -> Self {
        let target = player_id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            match server.players().mutate(&target, |player| player.message.clear()) {
                Ok(true) => log::debug!("Cleared message for player {}", target),
                Ok(false) => log::debug!("Player {} left before message expiry", target),
                Err(e) => log::error!("Failed to clear message for player {}: {}", target, e),
            }
            server.broadcast_safe("message expiry");
        });

        Self { player_id, handle }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop the timer before it fires. Has no effect once it has fired.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Wait for the timer to fire (or to be cancelled)
    pub async fn wait(self) {
        if let Err(e) = self.handle.await {
            if !e.is_cancelled() {
                log::error!("Message clear task for {} failed: {}", self.player_id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldSettings;
    use crate::core::server::create_server_manager;

    #[tokio::test(start_paused = true)]
    async fn test_clear_fires_after_delay() {
        let server = create_server_manager(WorldSettings::default());
        server.players().spawn("p1", server.settings()).unwrap();
        server
            .players()
            .mutate("p1", |p| p.message = "hi".to_string())
            .unwrap();

        let timer = MessageClearTimer::schedule(server.clone(), "p1".to_string(), Duration::from_secs(5));

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(server.players().get("p1").unwrap().unwrap().message, "hi");

        timer.wait().await;
        assert_eq!(server.players().get("p1").unwrap().unwrap().message, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_for_departed_player_is_noop() {
        let server = create_server_manager(WorldSettings::default());
        let timer = MessageClearTimer::schedule(server.clone(), "gone".to_string(), Duration::from_secs(5));

        timer.wait().await;
        assert!(server.players().is_empty().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_leaves_message() {
        let server = create_server_manager(WorldSettings::default());
        server.players().spawn("p1", server.settings()).unwrap();
        server
            .players()
            .mutate("p1", |p| p.message = "stay".to_string())
            .unwrap();

        let timer = MessageClearTimer::schedule(server.clone(), "p1".to_string(), Duration::from_secs(5));
        assert_eq!(timer.player_id(), "p1");
        timer.cancel();
        timer.wait().await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(server.players().get("p1").unwrap().unwrap().message, "stay");
    }
}
