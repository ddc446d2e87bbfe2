//! Live-update broadcast channel
//!
//! Socket sessions for display screens subscribe to the channel; every
//! published event fans out to all of them. Publishing with no subscribers
//! is not an error: nobody is watching the screen yet.

use async_trait::async_trait;
use meetup_core::config::LiveConfig;
use meetup_core::effects::{LiveEvent, LiveNotifier, NotifyError};
use tokio::sync::broadcast;

/// Broadcast notifier for live displays
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<LiveEvent>,
}

impl BroadcastNotifier {
    /// Create a notifier buffering `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Create a notifier from the `[live]` config section
    pub fn from_config(config: &LiveConfig) -> Self {
        Self::new(config.channel_capacity)
    }

    /// Subscribe a display session
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.sender.subscribe()
    }

    /// Number of connected display sessions
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl LiveNotifier for BroadcastNotifier {
    async fn notify(&self, event: LiveEvent) -> Result<(), NotifyError> {
        match self.sender.send(event) {
            Ok(delivered) => {
                tracing::debug!(delivered, "live event published");
            }
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(meetup = %event.meetup_id(), "live event dropped, no subscribers");
            }
        }
        Ok(())
    }
}
