use async_trait::async_trait;
use meetup_core::effects::{LiveEvent, LiveNotifier, NotifyError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex as AsyncMutex};

/// Notifier that records every event it receives
///
/// Events published from spawned tasks arrive asynchronously; use
/// [`RecordingNotifier::next_event`] to wait for them.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    sender: mpsc::UnboundedSender<LiveEvent>,
    receiver: Arc<AsyncMutex<mpsc::UnboundedReceiver<LiveEvent>>>,
    seen: Arc<Mutex<Vec<LiveEvent>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    /// Create a notifier that accepts every event
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Arc::new(AsyncMutex::new(receiver)),
            seen: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a notifier that rejects every event after recording it
    pub fn failing() -> Self {
        let notifier = Self::new();
        notifier.failing.store(true, Ordering::SeqCst);
        notifier
    }

    /// Wait up to one second for the next event
    pub async fn next_event(&self) -> Option<LiveEvent> {
        let mut receiver = self.receiver.lock().await;
        tokio::time::timeout(Duration::from_secs(1), receiver.recv())
            .await
            .ok()
            .flatten()
    }

    /// Every event received so far
    pub fn events(&self) -> Vec<LiveEvent> {
        self.seen.lock().clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveNotifier for RecordingNotifier {
    async fn notify(&self, event: LiveEvent) -> Result<(), NotifyError> {
        self.seen.lock().push(event.clone());
        let _ = self.sender.send(event);
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Unavailable("socket hub down".into()));
        }
        Ok(())
    }
}
