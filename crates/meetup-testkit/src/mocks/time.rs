use async_trait::async_trait;
use meetup_core::effects::{PhysicalTimeEffects, TimeError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
    unavailable: Arc<AtomicBool>,
}

impl ManualClock {
    /// Create a clock frozen at `unix_secs`
    pub fn new(unix_secs: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(unix_secs)),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Advance time by `secs`
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Set absolute time
    pub fn set(&self, unix_secs: u64) {
        self.now.store(unix_secs, Ordering::SeqCst);
    }

    /// Current reading
    pub fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    /// Make every read fail with [`TimeError::ClockUnavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(crate::fixtures::TEST_EPOCH_SECS)
    }
}

#[async_trait]
impl PhysicalTimeEffects for ManualClock {
    async fn now_unix_secs(&self) -> Result<u64, TimeError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TimeError::ClockUnavailable {
                reason: "ntp peer 10.0.0.5 unreachable".to_string(),
            });
        }
        Ok(self.now())
    }
}
