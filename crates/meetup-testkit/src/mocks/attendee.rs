use async_trait::async_trait;
use meetup_core::effects::{AttendeeDirectory, AttendeeError};
use meetup_core::ExternalAttendeeId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Attendee directory with call counting and an outage switch
#[derive(Debug, Clone, Default)]
pub struct MockAttendeeDirectory {
    names: Arc<Mutex<HashMap<ExternalAttendeeId, String>>>,
    unreachable: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl MockAttendeeDirectory {
    /// Empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a display name
    pub fn with_attendee(self, id: impl Into<ExternalAttendeeId>, name: &str) -> Self {
        self.names.lock().insert(id.into(), name.to_string());
        self
    }

    /// Make every lookup fail with `Unreachable` until restored
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Lookups performed so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttendeeDirectory for MockAttendeeDirectory {
    async fn attendee_display_name(
        &self,
        id: &ExternalAttendeeId,
    ) -> Result<String, AttendeeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(AttendeeError::Unreachable("ticketing platform offline".into()));
        }
        self.names
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| AttendeeError::UnknownAttendee(id.clone()))
    }
}
