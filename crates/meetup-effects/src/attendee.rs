//! Attendee directory backed by a roster exported from the ticketing platform

use async_trait::async_trait;
use meetup_core::effects::{AttendeeDirectory, AttendeeError};
use meetup_core::ExternalAttendeeId;
use std::collections::BTreeMap;

/// Preloaded attendee roster
///
/// An attendee missing from the roster is an error, not an empty name: the
/// draw must not announce a winner it cannot identify.
#[derive(Debug, Clone, Default)]
pub struct RosterAttendeeDirectory {
    names: BTreeMap<ExternalAttendeeId, String>,
}

impl RosterAttendeeDirectory {
    /// Create a directory from an exported roster
    pub fn new(names: BTreeMap<ExternalAttendeeId, String>) -> Self {
        Self { names }
    }

    /// Number of attendees on the roster
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the roster is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The roster
    pub fn names(&self) -> &BTreeMap<ExternalAttendeeId, String> {
        &self.names
    }
}

#[async_trait]
impl AttendeeDirectory for RosterAttendeeDirectory {
    async fn attendee_display_name(
        &self,
        id: &ExternalAttendeeId,
    ) -> Result<String, AttendeeError> {
        self.names
            .get(id)
            .cloned()
            .ok_or_else(|| AttendeeError::UnknownAttendee(id.clone()))
    }
}
