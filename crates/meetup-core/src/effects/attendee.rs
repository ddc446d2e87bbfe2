//! External ticketing attendee lookup

use crate::identifiers::ExternalAttendeeId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for attendee lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum AttendeeError {
    /// Ticketing platform could not be reached
    #[error("attendee directory unreachable: {0}")]
    Unreachable(String),
    /// Platform has no such attendee
    #[error("unknown attendee {0}")]
    UnknownAttendee(ExternalAttendeeId),
}

/// Resolves display names of attendees registered on the ticketing platform
#[async_trait]
pub trait AttendeeDirectory: Send + Sync {
    /// Display name for an external attendee
    async fn attendee_display_name(&self, id: &ExternalAttendeeId)
        -> Result<String, AttendeeError>;
}
