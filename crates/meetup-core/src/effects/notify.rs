//! Live-update notification effect
//!
//! Events are pushed to display screens over the socket broadcast channel.
//! Delivery is fire-and-forget: a failed notification never fails the
//! operation that produced it.

use crate::domain::WinnerNumber;
use crate::identifiers::{MeetupId, RaffleId, TicketId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Event pushed to live displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A ticket was drawn
    RaffleWinner {
        /// Meetup the draw belongs to
        meetup_id: MeetupId,
        /// Record the winner was appended to
        raffle_id: RaffleId,
        /// Winning ticket
        ticket_id: TicketId,
        /// Position within the draw
        winner_number: WinnerNumber,
        /// Name to announce
        display_name: String,
    },
    /// A win was confirmed
    WinnerClaimed {
        /// Meetup the ticket belongs to
        meetup_id: MeetupId,
        /// Claimed ticket
        ticket_id: TicketId,
        /// Wins after the claim
        wins: u32,
    },
}

impl LiveEvent {
    /// Meetup the event concerns
    pub fn meetup_id(&self) -> MeetupId {
        match self {
            Self::RaffleWinner { meetup_id, .. } | Self::WinnerClaimed { meetup_id, .. } => {
                *meetup_id
            }
        }
    }
}

/// Error type for notifications
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum NotifyError {
    /// Channel closed or transport gone
    #[error("notifier unavailable: {0}")]
    Unavailable(String),
}

/// Publishes live events
#[async_trait]
pub trait LiveNotifier: Send + Sync {
    /// Publish one event
    async fn notify(&self, event: LiveEvent) -> Result<(), NotifyError>;
}
