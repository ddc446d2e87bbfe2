//! Resource references supplied by the request path

use meetup_core::{MeetupId, RaffleId, TicketId, UserId};
use serde::{Deserialize, Serialize};

/// Ids of the resources a request addresses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRefs {
    /// Account the request acts on
    pub user: Option<UserId>,
    /// Ticket the request acts on
    pub ticket: Option<TicketId>,
    /// Meetup the request acts on
    pub meetup: Option<MeetupId>,
    /// Raffle record the request acts on
    pub raffle: Option<RaffleId>,
}

impl ResourceRefs {
    /// No resource references
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the user reference
    pub fn user(mut self, id: UserId) -> Self {
        self.user = Some(id);
        self
    }

    /// Set the ticket reference
    pub fn ticket(mut self, id: TicketId) -> Self {
        self.ticket = Some(id);
        self
    }

    /// Set the meetup reference
    pub fn meetup(mut self, id: MeetupId) -> Self {
        self.meetup = Some(id);
        self
    }

    /// Set the raffle reference
    pub fn raffle(mut self, id: RaffleId) -> Self {
        self.raffle = Some(id);
        self
    }

    /// Check if no references are set
    pub fn is_empty(&self) -> bool {
        self.user.is_none()
            && self.ticket.is_none()
            && self.meetup.is_none()
            && self.raffle.is_none()
    }
}
