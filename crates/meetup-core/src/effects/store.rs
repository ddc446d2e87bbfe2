//! Persistence effect traits
//!
//! Reads are split from writes. Relations are never loaded lazily: a caller
//! that needs a ticket's meetup asks for [`TicketWithMeetup`] explicitly.

use crate::domain::{ClaimOutcome, Identity, Meetup, RaffleRecord, Ticket};
use crate::identifiers::{MeetupId, RaffleId, TicketId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum StoreError {
    /// Backend could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Read failed
    #[error("read failed: {0}")]
    ReadFailed(String),
    /// Write failed
    #[error("write failed: {0}")]
    WriteFailed(String),
    /// Stored data violates a schema constraint
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// A ticket loaded together with the meetup it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketWithMeetup {
    /// The ticket
    pub ticket: Ticket,
    /// Its meetup, including organizers
    pub meetup: Meetup,
}

/// A raffle record loaded together with the meetup it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaffleWithMeetup {
    /// The record
    pub record: RaffleRecord,
    /// Its meetup, including organizers
    pub meetup: Meetup,
}

/// Identity lookups
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Find an identity by id
    async fn find_identity(&self, id: &UserId) -> Result<Option<Identity>, StoreError>;
}

/// Resource lookups
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Find a meetup with its organizers
    async fn find_meetup(&self, id: &MeetupId) -> Result<Option<Meetup>, StoreError>;

    /// Find a ticket without relations
    async fn find_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError>;

    /// Find a ticket and its meetup
    async fn find_ticket_with_meetup(
        &self,
        id: &TicketId,
    ) -> Result<Option<TicketWithMeetup>, StoreError>;

    /// Find a raffle record and its meetup
    async fn find_raffle_with_meetup(
        &self,
        id: &RaffleId,
    ) -> Result<Option<RaffleWithMeetup>, StoreError>;

    /// All tickets registered for a meetup
    async fn tickets_for_meetup(&self, id: &MeetupId) -> Result<Vec<Ticket>, StoreError>;

    /// All raffle records of a meetup in draw order
    async fn raffle_records_for_meetup(
        &self,
        id: &MeetupId,
    ) -> Result<Vec<RaffleRecord>, StoreError>;
}

/// Raffle writes
///
/// Implementations must make `claim_ticket_win` atomic per ticket: the
/// eligibility check and the increment happen under one lock or one
/// compare-and-swap, so concurrent claims serialize.
#[async_trait]
pub trait RaffleLedger: Send + Sync {
    /// Append a record with its winners in one write
    async fn append_raffle_record(&self, record: RaffleRecord) -> Result<(), StoreError>;

    /// Check `wins < entries`, increment `wins`, and mark the oldest unclaimed
    /// winner entry for the ticket as claimed. Returns `None` if the ticket
    /// does not exist.
    async fn claim_ticket_win(&self, id: &TicketId) -> Result<Option<ClaimOutcome>, StoreError>;
}
