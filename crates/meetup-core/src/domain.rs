//! Domain entities shared by the authorization evaluator and raffle engine
//!
//! These are plain data: lookups and mutations go through the effect traits
//! in [`crate::effects`].

use crate::identifiers::{ExternalAttendeeId, MeetupId, RaffleId, TicketId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Requestor identity as stored in the identity store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Account identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Account may create and run meetups
    pub is_organizer: bool,
    /// Account has site-wide administrative rights
    pub is_admin: bool,
}

impl Identity {
    /// Create a plain attendee identity
    pub fn attendee(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_organizer: false,
            is_admin: false,
        }
    }

    /// Create an organizer identity
    pub fn organizer(id: UserId, name: impl Into<String>) -> Self {
        Self {
            is_organizer: true,
            ..Self::attendee(id, name)
        }
    }

    /// Create an admin identity
    pub fn admin(id: UserId, name: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::attendee(id, name)
        }
    }
}

/// A meetup together with its organizer membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meetup {
    /// Meetup identifier
    pub id: MeetupId,
    /// Title
    pub name: String,
    /// Accounts allowed to manage this meetup
    pub organizers: BTreeSet<UserId>,
}

impl Meetup {
    /// Create a meetup with the given organizers
    pub fn new(
        id: MeetupId,
        name: impl Into<String>,
        organizers: impl IntoIterator<Item = UserId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            organizers: organizers.into_iter().collect(),
        }
    }

    /// Check whether `user` organizes this meetup
    pub fn is_organized_by(&self, user: &UserId) -> bool {
        self.organizers.contains(user)
    }
}

/// Who a ticket belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TicketHolder {
    /// Registered account
    User(UserId),
    /// Attendee record on the external ticketing platform
    External(ExternalAttendeeId),
    /// Walk-in registration with no linked account
    Unlinked,
}

/// A registration for one meetup, carrying raffle counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket identifier
    pub id: TicketId,
    /// Owning meetup
    pub meetup_id: MeetupId,
    /// Holder of the ticket
    pub holder: TicketHolder,
    /// Name entered at registration
    pub name: String,
    /// Scanned in at the door
    pub is_checked_in: bool,
    /// Raffle chances held
    pub raffle_entries: u32,
    /// Raffle chances already consumed by claims
    pub raffle_wins: u32,
}

impl Ticket {
    /// Create an unchecked ticket with a single raffle entry
    pub fn new(
        id: TicketId,
        meetup_id: MeetupId,
        holder: TicketHolder,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            meetup_id,
            holder,
            name: name.into(),
            is_checked_in: false,
            raffle_entries: 1,
            raffle_wins: 0,
        }
    }

    /// Account that owns this ticket, if any
    pub fn owner(&self) -> Option<UserId> {
        match &self.holder {
            TicketHolder::User(id) => Some(*id),
            TicketHolder::External(_) | TicketHolder::Unlinked => None,
        }
    }

    /// Current raffle state of this ticket
    pub fn raffle_state(&self) -> TicketRaffleState {
        TicketRaffleState::from_counts(self.raffle_wins, self.raffle_entries)
    }
}

/// Raffle dimension of a ticket
///
/// ```text
/// Eligible(wins < entries) --claim--> Eligible | Ineligible
/// Ineligible(wins == entries)          (left only by an external entries increase)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TicketRaffleState {
    /// Can still be drawn and claimed
    Eligible {
        /// Wins so far
        wins: u32,
        /// Entries held
        entries: u32,
    },
    /// Entries used up, or none held
    Ineligible {
        /// Wins so far
        wins: u32,
        /// Entries held
        entries: u32,
    },
}

impl TicketRaffleState {
    /// Classify raw counters
    pub fn from_counts(wins: u32, entries: u32) -> Self {
        if entries > 0 && wins < entries {
            Self::Eligible { wins, entries }
        } else {
            Self::Ineligible { wins, entries }
        }
    }

    /// Check if a claim would be accepted
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible { .. })
    }

    /// State after one claim, or `None` if the claim must be rejected
    pub fn claim(self) -> Option<Self> {
        match self {
            Self::Eligible { wins, entries } => Some(Self::from_counts(wins + 1, entries)),
            Self::Ineligible { .. } => None,
        }
    }

    /// Wins so far
    pub fn wins(&self) -> u32 {
        match self {
            Self::Eligible { wins, .. } | Self::Ineligible { wins, .. } => *wins,
        }
    }

    /// Entries held
    pub fn entries(&self) -> u32 {
        match self {
            Self::Eligible { entries, .. } | Self::Ineligible { entries, .. } => *entries,
        }
    }
}

/// 1-based position of a winner within a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WinnerNumber(pub u32);

impl WinnerNumber {
    /// First winner of a draw
    pub const FIRST: Self = Self(1);

    /// Next winner number
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for WinnerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One drawn ticket within a raffle record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    /// Winning ticket
    pub ticket_id: TicketId,
    /// Position within the draw
    pub winner_number: WinnerNumber,
    /// Whether the win has been confirmed by a claim
    pub claimed: bool,
}

/// Append-only log entry for one draw event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaffleRecord {
    /// Record identifier
    pub id: RaffleId,
    /// Meetup the draw belongs to
    pub meetup_id: MeetupId,
    /// Unix seconds at draw time
    pub drawn_at: u64,
    /// Winners in draw order
    pub winners: Vec<Winner>,
}

impl RaffleRecord {
    /// Build a record from tickets in draw order, numbering from 1
    pub fn from_draw(
        id: RaffleId,
        meetup_id: MeetupId,
        drawn_at: u64,
        tickets: impl IntoIterator<Item = TicketId>,
    ) -> Self {
        let mut number = WinnerNumber::FIRST;
        let mut winners = Vec::new();
        for ticket_id in tickets {
            winners.push(Winner {
                ticket_id,
                winner_number: number,
                claimed: false,
            });
            number = number.next();
        }
        Self {
            id,
            meetup_id,
            drawn_at,
            winners,
        }
    }

    /// Unclaimed winner entries for `ticket`
    pub fn pending_for(&self, ticket: &TicketId) -> usize {
        self.winners
            .iter()
            .filter(|w| &w.ticket_id == ticket && !w.claimed)
            .count()
    }
}

/// Result of an atomic claim against the raffle ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClaimOutcome {
    /// The win was counted
    Claimed {
        /// Claimed ticket
        ticket_id: TicketId,
        /// Wins after the claim
        wins: u32,
        /// Entries held
        entries: u32,
        /// Winner entry that was marked claimed, if the win came from a draw
        winner: Option<(RaffleId, WinnerNumber)>,
    },
    /// The ticket had no remaining entries
    NotEligible {
        /// Rejected ticket
        ticket_id: TicketId,
        /// Wins at rejection time
        wins: u32,
        /// Entries held
        entries: u32,
    },
}

impl ClaimOutcome {
    /// Returns `true` if the win was counted
    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Claimed { .. })
    }

    /// Convert a rejection into an invariant violation error
    pub fn into_result(self) -> crate::Result<Self> {
        match self {
            Self::NotEligible {
                ticket_id,
                wins,
                entries,
            } => Err(crate::MeetupError::invariant(format!(
                "ticket {ticket_id} has used {wins} of {entries} raffle entries"
            ))),
            claimed => Ok(claimed),
        }
    }
}
