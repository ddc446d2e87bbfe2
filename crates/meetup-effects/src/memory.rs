//! Single-process store handler
//!
//! Holds identities, meetups, tickets, and raffle records behind one
//! `tokio::sync::RwLock`. Claims take the write lock for the whole
//! check-and-increment, which is what makes them atomic per ticket. The
//! state can be exported to and restored from a JSON-friendly snapshot.

use async_trait::async_trait;
use meetup_core::domain::{ClaimOutcome, Identity, Meetup, RaffleRecord, Ticket};
use meetup_core::effects::{
    IdentityStore, RaffleLedger, RaffleWithMeetup, ResourceStore, StoreError, TicketWithMeetup,
};
use meetup_core::{MeetupId, RaffleId, TicketId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Serializable image of a [`MemoryStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    /// Accounts
    pub identities: Vec<Identity>,
    /// Meetups with organizers
    pub meetups: Vec<Meetup>,
    /// Tickets with raffle counters
    pub tickets: Vec<Ticket>,
    /// Raffle records in draw order
    pub raffles: Vec<RaffleRecord>,
}

#[derive(Debug, Default)]
struct StoreState {
    identities: HashMap<UserId, Identity>,
    meetups: HashMap<MeetupId, Meetup>,
    // Ordered so meetup ticket listings are stable across runs
    tickets: BTreeMap<TicketId, Ticket>,
    raffles: Vec<RaffleRecord>,
}

impl StoreState {
    fn meetup(&self, id: &MeetupId) -> Result<Meetup, StoreError> {
        self.meetups
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::Corrupt(format!("dangling meetup reference {id}")))
    }
}

/// In-memory store implementing every persistence effect
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a store from a snapshot, rejecting dangling references and
    /// tickets whose wins exceed their entries
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, StoreError> {
        let mut state = StoreState::default();
        for identity in snapshot.identities {
            state.identities.insert(identity.id, identity);
        }
        for meetup in snapshot.meetups {
            state.meetups.insert(meetup.id, meetup);
        }
        for ticket in snapshot.tickets {
            if !state.meetups.contains_key(&ticket.meetup_id) {
                return Err(StoreError::Corrupt(format!(
                    "ticket {} references unknown meetup {}",
                    ticket.id, ticket.meetup_id
                )));
            }
            if ticket.raffle_wins > ticket.raffle_entries {
                return Err(StoreError::Corrupt(format!(
                    "ticket {} has {} wins for {} entries",
                    ticket.id, ticket.raffle_wins, ticket.raffle_entries
                )));
            }
            state.tickets.insert(ticket.id, ticket);
        }
        for record in snapshot.raffles {
            if !state.meetups.contains_key(&record.meetup_id) {
                return Err(StoreError::Corrupt(format!(
                    "raffle {} references unknown meetup {}",
                    record.id, record.meetup_id
                )));
            }
            state.raffles.push(record);
        }
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Export the current state
    pub async fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read().await;
        let mut identities: Vec<_> = state.identities.values().cloned().collect();
        identities.sort_by_key(|i| i.id);
        let mut meetups: Vec<_> = state.meetups.values().cloned().collect();
        meetups.sort_by_key(|m| m.id);
        StoreSnapshot {
            identities,
            meetups,
            tickets: state.tickets.values().cloned().collect(),
            raffles: state.raffles.clone(),
        }
    }

    /// Insert or replace an identity
    pub async fn insert_identity(&self, identity: Identity) {
        self.state
            .write()
            .await
            .identities
            .insert(identity.id, identity);
    }

    /// Insert or replace a meetup
    pub async fn insert_meetup(&self, meetup: Meetup) {
        self.state.write().await.meetups.insert(meetup.id, meetup);
    }

    /// Insert or replace a ticket; its meetup must already exist
    pub async fn insert_ticket(&self, ticket: Ticket) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.meetups.contains_key(&ticket.meetup_id) {
            return Err(StoreError::WriteFailed(format!(
                "unknown meetup {}",
                ticket.meetup_id
            )));
        }
        state.tickets.insert(ticket.id, ticket);
        Ok(())
    }

    /// Mark a ticket as scanned in at the door. Returns the updated ticket, or
    /// `None` if it does not exist. Checking in twice is a no-op.
    pub async fn check_in_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError> {
        let mut state = self.state.write().await;
        Ok(state.tickets.get_mut(id).map(|ticket| {
            ticket.is_checked_in = true;
            ticket.clone()
        }))
    }

    /// Number of raffle records written
    pub async fn raffle_count(&self) -> usize {
        self.state.read().await.raffles.len()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_identity(&self, id: &UserId) -> Result<Option<Identity>, StoreError> {
        Ok(self.state.read().await.identities.get(id).cloned())
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn find_meetup(&self, id: &MeetupId) -> Result<Option<Meetup>, StoreError> {
        Ok(self.state.read().await.meetups.get(id).cloned())
    }

    async fn find_ticket(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError> {
        Ok(self.state.read().await.tickets.get(id).cloned())
    }

    async fn find_ticket_with_meetup(
        &self,
        id: &TicketId,
    ) -> Result<Option<TicketWithMeetup>, StoreError> {
        let state = self.state.read().await;
        let Some(ticket) = state.tickets.get(id) else {
            return Ok(None);
        };
        let meetup = state.meetup(&ticket.meetup_id)?;
        Ok(Some(TicketWithMeetup {
            ticket: ticket.clone(),
            meetup,
        }))
    }

    async fn find_raffle_with_meetup(
        &self,
        id: &RaffleId,
    ) -> Result<Option<RaffleWithMeetup>, StoreError> {
        let state = self.state.read().await;
        let Some(record) = state.raffles.iter().find(|r| &r.id == id) else {
            return Ok(None);
        };
        let meetup = state.meetup(&record.meetup_id)?;
        Ok(Some(RaffleWithMeetup {
            record: record.clone(),
            meetup,
        }))
    }

    async fn tickets_for_meetup(&self, id: &MeetupId) -> Result<Vec<Ticket>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .tickets
            .values()
            .filter(|t| &t.meetup_id == id)
            .cloned()
            .collect())
    }

    async fn raffle_records_for_meetup(
        &self,
        id: &MeetupId,
    ) -> Result<Vec<RaffleRecord>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .raffles
            .iter()
            .filter(|r| &r.meetup_id == id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RaffleLedger for MemoryStore {
    async fn append_raffle_record(&self, record: RaffleRecord) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.meetups.contains_key(&record.meetup_id) {
            return Err(StoreError::WriteFailed(format!(
                "unknown meetup {}",
                record.meetup_id
            )));
        }
        if state.raffles.iter().any(|r| r.id == record.id) {
            return Err(StoreError::WriteFailed(format!(
                "raffle {} already recorded",
                record.id
            )));
        }
        state.raffles.push(record);
        Ok(())
    }

    async fn claim_ticket_win(&self, id: &TicketId) -> Result<Option<ClaimOutcome>, StoreError> {
        let mut state = self.state.write().await;
        let StoreState {
            tickets, raffles, ..
        } = &mut *state;

        let Some(ticket) = tickets.get_mut(id) else {
            return Ok(None);
        };
        let Some(next) = ticket.raffle_state().claim() else {
            return Ok(Some(ClaimOutcome::NotEligible {
                ticket_id: ticket.id,
                wins: ticket.raffle_wins,
                entries: ticket.raffle_entries,
            }));
        };
        ticket.raffle_wins = next.wins();
        let (ticket_id, meetup_id) = (ticket.id, ticket.meetup_id);

        let winner = raffles
            .iter_mut()
            .filter(|r| r.meetup_id == meetup_id)
            .find_map(|record| {
                let raffle_id = record.id;
                record
                    .winners
                    .iter_mut()
                    .find(|w| w.ticket_id == ticket_id && !w.claimed)
                    .map(|w| {
                        w.claimed = true;
                        (raffle_id, w.winner_number)
                    })
            });

        Ok(Some(ClaimOutcome::Claimed {
            ticket_id,
            wins: next.wins(),
            entries: next.entries(),
            winner,
        }))
    }
}
