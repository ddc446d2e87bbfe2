//! Raffle draw engine
//!
//! `roll_winner` reads the meetup's tickets, filters the eligible ones,
//! picks uniformly at random, resolves the winner's display name, and appends
//! a [`RaffleRecord`]. Nothing is written when there is no eligible ticket or
//! when a display name cannot be resolved. `claim_winner` delegates the
//! check-and-increment to [`RaffleLedger::claim_ticket_win`], which is atomic
//! per ticket.
//!
//! Live notifications are spawned onto the runtime and never block or fail
//! the operation that produced them.

use crate::eligibility::{eligible_tickets, pending_wins, PendingWins};
use meetup_core::effects::{
    AttendeeDirectory, LiveEvent, LiveNotifier, PhysicalTimeEffects, RaffleLedger, RandomEffects,
    ResourceStore,
};
use meetup_core::{
    ClaimOutcome, MeetupError, MeetupId, RaffleConfig, RaffleId, RaffleRecord, Result, Ticket,
    TicketHolder, TicketId, TicketRaffleState, WinnerNumber,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as DrawLock, OwnedMutexGuard};
use tracing::{debug, info, warn};

/// A drawn winner as announced to the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerInfo {
    /// Winning ticket
    pub ticket_id: TicketId,
    /// Name to announce
    pub display_name: String,
    /// Record the draw was written to
    pub raffle_id: RaffleId,
    /// Position within the draw
    pub winner_number: WinnerNumber,
}

/// Result of a single-winner draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DrawOutcome {
    /// A ticket was drawn and recorded
    Winner(WinnerInfo),
    /// No ticket qualified; nothing was written
    NoEligibleEntrants,
}

impl DrawOutcome {
    /// Winner, if one was drawn
    pub fn winner(&self) -> Option<&WinnerInfo> {
        match self {
            DrawOutcome::Winner(info) => Some(info),
            DrawOutcome::NoEligibleEntrants => None,
        }
    }
}

type DrawLocks = Mutex<HashMap<MeetupId, Arc<DrawLock<()>>>>;

/// Held for the length of one serialized draw
///
/// Dropping it releases the meetup's lock and removes the map entry once no
/// other draw holds or awaits it, so the map only holds meetups mid-draw.
struct DrawPermit<'a> {
    locks: &'a DrawLocks,
    meetup: MeetupId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for DrawPermit<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock();
        if locks
            .get(&self.meetup)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.meetup);
        }
    }
}

/// Draws and claims raffle wins for meetups
pub struct RaffleEngine {
    resources: Arc<dyn ResourceStore>,
    ledger: Arc<dyn RaffleLedger>,
    random: Arc<dyn RandomEffects>,
    time: Arc<dyn PhysicalTimeEffects>,
    attendees: Option<Arc<dyn AttendeeDirectory>>,
    notifier: Option<Arc<dyn LiveNotifier>>,
    config: RaffleConfig,
    draw_locks: DrawLocks,
}

impl std::fmt::Debug for RaffleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RaffleEngine")
            .field("config", &self.config)
            .field("attendees", &self.attendees.is_some())
            .field("notifier", &self.notifier.is_some())
            .finish_non_exhaustive()
    }
}

impl RaffleEngine {
    /// Create an engine with no attendee directory and no live notifier
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        ledger: Arc<dyn RaffleLedger>,
        random: Arc<dyn RandomEffects>,
        time: Arc<dyn PhysicalTimeEffects>,
        config: RaffleConfig,
    ) -> Self {
        Self {
            resources,
            ledger,
            random,
            time,
            attendees: None,
            notifier: None,
            config,
            draw_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve external attendees' names through `directory`
    pub fn with_attendee_directory(mut self, directory: Arc<dyn AttendeeDirectory>) -> Self {
        self.attendees = Some(directory);
        self
    }

    /// Publish draw and claim events to `notifier`
    pub fn with_notifier(mut self, notifier: Arc<dyn LiveNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Draw one winner for `meetup`
    pub async fn roll_winner(&self, meetup: &MeetupId) -> Result<DrawOutcome> {
        let mut winners = self.draw(meetup, 1).await?;
        Ok(match winners.pop() {
            Some(winner) => DrawOutcome::Winner(winner),
            None => DrawOutcome::NoEligibleEntrants,
        })
    }

    /// Draw up to `count` distinct winners into one record
    ///
    /// Returns fewer winners than asked when the pool is smaller, and none
    /// (with nothing written) when it is empty.
    pub async fn roll_winners(&self, meetup: &MeetupId, count: u32) -> Result<Vec<WinnerInfo>> {
        if count == 0 || count > self.config.max_winners_per_draw {
            return Err(MeetupError::invalid(format!(
                "winner count must be between 1 and {}, got {count}",
                self.config.max_winners_per_draw
            )));
        }
        self.draw(meetup, count as usize).await
    }

    /// Count one win against `ticket`
    ///
    /// `NotEligible` is returned as a value, not an error; use
    /// [`ClaimOutcome::into_result`] to treat it as an invariant violation.
    pub async fn claim_winner(&self, ticket: &TicketId) -> Result<ClaimOutcome> {
        let outcome = self
            .ledger
            .claim_ticket_win(ticket)
            .await?
            .ok_or_else(|| MeetupError::not_found(format!("ticket {ticket}")))?;

        match &outcome {
            ClaimOutcome::Claimed {
                ticket_id,
                wins,
                entries,
                winner,
            } => {
                let state = TicketRaffleState::from_counts(*wins, *entries);
                info!(
                    ticket = %ticket_id,
                    wins,
                    entries,
                    exhausted = !state.is_eligible(),
                    winner = ?winner,
                    "Raffle win claimed"
                );
                self.publish_claim(*ticket_id, *wins);
            }
            ClaimOutcome::NotEligible {
                ticket_id,
                wins,
                entries,
            } => {
                warn!(ticket = %ticket_id, wins, entries, "Claim rejected, no entries left");
            }
        }
        Ok(outcome)
    }

    async fn draw(&self, meetup: &MeetupId, count: usize) -> Result<Vec<WinnerInfo>> {
        let _guard = self.lock_draws(meetup).await;

        if self.resources.find_meetup(meetup).await?.is_none() {
            return Err(MeetupError::not_found(format!("meetup {meetup}")));
        }

        let tickets = self.resources.tickets_for_meetup(meetup).await?;
        let pending = if self.config.serialize_draws {
            let records = self.resources.raffle_records_for_meetup(meetup).await?;
            pending_wins(&records)
        } else {
            PendingWins::new()
        };
        let mut pool = eligible_tickets(tickets, meetup, &pending);
        debug!(meetup = %meetup, eligible = pool.len(), "Raffle pool built");

        if pool.is_empty() {
            info!(meetup = %meetup, "No eligible entrants");
            return Ok(Vec::new());
        }

        let mut picked = Vec::with_capacity(count.min(pool.len()));
        while picked.len() < count && !pool.is_empty() {
            let index = self.random.random_index(pool.len()).await;
            picked.push(pool.swap_remove(index));
        }

        // All names must resolve before anything is written
        let mut names = Vec::with_capacity(picked.len());
        for ticket in &picked {
            names.push(self.display_name(ticket).await?);
        }

        let drawn_at = self.time.now_unix_secs().await?;
        let record = RaffleRecord::from_draw(
            RaffleId::new(),
            *meetup,
            drawn_at,
            picked.iter().map(|t| t.id),
        );
        self.ledger.append_raffle_record(record.clone()).await?;

        let winners: Vec<WinnerInfo> = record
            .winners
            .iter()
            .zip(names)
            .map(|(winner, display_name)| WinnerInfo {
                ticket_id: winner.ticket_id,
                display_name,
                raffle_id: record.id,
                winner_number: winner.winner_number,
            })
            .collect();

        for winner in &winners {
            info!(
                meetup = %meetup,
                raffle = %winner.raffle_id,
                ticket = %winner.ticket_id,
                number = %winner.winner_number,
                "Raffle winner drawn"
            );
            self.publish(LiveEvent::RaffleWinner {
                meetup_id: *meetup,
                raffle_id: winner.raffle_id,
                ticket_id: winner.ticket_id,
                winner_number: winner.winner_number,
                display_name: winner.display_name.clone(),
            });
        }
        Ok(winners)
    }

    async fn lock_draws(&self, meetup: &MeetupId) -> Option<DrawPermit<'_>> {
        if !self.config.serialize_draws {
            return None;
        }
        let lock = self.draw_locks.lock().entry(*meetup).or_default().clone();
        Some(DrawPermit {
            locks: &self.draw_locks,
            meetup: *meetup,
            guard: Some(lock.lock_owned().await),
        })
    }

    async fn display_name(&self, ticket: &Ticket) -> Result<String> {
        match &ticket.holder {
            TicketHolder::External(attendee) => {
                let directory = self.attendees.as_ref().ok_or_else(|| {
                    MeetupError::external(format!(
                        "ticket {} is linked to attendee {attendee} but no attendee directory is configured",
                        ticket.id
                    ))
                })?;
                directory
                    .attendee_display_name(attendee)
                    .await
                    .map_err(|err| {
                        warn!(ticket = %ticket.id, error = %err, "Attendee lookup failed, draw aborted");
                        MeetupError::from(err)
                    })
            }
            TicketHolder::User(_) | TicketHolder::Unlinked => Ok(ticket.name.clone()),
        }
    }

    fn publish(&self, event: LiveEvent) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(err) = notifier.notify(event).await {
                warn!(error = %err, "Live notification failed");
            }
        });
    }

    fn publish_claim(&self, ticket_id: TicketId, wins: u32) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        let resources = self.resources.clone();
        tokio::spawn(async move {
            let meetup_id = match resources.find_ticket(&ticket_id).await {
                Ok(Some(ticket)) => ticket.meetup_id,
                Ok(None) => return,
                Err(err) => {
                    warn!(ticket = %ticket_id, error = %err, "Claim notification skipped");
                    return;
                }
            };
            let event = LiveEvent::WinnerClaimed {
                meetup_id,
                ticket_id,
                wins,
            };
            if let Err(err) = notifier.notify(event).await {
                warn!(error = %err, "Live notification failed");
            }
        });
    }
}
