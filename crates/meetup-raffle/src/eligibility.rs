//! Draw-time eligibility filter

use meetup_core::{MeetupId, RaffleRecord, Ticket, TicketId};
use std::collections::HashMap;

/// Drawn-but-unclaimed wins per ticket
pub type PendingWins = HashMap<TicketId, u32>;

/// A ticket qualifies iff it belongs to `meetup`, is checked in, and has an
/// unused entry
pub fn is_eligible(ticket: &Ticket, meetup: &MeetupId) -> bool {
    &ticket.meetup_id == meetup
        && ticket.is_checked_in
        && ticket.raffle_state().is_eligible()
}

/// Count unclaimed winner entries across `records`
pub fn pending_wins<'a>(records: impl IntoIterator<Item = &'a RaffleRecord>) -> PendingWins {
    let mut pending = PendingWins::new();
    for record in records {
        for winner in record.winners.iter().filter(|w| !w.claimed) {
            *pending.entry(winner.ticket_id).or_default() += 1;
        }
    }
    pending
}

/// Filter `tickets` down to the draw pool
///
/// Unclaimed wins in `pending` count as used entries, so a ticket with one
/// entry and one pending win is left out.
pub fn eligible_tickets(
    tickets: impl IntoIterator<Item = Ticket>,
    meetup: &MeetupId,
    pending: &PendingWins,
) -> Vec<Ticket> {
    tickets
        .into_iter()
        .filter(|ticket| is_eligible(ticket, meetup))
        .filter(|ticket| {
            let held = pending.get(&ticket.id).copied().unwrap_or(0);
            ticket.raffle_wins.saturating_add(held) < ticket.raffle_entries
        })
        .collect()
}
