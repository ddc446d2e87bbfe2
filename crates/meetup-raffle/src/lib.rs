//! # Meetup Raffle - Draw Engine
//!
//! Picks raffle winners among a meetup's checked-in tickets and counts claimed
//! wins against each ticket's entries.
//!
//! - [`eligibility`]: which tickets may be drawn right now
//! - [`engine`]: [`RaffleEngine`] with `roll_winner`, `roll_winners`, and
//!   `claim_winner`
//!
//! Draws only read ticket counters. A ticket stays in the pool until claims
//! use up its entries; the claim is the one atomic check-and-increment.

#![forbid(unsafe_code)]

pub mod eligibility;
pub mod engine;

pub use eligibility::{eligible_tickets, is_eligible, pending_wins, PendingWins};
pub use engine::{DrawOutcome, RaffleEngine, WinnerInfo};
pub use meetup_core::TicketRaffleState;
