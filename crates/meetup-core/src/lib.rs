//! Meetup Core - Foundation Types and Effect Interfaces
//!
//! This crate provides the vocabulary shared by every other meetup crate. It
//! contains no storage, no token crypto, and no randomness of its own; those
//! live behind the effect traits in [`effects`] and are implemented by
//! `meetup-effects` (production) and `meetup-testkit` (deterministic mocks).
//!
//! # Layers
//!
//! - Identifiers: `UserId`, `MeetupId`, `TicketId`, `RaffleId`, `ExternalAttendeeId`
//! - Domain: `Identity`, `Meetup`, `Ticket` and its `TicketRaffleState`,
//!   `RaffleRecord`, `Winner`
//! - Effects: identity/resource stores, raffle ledger, token verifier,
//!   attendee directory, live notifier, random and time sources
//! - Errors: a single [`MeetupError`] taxonomy with kind-level mapping
//! - Config: [`MeetupConfig`] loaded from TOML and the environment

#![forbid(unsafe_code)]

/// Unified error handling
pub mod errors;

/// Typed identifiers for users, meetups, tickets, and raffle records
pub mod identifiers;

/// Persisted domain entities
pub mod domain;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Configuration model, loading, and validation
pub mod config;

pub use config::{AuthConfig, LiveConfig, LogConfig, MeetupConfig, RaffleConfig};
pub use domain::{
    ClaimOutcome, Identity, Meetup, RaffleRecord, Ticket, TicketHolder, TicketRaffleState, Winner,
    WinnerNumber,
};
pub use errors::{ErrorKind, MeetupError, Result};
pub use identifiers::{ExternalAttendeeId, MeetupId, RaffleId, TicketId, UserId};
