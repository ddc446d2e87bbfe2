//! Meetup Test Fixtures
//!
//! Seeded identifiers, a ticket builder, and two ready-made scenarios: a
//! general authorization cast ([`StandardScenario`]) and the two-ticket raffle
//! setup ([`RaffleScenario`]).

use crate::mocks::ManualClock;
use meetup_core::{
    ExternalAttendeeId, Identity, Meetup, MeetupId, RaffleId, RaffleRecord, Ticket, TicketHolder,
    TicketId, UserId,
};
use meetup_effects::{HmacTokenAuthority, MemoryStore, StoreSnapshot};
use std::sync::Arc;

/// Fixed "now" for fixtures (2023-11-14T22:13:20Z)
pub const TEST_EPOCH_SECS: u64 = 1_700_000_000;

/// Token signing secret used by fixtures
pub const TEST_SECRET: &str = "meetup-testkit-signing-secret";

/// Token lifetime used by fixtures
pub const TEST_TOKEN_TTL_SECS: u64 = 3600;

/// Create a test user ID with a given seed.
pub fn test_user_id(seed: u8) -> UserId {
    UserId::from_bytes([seed; 16])
}

/// Create a test meetup ID with a given seed.
pub fn test_meetup_id(seed: u8) -> MeetupId {
    MeetupId::from_bytes([seed; 16])
}

/// Create a test ticket ID with a given seed.
pub fn test_ticket_id(seed: u8) -> TicketId {
    TicketId::from_bytes([seed; 16])
}

/// Create a test raffle ID with a given seed.
pub fn test_raffle_id(seed: u8) -> RaffleId {
    RaffleId::from_bytes([seed; 16])
}

/// Token authority over a [`ManualClock`] using [`TEST_SECRET`]
pub fn test_token_authority(clock: &ManualClock) -> Arc<HmacTokenAuthority> {
    Arc::new(HmacTokenAuthority::new(
        TEST_SECRET,
        TEST_TOKEN_TTL_SECS,
        Arc::new(clock.clone()),
    ))
}

/// Builder for tickets with explicit raffle counters
#[derive(Debug, Clone)]
pub struct TicketBuilder {
    ticket: Ticket,
}

impl TicketBuilder {
    /// Unlinked, not checked in, one entry
    pub fn new(seed: u8, meetup_id: MeetupId) -> Self {
        Self {
            ticket: Ticket::new(
                test_ticket_id(seed),
                meetup_id,
                TicketHolder::Unlinked,
                format!("ticket-{seed}"),
            ),
        }
    }

    /// Link to an account
    pub fn owned_by(mut self, user: UserId) -> Self {
        self.ticket.holder = TicketHolder::User(user);
        self
    }

    /// Link to an external attendee record
    pub fn external(mut self, id: impl Into<ExternalAttendeeId>) -> Self {
        self.ticket.holder = TicketHolder::External(id.into());
        self
    }

    /// Set the registration name
    pub fn named(mut self, name: &str) -> Self {
        self.ticket.name = name.to_string();
        self
    }

    /// Mark as scanned in
    pub fn checked_in(mut self) -> Self {
        self.ticket.is_checked_in = true;
        self
    }

    /// Set raffle entries
    pub fn entries(mut self, entries: u32) -> Self {
        self.ticket.raffle_entries = entries;
        self
    }

    /// Set raffle wins
    pub fn wins(mut self, wins: u32) -> Self {
        self.ticket.raffle_wins = wins;
        self
    }

    /// Finish
    pub fn build(self) -> Ticket {
        self.ticket
    }
}

/// Authorization cast around one meetup
///
/// - `organizer` organizes `meetup`
/// - `outside_organizer` has the organizer flag but is not on `meetup`
/// - `admin` is an admin account with no meetup role
/// - `attendee` owns `attendee_ticket`
/// - `stranger` owns nothing
/// - `raffle` is a past draw of `meetup` that picked `attendee_ticket`
#[derive(Debug, Clone)]
pub struct StandardScenario {
    /// Seeded store
    pub store: MemoryStore,
    /// Clock behind `tokens`
    pub clock: ManualClock,
    /// Token authority
    pub tokens: Arc<HmacTokenAuthority>,
    /// Organizer of `meetup`
    pub organizer: Identity,
    /// Organizer account not on `meetup`
    pub outside_organizer: Identity,
    /// Admin account
    pub admin: Identity,
    /// Holder of `attendee_ticket`
    pub attendee: Identity,
    /// Account with no tickets
    pub stranger: Identity,
    /// The meetup
    pub meetup: Meetup,
    /// Checked-in ticket with one entry owned by `attendee`
    pub attendee_ticket: Ticket,
    /// Past draw of `meetup`
    pub raffle: RaffleRecord,
}

impl StandardScenario {
    /// Build the scenario
    pub fn new() -> Self {
        let organizer = Identity::organizer(test_user_id(1), "Olga Organizer");
        let outside_organizer = Identity::organizer(test_user_id(2), "Otto Outsider");
        let admin = Identity::admin(test_user_id(3), "Ada Admin");
        let attendee = Identity::attendee(test_user_id(4), "Tess Attendee");
        let stranger = Identity::attendee(test_user_id(5), "Sam Stranger");

        let meetup = Meetup::new(test_meetup_id(1), "Rust Night", [organizer.id]);
        let other_meetup = Meetup::new(test_meetup_id(2), "Go Night", [outside_organizer.id]);

        let attendee_ticket = TicketBuilder::new(1, meetup.id)
            .owned_by(attendee.id)
            .named("Tess")
            .checked_in()
            .build();
        let raffle = RaffleRecord::from_draw(
            test_raffle_id(1),
            meetup.id,
            TEST_EPOCH_SECS - 60,
            [attendee_ticket.id],
        );

        let snapshot = StoreSnapshot {
            identities: vec![
                organizer.clone(),
                outside_organizer.clone(),
                admin.clone(),
                attendee.clone(),
                stranger.clone(),
            ],
            meetups: vec![meetup.clone(), other_meetup],
            tickets: vec![attendee_ticket.clone()],
            raffles: vec![raffle.clone()],
        };
        let store = MemoryStore::from_snapshot(snapshot).expect("fixture snapshot is valid");
        let clock = ManualClock::default();
        let tokens = test_token_authority(&clock);

        Self {
            store,
            clock,
            tokens,
            organizer,
            outside_organizer,
            admin,
            attendee,
            stranger,
            meetup,
            attendee_ticket,
            raffle,
        }
    }

    /// Issue a valid token for `identity`
    pub async fn token_for(&self, identity: &Identity) -> String {
        self.tokens
            .issue(identity)
            .await
            .expect("fixture token issues")
    }
}

impl Default for StandardScenario {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-ticket raffle setup
///
/// `t1` is checked in with two entries; `t2` has three entries but never
/// checked in, so every draw must pick `t1` until it is exhausted.
#[derive(Debug, Clone)]
pub struct RaffleScenario {
    /// Seeded store
    pub store: MemoryStore,
    /// Organizer of `meetup`
    pub organizer: Identity,
    /// The meetup
    pub meetup: Meetup,
    /// Checked in, 2 entries, 0 wins
    pub t1: Ticket,
    /// Not checked in, 3 entries, 0 wins
    pub t2: Ticket,
}

impl RaffleScenario {
    /// Build the scenario
    pub fn new() -> Self {
        let organizer = Identity::organizer(test_user_id(10), "Rita Raffle");
        let meetup = Meetup::new(test_meetup_id(10), "Raffle Night", [organizer.id]);
        let t1 = TicketBuilder::new(11, meetup.id)
            .owned_by(test_user_id(11))
            .named("T1")
            .checked_in()
            .entries(2)
            .build();
        let t2 = TicketBuilder::new(12, meetup.id)
            .owned_by(test_user_id(12))
            .named("T2")
            .entries(3)
            .build();

        let snapshot = StoreSnapshot {
            identities: vec![organizer.clone()],
            meetups: vec![meetup.clone()],
            tickets: vec![t1.clone(), t2.clone()],
            raffles: Vec::new(),
        };
        let store = MemoryStore::from_snapshot(snapshot).expect("fixture snapshot is valid");

        Self {
            store,
            organizer,
            meetup,
            t1,
            t2,
        }
    }
}

impl Default for RaffleScenario {
    fn default() -> Self {
        Self::new()
    }
}
