//! Effect interfaces
//!
//! Every collaborator the evaluator and raffle engine talk to is a trait here.
//! Production handlers live in `meetup-effects`; deterministic handlers for
//! tests live in `meetup-testkit`.
//!
//! | Trait | Category | Used by |
//! |---|---|---|
//! | `IdentityStore` | persistence | authorization |
//! | `ResourceStore` | persistence | authorization, raffle |
//! | `RaffleLedger` | persistence (writes) | raffle |
//! | `TokenVerifier` | crypto | authorization |
//! | `AttendeeDirectory` | external | raffle |
//! | `LiveNotifier` | external, fire-and-forget | raffle |
//! | `RandomEffects` | infrastructure | raffle |
//! | `PhysicalTimeEffects` | infrastructure | tokens, raffle |

pub mod attendee;
pub mod notify;
pub mod random;
pub mod store;
pub mod time;
pub mod token;

pub use attendee::{AttendeeDirectory, AttendeeError};
pub use notify::{LiveEvent, LiveNotifier, NotifyError};
pub use random::RandomEffects;
pub use store::{
    IdentityStore, RaffleLedger, RaffleWithMeetup, ResourceStore, StoreError, TicketWithMeetup,
};
pub use time::{PhysicalTimeEffects, TimeError};
pub use token::{TokenClaims, TokenError, TokenVerifier};
