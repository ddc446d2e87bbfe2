//! Meetup Effects - Production Handlers
//!
//! Stateless or single-process implementations of the effect traits defined
//! in `meetup-core`. Deterministic and failure-injecting handlers belong in
//! `meetup-testkit`, not here.

#![forbid(unsafe_code)]

pub mod attendee;
pub mod memory;
pub mod notify;
pub mod random;
pub mod time;
pub mod token;

pub use attendee::RosterAttendeeDirectory;
pub use memory::{MemoryStore, StoreSnapshot};
pub use notify::BroadcastNotifier;
pub use random::RealRandomHandler;
pub use time::RealTimeHandler;
pub use token::HmacTokenAuthority;
