//! Stateful mock handlers
//!
//! Each mock implements one effect trait from `meetup_core::effects` with
//! deterministic behavior and, where useful, failure injection.

mod attendee;
mod notify;
mod random;
mod store;
mod time;

pub use attendee::MockAttendeeDirectory;
pub use notify::RecordingNotifier;
pub use random::{MockRandomHandler, ScriptedRandomHandler};
pub use store::FailingStore;
pub use time::ManualClock;
