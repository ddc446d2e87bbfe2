//! Meetup Testing Infrastructure
//!
//! Deterministic and stateful stand-ins for the effect traits, plus fixtures
//! that seed a [`meetup_effects::MemoryStore`] with a known cast of users,
//! meetups, and tickets.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! meetup-testkit = { path = "../meetup-testkit" }
//! ```
//!
//! ```rust,no_run
//! use meetup_testkit::*;
//!
//! # async fn demo() {
//! let scenario = StandardScenario::new();
//! let token = scenario.token_for(&scenario.organizer).await;
//! # }
//! ```

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
