//! Operator CLI for the meetup backend
//!
//! Works against a JSON data file holding a store snapshot and the external
//! attendee roster. Every command that changes state authorizes through the
//! same evaluator and operation policy table the HTTP handlers use, then
//! writes the snapshot back.

#![forbid(unsafe_code)]

pub mod commands;
pub mod data;
pub mod services;

pub use commands::{execute, Command};
pub use data::DataFile;
pub use services::Services;
