//! CLI command definitions and dispatch

pub mod authorize;
pub mod raffle;
pub mod ticket;
pub mod token;

use crate::services::Services;
use anyhow::Result;
use clap::Subcommand;
use meetup_core::MeetupConfig;
use serde_json::Value;
use std::path::Path;

pub use authorize::AuthorizeArgs;
pub use raffle::RaffleCommand;
pub use ticket::TicketCommand;
pub use token::TokenCommand;

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Issue requestor tokens
    #[command(subcommand)]
    Token(TokenCommand),

    /// Evaluate an operation's rules for a token without running it
    Authorize(AuthorizeArgs),

    /// Draw and claim raffle winners
    #[command(subcommand)]
    Raffle(RaffleCommand),

    /// Door operations on tickets
    #[command(subcommand)]
    Ticket(TicketCommand),
}

/// Run `command` against the data file at `data`, returning JSON output
pub async fn execute(command: Command, config: &MeetupConfig, data: &Path) -> Result<Value> {
    let services = Services::open(config, data)?;
    match command {
        Command::Token(cmd) => token::handle(&services, cmd).await,
        Command::Authorize(args) => authorize::handle(&services, args).await,
        Command::Raffle(cmd) => raffle::handle(&services, cmd).await,
        Command::Ticket(cmd) => ticket::handle(&services, cmd).await,
    }
}
