//! Door check-in

use crate::services::Services;
use anyhow::{anyhow, Result};
use clap::Subcommand;
use meetup_authorization::{MeetupOperation, ResourceRefs};
use meetup_core::TicketId;
use serde_json::Value;

/// Ticket subcommands
#[derive(Debug, Subcommand)]
pub enum TicketCommand {
    /// Mark a ticket as present
    CheckIn {
        /// Organizer token
        #[arg(long)]
        token: String,

        /// Ticket to check in
        #[arg(long)]
        ticket: TicketId,
    },
}

/// Run a ticket subcommand
pub async fn handle(services: &Services, command: TicketCommand) -> Result<Value> {
    match command {
        TicketCommand::CheckIn { token, ticket } => {
            services
                .evaluator
                .authorize(
                    Some(&token),
                    MeetupOperation::CheckInTicket,
                    &ResourceRefs::none().ticket(ticket),
                )
                .await?;

            let updated = services
                .store
                .check_in_ticket(&ticket)
                .await?
                .ok_or_else(|| anyhow!("ticket {ticket} not found"))?;
            services.persist().await?;
            tracing::info!(ticket = %ticket, "Ticket checked in");
            Ok(serde_json::to_value(updated)?)
        }
    }
}
