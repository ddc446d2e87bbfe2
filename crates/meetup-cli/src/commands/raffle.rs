//! Raffle draws and claims

use crate::services::Services;
use anyhow::Result;
use clap::Subcommand;
use meetup_authorization::{MeetupOperation, ResourceRefs};
use meetup_core::{MeetupId, TicketId};
use meetup_raffle::DrawOutcome;
use serde_json::{json, Value};

/// Raffle subcommands
#[derive(Debug, Subcommand)]
pub enum RaffleCommand {
    /// Draw winners among checked-in tickets
    Roll {
        /// Organizer token
        #[arg(long)]
        token: String,

        /// Meetup to draw for
        #[arg(long)]
        meetup: MeetupId,

        /// Winners to draw
        #[arg(long, default_value = "1")]
        count: u32,
    },

    /// Count a drawn win against a ticket
    Claim {
        /// Organizer token
        #[arg(long)]
        token: String,

        /// Winning ticket
        #[arg(long)]
        ticket: TicketId,
    },
}

/// Run a raffle subcommand
pub async fn handle(services: &Services, command: RaffleCommand) -> Result<Value> {
    match command {
        RaffleCommand::Roll {
            token,
            meetup,
            count,
        } => {
            services
                .evaluator
                .authorize(
                    Some(&token),
                    MeetupOperation::RollRaffle,
                    &ResourceRefs::none().meetup(meetup),
                )
                .await?;

            let winners = if count == 1 {
                match services.raffle.roll_winner(&meetup).await? {
                    DrawOutcome::Winner(winner) => vec![winner],
                    DrawOutcome::NoEligibleEntrants => Vec::new(),
                }
            } else {
                services.raffle.roll_winners(&meetup, count).await?
            };
            if !winners.is_empty() {
                services.persist().await?;
            }
            Ok(json!({ "meetup": meetup, "winners": winners }))
        }
        RaffleCommand::Claim { token, ticket } => {
            services
                .evaluator
                .authorize(
                    Some(&token),
                    MeetupOperation::ClaimRaffleWin,
                    &ResourceRefs::none().ticket(ticket),
                )
                .await?;

            let outcome = services.raffle.claim_winner(&ticket).await?.into_result()?;
            services.persist().await?;
            Ok(serde_json::to_value(outcome)?)
        }
    }
}
