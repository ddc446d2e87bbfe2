//! Token issuing
//!
//! Holding the signing secret is the operator's credential, so issuing is not
//! itself authorized through the evaluator.

use crate::services::Services;
use anyhow::{anyhow, Result};
use clap::Subcommand;
use meetup_core::effects::IdentityStore;
use meetup_core::UserId;
use serde_json::{json, Value};

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Issue a token for an existing account
    Issue {
        /// Account to issue for
        #[arg(long)]
        user: UserId,
    },
}

/// Run a token subcommand
pub async fn handle(services: &Services, command: TokenCommand) -> Result<Value> {
    match command {
        TokenCommand::Issue { user } => {
            let identity = services
                .store
                .find_identity(&user)
                .await?
                .ok_or_else(|| anyhow!("user {user} not found"))?;
            let token = services.tokens.issue(&identity).await?;
            tracing::info!(user = %user, "Token issued");
            Ok(json!({ "user": user, "token": token }))
        }
    }
}
