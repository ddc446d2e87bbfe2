//! Dry-run authorization

use crate::services::Services;
use anyhow::Result;
use clap::Args;
use meetup_authorization::{AuthorizationDecision, MeetupOperation, ResourceRefs};
use meetup_core::{MeetupId, RaffleId, TicketId, UserId};
use serde_json::{json, Value};

/// Arguments for `authorize`
#[derive(Debug, Args)]
pub struct AuthorizeArgs {
    /// Requestor token
    #[arg(long)]
    pub token: String,

    /// Operation name, e.g. `roll-raffle`
    #[arg(long)]
    pub operation: MeetupOperation,

    /// Referenced account
    #[arg(long)]
    pub user: Option<UserId>,

    /// Referenced meetup
    #[arg(long)]
    pub meetup: Option<MeetupId>,

    /// Referenced ticket
    #[arg(long)]
    pub ticket: Option<TicketId>,

    /// Referenced raffle record
    #[arg(long)]
    pub raffle: Option<RaffleId>,
}

impl AuthorizeArgs {
    fn refs(&self) -> ResourceRefs {
        ResourceRefs {
            user: self.user,
            ticket: self.ticket,
            meetup: self.meetup,
            raffle: self.raffle,
        }
    }
}

/// Evaluate the operation's policy and report the decision
pub async fn handle(services: &Services, args: AuthorizeArgs) -> Result<Value> {
    let refs = args.refs();
    let policy = args.operation.policy();
    policy.check_refs(args.operation, &refs)?;

    let decision = services
        .evaluator
        .evaluate(Some(&args.token), &policy.rules, &refs)
        .await;

    let output = match decision {
        AuthorizationDecision::Allow(context) => json!({
            "operation": args.operation,
            "decision": "allow",
            "requestor": context.requestor,
            "meetup": context.meetup.map(|m| m.id),
            "ticket": context.ticket.map(|t| t.id),
            "raffle": context.raffle.map(|r| r.id),
        }),
        AuthorizationDecision::Deny { reason } => json!({
            "operation": args.operation,
            "decision": "deny",
            "reason": reason.to_string(),
        }),
        AuthorizationDecision::NotFound { resource } => json!({
            "operation": args.operation,
            "decision": "not_found",
            "resource": resource,
        }),
        AuthorizationDecision::InternalError => json!({
            "operation": args.operation,
            "decision": "internal_error",
        }),
    };
    Ok(output)
}
