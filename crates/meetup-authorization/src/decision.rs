//! Authorization decisions and the per-request context

use crate::rules::Rule;
use meetup_core::effects::TokenError;
use meetup_core::{Identity, Meetup, MeetupError, RaffleRecord, Result, Ticket};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entities resolved while evaluating a request
///
/// Handed to the handler on `Allow` so it does not fetch the same rows again.
/// Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Resolved requestor, flags taken from the identity store
    pub requestor: Identity,
    /// Meetup resolved from a meetup, ticket, or raffle reference
    pub meetup: Option<Meetup>,
    /// Ticket resolved from a ticket reference
    pub ticket: Option<Ticket>,
    /// Raffle record resolved from a raffle reference
    pub raffle: Option<RaffleRecord>,
}

impl RequestContext {
    pub(crate) fn for_requestor(requestor: Identity) -> Self {
        Self {
            requestor,
            meetup: None,
            ticket: None,
            raffle: None,
        }
    }
}

/// Resource kinds that can be reported as missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Requestor or referenced account
    User,
    /// Meetup
    Meetup,
    /// Ticket
    Ticket,
    /// Raffle record
    Raffle,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::User => write!(f, "user"),
            ResourceKind::Meetup => write!(f, "meetup"),
            ResourceKind::Ticket => write!(f, "ticket"),
            ResourceKind::Raffle => write!(f, "raffle"),
        }
    }
}

/// Why a request was denied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DenyReason {
    /// Token missing or failed verification
    #[error("no or invalid token: {0}")]
    InvalidToken(TokenError),

    /// A require rule was not satisfied by the account flags
    #[error("rule {0} not satisfied")]
    MissingRole(Rule),

    /// User reference points at another account
    #[error("requestor is not the referenced user")]
    NotSelf,

    /// Ticket belongs to someone else
    #[error("requestor does not own the ticket")]
    NotTicketOwner,

    /// Requestor does not organize the raffle's meetup
    #[error("requestor does not organize the raffle's meetup")]
    NotRaffleOrganizer,

    /// Requestor is not in the meetup's organizer list
    #[error("requestor does not organize the meetup")]
    NotMeetupOrganizer,
}

impl DenyReason {
    /// Token failures are authentication errors; everything else is a denial
    pub fn is_authentication(&self) -> bool {
        matches!(self, DenyReason::InvalidToken(_))
    }
}

/// Outcome of [`crate::AuthorizationEvaluator::evaluate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// Request may proceed with the resolved entities
    Allow(Box<RequestContext>),
    /// A rule rejected the request
    Deny {
        /// Rejection reason
        reason: DenyReason,
    },
    /// A referenced resource does not exist
    NotFound {
        /// Missing resource kind
        resource: ResourceKind,
    },
    /// A collaborator failed; detail is logged, not returned
    InternalError,
}

impl AuthorizationDecision {
    /// Check if the request was allowed
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow(_))
    }

    /// Resolved context when allowed
    pub fn context(&self) -> Option<&RequestContext> {
        match self {
            AuthorizationDecision::Allow(context) => Some(context.as_ref()),
            _ => None,
        }
    }

    /// Convert into the unified error type
    pub fn into_result(self) -> Result<RequestContext> {
        match self {
            AuthorizationDecision::Allow(context) => Ok(*context),
            AuthorizationDecision::Deny { reason } if reason.is_authentication() => {
                Err(MeetupError::authentication(reason.to_string()))
            }
            AuthorizationDecision::Deny { reason } => Err(MeetupError::denied(reason.to_string())),
            AuthorizationDecision::NotFound { resource } => {
                Err(MeetupError::not_found(format!("{resource} not found")))
            }
            AuthorizationDecision::InternalError => {
                Err(MeetupError::internal("authorization could not be evaluated"))
            }
        }
    }
}
