//! Authorization evaluator
//!
//! Walks a [`RuleSet`] against the presented token and resource references in
//! a fixed precedence order. The first rule that produces a decision wins.

use crate::decision::{AuthorizationDecision, DenyReason, RequestContext, ResourceKind};
use crate::operations::MeetupOperation;
use crate::refs::ResourceRefs;
use crate::rules::{Rule, RuleSet};
use meetup_core::effects::{IdentityStore, ResourceStore, StoreError, TokenError, TokenVerifier};
use std::sync::Arc;
use tracing::{debug, error};

/// Collaborator failure that stops evaluation without a decision
#[derive(Debug, thiserror::Error)]
enum EvaluationFault {
    #[error("store fault: {0}")]
    Store(#[from] StoreError),
    #[error("token verification fault: {0}")]
    Verifier(TokenError),
}

/// Evaluates rule sets against the token verifier and stores
#[derive(Clone)]
pub struct AuthorizationEvaluator {
    tokens: Arc<dyn TokenVerifier>,
    identities: Arc<dyn IdentityStore>,
    resources: Arc<dyn ResourceStore>,
}

impl std::fmt::Debug for AuthorizationEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationEvaluator").finish_non_exhaustive()
    }
}

fn deny(reason: DenyReason) -> AuthorizationDecision {
    AuthorizationDecision::Deny { reason }
}

fn not_found(resource: ResourceKind) -> AuthorizationDecision {
    AuthorizationDecision::NotFound { resource }
}

impl AuthorizationEvaluator {
    /// Create an evaluator over the given collaborators
    pub fn new(
        tokens: Arc<dyn TokenVerifier>,
        identities: Arc<dyn IdentityStore>,
        resources: Arc<dyn ResourceStore>,
    ) -> Self {
        Self {
            tokens,
            identities,
            resources,
        }
    }

    /// Evaluate `rules` for the bearer of `token` against `refs`
    ///
    /// Store faults and verifier faults never surface as `Deny` or `NotFound`:
    /// they are logged and reported as [`AuthorizationDecision::InternalError`].
    pub async fn evaluate(
        &self,
        token: Option<&str>,
        rules: &RuleSet,
        refs: &ResourceRefs,
    ) -> AuthorizationDecision {
        match self.evaluate_inner(token, rules, refs).await {
            Ok(decision) => {
                debug!(%rules, ?decision, "Authorization evaluated");
                decision
            }
            Err(err) => {
                error!(%rules, error = %err, "Authorization failed on internal fault");
                AuthorizationDecision::InternalError
            }
        }
    }

    /// Evaluate the policy of `operation`, rejecting refs it does not accept
    pub async fn authorize(
        &self,
        token: Option<&str>,
        operation: MeetupOperation,
        refs: &ResourceRefs,
    ) -> meetup_core::Result<RequestContext> {
        let policy = operation.policy();
        policy.check_refs(operation, refs)?;
        self.evaluate(token, &policy.rules, refs)
            .await
            .into_result()
    }

    async fn evaluate_inner(
        &self,
        token: Option<&str>,
        rules: &RuleSet,
        refs: &ResourceRefs,
    ) -> Result<AuthorizationDecision, EvaluationFault> {
        let claims = match token {
            Some(token) => match self.tokens.verify(token).await {
                Ok(claims) => claims,
                Err(err @ TokenError::Unverifiable(_)) => {
                    return Err(EvaluationFault::Verifier(err));
                }
                Err(err) => return Ok(deny(DenyReason::InvalidToken(err))),
            },
            None => return Ok(deny(DenyReason::InvalidToken(TokenError::Missing))),
        };

        // Role flags come from the store, not the token
        let Some(requestor) = self.identities.find_identity(&claims.user_id).await? else {
            return Ok(not_found(ResourceKind::User));
        };
        let mut context = RequestContext::for_requestor(requestor);
        let requestor = context.requestor.clone();

        if rules.contains(Rule::OverrideOrganizer) && requestor.is_organizer {
            return Ok(AuthorizationDecision::Allow(Box::new(context)));
        }
        if rules.contains(Rule::OverrideAdmin) && requestor.is_admin {
            return Ok(AuthorizationDecision::Allow(Box::new(context)));
        }
        if rules.contains(Rule::RequireOrganizer) && !requestor.is_organizer {
            return Ok(deny(DenyReason::MissingRole(Rule::RequireOrganizer)));
        }
        if rules.contains(Rule::RequireAdmin) && !requestor.is_admin {
            return Ok(deny(DenyReason::MissingRole(Rule::RequireAdmin)));
        }

        if let Some(user_id) = refs.user {
            if user_id != requestor.id {
                return Ok(deny(DenyReason::NotSelf));
            }
        }

        if let Some(ticket_id) = refs.ticket {
            let Some(found) = self.resources.find_ticket_with_meetup(&ticket_id).await? else {
                return Ok(not_found(ResourceKind::Ticket));
            };
            let organizes = rules.contains(Rule::OverrideMeetupOrganizer)
                && found.meetup.is_organized_by(&requestor.id);
            if !organizes && found.ticket.owner() != Some(requestor.id) {
                return Ok(deny(DenyReason::NotTicketOwner));
            }
            context.ticket = Some(found.ticket);
            context.meetup = Some(found.meetup);
        }

        if let Some(raffle_id) = refs.raffle {
            let Some(found) = self.resources.find_raffle_with_meetup(&raffle_id).await? else {
                return Ok(not_found(ResourceKind::Raffle));
            };
            if !found.meetup.is_organized_by(&requestor.id) {
                return Ok(deny(DenyReason::NotRaffleOrganizer));
            }
            context.raffle = Some(found.record);
            context.meetup = Some(found.meetup);
        }

        if let Some(meetup_id) = refs.meetup {
            let Some(meetup) = self.resources.find_meetup(&meetup_id).await? else {
                return Ok(not_found(ResourceKind::Meetup));
            };
            if !rules.contains(Rule::IgnoreMeetupOrganizer)
                && !meetup.is_organized_by(&requestor.id)
            {
                return Ok(deny(DenyReason::NotMeetupOrganizer));
            }
            context.meetup = Some(meetup);
        }

        Ok(AuthorizationDecision::Allow(Box::new(context)))
    }
}
