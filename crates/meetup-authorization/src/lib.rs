//! # Meetup Authorization - Rule Evaluation
//!
//! Decides whether a requestor may run an operation before its handler runs.
//! Each operation declares a [`RuleSet`] and the resources it touches
//! ([`ResourceRefs`]); the [`AuthorizationEvaluator`] resolves the requestor
//! from a signed token, walks the rules in a fixed precedence order, and
//! returns an [`AuthorizationDecision`]. On `Allow` the decision carries a
//! [`RequestContext`] with every entity it resolved, so handlers do not fetch
//! them again.
//!
//! # Precedence
//!
//! ```text
//! token -> identity -> OverrideOrganizer -> OverrideAdmin -> RequireOrganizer
//!       -> RequireAdmin -> user ref -> ticket ref -> raffle ref -> meetup ref -> Allow
//! ```

#![forbid(unsafe_code)]

pub mod decision;
pub mod evaluator;
pub mod operations;
pub mod refs;
pub mod rules;

pub use decision::{AuthorizationDecision, DenyReason, RequestContext, ResourceKind};
pub use evaluator::AuthorizationEvaluator;
pub use operations::{MeetupOperation, OperationPolicy, UnknownOperation};
pub use refs::ResourceRefs;
pub use rules::{Rule, RuleSet};
