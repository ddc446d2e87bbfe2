//! Operation policy table
//!
//! Every externally reachable operation declares its rule set and the
//! resource references it accepts in one place, so a handler cannot run
//! without going through the evaluator with the right rules.

use crate::decision::ResourceKind;
use crate::refs::ResourceRefs;
use crate::rules::{Rule, RuleSet};
use meetup_core::MeetupError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operations guarded by the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeetupOperation {
    /// Create a meetup
    CreateMeetup,
    /// Edit a meetup's details
    UpdateMeetup,
    /// Delete a meetup
    DeleteMeetup,
    /// List a meetup's tickets
    ListTickets,
    /// Register for a meetup
    RsvpMeetup,
    /// View a ticket
    ViewTicket,
    /// Cancel a ticket
    CancelTicket,
    /// Mark a ticket as present at the door
    CheckInTicket,
    /// Draw raffle winners for a meetup
    RollRaffle,
    /// Count a drawn win against a ticket
    ClaimRaffleWin,
    /// View a raffle record
    ViewRaffle,
    /// View an account
    ViewUser,
    /// Edit an account
    UpdateUser,
    /// List every account
    ListUsers,
}

/// Rules and accepted references for one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPolicy {
    /// Rules passed to the evaluator
    pub rules: RuleSet,
    /// References the operation requires
    pub required: &'static [ResourceKind],
}

impl OperationPolicy {
    fn new<const N: usize>(rules: [Rule; N], required: &'static [ResourceKind]) -> Self {
        Self {
            rules: RuleSet::from(rules),
            required,
        }
    }

    /// Check that `refs` carries exactly the references this policy names
    pub fn check_refs(
        &self,
        operation: MeetupOperation,
        refs: &ResourceRefs,
    ) -> Result<(), MeetupError> {
        let present = [
            (ResourceKind::User, refs.user.is_some()),
            (ResourceKind::Ticket, refs.ticket.is_some()),
            (ResourceKind::Meetup, refs.meetup.is_some()),
            (ResourceKind::Raffle, refs.raffle.is_some()),
        ];
        for (kind, is_set) in present {
            let wanted = self.required.contains(&kind);
            if wanted && !is_set {
                return Err(MeetupError::invalid(format!(
                    "{operation} requires a {kind} reference"
                )));
            }
            if !wanted && is_set {
                return Err(MeetupError::invalid(format!(
                    "{operation} does not take a {kind} reference"
                )));
            }
        }
        Ok(())
    }
}

impl MeetupOperation {
    /// Every operation, in declaration order
    pub const ALL: [MeetupOperation; 14] = [
        MeetupOperation::CreateMeetup,
        MeetupOperation::UpdateMeetup,
        MeetupOperation::DeleteMeetup,
        MeetupOperation::ListTickets,
        MeetupOperation::RsvpMeetup,
        MeetupOperation::ViewTicket,
        MeetupOperation::CancelTicket,
        MeetupOperation::CheckInTicket,
        MeetupOperation::RollRaffle,
        MeetupOperation::ClaimRaffleWin,
        MeetupOperation::ViewRaffle,
        MeetupOperation::ViewUser,
        MeetupOperation::UpdateUser,
        MeetupOperation::ListUsers,
    ];

    /// Policy attached to this operation
    pub fn policy(self) -> OperationPolicy {
        use MeetupOperation::*;
        use ResourceKind as R;
        match self {
            CreateMeetup => OperationPolicy::new([Rule::RequireOrganizer], &[]),
            UpdateMeetup | DeleteMeetup => OperationPolicy::new(
                [Rule::OverrideAdmin, Rule::RequireOrganizer],
                &[R::Meetup],
            ),
            ListTickets => OperationPolicy::new([Rule::OverrideAdmin], &[R::Meetup]),
            RsvpMeetup => OperationPolicy::new([Rule::IgnoreMeetupOrganizer], &[R::Meetup]),
            ViewTicket => OperationPolicy::new(
                [Rule::OverrideAdmin, Rule::OverrideMeetupOrganizer],
                &[R::Ticket],
            ),
            CancelTicket => OperationPolicy::new([Rule::OverrideMeetupOrganizer], &[R::Ticket]),
            CheckInTicket | ClaimRaffleWin => OperationPolicy::new(
                [Rule::RequireOrganizer, Rule::OverrideMeetupOrganizer],
                &[R::Ticket],
            ),
            RollRaffle => OperationPolicy::new([Rule::RequireOrganizer], &[R::Meetup]),
            ViewRaffle => OperationPolicy::new([Rule::OverrideAdmin], &[R::Raffle]),
            ViewUser | UpdateUser => OperationPolicy::new([Rule::OverrideAdmin], &[R::User]),
            ListUsers => OperationPolicy::new([Rule::RequireAdmin], &[]),
        }
    }

    /// Stable kebab-case name
    pub fn as_str(self) -> &'static str {
        match self {
            MeetupOperation::CreateMeetup => "create-meetup",
            MeetupOperation::UpdateMeetup => "update-meetup",
            MeetupOperation::DeleteMeetup => "delete-meetup",
            MeetupOperation::ListTickets => "list-tickets",
            MeetupOperation::RsvpMeetup => "rsvp-meetup",
            MeetupOperation::ViewTicket => "view-ticket",
            MeetupOperation::CancelTicket => "cancel-ticket",
            MeetupOperation::CheckInTicket => "check-in-ticket",
            MeetupOperation::RollRaffle => "roll-raffle",
            MeetupOperation::ClaimRaffleWin => "claim-raffle-win",
            MeetupOperation::ViewRaffle => "view-raffle",
            MeetupOperation::ViewUser => "view-user",
            MeetupOperation::UpdateUser => "update-user",
            MeetupOperation::ListUsers => "list-users",
        }
    }
}

impl fmt::Display for MeetupOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation name that matched nothing in the table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for MeetupOperation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeetupOperation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}
