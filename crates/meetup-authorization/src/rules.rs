//! Rule vocabulary
//!
//! Rules are tags, not predicates: their meaning is fixed by the evaluator's
//! precedence order, so the order in which an operation lists them does not
//! matter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One declarative authorization rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Requestor account must be an organizer account
    RequireOrganizer,
    /// Requestor account must be an admin account
    RequireAdmin,
    /// Organizer accounts skip every other check
    OverrideOrganizer,
    /// Admin accounts skip every other check
    OverrideAdmin,
    /// Organizers of a ticket's meetup skip the ticket ownership check
    OverrideMeetupOrganizer,
    /// Skip the meetup organizer-membership check
    IgnoreMeetupOrganizer,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::RequireOrganizer => "require-organizer",
            Rule::RequireAdmin => "require-admin",
            Rule::OverrideOrganizer => "override-organizer",
            Rule::OverrideAdmin => "override-admin",
            Rule::OverrideMeetupOrganizer => "override-meetup-organizer",
            Rule::IgnoreMeetupOrganizer => "ignore-meetup-organizer",
        };
        write!(f, "{name}")
    }
}

/// Set of rules attached to an operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet(BTreeSet<Rule>);

impl RuleSet {
    /// Empty rule set: any authenticated requestor, subject to resource checks
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `rule` is present
    pub fn contains(&self, rule: Rule) -> bool {
        self.0.contains(&rule)
    }

    /// Add a rule
    pub fn with(mut self, rule: Rule) -> Self {
        self.0.insert(rule);
        self
    }

    /// Iterate rules in declaration-independent order
    pub fn iter(&self) -> impl Iterator<Item = Rule> + '_ {
        self.0.iter().copied()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no rules are declared
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Rule; N]> for RuleSet {
    fn from(rules: [Rule; N]) -> Self {
        rules.into_iter().collect()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|r| r.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
