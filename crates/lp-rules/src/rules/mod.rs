//! Rule tables: each rule is a pure predicate over an action and the
//! belief state.

use lp_world::WorldState;

use crate::action::ParsedAction;
use crate::violation::{ConstraintKind, ConstraintViolation};

/// Blocking rules.
pub mod hard;
/// Advisory rules.
pub mod soft;

/// Predicate signature shared by every rule.
pub type RuleCheck = fn(&ParsedAction, &WorldState) -> Option<ConstraintViolation>;

/// One entry of a rule table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable identifier, also carried by the violations it produces.
    pub name: &'static str,
    /// Whether violations block.
    pub kind: ConstraintKind,
    /// One-line statement used in constraint prompts.
    pub summary: &'static str,
    /// The predicate.
    pub check: RuleCheck,
}

/// Dark underground areas the torch is needed for.
pub(crate) const DARK_AREAS: &[&str] = &["hole", "cave", "tunnel", "underground"];

/// The full default table: hard rules first, then soft rules.
pub fn default_rules() -> Vec<Rule> {
    hard::RULES.iter().chain(soft::RULES).copied().collect()
}
