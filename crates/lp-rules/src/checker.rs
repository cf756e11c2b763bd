//! Constraint checking against the belief state.

use lp_world::WorldState;
use serde::Serialize;

use crate::action::ParsedAction;
use crate::error::{RulesError, RulesResult};
use crate::rules::{Rule, default_rules};
use crate::violation::{ConstraintKind, ConstraintViolation};

/// Every violation one candidate action produced, hard rules first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConstraintReport {
    /// Violations in rule-table order.
    pub violations: Vec<ConstraintViolation>,
}

impl ConstraintReport {
    /// True when no hard rule fired. Soft violations never affect validity.
    pub fn is_valid(&self) -> bool {
        !self.violations.iter().any(ConstraintViolation::is_hard)
    }

    /// Hard violations.
    pub fn hard(&self) -> impl Iterator<Item = &ConstraintViolation> {
        self.violations.iter().filter(|v| v.is_hard())
    }

    /// Soft violations.
    pub fn soft(&self) -> impl Iterator<Item = &ConstraintViolation> {
        self.violations.iter().filter(|v| !v.is_hard())
    }

    /// Sum of soft severities, capped at 1.0.
    pub fn penalty(&self) -> f64 {
        self.soft().map(|v| v.severity).sum::<f64>().min(1.0)
    }

    /// Hard violations joined for regeneration feedback.
    pub fn feedback(&self) -> String {
        self.hard()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Evaluates candidate actions against a table of rules.
///
/// The checker holds no belief state of its own; every call reads the state
/// it is given.
#[derive(Debug, Clone)]
pub struct ConstraintChecker {
    rules: Vec<Rule>,
}

impl Default for ConstraintChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintChecker {
    /// A checker with the full Lost Pig rule set.
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
        }
    }

    /// A checker with a custom rule table.
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Add a rule to the end of the table.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Remove a rule by name.
    pub fn without_rule(mut self, name: &str) -> RulesResult<Self> {
        let before = self.rules.len();
        self.rules.retain(|r| r.name != name);
        if self.rules.len() == before {
            return Err(RulesError::UnknownRule(name.to_string()));
        }
        Ok(self)
    }

    /// The active rules.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate `action` against every rule.
    pub fn check_action(&self, state: &WorldState, action: &str) -> ConstraintReport {
        let parsed = ParsedAction::parse(action);
        let mut violations: Vec<ConstraintViolation> = self
            .rules
            .iter()
            .filter_map(|rule| (rule.check)(&parsed, state))
            .collect();
        violations.sort_by_key(|v| !v.is_hard());

        let report = ConstraintReport { violations };
        if !report.is_valid() {
            log::debug!("'{action}' blocked: {}", report.feedback());
        }
        report
    }

    /// Soft-violation penalty for `action`, in `[0, 1]`.
    pub fn penalty_score(&self, state: &WorldState, action: &str) -> f64 {
        self.check_action(state, action).penalty()
    }

    /// Rule explanation plus a snapshot of the current state, for prompts.
    pub fn constraint_prompt_text(&self, state: &WorldState) -> String {
        let mut lines = vec![
            "=== LOST PIG GAME CONSTRAINTS ===".to_string(),
            String::new(),
            "HARD CONSTRAINTS (must be satisfied):".to_string(),
        ];
        lines.extend(self.summaries(ConstraintKind::Hard));
        lines.push(String::new());
        lines.push("CURRENT STATE:".to_string());
        lines.push(state.render_summary());
        lines.push(String::new());
        lines.push("SOFT CONSTRAINTS (should be satisfied):".to_string());
        lines.extend(self.summaries(ConstraintKind::Soft));
        if !state.pig_caught() {
            lines.push(String::new());
            lines.push("GOAL: Catch the lost pig and bring it back to farm!".to_string());
        }
        lines.join("\n")
    }

    fn summaries(&self, kind: ConstraintKind) -> impl Iterator<Item = String> + '_ {
        self.rules
            .iter()
            .filter(move |r| r.kind == kind)
            .map(|r| format!("- {}", r.summary))
    }
}

#[cfg(test)]
mod tests {
    use lp_world::Location;

    use super::*;

    #[test]
    fn item_not_carried_is_invalid() {
        let checker = ConstraintChecker::new();
        let state = WorldState::new();
        let report = checker.check_action(&state, "use key");
        assert!(!report.is_valid());
        assert!(report.hard().any(|v| v.rule == "item_in_inventory"));
    }

    #[test]
    fn dark_cave_needs_light() {
        let checker = ConstraintChecker::new();
        let mut state = WorldState::new();
        state.update("Grunk in cave. Stream here.", "");
        state.set_torch_lit(false);
        let report = checker.check_action(&state, "go cave");
        assert!(!report.is_valid());
        assert!(report.hard().any(|v| v.message.contains("light")));
    }

    #[test]
    fn several_hard_rules_can_fire_together() {
        let checker = ConstraintChecker::new();
        let mut state = WorldState::new();
        state.set_location(Location::StatueRoom);
        let report = checker.check_action(&state, "go north");
        let rules: Vec<_> = report.hard().map(|v| v.rule).collect();
        assert_eq!(rules, vec!["orb_for_windy", "secret_door"]);
    }

    #[test]
    fn hard_violations_come_first() {
        let checker = ConstraintChecker::new();
        let state = WorldState::new();
        let report = checker.check_action(&state, "drink water");
        assert!(report.violations.first().is_some_and(|v| v.is_hard()));
        assert!(report.soft().count() >= 1);
    }

    #[test]
    fn soft_only_is_still_valid() {
        let checker = ConstraintChecker::new();
        let state = WorldState::new();
        let report = checker.check_action(&state, "catch pig");
        assert!(report.is_valid());
        assert!(report.soft().any(|v| v.rule == "brick_for_pig"));
    }

    #[test]
    fn third_identical_action_gets_repeat_warning() {
        let checker = ConstraintChecker::new();
        let mut state = WorldState::new();
        for _ in 0..2 {
            assert!(checker
                .check_action(&state, "look")
                .soft()
                .all(|v| v.rule != "repeated_action"));
            state.record_action("look");
        }
        let report = checker.check_action(&state, "look");
        assert!(report.soft().any(|v| v.rule == "repeated_action"));
    }

    #[test]
    fn penalty_is_capped() {
        let checker = ConstraintChecker::new();
        let mut state = WorldState::new();
        for _ in 0..2 {
            state.record_action("catch pig in windy torch sing");
        }
        let penalty = checker.penalty_score(&state, "catch pig in windy torch sing");
        // 0.2 + 0.3 + 0.3 + 0.4 would exceed the cap.
        assert_eq!(penalty, 1.0);
    }

    #[test]
    fn penalty_is_zero_for_clean_action() {
        let checker = ConstraintChecker::new();
        assert_eq!(checker.penalty_score(&WorldState::new(), "look"), 0.0);
    }

    #[test]
    fn feedback_joins_hard_messages() {
        let checker = ConstraintChecker::new();
        let mut state = WorldState::new();
        state.set_location(Location::StatueRoom);
        let feedback = checker.check_action(&state, "n").feedback();
        assert!(feedback.starts_with("[HARD] Secret door must be opened first"));
        assert!(feedback.contains("; [HARD] Secret door not open"));
    }

    #[test]
    fn rules_can_be_removed() {
        let checker = ConstraintChecker::new().without_rule("item_in_inventory").unwrap();
        assert!(checker.check_action(&WorldState::new(), "use key").is_valid());
        assert!(matches!(
            ConstraintChecker::new().without_rule("nope"),
            Err(RulesError::UnknownRule(_))
        ));
    }

    fn no_eating_the_pig(action: &ParsedAction, _: &WorldState) -> Option<ConstraintViolation> {
        (action.has_word("eat") && action.has_word("pig"))
            .then(|| ConstraintViolation::hard("no_eating_pig", "Grunk need pig alive"))
    }

    #[test]
    fn added_rule_runs_after_defaults() {
        let checker = ConstraintChecker::new().with_rule(Rule {
            name: "no_eating_pig",
            kind: ConstraintKind::Hard,
            summary: "Never eat the pig",
            check: no_eating_the_pig,
        });
        assert_eq!(checker.rules().last().map(|r| r.name), Some("no_eating_pig"));

        let report = checker.check_action(&WorldState::new(), "eat pig");
        assert!(!report.is_valid());
        assert!(report.hard().any(|v| v.rule == "no_eating_pig"));
        assert!(checker.check_action(&WorldState::new(), "look").is_valid());
        assert!(
            checker
                .constraint_prompt_text(&WorldState::new())
                .contains("- Never eat the pig")
        );
    }

    #[test]
    fn prompt_lists_rules_and_state() {
        let checker = ConstraintChecker::new();
        let text = checker.constraint_prompt_text(&WorldState::new());
        assert!(text.starts_with("=== LOST PIG GAME CONSTRAINTS ==="));
        assert!(text.contains("- Cannot use items not in inventory"));
        assert!(text.contains("- Avoid repetitive actions"));
        assert!(text.contains("=== Lost Pig Game State (Turn 0) ==="));
        assert!(text.ends_with("GOAL: Catch the lost pig and bring it back to farm!"));
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        const VERBS: &[&str] = &["use", "drop", "give", "read", "eat", "burn"];
        const ITEMS: &[&str] = &["key", "coin", "hat", "whistle", "book", "paper"];

        proptest! {
            #[test]
            fn uncarried_item_use_is_always_blocked(
                verb in prop::sample::select(VERBS),
                item in prop::sample::select(ITEMS),
            ) {
                let checker = ConstraintChecker::new();
                let report = checker.check_action(&WorldState::new(), &format!("{verb} {item}"));
                prop_assert!(!report.is_valid());
            }

            #[test]
            fn penalty_stays_in_unit_range(action in "[a-z ]{0,30}") {
                let checker = ConstraintChecker::new();
                let p = checker.penalty_score(&WorldState::new(), &action);
                prop_assert!((0.0..=1.0).contains(&p));
            }
        }
    }
}
