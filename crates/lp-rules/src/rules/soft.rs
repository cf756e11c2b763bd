//! Soft rules: a violation only adds to the penalty.

use lp_world::WorldState;
use lp_world::command::canonical_direction;
use lp_world::text::normalize_command;

use super::Rule;
use crate::action::ParsedAction;
use crate::violation::{ConstraintKind, ConstraintViolation};

/// Verbs that do nothing toward catching the pig.
const UNHELPFUL: &[&str] = &["quit", "save", "restore", "help", "sing"];

/// Words that mark an action as exploring or collecting.
const HELPFUL: &[&str] = &["look", "examine", "go", "take", "search", "get", "brick"];

/// Movement words for the unlit-torch warning.
const MOVING: &[&str] = &["go", "enter", "north", "south", "east", "west"];

/// Soft rules in evaluation order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "pig_priority",
        kind: ConstraintKind::Soft,
        summary: "Prioritize actions that help catch the lost pig",
        check: pig_priority,
    },
    Rule {
        name: "repeated_action",
        kind: ConstraintKind::Soft,
        summary: "Avoid repetitive actions",
        check: repeated_action,
    },
    Rule {
        name: "torch_in_wind",
        kind: ConstraintKind::Soft,
        summary: "Torch blows out in windy areas; use the orb there",
        check: torch_in_wind,
    },
    Rule {
        name: "brick_for_pig",
        kind: ConstraintKind::Soft,
        summary: "Use bricks to distract pig before catching",
        check: brick_for_pig,
    },
    Rule {
        name: "unlit_torch",
        kind: ConstraintKind::Soft,
        summary: "Manage torch carefully (can go out)",
        check: unlit_torch,
    },
];

/// While the pig is loose, prefer exploring and collecting.
pub fn pig_priority(action: &ParsedAction, state: &WorldState) -> Option<ConstraintViolation> {
    if state.pig_caught() || action.is_empty() {
        return None;
    }
    if action.mentions_any(UNHELPFUL) {
        return Some(ConstraintViolation::soft(
            "pig_priority",
            "Action doesn't help catch the lost pig",
            0.2,
        ));
    }
    let moving = action
        .words()
        .first()
        .is_some_and(|w| canonical_direction(w).is_some());
    let canonical_verb = action.canonical().split(' ').next().unwrap_or("");
    if !moving && !action.mentions_any(HELPFUL) && !HELPFUL.contains(&canonical_verb) {
        return Some(ConstraintViolation::soft(
            "pig_priority",
            "Consider exploring or collecting items to catch the pig",
            0.1,
        ));
    }
    None
}

/// The same action three times running rarely works the third time.
pub fn repeated_action(action: &ParsedAction, state: &WorldState) -> Option<ConstraintViolation> {
    let history = state.action_history();
    let [.., a, b] = history else {
        return None;
    };
    let current = action.text();
    if current.is_empty() || normalize_command(a) != current || normalize_command(b) != current {
        return None;
    }
    Some(ConstraintViolation::soft(
        "repeated_action",
        format!("Action '{current}' repeated - may not be effective"),
        0.3,
    ))
}

/// Carrying the torch into the wind blows it out.
pub fn torch_in_wind(action: &ParsedAction, _state: &WorldState) -> Option<ConstraintViolation> {
    if action.mentions("torch") && action.mentions("windy") {
        return Some(ConstraintViolation::soft(
            "torch_in_wind",
            "Torch will blow out in windy areas - use orb instead",
            0.3,
        ));
    }
    None
}

/// The pig is too quick to catch without a brick to distract it.
pub fn brick_for_pig(action: &ParsedAction, state: &WorldState) -> Option<ConstraintViolation> {
    if action.mentions_any(&["catch", "grab"]) && action.mentions("pig") && !state.has_item("brick")
    {
        return Some(ConstraintViolation::soft(
            "brick_for_pig",
            "Pig is too quick - need bricks to distract it first",
            0.4,
        ));
    }
    None
}

/// Heading into the dark with an unlit torch.
pub fn unlit_torch(action: &ParsedAction, state: &WorldState) -> Option<ConstraintViolation> {
    if state.torch_is_lit() {
        return None;
    }
    if action.mentions_any(MOVING) && action.mentions_any(&["hole", "cave", "tunnel", "dark"]) {
        return Some(ConstraintViolation::soft(
            "unlit_torch",
            "Torch is unlit - consider relighting before exploring dark areas",
            0.2,
        ));
    }
    None
}
