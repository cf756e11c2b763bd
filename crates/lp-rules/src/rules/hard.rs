//! Hard rules: a violation blocks the action.

use lp_world::item::vocabulary_item;
use lp_world::{Location, PoleColor, WorldState};

use super::{DARK_AREAS, Rule};
use crate::action::ParsedAction;
use crate::violation::{ConstraintKind, ConstraintViolation};

/// Verbs whose object must be carried.
pub const ITEM_VERBS: &[&str] = &[
    "use", "drop", "give", "put", "open", "close", "read", "eat", "drink", "light", "burn",
];

/// Object words that never name an item.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "it", "them", "this", "that", "all", "everything",
];

/// Hard rules in evaluation order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "light_for_dark",
        kind: ConstraintKind::Hard,
        summary: "Need light source (lit torch or orb) for dark areas",
        check: light_for_dark,
    },
    Rule {
        name: "orb_for_windy",
        kind: ConstraintKind::Hard,
        summary: "Windy cave requires the secret door open and the orb (torch blows out)",
        check: orb_for_windy,
    },
    Rule {
        name: "item_in_inventory",
        kind: ConstraintKind::Hard,
        summary: "Cannot use items not in inventory",
        check: item_in_inventory,
    },
    Rule {
        name: "secret_door",
        kind: ConstraintKind::Hard,
        summary: "Secret door must be opened (give chair to statue)",
        check: secret_door,
    },
    Rule {
        name: "pole_color",
        kind: ConstraintKind::Hard,
        summary: "Color magnet: need black pole to get white paper",
        check: pole_color,
    },
];

/// Entering a dark area needs a lit torch or the orb. Falling into the hole
/// needs neither.
pub fn light_for_dark(action: &ParsedAction, state: &WorldState) -> Option<ConstraintViolation> {
    if !action.mentions_any(DARK_AREAS) {
        return None;
    }
    if action.has_word("hole") || action.has_word("northeast") || action.has_word("ne") {
        return None;
    }
    if state.torch_is_lit() || state.has_item("orb") {
        return None;
    }
    Some(ConstraintViolation::hard(
        "light_for_dark",
        "Need lit torch or orb to see in dark areas",
    ))
}

/// The windy cave lies behind the secret door and blows the torch out.
pub fn orb_for_windy(action: &ParsedAction, state: &WorldState) -> Option<ConstraintViolation> {
    let toward_windy = action.mentions("windy")
        || (state.player_location() == Some(Location::StatueRoom)
            && action.canonical() == "north");
    if !toward_windy {
        return None;
    }
    if !state.secret_door_open() {
        return Some(ConstraintViolation::hard(
            "orb_for_windy",
            "Secret door must be opened first (give chair to statue)",
        ));
    }
    if !state.has_item("orb") {
        return Some(ConstraintViolation::hard(
            "orb_for_windy",
            "Need orb for windy cave - torch will blow out",
        ));
    }
    None
}

/// The object of an item verb must be carried.
///
/// "light torch" is also satisfied by carrying powder and water.
pub fn item_in_inventory(action: &ParsedAction, state: &WorldState) -> Option<ConstraintViolation> {
    for verb in ITEM_VERBS {
        let Some(object) = action.object_of(verb) else {
            continue;
        };
        if STOPWORDS.contains(&object) || carries(state, object) {
            continue;
        }
        if *verb == "light"
            && object == "torch"
            && state.has_item("powder")
            && state.has_item("water")
        {
            continue;
        }
        return Some(ConstraintViolation::hard(
            "item_in_inventory",
            format!("Cannot {verb} '{object}' - not in inventory"),
        ));
    }
    None
}

fn carries(state: &WorldState, word: &str) -> bool {
    state.has_item(word) || vocabulary_item(word).is_some_and(|item| state.has_item(item))
}

/// Moving north out of the statue room needs the secret door open.
pub fn secret_door(action: &ParsedAction, state: &WorldState) -> Option<ConstraintViolation> {
    if state.player_location() != Some(Location::StatueRoom) || state.secret_door_open() {
        return None;
    }
    if action.is_movement() && action.direction() == Some("north") {
        return Some(ConstraintViolation::hard(
            "secret_door",
            "Secret door not open - give chair to statue first",
        ));
    }
    None
}

/// Only a black pole attracts the white paper.
pub fn pole_color(action: &ParsedAction, state: &WorldState) -> Option<ConstraintViolation> {
    if !action.mentions("pole") || !state.has_item("pole") {
        return None;
    }
    if !action.mentions_any(&["paper", "crack"]) || state.pole_color() == PoleColor::Black {
        return None;
    }
    Some(ConstraintViolation::hard(
        "pole_color",
        format!(
            "Need black pole to get white paper (current: {})",
            state.pole_color()
        ),
    ))
}

#[cfg(test)]
mod tests {
    use lp_world::Puzzle;

    use super::*;
    use crate::rules::RuleCheck;

    fn check(rule: RuleCheck, state: &WorldState, action: &str) -> Option<ConstraintViolation> {
        rule(&ParsedAction::parse(action), state)
    }

    #[test]
    fn dark_area_without_light_is_blocked() {
        let mut state = WorldState::new();
        state.set_location(Location::FountainRoom);
        state.add_item("torch");
        state.set_torch_lit(false);
        let v = check(light_for_dark, &state, "go cave").unwrap();
        assert!(v.message.contains("light"));
    }

    #[test]
    fn dark_area_with_light_is_fine() {
        let mut state = WorldState::new();
        state.add_item("torch");
        assert!(check(light_for_dark, &state, "go cave").is_none());

        let mut state = WorldState::new();
        state.add_item("orb");
        assert!(check(light_for_dark, &state, "enter tunnel").is_none());
    }

    #[test]
    fn falling_in_hole_needs_no_light() {
        let state = WorldState::new();
        assert!(check(light_for_dark, &state, "go hole").is_none());
        assert!(check(light_for_dark, &state, "jump in hole").is_none());
    }

    #[test]
    fn uncarried_torch_does_not_light() {
        // The torch starts lit, but lying outside it lights nothing.
        let state = WorldState::new();
        assert!(check(light_for_dark, &state, "go cave").is_some());
    }

    #[test]
    fn windy_checks_door_before_orb() {
        let mut state = WorldState::new();
        let v = check(orb_for_windy, &state, "go windy cave").unwrap();
        assert!(v.message.contains("Secret door"));

        state.open_secret_door();
        let v = check(orb_for_windy, &state, "go windy cave").unwrap();
        assert!(v.message.contains("orb"));

        state.add_item("orb");
        assert!(check(orb_for_windy, &state, "go windy cave").is_none());
    }

    #[test]
    fn north_from_statue_room_is_windy() {
        let mut state = WorldState::new();
        state.set_location(Location::StatueRoom);
        assert!(check(orb_for_windy, &state, "n").is_some());
        assert!(check(orb_for_windy, &state, "south").is_none());
    }

    #[test]
    fn item_verbs_need_carried_object() {
        let mut state = WorldState::new();
        let v = check(item_in_inventory, &state, "burn pole").unwrap();
        assert_eq!(v.message, "Cannot burn 'pole' - not in inventory");

        state.add_item("pole");
        assert!(check(item_in_inventory, &state, "burn pole").is_none());
    }

    #[test]
    fn stopwords_and_plurals_are_allowed() {
        let mut state = WorldState::new();
        assert!(check(item_in_inventory, &state, "drop it").is_none());
        assert!(check(item_in_inventory, &state, "use the").is_none());
        state.add_item("brick");
        assert!(check(item_in_inventory, &state, "drop bricks").is_none());
    }

    #[test]
    fn light_torch_via_powder_and_water() {
        let mut state = WorldState::new();
        assert!(check(item_in_inventory, &state, "light torch").is_some());
        state.add_item("powder");
        state.add_item("water");
        assert!(check(item_in_inventory, &state, "light torch").is_none());
        // The shortcut is specific to the torch.
        assert!(check(item_in_inventory, &state, "light book").is_some());
    }

    #[test]
    fn secret_door_blocks_north_from_statue_room() {
        let mut state = WorldState::new();
        state.set_location(Location::StatueRoom);
        assert!(check(secret_door, &state, "go north").is_some());
        assert!(check(secret_door, &state, "examine statue").is_none());

        state.open_secret_door();
        state.mark_puzzle_solved(Puzzle::StatueSecret);
        assert!(check(secret_door, &state, "go north").is_none());
    }

    #[test]
    fn secret_door_only_applies_in_statue_room() {
        let mut state = WorldState::new();
        state.set_location(Location::FountainRoom);
        assert!(check(secret_door, &state, "north").is_none());
    }

    #[test]
    fn pole_must_be_black_for_paper() {
        let mut state = WorldState::new();
        state.add_item("pole");
        let v = check(pole_color, &state, "put pole in crack").unwrap();
        assert!(v.message.contains("current: green"));

        state.set_pole_color(PoleColor::Black);
        assert!(check(pole_color, &state, "put pole in crack").is_none());
    }

    #[test]
    fn pole_rule_ignores_uncarried_pole() {
        let state = WorldState::new();
        assert!(check(pole_color, &state, "use pole on paper").is_none());
    }
}
