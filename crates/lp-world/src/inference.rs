//! Reading evidence out of observation text.
//!
//! Inference is split in two: [`read_evidence`] is a pure function from the
//! observation and action text to an [`Evidence`] record, and
//! [`WorldState::apply`] folds that record into the belief state. [`infer`]
//! composes the two without touching the prior state.

use std::collections::BTreeSet;

use crate::item::{extract_items, vocabulary_item};
use crate::location::{Location, detect_location};
use crate::state::WorldState;
use crate::text::{contains_any, contains_phrase, words};

/// Phrases that introduce an explicit inventory listing.
pub const INVENTORY_MARKERS: &[&str] = &[
    "grunk have:",
    "you are carrying:",
    "you are carrying",
    "you have:",
    "inventory:",
];

const TAKE_VERBS: &[&str] = &["take", "get", "pick", "grab"];
const TAKE_SUCCESS: &[&str] = &["got", "take", "took", "pick", "get", "now have"];
const DROP_VERBS: &[&str] = &["drop"];

const PIG_CATCH: &[&str] = &["catch", "caught", "grab", "hold", "carrying", "have pig"];
const PIG_SIGHTING: &[&str] = &["see pig", "pig here", "pig there"];

const TORCH_OUT: &[&str] = &[
    "go out",
    "goes out",
    "went out",
    "extinguished",
    "not lit",
    "black and sooty",
];
const TORCH_LIT: &[&str] = &["lit", "burning", "on fire"];

/// What the pig-related phrases in an observation say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PigEvidence {
    /// Nothing about the pig.
    #[default]
    None,
    /// The pig was seen, possibly in a recognisable room.
    Seen {
        /// Room named alongside the sighting.
        room: Option<Location>,
    },
    /// The player caught or is carrying the pig.
    Caught,
}

/// Facts read from one observation and the action that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    /// The room the observation describes.
    pub location: Option<Location>,
    /// Item words mentioned in the observation.
    pub items_seen: BTreeSet<String>,
    /// Full inventory when the observation is an inventory listing.
    pub inventory_listing: Option<BTreeSet<String>>,
    /// Items a successful take action picked up.
    pub picked_up: BTreeSet<String>,
    /// Items a drop action put down.
    pub dropped: BTreeSet<String>,
    /// Pig sighting or capture.
    pub pig: PigEvidence,
    /// Explicit torch state, `Some(false)` when it went out.
    pub torch_lit: Option<bool>,
    /// The torch was relit with fire.
    pub torch_relit: bool,
    /// The chest was unlocked or opened.
    pub chest_opened: bool,
    /// The secret door opened.
    pub secret_door_opened: bool,
    /// The pole was burned black.
    pub pole_blackened: bool,
    /// A coin went into the autobaker slot.
    pub coin_in_slot: bool,
    /// The autobaker produced a brick.
    pub brick_dispensed: bool,
}

/// Read everything the rule tables recognise in one observation.
///
/// Never fails; unrecognised text yields an empty [`Evidence`].
pub fn read_evidence(observation: &str, action: &str) -> Evidence {
    let obs = observation.to_lowercase();
    let act = action.trim().to_lowercase();
    let action_words = words(&act);
    let verb = action_words.first().map(String::as_str).unwrap_or("");

    let picked_up = if TAKE_VERBS.contains(&verb) && contains_any(&obs, TAKE_SUCCESS) {
        action_items(&action_words)
    } else {
        BTreeSet::new()
    };

    let dropped = if action_words.iter().any(|w| DROP_VERBS.contains(&w.as_str())) {
        action_items(&action_words)
    } else {
        BTreeSet::new()
    };

    Evidence {
        location: detect_location(&obs),
        items_seen: extract_items(&obs),
        inventory_listing: parse_inventory_listing(&obs),
        picked_up,
        dropped,
        pig: read_pig(&obs),
        torch_lit: read_torch(&obs),
        torch_relit: contains_phrase(&obs, "light")
            && contains_phrase(&obs, "torch")
            && contains_any(&obs, &["fire", "burning"]),
        chest_opened: contains_phrase(&obs, "chest")
            && contains_any(&obs, &["unlock", "unlocked", "open", "opened"]),
        secret_door_opened: contains_any(&obs, &["secret door", "wall open", "wall opened"]),
        pole_blackened: contains_phrase(&act, "burn")
            && contains_phrase(&act, "pole")
            && contains_any(&obs, &["black", "sooty"]),
        coin_in_slot: contains_phrase(&act, "coin") && contains_phrase(&act, "slot"),
        brick_dispensed: contains_phrase(&act, "lever") && contains_phrase(&obs, "brick"),
    }
}

/// Fold one observation into a copy of `prior`.
pub fn infer(prior: &WorldState, observation: &str, action: &str) -> WorldState {
    let evidence = read_evidence(observation, action);
    let mut next = prior.clone();
    next.apply(action, &evidence);
    next
}

fn action_items(action_words: &[String]) -> BTreeSet<String> {
    action_words
        .iter()
        .skip(1)
        .filter_map(|w| vocabulary_item(w))
        .map(str::to_string)
        .collect()
}

/// Parse the item block following an inventory marker.
///
/// The block ends at the first blank line or at a line opening with a
/// parenthetical. Returns `None` when there is no marker or the block names
/// no known item.
pub fn parse_inventory_listing(observation: &str) -> Option<BTreeSet<String>> {
    let lower = observation.to_lowercase();
    let start = INVENTORY_MARKERS
        .iter()
        .filter_map(|m| lower.find(m).map(|pos| pos + m.len()))
        .min()?;

    let mut block = String::new();
    for (i, line) in lower[start..].lines().enumerate() {
        let trimmed = line.trim();
        if i > 0 && (trimmed.is_empty() || trimmed.starts_with('(')) {
            break;
        }
        block.push_str(trimmed);
        block.push('\n');
    }

    let items = extract_items(&block);
    if items.is_empty() { None } else { Some(items) }
}

fn read_pig(obs: &str) -> PigEvidence {
    if !contains_phrase(obs, "pig") {
        return PigEvidence::None;
    }
    if contains_any(obs, PIG_CATCH) {
        return PigEvidence::Caught;
    }
    if contains_any(obs, PIG_SIGHTING) {
        let room = [
            ("fountain", Location::FountainRoom),
            ("shelf", Location::ShelfRoom),
            ("table", Location::TableRoom),
            ("gnome", Location::GnomeRoom),
        ]
        .into_iter()
        .find(|(word, _)| contains_phrase(obs, word))
        .map(|(_, loc)| loc);
        return PigEvidence::Seen { room };
    }
    PigEvidence::None
}

fn read_torch(obs: &str) -> Option<bool> {
    if !contains_phrase(obs, "torch") {
        return None;
    }
    if contains_any(obs, TORCH_OUT) {
        Some(false)
    } else if contains_any(obs, TORCH_LIT) {
        Some(true)
    } else {
        None
    }
}
