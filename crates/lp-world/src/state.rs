//! The belief store: what the agent currently thinks is true of the game.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::command::commands_equivalent;
use crate::error::WorldResult;
use crate::inference::{Evidence, PigEvidence, read_evidence};
use crate::item::{ItemPlace, initial_item_places};
use crate::location::{KNOWN_CONNECTIONS, Location};
use crate::puzzle::{PoleColor, Puzzle};
use crate::text::normalize_command;

/// What has happened at one location across the episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Number of observations attributed to this location.
    pub visits: u32,
    /// Normalised commands whose result was observed here.
    pub commands_tried: BTreeSet<String>,
    /// Item words ever seen in observations here.
    pub items_found: BTreeSet<String>,
}

/// Counters used for episode-level progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMetrics {
    /// Distinct locations the player has been observed in.
    pub locations_discovered: usize,
    /// Distinct items ever believed carried.
    pub items_collected: usize,
}

/// Inferred belief state for one episode.
///
/// Mutated only through [`WorldState::update`] and the explicit setters.
/// Inference is lossy and never fails: text that matches no rule leaves the
/// state as it was, apart from the turn counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    player_location: Option<Location>,
    inventory: BTreeSet<String>,
    connections: BTreeMap<Location, BTreeSet<Location>>,
    item_locations: BTreeMap<String, ItemPlace>,
    puzzles_solved: BTreeSet<Puzzle>,
    torch_lit: bool,
    pole_color: PoleColor,
    secret_door_open: bool,
    pig_found: bool,
    pig_caught: bool,
    pig_location: Option<Location>,
    autobaker_has_coin: bool,
    locations: BTreeMap<Location, LocationRecord>,
    items_collected: BTreeSet<String>,
    action_history: Vec<String>,
    turn: u32,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldState {
    /// Create the belief state at the start of an episode.
    ///
    /// The map and the initial item placement are seeded; the player's
    /// location is unknown until an observation names it.
    pub fn new() -> Self {
        let mut state = Self {
            player_location: None,
            inventory: BTreeSet::new(),
            connections: BTreeMap::new(),
            item_locations: initial_item_places()
                .into_iter()
                .map(|(item, place)| (item.to_string(), place))
                .collect(),
            puzzles_solved: BTreeSet::new(),
            torch_lit: true,
            pole_color: PoleColor::Green,
            secret_door_open: false,
            pig_found: false,
            pig_caught: false,
            pig_location: Some(Location::FountainRoom),
            autobaker_has_coin: false,
            locations: BTreeMap::new(),
            items_collected: BTreeSet::new(),
            action_history: Vec::new(),
            turn: 0,
        };
        for &(a, b) in KNOWN_CONNECTIONS {
            state.add_connection(a, b, true);
        }
        state
    }

    /// Fold one `(observation, action)` pair into the belief state.
    ///
    /// `action` is the command that produced `observation`; pass an empty
    /// string for the opening text.
    pub fn update(&mut self, observation: &str, action: &str) {
        let evidence = read_evidence(observation, action);
        self.apply(action, &evidence);
    }

    /// Apply evidence already read from an observation.
    pub fn apply(&mut self, action: &str, evidence: &Evidence) {
        self.turn += 1;

        let issued = normalize_command(action);
        if !issued.is_empty() {
            self.action_history.push(issued.clone());
        }

        if let Some(location) = evidence.location {
            if self.player_location != Some(location) {
                log::debug!("turn {}: location -> {location}", self.turn);
            }
            self.player_location = Some(location);
            let record = self.locations.entry(location).or_default();
            record.visits += 1;
            if !issued.is_empty() {
                record.commands_tried.insert(issued);
            }
            record
                .items_found
                .extend(evidence.items_seen.iter().cloned());
        }

        if let Some(listing) = &evidence.inventory_listing {
            log::debug!("turn {}: inventory listing {listing:?}", self.turn);
            for item in listing {
                self.item_locations.remove(item);
            }
            self.items_collected.extend(listing.iter().cloned());
            self.inventory = listing.clone();
        } else {
            for item in &evidence.picked_up {
                self.take_item(item);
            }
            for item in &evidence.dropped {
                if self.inventory.remove(item)
                    && let Some(here) = self.player_location
                {
                    self.item_locations.insert(item.clone(), ItemPlace::At(here));
                }
            }
        }

        match evidence.pig {
            PigEvidence::Caught => {
                self.pig_found = true;
                self.pig_caught = true;
                self.pig_location = self.player_location;
            }
            PigEvidence::Seen { room } => {
                self.pig_found = true;
                if !self.pig_caught && room.is_some() {
                    self.pig_location = room;
                }
            }
            PigEvidence::None => {}
        }

        if let Some(lit) = evidence.torch_lit {
            self.torch_lit = lit;
        }
        if evidence.torch_relit {
            self.torch_lit = true;
            self.puzzles_solved.insert(Puzzle::LightTorch);
        }
        if evidence.chest_opened {
            self.puzzles_solved.insert(Puzzle::CaveChest);
        }
        if evidence.secret_door_opened {
            self.secret_door_open = true;
            self.puzzles_solved.insert(Puzzle::StatueSecret);
        }
        if evidence.pole_blackened {
            self.pole_color = PoleColor::Black;
            self.puzzles_solved.insert(Puzzle::BlackenPole);
        }
        if evidence.coin_in_slot {
            self.autobaker_has_coin = true;
        }
        if evidence.brick_dispensed {
            self.autobaker_has_coin = false;
            if !self.inventory.contains("brick") {
                self.item_locations
                    .insert("brick".to_string(), ItemPlace::At(Location::TableRoom));
            }
        }
    }

    fn take_item(&mut self, item: &str) {
        self.inventory.insert(item.to_string());
        self.items_collected.insert(item.to_string());
        self.item_locations.remove(item);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The room the player is believed to be in.
    pub fn player_location(&self) -> Option<Location> {
        self.player_location
    }

    /// Items believed carried.
    pub fn inventory(&self) -> &BTreeSet<String> {
        &self.inventory
    }

    /// Whether the player is believed to carry `item`.
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.contains(&item.to_lowercase())
    }

    /// The adjacency graph.
    pub fn connections(&self) -> &BTreeMap<Location, BTreeSet<Location>> {
        &self.connections
    }

    /// Rooms adjacent to the current location.
    pub fn exits(&self) -> Vec<Location> {
        self.player_location
            .and_then(|loc| self.connections.get(&loc))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Last known position of each item not carried.
    pub fn item_locations(&self) -> &BTreeMap<String, ItemPlace> {
        &self.item_locations
    }

    /// Items believed to lie in the current room.
    pub fn items_here(&self) -> Vec<&str> {
        let Some(here) = self.player_location else {
            return Vec::new();
        };
        self.item_locations
            .iter()
            .filter(|(_, place)| **place == ItemPlace::At(here))
            .map(|(item, _)| item.as_str())
            .collect()
    }

    /// Puzzles recognised as solved.
    pub fn puzzles_solved(&self) -> &BTreeSet<Puzzle> {
        &self.puzzles_solved
    }

    /// Whether `puzzle` has been solved.
    pub fn puzzle_solved(&self, puzzle: Puzzle) -> bool {
        self.puzzles_solved.contains(&puzzle)
    }

    /// Raw torch flag, independent of whether the torch is carried.
    pub fn torch_lit(&self) -> bool {
        self.torch_lit
    }

    /// Whether the player carries a burning torch.
    pub fn torch_is_lit(&self) -> bool {
        self.torch_lit && self.inventory.contains("torch")
    }

    /// Current pole colour.
    pub fn pole_color(&self) -> PoleColor {
        self.pole_color
    }

    /// Whether the statue's secret door has been opened.
    pub fn secret_door_open(&self) -> bool {
        self.secret_door_open
    }

    /// Whether the pig has been seen.
    pub fn pig_found(&self) -> bool {
        self.pig_found
    }

    /// Whether the pig has been caught.
    pub fn pig_caught(&self) -> bool {
        self.pig_caught
    }

    /// Where the pig was last believed to be.
    pub fn pig_location(&self) -> Option<Location> {
        self.pig_location
    }

    /// Whether a coin is believed to sit in the autobaker.
    pub fn autobaker_has_coin(&self) -> bool {
        self.autobaker_has_coin
    }

    /// Per-location records, created lazily on first visit.
    pub fn locations(&self) -> &BTreeMap<Location, LocationRecord> {
        &self.locations
    }

    /// The record for one location, if it has been visited.
    pub fn location_record(&self, location: Location) -> Option<&LocationRecord> {
        self.locations.get(&location)
    }

    /// Items ever believed carried.
    pub fn items_collected(&self) -> &BTreeSet<String> {
        &self.items_collected
    }

    /// Normalised actions in the order they were issued.
    pub fn action_history(&self) -> &[String] {
        &self.action_history
    }

    /// Observations processed so far.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    // -----------------------------------------------------------------------
    // Setters
    // -----------------------------------------------------------------------

    /// Place the player in a known room.
    pub fn set_location(&mut self, location: Location) {
        self.player_location = Some(location);
    }

    /// Add an item to the inventory.
    pub fn add_item(&mut self, item: &str) {
        self.take_item(&item.to_lowercase());
    }

    /// Remove an item from the inventory. Returns whether it was carried.
    pub fn remove_item(&mut self, item: &str) -> bool {
        self.inventory.remove(&item.to_lowercase())
    }

    /// Record a puzzle as solved. Solved puzzles are never forgotten.
    pub fn mark_puzzle_solved(&mut self, puzzle: Puzzle) {
        self.puzzles_solved.insert(puzzle);
    }

    /// Set the torch flag.
    pub fn set_torch_lit(&mut self, lit: bool) {
        self.torch_lit = lit;
    }

    /// Set the pole colour.
    pub fn set_pole_color(&mut self, color: PoleColor) {
        self.pole_color = color;
    }

    /// Record the secret door as open.
    pub fn open_secret_door(&mut self) {
        self.secret_door_open = true;
    }

    /// Connect two rooms, in both directions when `bidirectional`.
    pub fn add_connection(&mut self, from: Location, to: Location, bidirectional: bool) {
        self.connections.entry(from).or_default().insert(to);
        if bidirectional {
            self.connections.entry(to).or_default().insert(from);
        }
    }

    /// Append an action to the history without processing an observation.
    pub fn record_action(&mut self, action: &str) {
        let issued = normalize_command(action);
        if !issued.is_empty() {
            self.action_history.push(issued);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Commands already tried at the current location.
    pub fn commands_tried_here(&self) -> BTreeSet<String> {
        self.player_location
            .map(|loc| self.commands_tried_at(loc))
            .unwrap_or_default()
    }

    /// Commands already tried at `location`.
    pub fn commands_tried_at(&self, location: Location) -> BTreeSet<String> {
        self.locations
            .get(&location)
            .map(|r| r.commands_tried.clone())
            .unwrap_or_default()
    }

    /// Whether `candidate`, or a near-duplicate of it, was already tried at
    /// the current location.
    pub fn should_avoid_command(&self, candidate: &str) -> bool {
        self.commands_tried_here()
            .iter()
            .any(|tried| commands_equivalent(candidate, tried))
    }

    /// Location and item counters for progress reporting.
    pub fn progress_metrics(&self) -> ProgressMetrics {
        ProgressMetrics {
            locations_discovered: self.locations.len(),
            items_collected: self.items_collected.len(),
        }
    }

    /// Serialise the state to pretty JSON.
    pub fn to_json(&self) -> WorldResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a state from JSON produced by [`WorldState::to_json`].
    pub fn from_json(json: &str) -> WorldResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
