//! Item vocabulary and item extraction from free text.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::text::contains_phrase;

/// Nouns the tracker recognises as items or notable objects.
pub const ITEM_VOCABULARY: &[&str] = &[
    "torch", "pole", "key", "coin", "brick", "hat", "whistle", "chair", "book", "paper", "powder",
    "water", "orb", "ball", "pig", "pants", "chest", "box", "fountain", "statue", "shelf", "table",
    "bench", "stream", "curtain", "picture", "wall",
];

/// Where an item was last believed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPlace {
    /// Worn or otherwise permanently on the player.
    Player,
    /// Lying in a room.
    At(Location),
}

/// Lowercase item names mentioned in `text`.
pub fn extract_items(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    ITEM_VOCABULARY
        .iter()
        .filter(|item| contains_phrase(&lower, item))
        .map(|item| item.to_string())
        .collect()
}

/// Map a word such as "bricks" onto its vocabulary entry.
pub fn vocabulary_item(word: &str) -> Option<&'static str> {
    let lower = word.to_lowercase();
    let singular = lower.strip_suffix('s').unwrap_or(&lower);
    ITEM_VOCABULARY
        .iter()
        .copied()
        .find(|item| *item == lower || *item == singular)
}

/// Items the map puts somewhere at the start of the game.
///
/// The brick appears only once the autobaker dispenses it.
pub fn initial_item_places() -> Vec<(&'static str, ItemPlace)> {
    vec![
        ("torch", ItemPlace::At(Location::Outside)),
        ("pants", ItemPlace::Player),
        ("pole", ItemPlace::At(Location::ShelfRoom)),
        ("key", ItemPlace::At(Location::CaveWithStream)),
        ("coin", ItemPlace::At(Location::FountainRoom)),
        ("chair", ItemPlace::At(Location::TableRoom)),
        ("hat", ItemPlace::At(Location::StatueRoom)),
        ("whistle", ItemPlace::At(Location::Hole)),
        ("book", ItemPlace::At(Location::ShelfRoom)),
        ("paper", ItemPlace::At(Location::Hole)),
        ("powder", ItemPlace::At(Location::ShelfRoom)),
        ("orb", ItemPlace::At(Location::GnomeRoom)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_listed_items() {
        let items = extract_items("Grunk have: torch, pole");
        let expected: BTreeSet<String> = ["pole", "torch"].iter().map(|s| s.to_string()).collect();
        assert_eq!(items, expected);
    }

    #[test]
    fn ignores_embedded_words() {
        // "that" contains "hat", "wallet" contains "wall".
        assert!(extract_items("What is that wallet?").is_empty());
    }

    #[test]
    fn plural_mentions_count() {
        assert!(extract_items("Two bricks fall out.").contains("brick"));
    }

    #[test]
    fn vocabulary_lookup_handles_plurals() {
        assert_eq!(vocabulary_item("Bricks"), Some("brick"));
        assert_eq!(vocabulary_item("orb"), Some("orb"));
        assert_eq!(vocabulary_item("sword"), None);
    }
}
