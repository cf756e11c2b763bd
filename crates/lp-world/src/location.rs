//! Known rooms and the keyword table used to recognise them in game text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::text::contains_phrase;

/// A room the agent can believe the player is standing in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// The open area by the farm where the game starts.
    Outside,
    /// Forest to the north of the starting area.
    ForestNorth,
    /// Forest to the east of the starting area.
    ForestEast,
    /// The hole the pig fell into; entered by falling.
    Hole,
    /// Underground room with the fountain and glowing walls.
    FountainRoom,
    /// Room with shelves, the chest, and the book.
    ShelfRoom,
    /// The gnome's closet.
    GnomeRoom,
    /// Room with the table and the autobaker.
    TableRoom,
    /// Room with the statue guarding the secret door.
    StatueRoom,
    /// Cave split by a stream, with the key on the far side.
    CaveWithStream,
    /// Windy tunnel behind the secret door.
    WindyCave,
    /// Twisty tunnels leading back out.
    TwistyCave,
    /// Forest reached again on the way home.
    Forest,
}

impl Location {
    /// Every known location, in declaration order.
    pub const ALL: [Location; 13] = [
        Location::Outside,
        Location::ForestNorth,
        Location::ForestEast,
        Location::Hole,
        Location::FountainRoom,
        Location::ShelfRoom,
        Location::GnomeRoom,
        Location::TableRoom,
        Location::StatueRoom,
        Location::CaveWithStream,
        Location::WindyCave,
        Location::TwistyCave,
        Location::Forest,
    ];

    /// The stable identifier used in snapshots and prompts.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Outside => "outside",
            Self::ForestNorth => "forest_north",
            Self::ForestEast => "forest_east",
            Self::Hole => "hole",
            Self::FountainRoom => "fountain_room",
            Self::ShelfRoom => "shelf_room",
            Self::GnomeRoom => "gnome_room",
            Self::TableRoom => "table_room",
            Self::StatueRoom => "statue_room",
            Self::CaveWithStream => "cave_with_stream",
            Self::WindyCave => "windy_cave",
            Self::TwistyCave => "twisty_cave",
            Self::Forest => "forest",
        }
    }

    /// Human-readable name, used when suggesting movement commands.
    pub fn display_name(&self) -> String {
        self.id().replace('_', " ")
    }

    /// Whether the room lies below ground and needs a light source.
    pub fn is_underground(&self) -> bool {
        !matches!(
            self,
            Self::Outside | Self::ForestNorth | Self::ForestEast | Self::Forest
        )
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Location {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '-'], "_");
        Location::ALL
            .iter()
            .copied()
            .find(|loc| loc.id() == key)
            .ok_or_else(|| WorldError::UnknownLocation(s.to_string()))
    }
}

/// One row of the recognition table: a location and the phrases that
/// identify it in an observation.
#[derive(Debug, Clone, Copy)]
pub struct LocationRule {
    /// The location this row recognises.
    pub location: Location,
    /// Phrases whose presence (on word boundaries) selects the location.
    pub keywords: &'static [&'static str],
}

/// Recognition table in declaration order. When several rows match and no
/// [`PriorityRule`] decides between them, the earliest row wins.
pub const LOCATION_RULES: &[LocationRule] = &[
    LocationRule {
        location: Location::Outside,
        keywords: &["outside", "clearing", "open area"],
    },
    LocationRule {
        location: Location::ForestNorth,
        keywords: &["forest", "north forest"],
    },
    LocationRule {
        location: Location::ForestEast,
        keywords: &["forest", "east forest"],
    },
    LocationRule {
        location: Location::Hole,
        keywords: &["hole", "bottom of", "deep hole", "fall down"],
    },
    LocationRule {
        location: Location::FountainRoom,
        keywords: &["fountain room", "fountain", "glowing wall", "all wall glow"],
    },
    LocationRule {
        location: Location::ShelfRoom,
        keywords: &["shelf room", "shelfs", "shelves"],
    },
    LocationRule {
        location: Location::GnomeRoom,
        keywords: &["gnome room", "closet", "little person room"],
    },
    LocationRule {
        location: Location::TableRoom,
        keywords: &["table room", "table", "autobaker"],
    },
    LocationRule {
        location: Location::StatueRoom,
        keywords: &["statue room", "statue"],
    },
    LocationRule {
        location: Location::CaveWithStream,
        keywords: &["cave with stream", "stream", "cave"],
    },
    LocationRule {
        location: Location::WindyCave,
        keywords: &["windy cave", "wind"],
    },
    LocationRule {
        location: Location::TwistyCave,
        keywords: &["twisty cave", "twisty tunnel"],
    },
    LocationRule {
        location: Location::Forest,
        keywords: &["forest", "outside again"],
    },
];

/// An explicit tie-break between two rows that can match the same text.
#[derive(Debug, Clone, Copy)]
pub struct PriorityRule {
    /// The location kept when both match.
    pub preferred: Location,
    /// The location discarded when both match.
    pub displaced: Location,
    /// Why the text is read this way.
    pub reason: &'static str,
}

/// Tie-breaks applied before declaration order.
pub const PRIORITY_RULES: &[PriorityRule] = &[
    PriorityRule {
        preferred: Location::Outside,
        displaced: Location::ForestNorth,
        reason: "the starting area describes the forest edge it borders",
    },
    PriorityRule {
        preferred: Location::Outside,
        displaced: Location::ForestEast,
        reason: "the starting area describes the forest edge it borders",
    },
    PriorityRule {
        preferred: Location::Outside,
        displaced: Location::Forest,
        reason: "the starting area describes the forest edge it borders",
    },
    PriorityRule {
        preferred: Location::FountainRoom,
        displaced: Location::Hole,
        reason: "the fountain room mentions the hole Grunk fell through",
    },
    PriorityRule {
        preferred: Location::WindyCave,
        displaced: Location::CaveWithStream,
        reason: "\"windy cave\" also contains the generic word cave",
    },
    PriorityRule {
        preferred: Location::TwistyCave,
        displaced: Location::CaveWithStream,
        reason: "\"twisty cave\" also contains the generic word cave",
    },
];

/// Every location whose keywords occur in `text`, in declaration order.
pub fn matching_locations(text: &str) -> Vec<Location> {
    let lower = text.to_lowercase();
    LOCATION_RULES
        .iter()
        .filter(|rule| rule.keywords.iter().any(|kw| contains_phrase(&lower, kw)))
        .map(|rule| rule.location)
        .collect()
}

/// Identify the location described by an observation.
///
/// Returns `None` when no keyword matches, so the caller can keep its prior
/// belief.
pub fn detect_location(text: &str) -> Option<Location> {
    let matched = matching_locations(text);
    let displaced = |loc: &Location| {
        PRIORITY_RULES
            .iter()
            .any(|p| p.displaced == *loc && matched.contains(&p.preferred))
    };

    matched
        .iter()
        .copied()
        .find(|loc| !displaced(loc))
        .or_else(|| matched.first().copied())
}

/// Adjacency known before play starts, as undirected pairs.
pub const KNOWN_CONNECTIONS: &[(Location, Location)] = &[
    (Location::Outside, Location::ForestNorth),
    (Location::Outside, Location::ForestEast),
    (Location::ForestNorth, Location::Hole),
    (Location::ForestEast, Location::Hole),
    (Location::Hole, Location::FountainRoom),
    (Location::FountainRoom, Location::ShelfRoom),
    (Location::FountainRoom, Location::TableRoom),
    (Location::FountainRoom, Location::StatueRoom),
    (Location::FountainRoom, Location::CaveWithStream),
    (Location::ShelfRoom, Location::GnomeRoom),
    (Location::TableRoom, Location::GnomeRoom),
    (Location::StatueRoom, Location::WindyCave),
    (Location::WindyCave, Location::TwistyCave),
    (Location::TwistyCave, Location::Forest),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_keyword_means_no_location() {
        assert_eq!(detect_location("You see a torch here."), None);
        assert_eq!(detect_location(""), None);
    }

    #[test]
    fn single_keyword_match() {
        assert_eq!(
            detect_location("Grunk in room with big statue."),
            Some(Location::StatueRoom)
        );
        assert_eq!(
            detect_location("Many shelves here."),
            Some(Location::ShelfRoom)
        );
    }

    #[test]
    fn outside_beats_forest() {
        let text = "Outside\nGrunk by forest. Farm is south.";
        assert_eq!(
            matching_locations(text),
            vec![Location::Outside, Location::ForestNorth, Location::ForestEast, Location::Forest]
        );
        assert_eq!(detect_location(text), Some(Location::Outside));
    }

    #[test]
    fn fountain_beats_hole() {
        let text = "Fountain Room\nHole in ceiling far above. Fountain in middle.";
        assert_eq!(detect_location(text), Some(Location::FountainRoom));
    }

    #[test]
    fn windy_cave_beats_generic_cave() {
        assert_eq!(
            detect_location("Windy Cave\nWind blow hard in cave."),
            Some(Location::WindyCave)
        );
    }

    #[test]
    fn declaration_order_breaks_remaining_ties() {
        // Table and statue both match; the table room row comes first.
        assert_eq!(
            detect_location("A table stands before a statue."),
            Some(Location::TableRoom)
        );
    }

    #[test]
    fn whole_is_not_hole() {
        assert_eq!(detect_location("Grunk whole body tired."), None);
    }

    #[test]
    fn parse_location_ids() {
        assert_eq!("fountain_room".parse::<Location>().unwrap(), Location::FountainRoom);
        assert_eq!("Statue Room".parse::<Location>().unwrap(), Location::StatueRoom);
        assert!("moon".parse::<Location>().is_err());
    }

    #[test]
    fn ids_round_trip_through_display() {
        for loc in Location::ALL {
            assert_eq!(loc.to_string().parse::<Location>().unwrap(), loc);
        }
    }
}
