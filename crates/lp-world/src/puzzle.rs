//! Puzzle identifiers and the colour-magnet pole state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A puzzle whose solution the tracker can recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Puzzle {
    /// Relit the torch with black powder and water.
    LightTorch,
    /// Unlocked or opened the chest.
    CaveChest,
    /// Opened the secret door behind the statue.
    StatueSecret,
    /// Burned the green pole black so it attracts white paper.
    BlackenPole,
}

impl Puzzle {
    /// Every known puzzle.
    pub const ALL: [Puzzle; 4] = [
        Puzzle::LightTorch,
        Puzzle::CaveChest,
        Puzzle::StatueSecret,
        Puzzle::BlackenPole,
    ];

    /// The stable identifier used in snapshots and prompts.
    pub fn id(&self) -> &'static str {
        match self {
            Self::LightTorch => "light_torch",
            Self::CaveChest => "cave_chest",
            Self::StatueSecret => "statue_secret",
            Self::BlackenPole => "blacken_pole",
        }
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Puzzle {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Puzzle::ALL
            .iter()
            .copied()
            .find(|p| p.id() == key)
            .ok_or_else(|| WorldError::UnknownPuzzle(s.to_string()))
    }
}

/// Colour of the magnet pole. Green repels, black attracts white things.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoleColor {
    /// The starting colour.
    #[default]
    Green,
    /// After being burned.
    Black,
}

impl PoleColor {
    /// Lowercase colour name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for PoleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PoleColor {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "black" => Ok(Self::Black),
            _ => Err(WorldError::UnknownPoleColor(s.to_string())),
        }
    }
}
