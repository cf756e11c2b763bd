//! Belief-state model for an agent playing Lost Pig.
//!
//! The [`WorldState`] is the agent's own inferred picture of the game: where
//! Grunk is, what Grunk carries, which puzzles are solved, and what has already
//! been tried in each room. It is built up from free-text observations by
//! keyword tables and is a best-effort overlay, not a simulator.

/// Command canonicalisation for near-duplicate detection.
pub mod command;
/// Episode log used for scoring.
pub mod episode;
/// Error types.
pub mod error;
/// Observation inference: evidence extraction and state folding.
pub mod inference;
/// Item vocabulary and placement.
pub mod item;
/// Known locations and recognition tables.
pub mod location;
/// Puzzle identifiers and pole colour.
pub mod puzzle;
mod report;
/// The belief store.
pub mod state;
/// Word-boundary text matching.
pub mod text;

pub use episode::{EpisodeId, EpisodeLog, StepRecord};
pub use error::{WorldError, WorldResult};
pub use inference::{Evidence, PigEvidence, infer, read_evidence};
pub use item::ItemPlace;
pub use location::Location;
pub use puzzle::{PoleColor, Puzzle};
pub use state::{LocationRecord, ProgressMetrics, WorldState};
