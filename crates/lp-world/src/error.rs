//! Error types for the belief-state model.

use thiserror::Error;

/// Result type for world-state operations.
pub type WorldResult<T> = Result<T, WorldError>;

/// Errors raised by the explicit setters and the snapshot codec.
///
/// Observation inference never produces these: unrecognised text leaves the
/// belief state untouched instead of failing.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A location identifier outside the known room table.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// A puzzle identifier outside the known puzzle table.
    #[error("unknown puzzle: {0}")]
    UnknownPuzzle(String),

    /// A pole colour other than green or black.
    #[error("unknown pole colour: {0}")]
    UnknownPoleColor(String),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}
