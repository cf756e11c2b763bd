//! Error types for command verification and constraint checking.

use thiserror::Error;

/// Result type for rule-layer operations.
pub type RulesResult<T> = Result<T, RulesError>;

/// Errors raised while building the rule layer.
///
/// Checking and verifying never fail; these only surface at construction.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A command-grammar pattern failed to compile.
    #[error("invalid command pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// No rule with this name exists in the checker's table.
    #[error("unknown rule: {0}")]
    UnknownRule(String),
}

/// Failures of the external text-generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// The generator cannot be reached or has nothing left to give.
    #[error("text generator unavailable: {0}")]
    Unavailable(String),

    /// The generator answered with only whitespace.
    #[error("text generator returned an empty response")]
    Empty,

    /// The request was made but failed.
    #[error("text generation failed: {0}")]
    Failed(String),
}
