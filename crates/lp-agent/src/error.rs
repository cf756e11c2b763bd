//! Error types for the agent loop.

use thiserror::Error;

use lp_rules::RulesError;

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors that stop an episode from starting.
///
/// Failures during a turn never surface here; the loop logs them and
/// substitutes a fallback.
#[derive(Debug, Error)]
pub enum AgentError {
    /// `run_episode` was called without a game environment.
    #[error("no game environment provided")]
    MissingEnvironment,

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file did not parse.
    #[error("invalid config: {0}")]
    Config(#[source] serde_json::Error),

    /// A transcript file did not parse.
    #[error("invalid transcript: {0}")]
    Transcript(#[source] serde_json::Error),

    /// The rule layer could not be built.
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Failures of the game-environment collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    /// `step` was called before `reset`.
    #[error("environment not started")]
    NotStarted,

    /// The game did not accept the step.
    #[error("step failed: {0}")]
    StepFailed(String),

    /// The environment has been closed.
    #[error("environment closed")]
    Closed,
}

pub(crate) fn read_file(path: &std::path::Path) -> AgentResult<String> {
    std::fs::read_to_string(path).map_err(|source| AgentError::Io {
        path: path.display().to_string(),
        source,
    })
}
