//! Agent loop for playing Lost Pig with a text generator.
//!
//! Each turn the agent folds the latest observation into its
//! [`WorldState`](lp_world::WorldState), asks the generator for a thought and
//! a command, and runs the command through structural verification and
//! constraint checking before sending it to the game. Rejected commands are
//! regenerated with feedback a bounded number of times.

/// The agent and its episode loop.
pub mod agent;
/// Agent configuration.
pub mod config;
/// Game-environment collaborator trait.
pub mod environment;
/// Error types.
pub mod error;
/// Prompt construction and candidate cleaning.
pub mod prompt;
/// The verify/check/regenerate protocol.
pub mod retry;
/// Scripted generator and transcript playback.
pub mod scripted;

pub use agent::Agent;
pub use config::AgentConfig;
pub use environment::{GameEnvironment, SCORE_KEY, StepOutcome};
pub use error::{AgentError, AgentResult, EnvironmentError};
pub use retry::{RetryPolicy, RetryStage, Selection, SelectionOutcome};
pub use scripted::{ScriptedGenerator, Transcript, TranscriptEnvironment, TranscriptTurn};
