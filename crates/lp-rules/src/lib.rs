//! Rule layer for the Lost Pig agent.
//!
//! Three independent checks sit between the text generator and the game:
//! the [`ActionVerifier`] rejects strings that are not commands, the
//! [`ConstraintChecker`] rejects commands inconsistent with the belief state,
//! and the [`AchievementEvaluator`] scores a finished episode.

/// Milestone table and episode scoring.
pub mod achievement;
/// Candidate-action parsing for rule predicates.
pub mod action;
/// Bounded verdict cache.
pub mod cache;
/// Constraint checker and report.
pub mod checker;
/// Error types.
pub mod error;
/// Text-generator collaborator trait.
pub mod generator;
/// Hard and soft rule tables.
pub mod rules;
/// Structural command verification.
pub mod verifier;
/// Constraint violations.
pub mod violation;

pub use achievement::{Achievement, AchievementEvaluator, EvaluationReport};
pub use action::ParsedAction;
pub use checker::{ConstraintChecker, ConstraintReport};
pub use error::{GeneratorError, RulesError, RulesResult};
pub use generator::{GenerationParams, TextGenerator};
pub use rules::Rule;
pub use verifier::{ActionVerifier, Verdict};
pub use violation::{ConstraintKind, ConstraintViolation};
