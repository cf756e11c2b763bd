//! The bounded verify/check/regenerate protocol around each action.

use lp_rules::{ActionVerifier, ConstraintChecker, GenerationParams, TextGenerator};
use lp_world::WorldState;

use crate::config::AgentConfig;
use crate::prompt::{clean_candidate, regenerate_prompt};

/// Stages a candidate action moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStage {
    /// The first candidate was produced.
    Generate,
    /// The candidate is checked against the command grammar.
    VerifyStructure,
    /// The candidate is checked against the belief state.
    CheckConstraints,
    /// A replacement is requested with the rejection as feedback.
    RegenerateWithFeedback,
    /// The candidate is sent to the game.
    Accept,
}

/// How the protocol ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The candidate passed both checks.
    Passed,
    /// Retries ran out; the last candidate was taken unchecked.
    Exhausted,
}

/// The action the protocol settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Command to send to the game.
    pub action: String,
    /// Verification passes used.
    pub attempts: u32,
    /// Whether the action passed or was forced through.
    pub outcome: SelectionOutcome,
    /// Feedback for each rejected candidate, in order.
    pub rejections: Vec<String>,
    /// Every stage visited, in order.
    pub trace: Vec<RetryStage>,
}

/// Parameters of the protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum verification passes.
    pub max_retries: u32,
    /// Command used when regeneration yields nothing.
    pub fallback_action: String,
    /// Ask the generator about commands the grammar rejects.
    pub llm_verification: bool,
    /// Parameters for regeneration calls.
    pub regenerate: GenerationParams,
}

impl RetryPolicy {
    /// Take the protocol settings from an agent config.
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            max_retries: config.max_retries.max(1),
            fallback_action: config.fallback_action.clone(),
            llm_verification: config.llm_verification,
            regenerate: config.regenerate,
        }
    }

    /// Drive `candidate` through verification and constraint checking,
    /// regenerating on rejection, until it passes or retries run out.
    pub fn select<G>(
        &self,
        candidate: String,
        verifier: &mut ActionVerifier,
        checker: &ConstraintChecker,
        state: &WorldState,
        generator: &mut G,
    ) -> Selection
    where
        G: TextGenerator + ?Sized,
    {
        let mut action = candidate;
        let mut rejections = Vec::new();
        let mut trace = vec![RetryStage::Generate];

        for attempt in 1..=self.max_retries {
            trace.push(RetryStage::VerifyStructure);
            let verdict = if self.llm_verification {
                verifier.verify_with_fallback(&action, generator)
            } else {
                verifier.verify(&action)
            };

            let feedback = match verdict.normalized() {
                None => format!(
                    "Invalid command structure: {}",
                    verdict.reason().unwrap_or("unknown")
                ),
                Some(normalized) => {
                    action = normalized.to_string();
                    trace.push(RetryStage::CheckConstraints);
                    let report = checker.check_action(state, &action);
                    if report.is_valid() {
                        trace.push(RetryStage::Accept);
                        return Selection {
                            action,
                            attempts: attempt,
                            outcome: SelectionOutcome::Passed,
                            rejections,
                            trace,
                        };
                    }
                    report.feedback()
                }
            };

            log::debug!("attempt {attempt}: '{action}' rejected: {feedback}");
            trace.push(RetryStage::RegenerateWithFeedback);
            action = self.regenerate(&action, &feedback, generator);
            rejections.push(feedback);
        }

        log::warn!(
            "no candidate passed after {} attempts; sending '{action}'",
            self.max_retries
        );
        trace.push(RetryStage::Accept);
        Selection {
            action,
            attempts: self.max_retries,
            outcome: SelectionOutcome::Exhausted,
            rejections,
            trace,
        }
    }

    fn regenerate<G>(&self, action: &str, feedback: &str, generator: &mut G) -> String
    where
        G: TextGenerator + ?Sized,
    {
        let prompt = regenerate_prompt(action, feedback);
        match generator.generate(
            &prompt,
            self.regenerate.max_tokens,
            self.regenerate.temperature,
        ) {
            Ok(text) => clean_candidate(&text, &self.fallback_action),
            Err(e) => {
                log::warn!("regeneration failed: {e}");
                self.fallback_action.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lp_world::Location;

    use super::*;
    use crate::scripted::ScriptedGenerator;

    fn policy() -> RetryPolicy {
        RetryPolicy::from_config(&AgentConfig::default().with_llm_verification(false))
    }

    fn verifier() -> ActionVerifier {
        ActionVerifier::new().unwrap()
    }

    #[test]
    fn valid_candidate_is_accepted_first_time() {
        let mut generator = ScriptedGenerator::new(Vec::<String>::new());
        let selection = policy().select(
            "Look".into(),
            &mut verifier(),
            &ConstraintChecker::new(),
            &WorldState::new(),
            &mut generator,
        );
        assert_eq!(selection.action, "look");
        assert_eq!(selection.attempts, 1);
        assert_eq!(selection.outcome, SelectionOutcome::Passed);
        assert_eq!(
            selection.trace,
            vec![
                RetryStage::Generate,
                RetryStage::VerifyStructure,
                RetryStage::CheckConstraints,
                RetryStage::Accept
            ]
        );
        assert!(generator.prompts().is_empty());
    }

    #[test]
    fn hard_violation_triggers_regeneration_with_feedback() {
        let mut state = WorldState::new();
        state.set_location(Location::FountainRoom);
        let mut generator = ScriptedGenerator::new(["take coin"]);
        let selection = policy().select(
            "go cave".into(),
            &mut verifier(),
            &ConstraintChecker::new(),
            &state,
            &mut generator,
        );
        assert_eq!(selection.action, "take coin");
        assert_eq!(selection.attempts, 2);
        assert_eq!(selection.rejections.len(), 1);
        assert!(selection.rejections[0].contains("[HARD] Need lit torch or orb"));
        assert!(generator.prompts()[0].contains("\"go cave\" was invalid"));
    }

    #[test]
    fn structural_failure_feeds_back_reason() {
        let mut generator = ScriptedGenerator::new(["north"]);
        let selection = policy().select(
            "Grunk wonders what to do".into(),
            &mut verifier(),
            &ConstraintChecker::new(),
            &WorldState::new(),
            &mut generator,
        );
        assert_eq!(selection.action, "go north");
        assert!(selection.rejections[0].starts_with("Invalid command structure:"));
        assert_eq!(
            &selection.trace[..4],
            &[
                RetryStage::Generate,
                RetryStage::VerifyStructure,
                RetryStage::RegenerateWithFeedback,
                RetryStage::VerifyStructure
            ]
        );
    }

    #[test]
    fn exhausted_retries_accept_last_candidate() {
        let mut generator = ScriptedGenerator::new(["use key", "use coin", "use hat"]);
        let selection = policy().select(
            "use orb".into(),
            &mut verifier(),
            &ConstraintChecker::new(),
            &WorldState::new(),
            &mut generator,
        );
        assert_eq!(selection.outcome, SelectionOutcome::Exhausted);
        assert_eq!(selection.attempts, 3);
        assert_eq!(selection.rejections.len(), 3);
        assert_eq!(selection.action, "use hat");
        assert_eq!(selection.trace.last(), Some(&RetryStage::Accept));
    }

    #[test]
    fn failed_regeneration_uses_fallback() {
        let mut generator = ScriptedGenerator::new(Vec::<String>::new());
        let selection = policy().select(
            "use orb".into(),
            &mut verifier(),
            &ConstraintChecker::new(),
            &WorldState::new(),
            &mut generator,
        );
        assert_eq!(selection.action, "look");
        assert_eq!(selection.outcome, SelectionOutcome::Passed);
        assert_eq!(selection.attempts, 2);
    }

    #[test]
    fn generator_verification_is_consulted() {
        let policy = RetryPolicy::from_config(&AgentConfig::default());
        let mut generator = ScriptedGenerator::new(["VALID"]);
        let selection = policy.select(
            "wiggle ears".into(),
            &mut verifier(),
            &ConstraintChecker::new(),
            &WorldState::new(),
            &mut generator,
        );
        assert_eq!(selection.action, "wiggle ears");
        assert_eq!(selection.attempts, 1);
    }
}
