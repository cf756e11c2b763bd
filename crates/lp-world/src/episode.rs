//! Episode log: the record of one run, used for post-hoc scoring.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WorldResult;

/// Unique identifier for an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeId(pub Uuid);

impl EpisodeId {
    /// Generate a new random episode ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EpisodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// One turn of an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based turn number.
    pub turn: u32,
    /// The reasoning text produced before acting, if any.
    pub thought: Option<String>,
    /// The command sent to the game.
    pub action: String,
    /// The game's response.
    pub observation: String,
    /// Reward reported by the environment for this step.
    pub reward: f64,
    /// Generation attempts spent selecting the action.
    pub attempts: u32,
}

impl StepRecord {
    /// Create a step with no thought, zero reward, and one attempt.
    pub fn new(turn: u32, action: impl Into<String>, observation: impl Into<String>) -> Self {
        Self {
            turn,
            thought: None,
            action: action.into(),
            observation: observation.into(),
            reward: 0.0,
            attempts: 1,
        }
    }

    /// Attach the thought that preceded the action.
    pub fn with_thought(mut self, thought: impl Into<String>) -> Self {
        self.thought = Some(thought.into());
        self
    }

    /// Set the reward.
    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = reward;
        self
    }

    /// Set the number of generation attempts.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }
}

/// The full record of one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeLog {
    /// Episode identifier.
    pub id: EpisodeId,
    /// When the episode started.
    pub started_at: DateTime<Utc>,
    /// Opening text returned by the environment on reset.
    pub intro: String,
    /// Turns in order.
    pub steps: Vec<StepRecord>,
    /// Last numeric score the environment reported, if any.
    pub final_score: Option<f64>,
    /// Whether the environment signalled the end of the game.
    pub finished: bool,
}

impl EpisodeLog {
    /// Start a log with the environment's opening text.
    pub fn new(intro: impl Into<String>) -> Self {
        Self {
            id: EpisodeId::new(),
            started_at: Utc::now(),
            intro: intro.into(),
            steps: Vec::new(),
            final_score: None,
            finished: false,
        }
    }

    /// Append a step.
    pub fn push(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    /// Number of turns taken.
    pub fn turns(&self) -> u32 {
        self.steps.len() as u32
    }

    /// Observations returned after each action, in order.
    pub fn observations(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.observation.as_str())
    }

    /// Actions issued, in order.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.action.as_str())
    }

    /// The last observation, or an empty string before the first turn.
    pub fn final_observation(&self) -> &str {
        self.steps
            .last()
            .map(|s| s.observation.as_str())
            .unwrap_or("")
    }

    /// Serialise the log to pretty JSON.
    pub fn to_json(&self) -> WorldResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_log() {
        let log = EpisodeLog::new("Grunk by farm.");
        assert_eq!(log.turns(), 0);
        assert_eq!(log.final_observation(), "");
        assert!(!log.finished);
    }

    #[test]
    fn steps_accumulate() {
        let mut log = EpisodeLog::new("");
        log.push(StepRecord::new(1, "north", "Forest"));
        log.push(StepRecord::new(2, "ne", "Grunk fall in hole!").with_reward(1.0));
        assert_eq!(log.turns(), 2);
        assert_eq!(log.final_observation(), "Grunk fall in hole!");
        assert_eq!(log.actions().collect::<Vec<_>>(), vec!["north", "ne"]);
    }

    #[test]
    fn log_serialises() {
        let mut log = EpisodeLog::new("intro");
        log.push(StepRecord::new(1, "look", "Outside").with_thought("look around"));
        let json = log.to_json().unwrap();
        let back: EpisodeLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn episode_id_display_is_short() {
        assert_eq!(EpisodeId::new().to_string().len(), 8);
    }
}
