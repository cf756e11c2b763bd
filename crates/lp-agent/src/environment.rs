//! The game-environment collaborator.

use std::collections::BTreeMap;

use crate::error::EnvironmentError;

/// Key under which an environment reports the game's numeric score.
pub const SCORE_KEY: &str = "score";

/// What one call to [`GameEnvironment::step`] returned.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// The game's response text.
    pub observation: String,
    /// Reward earned by this step.
    pub reward: f64,
    /// Whether the game has ended.
    pub done: bool,
    /// Extra numeric values, optionally including [`SCORE_KEY`].
    pub info: BTreeMap<String, f64>,
}

impl StepOutcome {
    /// A step with no reward that does not end the game.
    pub fn new(observation: impl Into<String>) -> Self {
        Self {
            observation: observation.into(),
            reward: 0.0,
            done: false,
            info: BTreeMap::new(),
        }
    }

    /// Set the reward.
    pub fn with_reward(mut self, reward: f64) -> Self {
        self.reward = reward;
        self
    }

    /// Mark the game as ended.
    pub fn finished(mut self) -> Self {
        self.done = true;
        self
    }

    /// Attach an info value.
    pub fn with_info(mut self, key: impl Into<String>, value: f64) -> Self {
        self.info.insert(key.into(), value);
        self
    }

    /// The reported score, if any.
    pub fn score(&self) -> Option<f64> {
        self.info.get(SCORE_KEY).copied()
    }
}

/// A text game the agent plays, such as an interpreter subprocess.
pub trait GameEnvironment {
    /// Start a new game and return its opening text.
    fn reset(&mut self) -> Result<String, EnvironmentError>;

    /// Send one command.
    fn step(&mut self, action: &str) -> Result<StepOutcome, EnvironmentError>;

    /// Release the game. The default does nothing.
    fn close(&mut self) {}
}

impl<E: GameEnvironment + ?Sized> GameEnvironment for Box<E> {
    fn reset(&mut self) -> Result<String, EnvironmentError> {
        (**self).reset()
    }

    fn step(&mut self, action: &str) -> Result<StepOutcome, EnvironmentError> {
        (**self).step(action)
    }

    fn close(&mut self) {
        (**self).close()
    }
}
