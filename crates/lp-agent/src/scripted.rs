//! Deterministic collaborators: canned generator output and transcript
//! playback.

use std::collections::VecDeque;
use std::path::Path;

use lp_rules::achievement::SCORE_MARKER;
use lp_rules::{GeneratorError, TextGenerator};
use lp_world::{EpisodeLog, StepRecord, WorldState};
use serde::{Deserialize, Serialize};

use crate::environment::{GameEnvironment, SCORE_KEY, StepOutcome};
use crate::error::{AgentError, AgentResult, EnvironmentError, read_file};

/// A generator that answers from a queue of canned responses.
///
/// Every prompt it receives is recorded. Once the queue is empty each call
/// fails with [`GeneratorError::Unavailable`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    responses: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedGenerator {
    /// Create a generator that will return `responses` in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// One response per non-blank line of `text`.
    pub fn from_lines(text: &str) -> Self {
        Self::new(text.lines().map(str::trim).filter(|l| !l.is_empty()))
    }

    /// Queue another response.
    pub fn push(&mut self, response: impl Into<String>) {
        self.responses.push_back(response.into());
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Responses not yet handed out.
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(
        &mut self,
        prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, GeneratorError> {
        self.prompts.push(prompt.to_string());
        let response = self
            .responses
            .pop_front()
            .ok_or_else(|| GeneratorError::Unavailable("script exhausted".to_string()))?;
        if response.trim().is_empty() {
            return Err(GeneratorError::Empty);
        }
        Ok(response)
    }
}

/// One recorded exchange with the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    /// Command that was sent.
    pub action: String,
    /// What the game answered.
    pub observation: String,
}

/// A recorded game session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Opening text.
    #[serde(default)]
    pub intro: String,
    /// Exchanges in order.
    #[serde(default)]
    pub turns: Vec<TranscriptTurn>,
}

impl Transcript {
    /// Parse a transcript from JSON.
    pub fn from_json_str(json: &str) -> AgentResult<Self> {
        serde_json::from_str(json).map_err(AgentError::Transcript)
    }

    /// Read and parse a transcript file.
    pub fn load(path: &Path) -> AgentResult<Self> {
        Self::from_json_str(&read_file(path)?)
    }

    /// Fold the transcript into a belief state and an episode log.
    pub fn replay(&self) -> (WorldState, EpisodeLog) {
        let mut state = WorldState::new();
        let mut log = EpisodeLog::new(self.intro.clone());
        state.update(&self.intro, "");
        for (i, turn) in self.turns.iter().enumerate() {
            state.update(&turn.observation, &turn.action);
            log.push(
                StepRecord::new(i as u32 + 1, turn.action.clone(), turn.observation.clone())
                    .with_reward(score_markers(&turn.observation)),
            );
        }
        log.final_score = Some(log.steps.iter().map(|s| s.reward).sum());
        (state, log)
    }
}

fn score_markers(observation: &str) -> f64 {
    observation.matches(SCORE_MARKER).count() as f64
}

/// An environment that plays back a transcript whatever the agent sends.
///
/// Each step returns the next recorded observation; the last one ends the
/// game. Score markers in observations become rewards and a running score.
#[derive(Debug, Clone)]
pub struct TranscriptEnvironment {
    transcript: Transcript,
    cursor: usize,
    score: f64,
    started: bool,
    closed: bool,
}

impl TranscriptEnvironment {
    /// Play back `transcript`.
    pub fn new(transcript: Transcript) -> Self {
        Self {
            transcript,
            cursor: 0,
            score: 0.0,
            started: false,
            closed: false,
        }
    }

    /// Whether [`GameEnvironment::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl GameEnvironment for TranscriptEnvironment {
    fn reset(&mut self) -> Result<String, EnvironmentError> {
        if self.closed {
            return Err(EnvironmentError::Closed);
        }
        self.cursor = 0;
        self.score = 0.0;
        self.started = true;
        Ok(self.transcript.intro.clone())
    }

    fn step(&mut self, action: &str) -> Result<StepOutcome, EnvironmentError> {
        if self.closed {
            return Err(EnvironmentError::Closed);
        }
        if !self.started {
            return Err(EnvironmentError::NotStarted);
        }
        let turn = self
            .transcript
            .turns
            .get(self.cursor)
            .ok_or_else(|| EnvironmentError::StepFailed("transcript exhausted".to_string()))?;
        if !turn.action.eq_ignore_ascii_case(action.trim()) {
            log::debug!("transcript expected '{}', agent sent '{action}'", turn.action);
        }
        self.cursor += 1;

        let reward = score_markers(&turn.observation);
        self.score += reward;
        let mut outcome = StepOutcome::new(turn.observation.clone())
            .with_reward(reward)
            .with_info(SCORE_KEY, self.score);
        if self.cursor == self.transcript.turns.len() {
            outcome = outcome.finished();
        }
        Ok(outcome)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
