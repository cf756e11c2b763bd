//! Configuration for an agent run.

use std::path::Path;

use lp_rules::GenerationParams;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, AgentResult, read_file};

/// Configuration for an agent run.
///
/// Deserialises from JSON; keys left out keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Turn budget for one episode.
    pub max_turns: u32,
    /// Verification passes before the last candidate is accepted anyway.
    pub max_retries: u32,
    /// Command used when generation fails or yields nothing.
    pub fallback_action: String,
    /// Run the verify/check/regenerate protocol. When false the agent is a
    /// baseline that only cleans the generator's output.
    pub enforce_constraints: bool,
    /// Ask the generator to judge commands the grammar rejects.
    pub llm_verification: bool,
    /// Entries per verifier cache.
    pub verifier_cache_capacity: usize,
    /// Recent observations and actions included in prompts.
    pub history_window: usize,
    /// Parameters for the reasoning call.
    pub think: GenerationParams,
    /// Parameters for baseline action generation.
    pub act: GenerationParams,
    /// Parameters for regeneration after a rejection.
    pub regenerate: GenerationParams,
    /// Parameters for generator-side verification.
    pub verify: GenerationParams,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_turns: 40,
            max_retries: 3,
            fallback_action: "look".to_string(),
            enforce_constraints: true,
            llm_verification: true,
            verifier_cache_capacity: 256,
            history_window: 3,
            think: GenerationParams::new(100, 0.7),
            act: GenerationParams::new(50, 0.3),
            regenerate: GenerationParams::new(30, 0.5),
            verify: GenerationParams::new(50, 0.0),
        }
    }
}

impl AgentConfig {
    /// Parse a JSON config.
    pub fn from_json_str(json: &str) -> AgentResult<Self> {
        serde_json::from_str(json).map_err(AgentError::Config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> AgentResult<Self> {
        Self::from_json_str(&read_file(path)?)
    }

    /// Set the turn budget.
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    /// Set the number of verification passes (at least 1).
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    /// Set the fallback command.
    pub fn with_fallback_action(mut self, action: impl Into<String>) -> Self {
        self.fallback_action = action.into();
        self
    }

    /// Enable or disable constraint enforcement.
    pub fn with_constraints(mut self, enforce: bool) -> Self {
        self.enforce_constraints = enforce;
        self
    }

    /// Enable or disable generator-side verification.
    pub fn with_llm_verification(mut self, enabled: bool) -> Self {
        self.llm_verification = enabled;
        self
    }

    /// Set the verifier cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.verifier_cache_capacity = capacity;
        self
    }

    /// Set how many recent observations and actions prompts include.
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }
}
