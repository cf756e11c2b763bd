//! The text-generation collaborator consumed by the verifier and the agent.

use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

/// Token budget and sampling temperature for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl GenerationParams {
    /// Create a parameter pair.
    pub const fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

/// A source of generated text, typically an LLM client.
pub trait TextGenerator {
    /// Generate a completion for `prompt`.
    fn generate(
        &mut self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GeneratorError>;

    /// Generate an action, steering the generator with example actions.
    ///
    /// The default appends the hints to the prompt and generates with a
    /// short, low-temperature budget.
    fn generate_with_hints(
        &mut self,
        prompt: &str,
        valid_hints: &[String],
        invalid_hints: &[String],
    ) -> Result<String, GeneratorError> {
        let prompt = prompt_with_hints(prompt, valid_hints, invalid_hints);
        self.generate(&prompt, 50, 0.3)
    }
}

impl<G: TextGenerator + ?Sized> TextGenerator for Box<G> {
    fn generate(
        &mut self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, GeneratorError> {
        (**self).generate(prompt, max_tokens, temperature)
    }

    fn generate_with_hints(
        &mut self,
        prompt: &str,
        valid_hints: &[String],
        invalid_hints: &[String],
    ) -> Result<String, GeneratorError> {
        (**self).generate_with_hints(prompt, valid_hints, invalid_hints)
    }
}

/// Append suggested and discouraged actions to a prompt.
pub fn prompt_with_hints(prompt: &str, valid_hints: &[String], invalid_hints: &[String]) -> String {
    let mut out = prompt.to_string();
    if !valid_hints.is_empty() {
        out.push_str("\n\nSuggested actions: ");
        out.push_str(&valid_hints.join(", "));
    }
    if !invalid_hints.is_empty() {
        out.push_str("\nAvoid: ");
        out.push_str(&invalid_hints.join(", "));
    }
    out
}
