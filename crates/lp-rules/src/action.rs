//! A candidate action split into lowercase words for rule predicates.

use lp_world::command::{canonical_command, canonical_direction};
use lp_world::text::{contains_any, contains_phrase, normalize_command};

/// Verbs that move the player.
const MOVEMENT_VERBS: &[&str] = &["go", "move", "walk", "run", "enter", "exit", "climb"];

/// A candidate action prepared for rule checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAction {
    text: String,
    words: Vec<String>,
    canonical: String,
}

impl ParsedAction {
    /// Normalise and split `action`.
    pub fn parse(action: &str) -> Self {
        let text = normalize_command(action);
        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        let canonical = canonical_command(&text);
        Self {
            text,
            words,
            canonical,
        }
    }

    /// The normalised action text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The action's words in order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The canonical form, e.g. `north` for `go n`.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Whether the action is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether `phrase` occurs in the action on word boundaries.
    pub fn mentions(&self, phrase: &str) -> bool {
        contains_phrase(&self.text, phrase)
    }

    /// Whether any of `phrases` occurs in the action.
    pub fn mentions_any(&self, phrases: &[&str]) -> bool {
        contains_any(&self.text, phrases)
    }

    /// Whether `word` is one of the action's words exactly.
    pub fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// The word immediately following the first occurrence of `verb`.
    pub fn object_of(&self, verb: &str) -> Option<&str> {
        let at = self.words.iter().position(|w| w == verb)?;
        self.words.get(at + 1).map(String::as_str)
    }

    /// Whether the action moves the player: a movement verb or a direction.
    pub fn is_movement(&self) -> bool {
        self.words.first().is_some_and(|w| MOVEMENT_VERBS.contains(&w.as_str()))
            || self.direction().is_some()
    }

    /// The compass direction the action heads in, if it names one.
    pub fn direction(&self) -> Option<&'static str> {
        self.words.iter().find_map(|w| canonical_direction(w))
    }
}
