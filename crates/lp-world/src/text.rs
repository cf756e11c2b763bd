//! Word-boundary keyword matching over lowercased game text.

use std::cell::RefCell;
use std::collections::HashMap;

use regex::Regex;

thread_local! {
    static PHRASE_PATTERNS: RefCell<HashMap<String, Regex>> = RefCell::new(HashMap::new());
}

/// Word-boundary pattern for `phrase`.
///
/// `\b` is only placed on sides of the phrase that end in a word character,
/// and a trailing word character may be followed by one `s`.
fn phrase_pattern(phrase: &str) -> Result<Regex, regex::Error> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let start = if phrase.starts_with(is_word) { r"\b" } else { "" };
    let end = if phrase.ends_with(is_word) { r"s?\b" } else { "" };
    Regex::new(&format!("{start}{}{end}", regex::escape(phrase)))
}

/// Check whether `phrase` occurs in `haystack` on word boundaries.
///
/// Both arguments are expected to be lowercase already. A single trailing
/// `s` is tolerated so that "bricks" matches "brick" and "caves" matches
/// "cave". Boundaries are only enforced on sides of the phrase that end in an
/// alphanumeric character, so markers like `"grunk have:"` still match when
/// the list follows without a space.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }

    PHRASE_PATTERNS.with(|cache| {
        let mut cache = cache.borrow_mut();
        if !cache.contains_key(phrase) {
            match phrase_pattern(phrase) {
                Ok(pattern) => {
                    cache.insert(phrase.to_string(), pattern);
                }
                Err(e) => {
                    log::warn!("unusable phrase {phrase:?}: {e}");
                    return false;
                }
            }
        }
        cache.get(phrase).is_some_and(|p| p.is_match(haystack))
    })
}

/// Check whether any of `phrases` occurs in `haystack` on word boundaries.
pub fn contains_any(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(haystack, p))
}

/// Split text into lowercase alphanumeric words.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Lowercase, trim, and collapse internal whitespace of a command.
pub fn normalize_command(command: &str) -> String {
    command
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whole_words_only() {
        assert!(contains_phrase("grunk fall in hole", "hole"));
        assert!(!contains_phrase("grunk whole body hurt", "hole"));
        assert!(!contains_phrase("that is big", "hat"));
    }

    #[test]
    fn tolerates_plural_suffix() {
        assert!(contains_phrase("two bricks here", "brick"));
        assert!(contains_phrase("dark caves", "cave"));
        assert!(!contains_phrase("brickwork", "brick"));
    }

    #[test]
    fn punctuated_marker_needs_no_trailing_boundary() {
        assert!(contains_phrase("grunk have:torch", "grunk have:"));
        assert!(contains_phrase("grunk have: torch", "grunk have:"));
    }

    #[test]
    fn phrase_with_regex_metacharacters_is_literal() {
        assert!(contains_phrase("grunk score go up one.] yes", "go up one.]"));
        assert!(!contains_phrase("grunk score go up one", "go up one.]"));
        assert!(!contains_phrase("a+b", "a.b"));
    }

    #[test]
    fn multi_word_phrases() {
        assert!(contains_phrase("you see pig here.", "see pig"));
        assert!(contains_any("the torch went out", &["go out", "went out"]));
    }

    #[test]
    fn words_split_on_punctuation() {
        assert_eq!(words("Take the Torch, now!"), vec!["take", "the", "torch", "now"]);
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize_command("  Examine   POLE "), "examine pole");
        assert_eq!(normalize_command("   "), "");
    }
}
