//! Structural command verification.
//!
//! The verifier answers one question: does this string look like a game
//! command at all? It knows nothing about the world; consistency with the
//! belief state is the constraint checker's job.

use regex::Regex;
use serde::Serialize;
use strsim::jaro_winkler;

use crate::cache::BoundedCache;
use crate::error::RulesResult;
use crate::generator::{GenerationParams, TextGenerator};

/// Default number of entries kept in each verdict cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Command grammar, tried in order. The first match wins.
const COMMAND_PATTERNS: &[&str] = &[
    r"^(go|move|walk|run|travel|enter|climb)\s+(.+)$",
    r"^(take|get|pick\s+up|grab)\s+(?:the\s+)?(.+)$",
    r"^(drop|put\s+down|discard)\s+(?:the\s+)?(.+)$",
    r"^(use|activate|operate)\s+(?:the\s+)?(.+)$",
    r"^(look|examine|inspect|read|x|search)\s+(?:at\s+|in\s+|under\s+)?(?:the\s+)?(.+)$",
    r"^(open|close|unlock|lock)\s+(?:the\s+)?(.+)$",
    r"^(talk|speak|say|tell|ask)\s+(?:to\s+)?(.+)$",
    r"^(give|hand|offer|show)\s+(?:the\s+)?(.+)\s+(?:to\s+)?(.+)$",
    r"^(catch|chase|follow|burn|light|put|push|pull|turn|fill|pour|eat|drink|wear|remove|throw|blow|break|hit|touch|smell|listen|play)\s+(.+)$",
    r"^(inventory|inv|i)$",
    r"^(look|examine|l|search)$",
    r"^(listen|smell|wait|z|sleep|jump|dance|sing|score)$",
    r"^(help|h)$",
    r"^(quit|exit|q)$",
];

/// Bare direction words accepted when no pattern matches.
const BARE_DIRECTIONS: &[&str] = &[
    "n",
    "s",
    "e",
    "w",
    "u",
    "d",
    "ne",
    "nw",
    "se",
    "sw",
    "north",
    "south",
    "east",
    "west",
    "up",
    "down",
    "northeast",
    "northwest",
    "southeast",
    "southwest",
];

/// Verbs offered as "did you mean" suggestions.
const KNOWN_VERBS: &[&str] = &[
    "go", "take", "drop", "use", "look", "examine", "read", "open", "close", "unlock", "talk",
    "give", "catch", "burn", "light", "put", "push", "pull", "search", "listen", "inventory",
    "north", "south", "east", "west",
];

/// Reason reported for a command found in the invalid cache.
const CACHED_INVALID: &str = "Action previously marked as invalid";

/// Outcome of a structural check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The command is well-formed.
    Valid {
        /// Trimmed, lowercased command to send to the game.
        normalized: String,
    },
    /// The command was rejected.
    Invalid {
        /// Diagnostic message naming the offending text.
        reason: String,
    },
}

impl Verdict {
    /// Whether the command was accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid { .. })
    }

    /// The normalised command, if accepted.
    pub fn normalized(&self) -> Option<&str> {
        match self {
            Verdict::Valid { normalized } => Some(normalized),
            Verdict::Invalid { .. } => None,
        }
    }

    /// The rejection reason, if rejected.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Valid { .. } => None,
            Verdict::Invalid { reason } => Some(reason),
        }
    }
}

/// Pattern-based structural checker with its own verdict caches.
#[derive(Debug, Clone)]
pub struct ActionVerifier {
    patterns: Vec<Regex>,
    valid: BoundedCache<String>,
    invalid: BoundedCache<String>,
    params: GenerationParams,
}

impl ActionVerifier {
    /// Create a verifier with the default cache capacity.
    pub fn new() -> RulesResult<Self> {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a verifier whose caches each hold at most `capacity` commands.
    pub fn with_capacity(capacity: usize) -> RulesResult<Self> {
        let patterns = COMMAND_PATTERNS
            .iter()
            .map(|p| Regex::new(&format!("(?i){p}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            valid: BoundedCache::new(capacity),
            invalid: BoundedCache::new(capacity),
            params: GenerationParams::new(50, 0.0),
        })
    }

    /// Set the generation parameters used when asking the generator.
    pub fn with_generation(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Check a command against the grammar.
    ///
    /// Repeated calls with the same text are answered from the caches.
    pub fn verify(&mut self, action: &str) -> Verdict {
        let action = action.trim();
        let key = action.to_lowercase();

        if let Some(normalized) = self.valid.get(&key) {
            log::debug!("verifier cache hit (valid): {key}");
            return Verdict::Valid {
                normalized: normalized.clone(),
            };
        }
        if self.invalid.contains(&key) {
            log::debug!("verifier cache hit (invalid): {key}");
            return Verdict::Invalid {
                reason: CACHED_INVALID.to_string(),
            };
        }

        if action.is_empty() {
            return Verdict::Invalid {
                reason: "Empty action".to_string(),
            };
        }

        if self.patterns.iter().any(|p| p.is_match(action)) {
            self.valid.insert(key.clone(), key.clone());
            return Verdict::Valid { normalized: key };
        }

        if BARE_DIRECTIONS.contains(&key.as_str()) {
            let normalized = format!("go {key}");
            self.valid.insert(key, normalized.clone());
            return Verdict::Valid { normalized };
        }

        let reason = rejection_message(action);
        self.invalid.insert(key, reason.clone());
        Verdict::Invalid { reason }
    }

    /// Check a command, asking `generator` for a judgement when the grammar
    /// rejects it.
    ///
    /// A generator failure falls back to the grammar verdict.
    pub fn verify_with_fallback<G>(&mut self, action: &str, generator: &mut G) -> Verdict
    where
        G: TextGenerator + ?Sized,
    {
        let verdict = self.verify(action);
        if verdict.is_valid() || action.trim().is_empty() {
            return verdict;
        }

        let prompt = judgement_prompt(action.trim());
        let generated =
            generator.generate(&prompt, self.params.max_tokens, self.params.temperature);
        let response = match generated {
            Ok(response) => response,
            Err(e) => {
                log::warn!("verification by generator failed: {e}");
                return verdict;
            }
        };

        let key = action.trim().to_lowercase();
        let answer = response.trim().to_lowercase();
        if answer.starts_with("valid") {
            self.invalid.remove(&key);
            self.valid.insert(key.clone(), key.clone());
            return Verdict::Valid { normalized: key };
        }

        let reason = answer
            .strip_prefix("invalid")
            .unwrap_or(&answer)
            .trim_start_matches([':', '-', ',', '.', ' '])
            .trim()
            .to_string();
        let reason = if reason.is_empty() {
            "Generator marked the command as invalid".to_string()
        } else {
            reason
        };
        self.invalid.insert(key, reason.clone());
        Verdict::Invalid { reason }
    }

    /// Grammar guidance to include in an action prompt.
    pub fn guidance_prompt(&self) -> &'static str {
        "Generate a valid text adventure command. Valid commands include:\n\
         - Movement: \"go north\", \"n\", \"south\"\n\
         - Item actions: \"take torch\", \"drop pole\", \"use key\"\n\
         - Examination: \"look\", \"examine chest\", \"read book\"\n\
         - Interaction: \"talk to gnome\", \"give chair to statue\"\n\
         - System: \"inventory\", \"help\"\n\
         \n\
         Keep commands simple and direct."
    }

    /// Number of commands remembered as valid.
    pub fn valid_cached(&self) -> usize {
        self.valid.len()
    }

    /// Number of commands remembered as invalid.
    pub fn invalid_cached(&self) -> usize {
        self.invalid.len()
    }
}

fn rejection_message(action: &str) -> String {
    let mut message = format!("Action '{action}' does not match expected command structure");
    if let Some(verb) = suggest_verb(action) {
        message.push_str(&format!(" (did you mean '{verb}'?)"));
    }
    message
}

/// Suggest a known verb close to the command's first word.
fn suggest_verb(action: &str) -> Option<&'static str> {
    let first = action.split_whitespace().next()?.to_lowercase();
    if KNOWN_VERBS.contains(&first.as_str()) {
        return None;
    }
    KNOWN_VERBS
        .iter()
        .map(|verb| (*verb, jaro_winkler(&first, verb)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(verb, _)| verb)
}

fn judgement_prompt(action: &str) -> String {
    format!(
        "Is the following text adventure command valid?\n\n\
         Command: \"{action}\"\n\n\
         A valid command should:\n\
         - Be a simple action (go, take, use, look, etc.)\n\
         - Follow standard text adventure grammar\n\
         - Not be a question or statement\n\n\
         Respond with only \"VALID\" or \"INVALID\" followed by a brief reason."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;

    struct Judge(Result<String, GeneratorError>, u32);

    impl TextGenerator for Judge {
        fn generate(&mut self, _: &str, _: u32, _: f32) -> Result<String, GeneratorError> {
            self.1 += 1;
            self.0.clone()
        }
    }

    fn verifier() -> ActionVerifier {
        ActionVerifier::new().unwrap()
    }

    #[test]
    fn all_patterns_compile() {
        assert_eq!(verifier().patterns.len(), COMMAND_PATTERNS.len());
    }

    #[test]
    fn accepts_common_commands() {
        let mut v = verifier();
        for cmd in [
            "go north",
            "take torch",
            "pick up the pole",
            "examine statue",
            "look",
            "inventory",
            "open chest",
            "give chair to statue",
            "catch pig",
            "burn pole",
            "x pole",
        ] {
            assert!(v.verify(cmd).is_valid(), "{cmd} should be valid");
        }
    }

    #[test]
    fn normalises_case_and_whitespace() {
        let mut v = verifier();
        assert_eq!(v.verify("  Take Torch ").normalized(), Some("take torch"));
    }

    #[test]
    fn bare_direction_becomes_go() {
        let mut v = verifier();
        assert_eq!(v.verify("NE").normalized(), Some("go ne"));
        assert_eq!(v.verify("south").normalized(), Some("go south"));
    }

    #[test]
    fn empty_is_invalid() {
        let mut v = verifier();
        assert_eq!(v.verify("   ").reason(), Some("Empty action"));
    }

    #[test]
    fn rejects_prose_and_names_it() {
        let mut v = verifier();
        let verdict = v.verify("I think Grunk should find pig");
        assert!(!verdict.is_valid());
        assert!(verdict.reason().unwrap().contains("'I think Grunk should find pig'"));
    }

    #[test]
    fn suggests_close_verb() {
        let mut v = verifier();
        let verdict = v.verify("tkae torch");
        assert!(verdict.reason().unwrap().contains("did you mean 'take'?"));
    }

    #[test]
    fn repeated_invalid_comes_from_cache() {
        let mut v = verifier();
        v.verify("florp");
        assert_eq!(v.verify("FLORP").reason(), Some(CACHED_INVALID));
        assert_eq!(v.invalid_cached(), 1);
    }

    #[test]
    fn caches_are_bounded() {
        let mut v = ActionVerifier::with_capacity(2).unwrap();
        v.verify("take torch");
        v.verify("take pole");
        v.verify("take key");
        assert_eq!(v.valid_cached(), 2);
    }

    #[test]
    fn generator_can_accept() {
        let mut v = verifier();
        let mut judge = Judge(Ok("VALID - a plausible game verb".into()), 0);
        let verdict = v.verify_with_fallback("wiggle ears", &mut judge);
        assert_eq!(verdict.normalized(), Some("wiggle ears"));
        assert_eq!(v.invalid_cached(), 0);
        // Now cached as valid: no second generator call.
        assert!(v.verify_with_fallback("wiggle ears", &mut judge).is_valid());
        assert_eq!(judge.1, 1);
    }

    #[test]
    fn generator_can_reject_with_reason() {
        let mut v = verifier();
        let mut judge = Judge(Ok("INVALID: this is a question".into()), 0);
        let verdict = v.verify_with_fallback("where pig?", &mut judge);
        assert_eq!(verdict.reason(), Some("this is a question"));
    }

    #[test]
    fn generator_failure_falls_back_to_grammar() {
        let mut v = verifier();
        let mut judge = Judge(Err(GeneratorError::Unavailable("offline".into())), 0);
        let verdict = v.verify_with_fallback("florp", &mut judge);
        assert!(!verdict.is_valid());
        assert!(verdict.reason().unwrap().contains("'florp'"));
    }

    #[test]
    fn valid_commands_skip_generator() {
        let mut v = verifier();
        let mut judge = Judge(Ok("INVALID".into()), 0);
        assert!(v.verify_with_fallback("look", &mut judge).is_valid());
        assert_eq!(judge.1, 0);
    }

    #[test]
    fn empty_skips_generator() {
        let mut v = verifier();
        let mut judge = Judge(Ok("VALID".into()), 0);
        assert!(!v.verify_with_fallback("", &mut judge).is_valid());
        assert_eq!(judge.1, 0);
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn verification_is_deterministic(cmd in "[a-z ]{0,20}") {
                let mut v = verifier();
                let first = v.verify(&cmd).is_valid();
                let second = v.verify(&cmd).is_valid();
                prop_assert_eq!(first, second);
            }
        }
    }
}
