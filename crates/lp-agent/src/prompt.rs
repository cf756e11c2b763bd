//! Prompt construction for the think, act, and regenerate calls.

use lp_world::WorldState;
use lp_world::command::canonical_direction;

/// Game mechanics reminded in every constrained action prompt.
const MECHANICS: &str = "Important Lost Pig mechanics:\n\
- Torch can go out (relight with powder + water)\n\
- Green pole repels, but can be burned to black (attracts white paper)\n\
- Use bricks from autobaker to distract pig before catching\n\
- Secret door opens when you give chair to statue\n\
- Windy caves need orb (torch blows out)";

/// World-state summary plus the most recent observations and actions.
pub fn build_context(
    state: &WorldState,
    observations: &[String],
    actions: &[String],
    window: usize,
) -> String {
    let mut lines = vec![
        "=== LOST PIG GAME STATE ===".to_string(),
        state.render_summary(),
    ];
    if !observations.is_empty() {
        lines.push("\n=== RECENT OBSERVATIONS ===".to_string());
        lines.extend(recent(observations, window).iter().cloned());
    }
    if !actions.is_empty() {
        lines.push("\n=== RECENT ACTIONS ===".to_string());
        lines.extend(recent(actions, window).iter().cloned());
    }
    lines.join("\n")
}

fn recent(items: &[String], window: usize) -> &[String] {
    &items[items.len().saturating_sub(window)..]
}

/// Prompt asking for a short thought before acting.
pub fn think_prompt(context: &str, observation: &str) -> String {
    format!(
        "You are Grunk, an orc searching for a lost pig in Lost Pig text adventure game.\n\n\
         {context}\n\n\
         Current observation:\n{observation}\n\n\
         Think about what to do next. Consider:\n\
         1. Your goal: Catch the lost pig and bring it back to the farm\n\
         2. What items do you have? (torch, pole, key, coin, brick, etc.)\n\
         3. Is your torch lit? (It can go out and needs powder + water to relight)\n\
         4. What locations can you access?\n\
         5. Do you need any items to access new areas or solve puzzles?\n\
         6. The pig is quick - you'll need bricks to distract it before catching\n\
         7. What constraints must you follow?\n\n\
         Provide a brief thought (1-2 sentences) about your next action."
    )
}

/// Prompt for a constrained action, including the rules and grammar.
pub fn act_prompt(
    context: &str,
    observation: &str,
    thought: &str,
    constraints: &str,
    guidance: &str,
) -> String {
    format!(
        "You are Grunk, an orc playing Lost Pig text adventure.\n\n\
         {context}\n\n\
         Current observation:\n{observation}\n\n\
         Your thought:\n{thought}\n\n\
         {constraints}\n\n\
         {guidance}\n\n\
         {MECHANICS}\n\n\
         Generate a single action command to help catch the lost pig. \
         Keep it short and direct (1-5 words)."
    )
}

/// Prompt for a baseline action: no rules, only repetition warnings.
pub fn baseline_act_prompt(
    context: &str,
    observation: &str,
    thought: &str,
    state: &WorldState,
    actions: &[String],
) -> String {
    let mut warnings = String::new();
    if is_stuck(actions) {
        warnings.push_str(
            "\nWARNING: You're repeating actions! Try something completely different.\n",
        );
    }
    let tried = state.commands_tried_here();
    if !tried.is_empty() {
        let list: Vec<&str> = tried.iter().take(8).map(String::as_str).collect();
        warnings.push_str(&format!(
            "\nWARNING: Commands already tried at this location: {}\n\
             Try to avoid repeating these unless you have a good reason.\n",
            list.join(", ")
        ));
    }
    let recent_actions = if actions.is_empty() {
        "none yet".to_string()
    } else {
        recent(actions, 5).join(", ")
    };
    format!(
        "You are Grunk, an orc playing Lost Pig text adventure.\n\n\
         {context}\n\n\
         Current observation:\n{observation}\n\n\
         Your thought:\n{thought}\n\
         {warnings}\n\
         Use simple text adventure commands. Only interact with items/objects \
         that are explicitly mentioned in the observation.\n\n\
         Recent actions: {recent_actions}\n\n\
         Generate a single action command."
    )
}

/// Prompt asking for a replacement after a rejection.
pub fn regenerate_prompt(action: &str, feedback: &str) -> String {
    format!(
        "The action \"{action}\" was invalid: {feedback}\n\n\
         Generate a different, valid action that avoids this issue.\n\
         Remember: You're Grunk, an orc searching for a lost pig. \
         You need to catch it and bring it back to the farm.\n\
         Keep it short (1-5 words)."
    )
}

/// Whether the last three actions contain at most two distinct commands.
pub fn is_stuck(actions: &[String]) -> bool {
    if actions.len() < 3 {
        return false;
    }
    let last = recent(actions, 3);
    let distinct: std::collections::BTreeSet<&String> = last.iter().collect();
    distinct.len() <= 2
}

/// Reduce raw generator output to one command.
///
/// Takes the first non-empty line, strips quotes and a leading prompt
/// marker, and collapses `go <direction>` to the direction. Empty output
/// becomes `fallback`.
pub fn clean_candidate(raw: &str, fallback: &str) -> String {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    let line = line
        .trim_start_matches('>')
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim();
    if line.is_empty() {
        return fallback.to_string();
    }

    let lower = line.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    if let [verb, rest @ ..] = words.as_slice()
        && matches!(*verb, "go" | "move" | "walk")
        && let Some(dir) = rest.iter().rev().find_map(|w| canonical_direction(w))
    {
        return dir.to_string();
    }
    if let Some(dir) = lower
        .split('_')
        .find_map(canonical_direction)
        .filter(|_| lower.contains('_'))
    {
        return dir.to_string();
    }
    line.to_string()
}
