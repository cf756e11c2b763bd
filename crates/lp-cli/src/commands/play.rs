use std::fs;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use lp_agent::{Agent, AgentConfig, ScriptedGenerator, Transcript, TranscriptEnvironment};
use lp_rules::AchievementEvaluator;

const OBSERVATION_PREVIEW: usize = 60;

pub fn run(
    transcript: &Path,
    script: &Path,
    config: Option<&Path>,
    baseline: bool,
) -> Result<(), String> {
    let transcript = Transcript::load(transcript).map_err(|e| e.to_string())?;
    let script = fs::read_to_string(script)
        .map_err(|e| format!("failed to read '{}': {e}", script.display()))?;

    let config = match config {
        Some(path) => AgentConfig::load(path).map_err(|e| e.to_string())?,
        None => AgentConfig::default(),
    };
    let config = if baseline {
        config.with_constraints(false)
    } else {
        config
    };

    let mut agent = Agent::new(ScriptedGenerator::from_lines(&script), config)
        .map_err(|e| e.to_string())?
        .with_environment(TranscriptEnvironment::new(transcript));
    let episode = agent.run_episode().map_err(|e| e.to_string())?;

    let mode = if baseline { "baseline" } else { "constrained" };
    println!("  {} episode {} ({mode})", "Played".green().bold(), episode.id);
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Turn", "Action", "Attempts", "Observation"]);
    for step in &episode.steps {
        let observation = step.observation.replace('\n', " ");
        let observation = if observation.chars().count() > OBSERVATION_PREVIEW {
            let head: String = observation.chars().take(OBSERVATION_PREVIEW - 3).collect();
            format!("{head}...")
        } else {
            observation
        };
        table.add_row(vec![
            step.turn.to_string(),
            step.action.clone(),
            step.attempts.to_string(),
            observation,
        ]);
    }
    println!("{table}");
    println!();

    let report = AchievementEvaluator::new()
        .with_turn_limit(agent.config().max_turns)
        .evaluate(agent.world(), &episode);
    super::print_evaluation(&report);

    if !episode.finished {
        println!("  {}", "Episode ended before the game did.".yellow());
    }

    Ok(())
}
