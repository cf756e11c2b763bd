pub mod check;
pub mod play;
pub mod replay;
pub mod rules;
pub mod verify;

use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use lp_agent::Transcript;
use lp_rules::EvaluationReport;
use lp_world::{EpisodeLog, WorldState};

/// Load a transcript and fold it into a belief state and episode log.
fn replay_transcript(path: &Path) -> Result<(WorldState, EpisodeLog), String> {
    let transcript = Transcript::load(path).map_err(|e| e.to_string())?;
    Ok(transcript.replay())
}

/// Belief state from an optional transcript, or a fresh game.
fn state_from(transcript: Option<&Path>) -> Result<WorldState, String> {
    match transcript {
        Some(path) => replay_transcript(path).map(|(state, _)| state),
        None => Ok(WorldState::new()),
    }
}

/// Print the achievements table and totals of an evaluation.
fn print_evaluation(report: &EvaluationReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Achievement", "Description", "Points"]);
    for detail in &report.details {
        let mark = if detail.achieved { "+" } else { "-" };
        table.add_row(vec![
            format!("{mark} {}", detail.name),
            detail.description.to_string(),
            detail.points.to_string(),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "  {}/{} points, {}/{} turns, game score {}, {} locations, {} items",
        report.total_points,
        report.max_points,
        report.turns_taken,
        report.turn_limit,
        report.game_score,
        report.locations_discovered,
        report.items_collected
    );
    if report.success {
        println!("  Pig caught and home in time.");
    } else {
        println!("  Game not completed.");
    }
}
