use std::path::Path;

use lp_rules::AchievementEvaluator;

pub fn run(transcript: &Path, json: bool) -> Result<(), String> {
    let (state, log) = super::replay_transcript(transcript)?;

    if json {
        println!("{}", state.to_json().map_err(|e| e.to_string())?);
        return Ok(());
    }

    println!("{}", state.render_summary());
    println!();

    let predicates = state.to_predicates();
    if !predicates.is_empty() {
        println!("  {}", predicates.join(", "));
        println!();
    }

    let report = AchievementEvaluator::new().evaluate(&state, &log);
    super::print_evaluation(&report);

    Ok(())
}
