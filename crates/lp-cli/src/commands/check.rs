use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use lp_rules::ConstraintChecker;

pub fn run(action: &str, transcript: Option<&Path>) -> Result<(), String> {
    let state = super::state_from(transcript)?;
    let report = ConstraintChecker::new().check_action(&state, action);

    if report.violations.is_empty() {
        println!("  {} '{action}' breaks no rules.", "OK".green().bold());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Kind", "Rule", "Severity", "Message"]);
    for violation in &report.violations {
        table.add_row(vec![
            violation.kind.to_string(),
            violation.rule.to_string(),
            format!("{:.1}", violation.severity),
            violation.message.clone(),
        ]);
    }
    println!("{table}");
    println!();

    if report.is_valid() {
        println!("  {} '{action}' is allowed", "ADVISORY".yellow().bold());
    } else {
        println!("  {} '{action}' is blocked", "BLOCKED".red().bold());
    }
    println!("  penalty {:.2}", report.penalty());

    Ok(())
}
