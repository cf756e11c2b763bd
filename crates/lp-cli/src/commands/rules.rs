use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use lp_rules::ConstraintChecker;

pub fn run(transcript: Option<&Path>) -> Result<(), String> {
    let state = super::state_from(transcript)?;
    let checker = ConstraintChecker::new();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rule", "Kind", "Summary"]);
    for rule in checker.rules() {
        table.add_row(vec![rule.name, rule.kind.label(), rule.summary]);
    }
    println!("{table}");
    println!();
    println!("{}", checker.constraint_prompt_text(&state));

    Ok(())
}
