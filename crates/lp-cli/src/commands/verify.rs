use colored::Colorize;
use lp_rules::{ActionVerifier, Verdict};

pub fn run(actions: &[String]) -> Result<(), String> {
    let mut verifier = ActionVerifier::new().map_err(|e| e.to_string())?;

    for action in actions {
        match verifier.verify(action) {
            Verdict::Valid { normalized } => {
                println!("  {} {action} -> {normalized}", "VALID".green().bold());
            }
            Verdict::Invalid { reason } => {
                println!("  {} {action}: {reason}", "INVALID".red().bold());
            }
        }
    }

    Ok(())
}
