//! Rules command implementation.
//!
//! Validates the rules file with the same fail-fast loader the batch uses,
//! so a malformed line is caught before spending API calls.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rules::{load_rules, Rule};
use anyhow::Result;

/// Run the rules command.
pub fn run_rules(rules_path: Option<String>, mut settings: Settings) -> Result<()> {
    // Validation is fully local; no API key required.
    preflight::check(Operation::Rules)?;

    if let Some(r) = rules_path {
        settings.rules.path = r;
    }
    let path = settings.rules_path();

    let rules = match load_rules(&path) {
        Ok(rules) => rules,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    if rules.is_empty() {
        Output::warning(&format!(
            "No rules loaded from {} (missing or empty file).",
            path.display()
        ));
        return Ok(());
    }

    Output::success(&format!(
        "{} rules loaded from {}",
        rules.len(),
        path.display()
    ));
    for rule in rules.iter() {
        match rule {
            Rule::Literal { term, replacement } => {
                Output::list_item(&format!("{} -> {}", term, replacement));
            }
            Rule::Regex { pattern, replacement } => {
                Output::list_item(&format!("REGEX: {} -> {}", pattern.as_str(), replacement));
            }
        }
    }

    Ok(())
}
