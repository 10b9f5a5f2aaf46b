//! Doctor command - verify configuration and environment.

use crate::cli::Output;
use crate::config::Settings;
use crate::rules::load_rules;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    message: String,
    hint: Option<String>,
}

#[derive(Debug, PartialEq)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("ragprep Doctor");
    println!();

    let mut checks = Vec::new();

    checks.push(check_api_key());
    checks.push(check_rules_file(settings));
    checks.push(check_config_file());

    for check in &checks {
        check.print();
    }
    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    if errors > 0 {
        Output::error(&format!("{} check(s) failed.", errors));
    } else {
        Output::success("All checks passed.");
    }

    Ok(())
}

fn check_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => CheckResult::ok("OPENAI_API_KEY", "set"),
        _ => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "export OPENAI_API_KEY='sk-...'",
        ),
    }
}

fn check_rules_file(settings: &Settings) -> CheckResult {
    let path = settings.rules_path();
    if !path.exists() {
        return CheckResult::warning(
            "rules file",
            &format!("{} not found (empty rule set will be used)", path.display()),
            "create a rules.txt with `Original Term -> Replacement Term` lines",
        );
    }
    match load_rules(&path) {
        Ok(rules) => CheckResult::ok(
            "rules file",
            &format!("{} ({} rules)", path.display(), rules.len()),
        ),
        Err(e) => CheckResult::error(
            "rules file",
            &format!("{}", e),
            "fix the offending line; loading is fail-fast",
        ),
    }
}

fn check_config_file() -> CheckResult {
    let path = Settings::default_config_path();
    if path.exists() {
        CheckResult::ok("config file", &path.display().to_string())
    } else {
        CheckResult::warning(
            "config file",
            &format!("{} not found (defaults in effect)", path.display()),
            "run 'ragprep config show' to see the defaults",
        )
    }
}
