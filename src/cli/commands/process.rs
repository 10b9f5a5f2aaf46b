//! Process command implementation.

use crate::adapter::OpenAiAdapter;
use crate::cli::preflight::{self, Operation};
use crate::cli::{format_duration, Output};
use crate::config::{Prompts, Settings};
use crate::orchestrator::{BatchOrchestrator, BatchSummary, JobStatus};
use crate::rules::load_rules;
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

/// Run the process command.
///
/// Per-file failures are reported in the summary but do not fail the
/// process; only setup-level problems (missing API key, bad rules file,
/// unreadable input directory) return an error.
#[allow(clippy::too_many_arguments)]
pub async fn run_process(
    dir: &str,
    output: Option<String>,
    workers: Option<usize>,
    rules_path: Option<String>,
    recursive: bool,
    json: bool,
    mut settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Process) {
        Output::error(&format!("{}", e));
        Output::info("Run 'ragprep doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    // CLI flags override config file values.
    if let Some(w) = workers {
        settings.batch.workers = w;
    }
    if let Some(r) = rules_path {
        settings.rules.path = r;
    }
    if recursive {
        settings.batch.recursive = true;
    }

    let input_dir = Settings::expand_path(dir);
    let output_dir = output
        .map(|o| Settings::expand_path(&o))
        .unwrap_or_else(|| input_dir.clone());

    // Setup: rules are loaded fail-fast, so a malformed file aborts here,
    // before any job runs.
    let rules = load_rules(&settings.rules_path())?;
    if !rules.is_empty() {
        Output::info(&format!("Loaded {} terminology rules", rules.len()));
    }

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let adapter = Arc::new(OpenAiAdapter::new(&settings.adapter, prompts)?);

    let orchestrator =
        BatchOrchestrator::new(settings, input_dir, output_dir, rules, adapter)?;

    // One directory scan feeds both the progress bar and the dispatch.
    let inputs = orchestrator.discover()?;
    if inputs.is_empty() {
        Output::warning("No transcripts found to process.");
        return Ok(());
    }
    Output::info(&format!("Found {} transcripts", inputs.len()));

    let started = Instant::now();
    let pb = Output::progress_bar(inputs.len() as u64, "processing");

    let summary = orchestrator
        .run_discovered(inputs, |outcome| {
            match &outcome.status {
                JobStatus::Succeeded => pb.println(format!("  done: {}", outcome.file)),
                JobStatus::Skipped => pb.println(format!("  skip: {}", outcome.file)),
                JobStatus::Failed { reason } => {
                    pb.println(format!("  FAIL: {} ({})", outcome.file, reason))
                }
            }
            pb.inc(1);
        })
        .await?;
    pb.finish_and_clear();

    let elapsed = format_duration(started.elapsed().as_secs_f64());

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &elapsed);
    }

    Ok(())
}

fn print_summary(summary: &BatchSummary, elapsed: &str) {
    println!();
    Output::info(&format!(
        "Batch complete in {}: {} succeeded, {} skipped, {} failed",
        elapsed,
        summary.succeeded,
        summary.skipped,
        summary.failed_count()
    ));

    if !summary.failed.is_empty() {
        Output::header("Failures");
        for failure in &summary.failed {
            Output::list_item(&format!("{}: {}", failure.file, failure.reason));
        }
    }
}