//! Batch orchestrator for ragprep.
//!
//! Discovers transcript files, skips the ones that already have an output
//! document, and fans the rest out over a bounded worker pool. A fixed number
//! of worker tasks drain a shared job queue and report outcomes over a channel
//! to a single collector, so the aggregate never needs shared mutable state.

use crate::adapter::TranscriptAdapter;
use crate::config::Settings;
use crate::error::{RagPrepError, Result};
use crate::rules::RuleSet;
use crate::transcript::{clean_srt_content, extract_metadata};
use serde::Serialize;
use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// Filenames never treated as transcripts even with a matching extension.
const EXCLUDED_FILES: [&str; 5] = [
    "historico.txt",
    "cookies.txt",
    "requirements.txt",
    "LICENSE",
    "README.md",
];

/// Terminal state of a single file job.
///
/// `Pending -> {Skipped | Running -> {Succeeded | Failed}}`; a failed job is
/// never retried within a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobStatus {
    Skipped,
    Succeeded,
    Failed { reason: String },
}

/// One input file's end-to-end processing.
#[derive(Debug, Clone)]
pub struct Job {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Job {
    fn file_name(&self) -> String {
        self.input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input_path.display().to_string())
    }
}

/// Outcome of a completed job, reported to the collector.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub file: String,
    #[serde(flatten)]
    pub status: JobStatus,
}

/// Aggregate counts for a finished batch.
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: Vec<FailedJob>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedJob {
    pub file: String,
    pub reason: String,
}

impl BatchSummary {
    fn record(&mut self, outcome: &JobOutcome) {
        match &outcome.status {
            JobStatus::Skipped => self.skipped += 1,
            JobStatus::Succeeded => self.succeeded += 1,
            JobStatus::Failed { reason } => self.failed.push(FailedJob {
                file: outcome.file.clone(),
                reason: reason.clone(),
            }),
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// The batch orchestrator.
pub struct BatchOrchestrator {
    settings: Settings,
    input_dir: PathBuf,
    output_dir: PathBuf,
    rules: Arc<RuleSet>,
    adapter: Arc<dyn TranscriptAdapter>,
}

impl BatchOrchestrator {
    /// Create an orchestrator. Fails if the input directory is missing or the
    /// output directory cannot be created (setup-level, aborts the run).
    pub fn new(
        settings: Settings,
        input_dir: PathBuf,
        output_dir: PathBuf,
        rules: RuleSet,
        adapter: Arc<dyn TranscriptAdapter>,
    ) -> Result<Self> {
        if !input_dir.is_dir() {
            return Err(RagPrepError::InvalidInput(format!(
                "Input directory not found: {}",
                input_dir.display()
            )));
        }
        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            settings,
            input_dir,
            output_dir,
            rules: Arc::new(rules),
            adapter,
        })
    }

    /// Discover eligible transcript files under the input directory.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        self.collect_files(&self.input_dir, self.settings.batch.recursive, &mut found)?;
        found.sort();
        Ok(found)
    }

    fn collect_files(&self, dir: &Path, recursive: bool, found: &mut Vec<PathBuf>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.is_dir() {
                if recursive {
                    self.collect_files(&path, recursive, found)?;
                }
                continue;
            }

            if self.is_eligible(&path) {
                found.push(path);
            }
        }
        Ok(())
    }

    fn is_eligible(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.starts_with('.') || EXCLUDED_FILES.contains(&name) {
            return false;
        }
        // The rules file itself often lives next to the transcripts.
        if Some(name) == self.settings.rules_path().file_name().and_then(|n| n.to_str()) {
            return false;
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_lowercase();
        if !self.settings.batch.extensions.iter().any(|e| *e == ext) {
            return false;
        }

        // Don't re-ingest our own outputs.
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return false;
        };
        !stem.ends_with(self.settings.batch.output_suffix.as_str())
    }

    /// Expected output path for an input file:
    /// `<output_dir>/<stem><suffix>.md`.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir
            .join(format!("{}{}.md", stem, self.settings.batch.output_suffix))
    }

    /// Discover and run the batch in one step.
    pub async fn run<F>(&self, on_progress: F) -> Result<BatchSummary>
    where
        F: Fn(&JobOutcome),
    {
        let inputs = self.discover()?;
        self.run_discovered(inputs, on_progress).await
    }

    /// Run the batch over an already-discovered input list: skip-check every
    /// file, dispatch the rest to the worker pool, and aggregate outcomes.
    /// `on_progress` is invoked once per terminal job, in completion order.
    ///
    /// Taking the list lets callers reuse a single directory scan for both
    /// progress reporting and dispatch.
    #[instrument(skip(self, inputs, on_progress))]
    pub async fn run_discovered<F>(&self, inputs: Vec<PathBuf>, on_progress: F) -> Result<BatchSummary>
    where
        F: Fn(&JobOutcome),
    {
        let mut summary = BatchSummary {
            total: inputs.len(),
            ..Default::default()
        };

        if inputs.is_empty() {
            info!("No transcripts found to process.");
            return Ok(summary);
        }

        // Idempotence: an existing output means the work was already done.
        let mut pending = VecDeque::new();
        for input in inputs {
            let output_path = self.output_path_for(&input);
            let job = Job {
                input_path: input,
                output_path,
            };
            if job.output_path.exists() {
                info!(
                    "Skipping: {} (output already exists at {})",
                    job.file_name(),
                    job.output_path.display()
                );
                let outcome = JobOutcome {
                    file: job.file_name(),
                    status: JobStatus::Skipped,
                };
                on_progress(&outcome);
                summary.record(&outcome);
            } else {
                pending.push_back(job);
            }
        }

        if pending.is_empty() {
            return Ok(summary);
        }

        let workers = self.settings.batch.workers.max(1).min(pending.len());
        info!(
            "Processing {} transcripts with {} workers",
            pending.len(),
            workers
        );

        let queue = Arc::new(Mutex::new(pending));
        let (tx, mut rx) = mpsc::unbounded_channel::<JobOutcome>();

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let rules = Arc::clone(&self.rules);
            let adapter = Arc::clone(&self.adapter);

            handles.push(tokio::spawn(async move {
                loop {
                    let job = {
                        let mut q = queue.lock().expect("job queue poisoned");
                        q.pop_front()
                    };
                    let Some(job) = job else { break };

                    let file = job.file_name();
                    let status = match execute_job(adapter.as_ref(), &rules, &job).await {
                        Ok(()) => JobStatus::Succeeded,
                        Err(e) => {
                            error!("Failed to process {}: {}", file, e);
                            JobStatus::Failed {
                                reason: e.to_string(),
                            }
                        }
                    };

                    // Collector hanging up means the run was cancelled.
                    if tx.send(JobOutcome { file, status }).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(tx);

        while let Some(outcome) = rx.recv().await {
            on_progress(&outcome);
            summary.record(&outcome);
        }

        futures::future::join_all(handles).await;

        Ok(summary)
    }
}

/// Process a single job: read, clean, adapt, enforce terminology, write.
///
/// Any error here is converted to `JobStatus::Failed` by the worker; nothing
/// propagates past the job boundary.
async fn execute_job(
    adapter: &dyn TranscriptAdapter,
    rules: &RuleSet,
    job: &Job,
) -> Result<()> {
    let file_name = job.file_name();
    info!("Processing: {}", file_name);

    let raw = std::fs::read_to_string(&job.input_path)?;

    let is_srt = job
        .input_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("srt"));

    let content = if is_srt {
        info!("Converting .srt to clean text: {}", file_name);
        clean_srt_content(&raw)
    } else {
        raw
    };

    if content.trim().is_empty() {
        return Err(RagPrepError::InvalidInput(format!(
            "Empty transcript: {}",
            file_name
        )));
    }

    let stem = job
        .input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let meta = extract_metadata(&stem);

    let document = adapter.adapt(&content, &file_name, &meta).await?;
    let document = rules.apply(&document);

    // The full cleaned transcript rides along so the RAG store can always
    // fall back to the source text.
    let mut final_text = document;
    final_text.push_str("\n\n---\n\n## Original Transcript\n\n");
    final_text.push_str(&content);

    write_atomic(&job.output_path, &final_text)?;
    Ok(())
}

/// Write via a temp file in the destination directory, then rename.
/// A crash mid-write never leaves a partial file at the final path.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        RagPrepError::InvalidInput(format!("Output path has no parent: {}", path.display()))
    })?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path)
        .map_err(|e| RagPrepError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptMeta;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Adapter double: counts calls, optionally fails on one filename.
    struct MockAdapter {
        calls: AtomicUsize,
        fail_on: Option<String>,
    }

    impl MockAdapter {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: None,
            }
        }

        fn failing_on(name: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on: Some(name.to_string()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranscriptAdapter for MockAdapter {
        async fn adapt(
            &self,
            raw_text: &str,
            filename: &str,
            meta: &TranscriptMeta,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.as_deref() == Some(filename) {
                return Err(RagPrepError::Adapter("simulated quota failure".to_string()));
            }
            Ok(format!(
                "# RAG Source: {}\n\nStructured: {}",
                meta.title, raw_text
            ))
        }
    }

    fn orchestrator_with(
        dir: &Path,
        rules: RuleSet,
        adapter: Arc<MockAdapter>,
    ) -> BatchOrchestrator {
        BatchOrchestrator::new(
            Settings::default(),
            dir.to_path_buf(),
            dir.to_path_buf(),
            rules,
            adapter,
        )
        .unwrap()
    }

    fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn discovery_filters_non_transcripts() {
        let dir = tempfile::tempdir().unwrap();
        write_input(dir.path(), "talk.txt", "a");
        write_input(dir.path(), "captions.srt", "b");
        write_input(dir.path(), "rules.txt", "x -> y");
        write_input(dir.path(), "cookies.txt", "c");
        write_input(dir.path(), ".hidden.txt", "d");
        write_input(dir.path(), "notes.pdf", "e");
        write_input(dir.path(), "talk_rag_optimized.txt", "f");

        let orch = orchestrator_with(dir.path(), RuleSet::default(), Arc::new(MockAdapter::new()));
        let found = orch.discover().unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["captions.srt", "talk.txt"]);
    }

    #[test]
    fn recursive_discovery_walks_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        write_input(&dir.path().join("nested"), "deep.txt", "a");
        write_input(dir.path(), "top.txt", "b");

        let mut settings = Settings::default();
        settings.batch.recursive = true;
        let orch = BatchOrchestrator::new(
            settings,
            dir.path().to_path_buf(),
            dir.path().to_path_buf(),
            RuleSet::default(),
            Arc::new(MockAdapter::new()),
        )
        .unwrap();

        assert_eq!(orch.discover().unwrap().len(), 2);
    }

    #[test]
    fn output_path_appends_suffix_and_md_extension() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator_with(dir.path(), RuleSet::default(), Arc::new(MockAdapter::new()));
        let out = orch.output_path_for(&dir.path().join("Live Jan 2026.txt"));
        assert_eq!(
            out.file_name().unwrap().to_str().unwrap(),
            "Live Jan 2026_rag_optimized.md"
        );
    }

    #[tokio::test]
    async fn second_run_skips_everything_without_adapter_calls() {
        let dir = tempfile::tempdir().unwrap();
        write_input(dir.path(), "one.txt", "first transcript");
        write_input(dir.path(), "two.txt", "second transcript");

        let adapter = Arc::new(MockAdapter::new());
        let orch = orchestrator_with(dir.path(), RuleSet::default(), Arc::clone(&adapter));

        let first = orch.run(|_| {}).await.unwrap();
        assert_eq!(first.succeeded, 2);
        assert_eq!(adapter.call_count(), 2);

        let second = orch.run(|_| {}).await.unwrap();
        assert_eq!(second.skipped, 2);
        assert_eq!(second.succeeded, 0);
        assert_eq!(adapter.call_count(), 2, "no redundant adapter calls");
    }

    #[tokio::test]
    async fn terminology_rules_are_applied_to_adapter_output() {
        let dir = tempfile::tempdir().unwrap();
        write_input(
            dir.path(),
            "live.txt",
            "falando das Sete Montanhas e da Ecclesia",
        );

        let rules = crate::rules::parse_rules(
            "Sete Montanhas -> Sete Montes\nEcclesia -> Ekklezia\n",
        )
        .unwrap();
        let adapter = Arc::new(MockAdapter::new());
        let orch = orchestrator_with(dir.path(), rules, Arc::clone(&adapter));

        let summary = orch.run(|_| {}).await.unwrap();
        assert_eq!(summary.succeeded, 1);

        let output =
            std::fs::read_to_string(dir.path().join("live_rag_optimized.md")).unwrap();
        let (document, _original) = output.split_once("## Original Transcript").unwrap();
        assert!(document.contains("Sete Montes"));
        assert!(document.contains("Ekklezia"));
        assert!(!document.contains("Sete Montanhas"));
        assert!(!document.contains("Ecclesia"));
    }

    #[tokio::test]
    async fn one_failing_job_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_input(dir.path(), "good.txt", "fine content");
        write_input(dir.path(), "bad.txt", "doomed content");

        let adapter = Arc::new(MockAdapter::failing_on("bad.txt"));
        let orch = orchestrator_with(dir.path(), RuleSet::default(), Arc::clone(&adapter));

        let summary = orch.run(|_| {}).await.unwrap();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(summary.failed[0].file, "bad.txt");
        assert!(summary.failed[0].reason.contains("quota"));

        assert!(dir.path().join("good_rag_optimized.md").exists());
        assert!(!dir.path().join("bad_rag_optimized.md").exists());
    }

    #[tokio::test]
    async fn empty_transcript_fails_before_the_adapter_is_called() {
        let dir = tempfile::tempdir().unwrap();
        write_input(dir.path(), "empty.txt", "   \n  ");

        let adapter = Arc::new(MockAdapter::new());
        let orch = orchestrator_with(dir.path(), RuleSet::default(), Arc::clone(&adapter));

        let summary = orch.run(|_| {}).await.unwrap();
        assert_eq!(summary.failed_count(), 1);
        assert_eq!(adapter.call_count(), 0);
    }

    #[tokio::test]
    async fn srt_inputs_are_cleaned_before_adaptation() {
        let dir = tempfile::tempdir().unwrap();
        write_input(
            dir.path(),
            "caps.srt",
            "1\n00:00:00,000 --> 00:00:02,000\nhello there\n",
        );

        let adapter = Arc::new(MockAdapter::new());
        let orch = orchestrator_with(dir.path(), RuleSet::default(), Arc::clone(&adapter));
        orch.run(|_| {}).await.unwrap();

        let output =
            std::fs::read_to_string(dir.path().join("caps_rag_optimized.md")).unwrap();
        assert!(output.contains("hello there"));
        assert!(!output.contains("-->"), "timestamps stripped before adapt");
    }

    #[tokio::test]
    async fn outcomes_are_reported_in_completion_order() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            write_input(dir.path(), &format!("t{}.txt", i), "body");
        }

        let adapter = Arc::new(MockAdapter::new());
        let orch = orchestrator_with(dir.path(), RuleSet::default(), Arc::clone(&adapter));

        let seen = std::sync::Mutex::new(Vec::new());
        let summary = orch
            .run(|outcome| seen.lock().unwrap().push(outcome.file.clone()))
            .await
            .unwrap();

        assert_eq!(summary.total, 5);
        assert_eq!(seen.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn run_discovered_processes_exactly_the_given_list() {
        let dir = tempfile::tempdir().unwrap();
        write_input(dir.path(), "one.txt", "first");
        write_input(dir.path(), "two.txt", "second");

        let adapter = Arc::new(MockAdapter::new());
        let orch = orchestrator_with(dir.path(), RuleSet::default(), Arc::clone(&adapter));
        let inputs = orch.discover().unwrap();
        assert_eq!(inputs.len(), 2);

        // A file appearing after discovery is not picked up by this run.
        write_input(dir.path(), "late.txt", "third");

        let summary = orch.run_discovered(inputs, |_| {}).await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(adapter.call_count(), 2);
        assert!(!dir.path().join("late_rag_optimized.md").exists());
    }

    #[test]
    fn atomic_write_creates_file_with_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("doc.md");
        write_atomic(&target, "document body").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "document body");

        // No stray temp files left behind after persist.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != target)
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn missing_input_directory_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = BatchOrchestrator::new(
            Settings::default(),
            missing,
            dir.path().to_path_buf(),
            RuleSet::default(),
            Arc::new(MockAdapter::new()),
        );
        assert!(result.is_err());
    }
}
