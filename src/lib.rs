//! ragprep - Transcripts to RAG-ready Markdown
//!
//! Batch-converts plain-text video transcripts (`.txt`, `.srt`) into
//! structured Markdown documents for retrieval-augmented-generation
//! ingestion. One LLM call per file restructures the content; an ordered
//! terminology rule pass enforces fixed vocabulary; an idempotent batch
//! orchestrator fans the jobs out over a bounded worker pool.
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `rules` - Terminology rule loading and application
//! - `transcript` - SRT cleanup and filename-derived metadata
//! - `adapter` - LLM seam (trait + OpenAI implementation)
//! - `orchestrator` - Discovery, skip-check, worker pool, aggregation
//! - `cli` - Command-line surface
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ragprep::adapter::OpenAiAdapter;
//! use ragprep::config::{Prompts, Settings};
//! use ragprep::orchestrator::BatchOrchestrator;
//! use ragprep::rules::load_rules;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let rules = load_rules(&settings.rules_path())?;
//!     let adapter = Arc::new(OpenAiAdapter::new(&settings.adapter, Prompts::default())?);
//!
//!     let orchestrator = BatchOrchestrator::new(
//!         settings,
//!         "./transcripts".into(),
//!         "./out".into(),
//!         rules,
//!         adapter,
//!     )?;
//!     let summary = orchestrator.run(|_| {}).await?;
//!     println!("{} succeeded, {} skipped", summary.succeeded, summary.skipped);
//!
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod rules;
pub mod transcript;

pub use error::{RagPrepError, Result};
