//! CLI module for ragprep.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{format_duration, Output};

use clap::{Parser, Subcommand};

/// ragprep - Transcripts to RAG-ready Markdown
///
/// Batch-converts plain-text video transcripts into structured Markdown
/// documents for retrieval-augmented-generation ingestion, with a
/// terminology rule pass over the generated output.
#[derive(Parser, Debug)]
#[command(name = "ragprep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a directory of transcripts into RAG source documents
    Process {
        /// Directory containing .txt or .srt transcripts
        #[arg(short, long, default_value = ".")]
        dir: String,

        /// Output directory (default: same as input)
        #[arg(short, long)]
        output: Option<String>,

        /// Number of concurrent workers
        #[arg(short, long)]
        workers: Option<usize>,

        /// Path to the terminology rules file
        #[arg(short, long)]
        rules: Option<String>,

        /// Walk subdirectories of the input directory
        #[arg(long)]
        recursive: bool,

        /// Print the batch summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate and list the terminology rules file
    Rules {
        /// Path to the rules file
        #[arg(short, long)]
        rules: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "adapter.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
