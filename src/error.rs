//! Error types for ragprep.

use thiserror::Error;

/// Library-level error type for ragprep operations.
#[derive(Error, Debug)]
pub enum RagPrepError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rule syntax error at line {line}: {reason} (`{content}`)")]
    RuleSyntax {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Adapter error: {0}")]
    Adapter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for ragprep operations.
pub type Result<T> = std::result::Result<T, RagPrepError>;
