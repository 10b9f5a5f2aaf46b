//! Transcript adapter: the seam between the batch core and the LLM.
//!
//! The orchestrator only sees this trait; the OpenAI implementation lives in
//! a submodule so tests can substitute an in-memory adapter.

mod openai;

pub use openai::OpenAiAdapter;

use crate::error::Result;
use crate::transcript::TranscriptMeta;
use async_trait::async_trait;

/// Trait for transcript restructuring.
#[async_trait]
pub trait TranscriptAdapter: Send + Sync {
    /// Restructure a raw transcript into a RAG-ready Markdown document.
    ///
    /// Any failure (auth, quota, network, malformed response) surfaces as
    /// `RagPrepError::Adapter` and is handled at the job boundary.
    async fn adapt(&self, raw_text: &str, filename: &str, meta: &TranscriptMeta)
        -> Result<String>;
}
