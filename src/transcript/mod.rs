//! Transcript preparation: SRT cleanup and filename-derived metadata.

mod metadata;
mod srt;

pub use metadata::{current_date_string, extract_metadata, TranscriptMeta};
pub use srt::clean_srt_content;
