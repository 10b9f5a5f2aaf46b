//! Metadata derived from input filenames.
//!
//! The transcript corpus names files like `MasterMind Jan 2026 Transcrição.txt`,
//! so the title and event date can be recovered without touching the content.
//! Month names follow the corpus locale (pt-BR).

use chrono::{Datelike, Local};
use regex::Regex;
use std::sync::OnceLock;

/// Title and event date recovered from a filename.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptMeta {
    pub title: String,
    /// Human-readable event date, or "N/A" when none is recognizable.
    pub event_date: String,
}

const TRANSCRIPT_SUFFIXES: [&str; 2] = [" Transcrição", " Transcricao"];

fn month_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(Jan|Fev|Mar|Abr|Mai|Jun|Jul|Ago|Set|Out|Nov|Dez)\w*\s+(\d{4})")
            .unwrap()
    })
}

fn full_month(abbr: &str) -> &'static str {
    match abbr.to_lowercase().as_str() {
        "jan" => "Janeiro",
        "fev" => "Fevereiro",
        "mar" => "Março",
        "abr" => "Abril",
        "mai" => "Maio",
        "jun" => "Junho",
        "jul" => "Julho",
        "ago" => "Agosto",
        "set" => "Setembro",
        "out" => "Outubro",
        "nov" => "Novembro",
        "dez" => "Dezembro",
        _ => "N/A",
    }
}

/// Extract a document title and event date from an input filename stem.
pub fn extract_metadata(stem: &str) -> TranscriptMeta {
    let mut clean = stem.trim().to_string();
    for suffix in TRANSCRIPT_SUFFIXES {
        if let Some(stripped) = clean.strip_suffix(suffix) {
            clean = stripped.trim_end().to_string();
        }
    }

    let mut title = clean.clone();
    let mut event_date = "N/A".to_string();

    if let Some(caps) = month_date_re().captures(&clean) {
        let month = full_month(&caps[1]);
        let year = &caps[2];
        event_date = format!("{} de {}", month, year);

        if clean.contains("MasterMind") {
            title = format!("MasterMind {} {}", month, year);
        }
    }

    TranscriptMeta { title, event_date }
}

/// Today's date formatted for the document metadata block.
pub fn current_date_string() -> String {
    let now = Local::now();
    let month = match now.month() {
        1 => "Janeiro",
        2 => "Fevereiro",
        3 => "Março",
        4 => "Abril",
        5 => "Maio",
        6 => "Junho",
        7 => "Julho",
        8 => "Agosto",
        9 => "Setembro",
        10 => "Outubro",
        11 => "Novembro",
        _ => "Dezembro",
    };
    format!("{} de {} de {}", now.day(), month, now.year())
}
