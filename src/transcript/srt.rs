//! SubRip (.srt) cleanup.
//!
//! YouTube auto-captions are exported as "rollup" subtitles: consecutive
//! blocks repeat the tail of the previous block, so naive concatenation
//! duplicates most lines. This module strips indices, timestamps, and HTML
//! tags, then removes the rollup overlap and joins the remainder into a
//! single plain-text body for the adapter.

use regex::Regex;
use std::sync::OnceLock;

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{2}:\d{2}:\d{2},\d{3}\s*-->\s*\d{2}:\d{2}:\d{2},\d{3}").unwrap()
    })
}

fn html_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Convert SRT content into clean, deduplicated plain text.
pub fn clean_srt_content(content: &str) -> String {
    let content = content.replace("\r\n", "\n");
    let blocks = parse_blocks(&content);
    deduplicate(&blocks).join(" ")
}

/// Extract the text body of each subtitle block, tags stripped.
fn parse_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();

    for raw_block in content.split("\n\n") {
        let mut lines = raw_block.lines().peekable();

        // Optional index line.
        if let Some(first) = lines.peek() {
            if first.trim().chars().all(|c| c.is_ascii_digit()) && !first.trim().is_empty() {
                lines.next();
            }
        }

        // Timestamp line is what makes this a subtitle block.
        match lines.peek() {
            Some(line) if timestamp_re().is_match(line.trim()) => {
                lines.next();
            }
            _ => continue,
        }

        let text: Vec<String> = lines
            .map(|l| html_tag_re().replace_all(l, "").trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        if !text.is_empty() {
            blocks.push(text.join("\n"));
        }
    }

    blocks
}

/// Remove rollup overlap between consecutive blocks.
fn deduplicate(blocks: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    let Some(first) = blocks.first() else {
        return cleaned;
    };
    cleaned.push(first.clone());

    for pair in blocks.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);

        // Whole-prefix rollup: prev="A", curr="A\nB" keeps only "B".
        if let Some(rest) = curr.strip_prefix(prev.as_str()) {
            let rest = rest.trim();
            if !rest.is_empty() {
                cleaned.push(rest.to_string());
            }
            continue;
        }

        // Line-level rollup: prev="A\nB", curr="B\nC" keeps only "C".
        let prev_lines: Vec<&str> = prev.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let curr_lines: Vec<&str> = curr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

        let start = if !prev_lines.is_empty() && !curr_lines.is_empty() {
            if curr_lines[0] == *prev_lines.last().unwrap() {
                1
            } else if prev_lines.len() < curr_lines.len()
                && curr_lines[..prev_lines.len()] == prev_lines[..]
            {
                prev_lines.len()
            } else {
                0
            }
        } else {
            0
        };

        for line in &curr_lines[start..] {
            cleaned.push((*line).to_string());
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_indices_and_timestamps() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000\nhello world\n\n\
                   2\n00:00:02,000 --> 00:00:04,000\ngoodbye\n";
        assert_eq!(clean_srt_content(srt), "hello world goodbye");
    }

    #[test]
    fn strips_html_tags() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000\n<i>styled</i> text\n";
        assert_eq!(clean_srt_content(srt), "styled text");
    }

    #[test]
    fn removes_whole_prefix_rollup() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000\nfirst line\n\n\
                   2\n00:00:02,000 --> 00:00:04,000\nfirst line\nsecond line\n";
        assert_eq!(clean_srt_content(srt), "first line second line");
    }

    #[test]
    fn removes_line_level_rollup() {
        let srt = "1\n00:00:00,000 --> 00:00:02,000\nalpha\nbravo\n\n\
                   2\n00:00:02,000 --> 00:00:04,000\nbravo\ncharlie\n";
        assert_eq!(clean_srt_content(srt), "alpha\nbravo charlie");
    }

    #[test]
    fn handles_crlf_input() {
        let srt = "1\r\n00:00:00,000 --> 00:00:02,000\r\nwindows line\r\n";
        assert_eq!(clean_srt_content(srt), "windows line");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(clean_srt_content(""), "");
    }

    #[test]
    fn ignores_non_subtitle_blocks() {
        let srt = "WEBVTT header junk\n\n1\n00:00:00,000 --> 00:00:01,000\nreal text\n";
        assert_eq!(clean_srt_content(srt), "real text");
    }
}
