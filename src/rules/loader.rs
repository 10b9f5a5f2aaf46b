//! Rules file parsing.
//!
//! Format, one rule per line:
//!
//! ```text
//! # comment
//! Original Term -> Replacement Term
//! REGEX: pattern -> replacement
//! ```
//!
//! Loading is fail-fast: the first malformed line (missing `->`, or a
//! `REGEX:` pattern that does not compile) aborts the load with its line
//! number, so no batch ever runs against an ambiguous rule set.

use super::{Rule, RuleSet};
use crate::error::{RagPrepError, Result};
use regex::Regex;
use std::path::Path;
use tracing::warn;

const REGEX_PREFIX: &str = "REGEX:";
const SEPARATOR: &str = "->";

/// Load rules from a file.
///
/// A missing file is not an error: first runs without customization get an
/// empty rule set and the adapter output passes through unchanged.
pub fn load_rules(path: &Path) -> Result<RuleSet> {
    if !path.exists() {
        warn!("Rules file not found: {}. Using empty rule set.", path.display());
        return Ok(RuleSet::default());
    }

    let content = std::fs::read_to_string(path)?;
    parse_rules(&content)
}

/// Parse rules from text.
pub fn parse_rules(content: &str) -> Result<RuleSet> {
    let mut rules = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no = idx + 1;
        let (body, is_regex) = match line.strip_prefix(REGEX_PREFIX) {
            Some(rest) => (rest.trim(), true),
            None => (line, false),
        };

        let Some((lhs, rhs)) = body.split_once(SEPARATOR) else {
            return Err(RagPrepError::RuleSyntax {
                line: line_no,
                content: raw_line.to_string(),
                reason: format!("missing `{}` separator", SEPARATOR),
            });
        };

        let term = lhs.trim().to_string();
        let replacement = rhs.trim().to_string();

        if is_regex {
            let pattern = Regex::new(&term).map_err(|e| RagPrepError::RuleSyntax {
                line: line_no,
                content: raw_line.to_string(),
                reason: format!("invalid regex: {}", e),
            })?;
            rules.push(Rule::Regex { pattern, replacement });
        } else {
            rules.push(Rule::Literal { term, replacement });
        }
    }

    Ok(RuleSet::new(rules))
}
