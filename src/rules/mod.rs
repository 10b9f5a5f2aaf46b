//! Terminology rule set: ordered find/replace rules applied to adapter output.

mod loader;

pub use loader::{load_rules, parse_rules};

use regex::Regex;

/// A single substitution rule.
///
/// Rules are parsed once at startup and shared read-only across workers,
/// so regex patterns are compiled here rather than at apply time.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Exact, case-sensitive substring replacement.
    Literal { term: String, replacement: String },
    /// Pattern replacement. Inline flags like `(?i)` are part of the pattern.
    Regex { pattern: Regex, replacement: String },
}

impl Rule {
    fn apply(&self, text: &str) -> String {
        match self {
            Rule::Literal { term, replacement } => text.replace(term.as_str(), replacement),
            Rule::Regex { pattern, replacement } => {
                pattern.replace_all(text, replacement.as_str()).into_owned()
            }
        }
    }
}

/// An ordered, immutable collection of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Apply every rule in declaration order. Each rule transforms the
    /// output of the previous one, so rules compose sequentially.
    ///
    /// A rule with no match is a no-op, never an error.
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}
