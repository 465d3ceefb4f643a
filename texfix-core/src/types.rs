use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Full text of the document being rewritten, plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub content: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }
}

/// What a single rule did to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: String,
    /// Zero means the rule's trigger was not met; the text passed through unchanged
    pub substitutions: usize,
    pub elapsed_us: u64,
}

impl RuleOutcome {
    pub fn applied(&self) -> bool {
        self.substitutions > 0
    }
}

/// Summary of one rewrite run, suitable for writing out as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteReport {
    pub target: PathBuf,
    pub rules: Vec<RuleOutcome>,
    pub input_sha256: String,
    pub output_sha256: String,
    /// Output differs from input
    pub changed: bool,
    /// Output was handed to the store (false for dry runs)
    pub written: bool,
}

impl RewriteReport {
    pub fn total_substitutions(&self) -> usize {
        self.rules.iter().map(|r| r.substitutions).sum()
    }

    pub fn outcome(&self, rule: &str) -> Option<&RuleOutcome> {
        self.rules.iter().find(|r| r.rule == rule)
    }
}

/// Text after each pipeline stage
/// Used for diagnostics: lets you see exactly which rule changed what
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStages {
    pub original: String,
    /// `(rule name, text after that rule)` in pipeline order, enabled rules only
    pub after_rule: Vec<(String, String)>,
    pub outcomes: Vec<RuleOutcome>,
}

impl PipelineStages {
    pub fn final_text(&self) -> &str {
        self.after_rule
            .last()
            .map(|(_, text)| text.as_str())
            .unwrap_or(&self.original)
    }
}
