//! Per-run rewrite reports.

use rlsperf_core::RewriteMode;
use serde::Serialize;

use crate::rule::RuleKind;

/// What one rule did during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub kind: RuleKind,
    /// Text the rule searched for.
    pub needle: String,
    /// Text each match was replaced with.
    pub replacement: String,
    /// Number of matches replaced.
    pub replacements: usize,
    /// Matches left alone as declaration or already-wrapped sites.
    pub skipped: usize,
}

/// Result summary of applying a rule set to one text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub mode: RewriteMode,
    pub outcomes: Vec<RuleOutcome>,
    /// Whether the output differs from the input.
    pub changed: bool,
}

impl RewriteReport {
    pub fn total_replacements(&self) -> usize {
        self.outcomes.iter().map(|o| o.replacements).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.outcomes.iter().map(|o| o.skipped).sum()
    }
}
