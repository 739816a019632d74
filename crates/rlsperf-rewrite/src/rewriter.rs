//! Applies a rule set to schema text.

use regex::{NoExpand, Regex};
use rlsperf_core::{RewriteConfig, RewriteMode};

use crate::error::RewriteError;
use crate::report::{RewriteReport, RuleOutcome};
use crate::rule::{RewriteRule, RuleSet};
use crate::site::{SiteClassifier, split_around};

/// Applies an ordered [`RuleSet`] to text.
#[derive(Debug, Clone)]
pub struct Rewriter {
    rules: RuleSet,
    sites: SiteClassifier,
}

/// Rewritten text plus what happened to it.
#[derive(Debug, Clone)]
pub struct Rewritten {
    pub text: String,
    pub report: RewriteReport,
}

impl Rewriter {
    /// Create a rewriter for the given configuration.
    pub fn new(config: &RewriteConfig) -> Result<Self, RewriteError> {
        Ok(Self::from_rules(RuleSet::from_config(config)?))
    }

    pub fn from_rules(rules: RuleSet) -> Self {
        Self {
            rules,
            sites: SiteClassifier::new(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn mode(&self) -> RewriteMode {
        self.rules.mode()
    }

    /// Apply every rule, in order, to the whole text.
    ///
    /// Each rule sees the output of the previous one. The input is never
    /// modified.
    pub fn rewrite(&self, source: &str) -> Rewritten {
        let mut text = source.to_string();
        let mut outcomes = Vec::with_capacity(self.rules.len());

        for rule in self.rules.rules() {
            let (next, replacements, skipped) = match rule {
                RewriteRule::Wrap {
                    call,
                    wrapped,
                    pattern,
                } => match self.mode() {
                    RewriteMode::Compat => wrap_all(&text, pattern, wrapped),
                    RewriteMode::CallSites => {
                        self.wrap_call_sites(&text, pattern, call, wrapped)
                    }
                },
                RewriteRule::Literal { from, to } => replace_literal(&text, from, to),
            };

            tracing::debug!(
                rule = %rule,
                replacements,
                skipped,
                "applied rewrite rule"
            );

            if let Some(next) = next {
                text = next;
            }
            outcomes.push(RuleOutcome {
                kind: rule.kind(),
                needle: rule.needle().to_string(),
                replacement: rule.replacement().to_string(),
                replacements,
                skipped,
            });
        }

        let changed = text != source;
        Rewritten {
            text,
            report: RewriteReport {
                mode: self.mode(),
                outcomes,
                changed,
            },
        }
    }

    fn wrap_call_sites(
        &self,
        text: &str,
        pattern: &Regex,
        call: &str,
        wrapped: &str,
    ) -> (Option<String>, usize, usize) {
        let around = split_around(wrapped, call);
        let mut out = String::new();
        let mut last = 0;
        let mut replacements = 0;
        let mut skipped = 0;

        for m in pattern.find_iter(text) {
            if self.sites.should_skip(text, m.start(), m.end(), around) {
                skipped += 1;
                continue;
            }
            if replacements == 0 {
                out.reserve(text.len() + wrapped.len());
            }
            out.push_str(&text[last..m.start()]);
            out.push_str(wrapped);
            last = m.end();
            replacements += 1;
        }

        if replacements == 0 {
            return (None, 0, skipped);
        }
        out.push_str(&text[last..]);
        (Some(out), replacements, skipped)
    }
}

/// Rule outputs are `(new text if changed, replaced, skipped)`.
fn wrap_all(text: &str, pattern: &Regex, wrapped: &str) -> (Option<String>, usize, usize) {
    let count = pattern.find_iter(text).count();
    if count == 0 {
        return (None, 0, 0);
    }
    let out = pattern.replace_all(text, NoExpand(wrapped)).into_owned();
    (Some(out), count, 0)
}

fn replace_literal(text: &str, from: &str, to: &str) -> (Option<String>, usize, usize) {
    let count = text.matches(from).count();
    if count == 0 {
        return (None, 0, 0);
    }
    (Some(text.replace(from, to)), count, 0)
}
