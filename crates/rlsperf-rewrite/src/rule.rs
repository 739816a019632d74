//! Rewrite rules and their expansion from configuration.

use regex::Regex;
use rlsperf_core::{FunctionTarget, RewriteConfig, RewriteMode};
use serde::Serialize;

use crate::error::RewriteError;

/// The two kinds of rewrite rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Wrap,
    Literal,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Wrap => write!(f, "wrap"),
            RuleKind::Literal => write!(f, "literal"),
        }
    }
}

/// A single find-and-replace step.
#[derive(Debug, Clone)]
pub enum RewriteRule {
    /// Replace every `call` that starts at a word boundary with `wrapped`.
    Wrap {
        call: String,
        wrapped: String,
        pattern: Regex,
    },
    /// Replace every exact occurrence of `from` with `to`.
    Literal { from: String, to: String },
}

impl RewriteRule {
    /// Build a wrap rule. The call is matched literally, anchored on a
    /// leading word boundary so `xauth.uid()` is left alone.
    pub fn wrap(call: impl Into<String>, wrapped: impl Into<String>) -> Result<Self, RewriteError> {
        let call = call.into();
        let pattern = Regex::new(&format!(r"\b{}", regex::escape(&call))).map_err(|source| {
            RewriteError::InvalidPattern {
                call: call.clone(),
                source,
            }
        })?;

        Ok(Self::Wrap {
            call,
            wrapped: wrapped.into(),
            pattern,
        })
    }

    pub fn literal(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Literal {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            RewriteRule::Wrap { .. } => RuleKind::Wrap,
            RewriteRule::Literal { .. } => RuleKind::Literal,
        }
    }

    /// The text this rule looks for.
    pub fn needle(&self) -> &str {
        match self {
            RewriteRule::Wrap { call, .. } => call,
            RewriteRule::Literal { from, .. } => from,
        }
    }

    /// The text this rule puts in place of a match.
    pub fn replacement(&self) -> &str {
        match self {
            RewriteRule::Wrap { wrapped, .. } => wrapped,
            RewriteRule::Literal { to, .. } => to,
        }
    }
}

impl std::fmt::Display for RewriteRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.needle(), self.replacement())
    }
}

/// An ordered rule sequence together with the mode it runs in.
#[derive(Debug, Clone)]
pub struct RuleSet {
    mode: RewriteMode,
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    /// Expand a validated configuration into its rule sequence.
    ///
    /// Each target contributes its wrap rule, followed by the two declaration
    /// corrections when it names a schema. Target order is preserved.
    pub fn from_config(config: &RewriteConfig) -> Result<Self, RewriteError> {
        config.validate()?;

        let mut rules = Vec::with_capacity(config.targets.len() * 3);
        for target in &config.targets {
            rules.extend(expand_target(target)?);
        }

        Ok(Self {
            mode: config.mode,
            rules,
        })
    }

    pub fn mode(&self) -> RewriteMode {
        self.mode
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn expand_target(target: &FunctionTarget) -> Result<Vec<RewriteRule>, RewriteError> {
    let mut rules = vec![RewriteRule::wrap(&target.call, &target.wrapped)?];

    // Wrapping also hits `{schema}.{call}` in the function's own declaration,
    // which then reads `{schema}.{wrapped}`.
    if let Some(schema) = &target.schema {
        let mangled = format!("{}.{}", schema, target.wrapped);
        let declared = format!("{}.{}", schema, target.call);

        rules.push(RewriteRule::literal(
            format!("CREATE OR REPLACE FUNCTION {mangled}"),
            format!("CREATE OR REPLACE FUNCTION {declared}"),
        ));
        rules.push(RewriteRule::literal(
            format!("DROP FUNCTION IF EXISTS {mangled} CASCADE;"),
            format!("DROP FUNCTION IF EXISTS {declared} CASCADE;"),
        ));
    }

    Ok(rules)
}
