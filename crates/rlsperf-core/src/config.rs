//! Rewrite configuration.
//!
//! A configuration is an ordered list of [`FunctionTarget`]s plus a
//! [`RewriteMode`]. It can be loaded from YAML:
//!
//! ```yaml
//! mode: call-sites
//! targets:
//!   - call: auth.uid()
//!     wrapped: (select auth.uid())
//!   - call: get_auth_role()
//!     wrapped: (select public.get_auth_role())
//!     schema: public
//! ```
//!
//! When no file is given, [`RewriteConfig::default`] provides the built-in
//! targets for `auth.uid()`, `get_auth_role()` and `get_auth_congregation()`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// How wrap rules treat matches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RewriteMode {
    /// Wrap every word-boundary match, then undo the damage on the two known
    /// declaration forms with literal corrections. Re-running wraps again.
    #[default]
    Compat,
    /// Wrap only call sites: declaration sites and calls that are already
    /// wrapped are left alone, so re-running is a no-op.
    CallSites,
}

impl std::fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewriteMode::Compat => write!(f, "compat"),
            RewriteMode::CallSites => write!(f, "call-sites"),
        }
    }
}

/// A function call to wrap in a subquery.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionTarget {
    /// The call token as it appears in the schema, e.g. `get_auth_role()`.
    pub call: String,

    /// Replacement text, e.g. `(select public.get_auth_role())`.
    pub wrapped: String,

    /// Schema the function is declared under. When set, the `CREATE OR
    /// REPLACE FUNCTION` and `DROP FUNCTION IF EXISTS` forms for
    /// `{schema}.{call}` are restored after wrapping.
    #[serde(default)]
    pub schema: Option<String>,
}

impl FunctionTarget {
    pub fn new(call: impl Into<String>, wrapped: impl Into<String>) -> Self {
        Self {
            call: call.into(),
            wrapped: wrapped.into(),
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// The call token without its trailing `()`.
    pub fn function_name(&self) -> &str {
        self.call.strip_suffix("()").unwrap_or(&self.call)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.call.ends_with("()") || self.function_name().trim().is_empty() {
            return Err(ConfigError::Config(format!(
                "call '{}' must be a function name followed by ()",
                self.call
            )));
        }
        if !self.wrapped.contains(&self.call) {
            return Err(ConfigError::Config(format!(
                "wrapped form '{}' does not contain call '{}'",
                self.wrapped, self.call
            )));
        }
        if let Some(schema) = &self.schema {
            if schema.trim().is_empty() || schema.contains(char::is_whitespace) {
                return Err(ConfigError::Config(format!(
                    "schema for '{}' must be a single identifier",
                    self.call
                )));
            }
        }
        Ok(())
    }
}

/// Complete rewrite configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    #[serde(default)]
    pub mode: RewriteMode,

    /// Targets in application order.
    #[serde(default = "default_targets")]
    pub targets: Vec<FunctionTarget>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            mode: RewriteMode::default(),
            targets: default_targets(),
        }
    }
}

fn default_targets() -> Vec<FunctionTarget> {
    vec![
        FunctionTarget::new("auth.uid()", "(select auth.uid())"),
        FunctionTarget::new("get_auth_role()", "(select public.get_auth_role())")
            .with_schema("public"),
        FunctionTarget::new(
            "get_auth_congregation()",
            "(select public.get_auth_congregation())",
        )
        .with_schema("public"),
    ]
}

impl RewriteConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise fall back to the built-in targets.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading rewrite config");
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn with_mode(mut self, mode: RewriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check every target for a usable call token and wrapped form.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::Config("no rewrite targets configured".into()));
        }
        for target in &self.targets {
            target.validate()?;
        }

        let mut seen = std::collections::HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.call.as_str()) {
                tracing::warn!(call = %target.call, "target listed more than once");
            }
        }
        Ok(())
    }
}
