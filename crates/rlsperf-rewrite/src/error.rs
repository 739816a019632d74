//! Error types for the rewrite crate.

use rlsperf_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while building a rewriter.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A call token did not compile into a valid pattern.
    #[error("invalid pattern for {call}: {source}")]
    InvalidPattern {
        call: String,
        #[source]
        source: regex::Error,
    },

    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
