//! Shared types for rlsperf.
//!
//! - [`config`]: which function calls get wrapped, and how
//! - [`schema_file`]: reading and atomically rewriting the schema file on disk

pub mod config;
pub mod schema_file;

pub use config::{ConfigError, FunctionTarget, RewriteConfig, RewriteMode};
pub use schema_file::{SchemaFile, SchemaFileError};
