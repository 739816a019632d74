//! CLI command implementations for rlsperf.

pub mod apply;
pub mod check;
pub mod rules;

use anyhow::{Context, Result};
use rlsperf_core::{RewriteConfig, RewriteMode};
use std::path::Path;

/// Load the rewrite configuration, applying a `--mode` override if given.
pub fn load_config(path: Option<&Path>, mode: Option<RewriteMode>) -> Result<RewriteConfig> {
    let config = RewriteConfig::load(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load built-in config".to_string(),
    })?;

    Ok(match mode {
        Some(mode) => config.with_mode(mode),
        None => config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_default_config() {
        let config = load_config(None, None).unwrap();
        assert_eq!(config.targets.len(), 3);
        assert_eq!(config.mode, RewriteMode::Compat);
    }

    #[test]
    fn test_mode_override_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rlsperf.yaml");
        fs::write(
            &path,
            "mode: call-sites\ntargets:\n  - call: auth.uid()\n    wrapped: (select auth.uid())\n",
        )
        .unwrap();

        let config = load_config(Some(&path), None).unwrap();
        assert_eq!(config.mode, RewriteMode::CallSites);

        let config = load_config(Some(&path), Some(RewriteMode::Compat)).unwrap();
        assert_eq!(config.mode, RewriteMode::Compat);
        assert_eq!(config.targets.len(), 1);
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.yaml")), None).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
