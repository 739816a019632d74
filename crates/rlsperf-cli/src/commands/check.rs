//! `rlsperf check` command implementation.
//!
//! Runs the rewrite without writing anything and reports, per rule, how many
//! matches would be replaced or skipped.

use anyhow::{Context, Result};
use std::fmt::{self, Write as _};
use std::path::Path;

use rlsperf_core::{RewriteConfig, SchemaFile};
use rlsperf_rewrite::{RewriteReport, Rewriter};

/// Print the report for `path`. Returns `true` when `apply` would change the file.
pub fn run(path: &Path, config: &RewriteConfig, json: bool) -> Result<bool> {
    let report = check_file(path, config)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", render(path, &report).context("Failed to render report")?);
    }

    Ok(report.changed)
}

pub fn check_file(path: &Path, config: &RewriteConfig) -> Result<RewriteReport> {
    let rewriter = Rewriter::new(config).context("Invalid rewrite configuration")?;
    let source = SchemaFile::new(path).read()?;
    Ok(rewriter.rewrite(&source).report)
}

fn render(path: &Path, report: &RewriteReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{} ({} mode)", path.display(), report.mode)?;

    for (i, outcome) in report.outcomes.iter().enumerate() {
        write!(
            out,
            "  {:>2}. [{:<7}] {:>4} replaced",
            i + 1,
            outcome.kind.to_string(),
            outcome.replacements
        )?;
        if outcome.skipped > 0 {
            write!(out, ", {} skipped", outcome.skipped)?;
        }
        writeln!(out, "  {}", outcome.needle)?;
    }

    if report.changed {
        writeln!(
            out,
            "✗ {} replacement(s) pending. Run `rlsperf apply` to rewrite.",
            report.total_replacements()
        )?;
    } else {
        writeln!(out, "✔ No changes needed.")?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_check_reports_pending() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        fs::write(&path, "USING (id = auth.uid())").unwrap();

        let pending = run(&path, &RewriteConfig::default(), false).unwrap();

        assert!(pending);
        // Dry run: file untouched.
        assert_eq!(fs::read_to_string(&path).unwrap(), "USING (id = auth.uid())");
    }

    #[test]
    fn test_check_clean_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        fs::write(&path, "CREATE TABLE t (id int);").unwrap();

        assert!(!run(&path, &RewriteConfig::default(), true).unwrap());
    }

    #[test]
    fn test_render_lists_every_rule() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        fs::write(&path, "SELECT auth.uid();").unwrap();

        let report = check_file(&path, &RewriteConfig::default()).unwrap();
        let text = render(&path, &report).unwrap();

        assert!(text.contains("compat mode"));
        assert!(text.contains(" 1. [wrap   ]    1 replaced  auth.uid()"));
        assert!(text.contains(" 7. [literal]"));
        assert!(text.contains("1 replacement(s) pending"));
    }

    #[test]
    fn test_check_missing_file() {
        let dir = tempdir().unwrap();
        assert!(check_file(&dir.path().join("missing.sql"), &RewriteConfig::default()).is_err());
    }
}
