//! `rlsperf apply` - rewrite a schema file in place.

use anyhow::{Context, Result};
use std::path::Path;

use rlsperf_core::{RewriteConfig, SchemaFile};
use rlsperf_rewrite::{RewriteReport, Rewriter};

/// Rewrite the file at `path` and print the completion line.
pub fn run(path: &Path, config: &RewriteConfig, backup: bool) -> Result<RewriteReport> {
    let report = rewrite_file(path, config, backup)?;
    println!("Replacement complete.");
    Ok(report)
}

/// Read, rewrite, and write back the file. Nothing is written if reading
/// or decoding fails.
pub fn rewrite_file(path: &Path, config: &RewriteConfig, backup: bool) -> Result<RewriteReport> {
    let rewriter = Rewriter::new(config).context("Invalid rewrite configuration")?;
    let file = SchemaFile::new(path);

    let source = file.read()?;
    let out = rewriter.rewrite(&source);

    for outcome in out.report.outcomes.iter().filter(|o| o.replacements > 0 || o.skipped > 0) {
        tracing::info!(
            kind = %outcome.kind,
            needle = %outcome.needle,
            replacements = outcome.replacements,
            skipped = outcome.skipped,
            "rule applied"
        );
    }

    if backup {
        let backup_path = file.backup()?;
        tracing::info!(path = %backup_path.display(), "saved backup");
    }
    file.write(&out.text)?;

    if !out.report.changed {
        tracing::info!(path = %path.display(), mode = %out.report.mode, "no changes needed");
    }

    Ok(out.report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rlsperf_core::{RewriteMode, SchemaFileError};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_apply_rewrites_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        fs::write(&path, "CREATE POLICY p ON t USING (owner = auth.uid());\n").unwrap();

        let report = run(&path, &RewriteConfig::default(), false).unwrap();

        assert!(report.changed);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "CREATE POLICY p ON t USING (owner = (select auth.uid()));\n"
        );
        assert!(!dir.path().join("schema.sql.bak").exists());
    }

    #[test]
    fn test_apply_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        fs::write(&path, "").unwrap();

        let report = run(&path, &RewriteConfig::default(), false).unwrap();

        assert!(!report.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_apply_with_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        fs::write(&path, "SELECT get_auth_role();").unwrap();

        run(&path, &RewriteConfig::default(), true).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("schema.sql.bak")).unwrap(),
            "SELECT get_auth_role();"
        );
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "SELECT (select public.get_auth_role());"
        );
    }

    #[test]
    fn test_apply_missing_file() {
        let dir = tempdir().unwrap();
        let err = run(&dir.path().join("missing.sql"), &RewriteConfig::default(), false)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SchemaFileError>(),
            Some(SchemaFileError::Access { .. })
        ));
    }

    #[test]
    fn test_apply_invalid_utf8_leaves_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        let bytes = b"SELECT auth.uid(); -- \xff\n";
        fs::write(&path, bytes).unwrap();

        let err = run(&path, &RewriteConfig::default(), true).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SchemaFileError>(),
            Some(SchemaFileError::Encoding { .. })
        ));
        assert_eq!(fs::read(&path).unwrap(), bytes.to_vec());
        assert!(!dir.path().join("schema.sql.bak").exists());
    }

    #[test]
    fn test_apply_call_sites_twice() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.sql");
        fs::write(
            &path,
            "CREATE OR REPLACE FUNCTION public.get_auth_role() RETURNS text AS $$ SELECT get_auth_role() $$;",
        )
        .unwrap();
        let config = RewriteConfig::default().with_mode(RewriteMode::CallSites);

        run(&path, &config, false).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        let report = run(&path, &config, false).unwrap();

        assert!(!report.changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
        assert_eq!(
            first,
            "CREATE OR REPLACE FUNCTION public.get_auth_role() RETURNS text AS $$ SELECT (select public.get_auth_role()) $$;"
        );
    }
}
