//! Schema file access.
//!
//! The file is read fully into memory as UTF-8 and written back through a
//! temporary file in the same directory that is renamed over the original,
//! so an interrupted write never leaves a truncated schema behind.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors that can occur while reading or writing a schema file.
#[derive(Debug, Error)]
pub enum SchemaFileError {
    /// Missing file, permission denied, or the path is a directory.
    #[error("cannot read {}: {source}", .path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8.
    #[error("{} is not valid UTF-8: {source}", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Writing the new contents (or the backup) failed.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A schema file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFile {
    path: PathBuf,
}

impl SchemaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the backup written by [`SchemaFile::backup`]: `<path>.bak`.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Read the whole file as UTF-8 text.
    pub fn read(&self) -> Result<String, SchemaFileError> {
        let bytes = fs::read(&self.path).map_err(|source| SchemaFileError::Access {
            path: self.path.clone(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|source| SchemaFileError::Encoding {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), bytes = text.len(), "read schema file");
        Ok(text)
    }

    /// Copy the current file to [`SchemaFile::backup_path`].
    pub fn backup(&self) -> Result<PathBuf, SchemaFileError> {
        let backup = self.backup_path();
        fs::copy(&self.path, &backup).map_err(|source| SchemaFileError::Write {
            path: backup.clone(),
            source,
        })?;
        Ok(backup)
    }

    /// Replace the file's contents atomically.
    ///
    /// A symlinked path is resolved first so the link's target is replaced
    /// and the link itself survives. The original permissions are kept when
    /// the file already exists; owner and group are not, the replacement
    /// belongs to the user running the rewrite.
    pub fn write(&self, contents: &str) -> Result<(), SchemaFileError> {
        let write_err = |source| SchemaFileError::Write {
            path: self.path.clone(),
            source,
        };

        // Missing files cannot be canonicalized; they are created at `path`.
        let target = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(contents.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        if let Ok(metadata) = fs::metadata(&target) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_err)?;
        }

        tmp.persist(&target).map_err(|e| write_err(e.error))?;

        tracing::info!(path = %self.path.display(), bytes = contents.len(), "wrote schema file");
        Ok(())
    }
}
