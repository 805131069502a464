//! Persisted refresh token.
//!
//! The service may rotate the refresh token on every exchange, so the CLI
//! reads it from here before connecting and writes the current one back when
//! it is done.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Plain-text file holding one refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored token, or `None` when the file is missing or blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Token file not found");
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let token = content.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    /// Overwrite the file with `token`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}\n", token.trim()))?;
        debug!(path = %self.path.display(), "Token file saved");
        Ok(())
    }
}
