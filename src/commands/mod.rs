//! Command implementations

pub mod add;
pub mod completions;
pub mod info;
pub mod init;
pub mod version;

use std::path::PathBuf;

use crate::error::{GlacialError, Result};

/// Resolve and canonicalize the project root for a command
pub(crate) fn resolve_cwd(cwd: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = match cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir().map_err(|e| GlacialError::FileReadFailed {
            path: ".".to_string(),
            reason: e.to_string(),
        })?,
    };

    dunce::canonicalize(&cwd).map_err(|e| GlacialError::read(&cwd, e))
}
