//! Simulator program resolution and validation utilities.
//!
//! This module resolves the simulator program from a bare name or an explicit
//! path, and validates that it exists and is executable before a sweep starts.

use std::env;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Errors that can occur during program resolution or validation
#[derive(Debug, thiserror::Error)]
pub enum BinaryError {
    #[error("Binary not found: {path}")]
    NotFound { path: String },

    #[error("Binary is not executable: {path}")]
    NotExecutable { path: String },

    #[error("Cannot determine home directory")]
    NoHomeDir,

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },
}

/// Get the user's home directory from the HOME environment variable
fn get_home_dir() -> Result<PathBuf, BinaryError> {
    env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| BinaryError::NoHomeDir)
}

/// Resolve a program from a bare name or an explicit path.
///
/// Resolution rules:
/// 1. If the value contains `/` or starts with `~`: explicit path. `~` is
///    expanded and relative paths are anchored at the current directory, so
///    the result stays valid when the simulator runs in a trial directory.
/// 2. Otherwise: the first match on `PATH`.
///
/// # Examples
///
/// ```ignore
/// resolve_program("./waf")            -> /home/user/ns-3/waf
/// resolve_program("~/ns-3/waf")       -> /home/user/ns-3/waf
/// resolve_program("slp-manet")        -> /usr/local/bin/slp-manet
/// ```
pub fn resolve_program(name_or_path: &str) -> Result<PathBuf, BinaryError> {
    if name_or_path.is_empty() {
        return Err(BinaryError::InvalidPath {
            path: name_or_path.to_string(),
        });
    }

    if name_or_path.contains('/') || name_or_path.starts_with('~') {
        let expanded = match name_or_path.strip_prefix("~/") {
            Some(rest) => get_home_dir()?.join(rest),
            None => PathBuf::from(name_or_path),
        };
        if expanded.is_absolute() {
            return Ok(expanded);
        }
        let cwd = env::current_dir().map_err(|_| BinaryError::InvalidPath {
            path: name_or_path.to_string(),
        })?;
        return Ok(cwd.join(expanded));
    }

    let search_path = env::var_os("PATH").unwrap_or_default();
    env::split_paths(&search_path)
        .map(|dir| dir.join(name_or_path))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| BinaryError::NotFound {
            path: name_or_path.to_string(),
        })
}

/// Validate that a binary exists and is executable
pub fn validate_binary(path: &Path) -> Result<(), BinaryError> {
    if !path.exists() {
        return Err(BinaryError::NotFound {
            path: path.display().to_string(),
        });
    }

    let metadata = path.metadata().map_err(|_| BinaryError::InvalidPath {
        path: path.display().to_string(),
    })?;

    // Check if file is executable (any execute bit set)
    let mode = metadata.permissions().mode();
    if !metadata.is_file() || mode & 0o111 == 0 {
        return Err(BinaryError::NotExecutable {
            path: path.display().to_string(),
        });
    }

    Ok(())
}

/// Resolve and validate a program in one step.
pub fn validate_program(name_or_path: &str) -> Result<PathBuf, BinaryError> {
    let resolved = resolve_program(name_or_path)?;
    validate_binary(&resolved)?;
    Ok(resolved)
}
