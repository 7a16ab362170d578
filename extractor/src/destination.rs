//! Destination directory preconditions.
//!
//! Extraction never writes into a directory that already holds files unless
//! the caller asked for an overwrite. Inspection and preparation are split so
//! that the guard can run before any download, while the destructive part
//! only runs once the archive has been verified.

use crate::error::{ExtractError, Result};
use std::fs;
use std::path::Path;

/// Observed state of a destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationState {
    /// Nothing exists at the path.
    Absent,
    /// An empty directory exists at the path.
    Empty,
    /// A directory with entries, or a non-directory, exists at the path.
    NonEmpty,
}

/// Inspect `path` without modifying it.
///
/// # Errors
///
/// Returns [`ExtractError::FileAccess`] if the path cannot be inspected.
pub fn inspect(path: &Path) -> Result<DestinationState> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(DestinationState::Absent);
        }
        Err(e) => return Err(ExtractError::file_access(path, e)),
    };
    if !metadata.is_dir() {
        return Ok(DestinationState::NonEmpty);
    }
    let mut entries = fs::read_dir(path).map_err(|e| ExtractError::file_access(path, e))?;
    Ok(match entries.next() {
        None => DestinationState::Empty,
        Some(_) => DestinationState::NonEmpty,
    })
}

/// Fail unless `path` may be extracted into.
///
/// A present-but-empty directory is accepted without `force`.
///
/// # Errors
///
/// Returns [`ExtractError::DestinationNotEmpty`] when `path` holds entries
/// and `force` is false.
pub fn check(path: &Path, force: bool) -> Result<DestinationState> {
    let state = inspect(path)?;
    if state == DestinationState::NonEmpty && !force {
        return Err(ExtractError::DestinationNotEmpty {
            path: path.to_path_buf(),
        });
    }
    Ok(state)
}

/// Make `path` an existing directory ready for extraction.
///
/// With `force`, anything already at `path` is deleted first. The directory
/// and its parents are then created if missing.
///
/// # Errors
///
/// Returns [`ExtractError::DestinationNotEmpty`] when `path` holds entries
/// and `force` is false, or [`ExtractError::FileAccess`] if removal or
/// creation fails.
pub fn prepare(path: &Path, force: bool) -> Result<()> {
    let state = check(path, force)?;
    if force && state != DestinationState::Absent {
        log::info!("removing existing destination {}", path.display());
        let removed = if fs::symlink_metadata(path).is_ok_and(|m| m.is_dir()) {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        removed.map_err(|e| ExtractError::file_access(path, e))?;
    }
    fs::create_dir_all(path).map_err(|e| ExtractError::file_access(path, e))
}
