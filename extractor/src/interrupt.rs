//! Temporary artefact cleanup on Ctrl-C.
//!
//! A `SIGINT` terminates the process without unwinding, so scoped
//! [`tempfile::TempDir`] values never get dropped. Directories registered
//! here are removed by the handler installed with [`install_handler`] before
//! the process exits.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Exit status used after an interrupt (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

static REGISTERED: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

/// Keeps a directory registered for interrupt cleanup until dropped.
#[derive(Debug)]
pub struct CleanupGuard {
    path: PathBuf,
}

/// Register `path` for removal if the process is interrupted.
#[must_use = "the directory is unregistered when the guard is dropped"]
pub fn register(path: &Path) -> CleanupGuard {
    REGISTERED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(path.to_path_buf());
    CleanupGuard {
        path: path.to_path_buf(),
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let mut registered = REGISTERED.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(position) = registered.iter().position(|p| p == &self.path) {
            registered.swap_remove(position);
        }
    }
}

/// Remove every registered directory. Failures are logged and ignored.
pub fn remove_registered() {
    let registered = std::mem::take(
        &mut *REGISTERED.lock().unwrap_or_else(PoisonError::into_inner),
    );
    remove_all(registered);
}

fn remove_all(paths: Vec<PathBuf>) {
    for path in paths {
        if let Err(err) = std::fs::remove_dir_all(&path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!("could not remove {}: {err}", path.display());
            }
        }
    }
}

/// Install a Ctrl-C handler that cleans up and exits with status 130.
///
/// # Errors
///
/// Returns an error if a handler is already installed or the signal cannot
/// be hooked.
pub fn install_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        log::debug!("interrupted; removing temporary artefacts");
        remove_registered();
        std::process::exit(INTERRUPTED_EXIT_CODE);
    })
}

#[cfg(test)]
fn is_registered(path: &Path) -> bool {
    REGISTERED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .any(|p| p == path)
}
