//! Advisory locking for install targets.
//!
//! Mutual exclusion between installer runs is the caller's responsibility:
//! the library's `install` assumes at most one run targets a given
//! directory at a time. Both shipped binaries take this file lock, scoped
//! to the target path, before installing. The lock is advisory; readers of
//! a published target never need it because publication is atomic.

use crate::error::{InstallError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};

/// An exclusive advisory lock scoped to one install target.
///
/// Released when dropped.
#[derive(Debug)]
pub struct TargetLock {
    // Held only for the lifetime of the lock; closing the file releases it.
    _file: File,
    path: Utf8PathBuf,
}

impl TargetLock {
    /// Acquire the lock for `target`, creating the lock file beside it.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Locked`] when another process holds the
    /// lock, or an I/O error when the lock file cannot be created.
    pub fn acquire(target: &Utf8Path) -> Result<Self> {
        let path = lock_path_for(target);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path.as_std_path())?;
        file.try_lock_exclusive()
            .map_err(|e| InstallError::Locked {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        log::debug!("acquired install lock {path}");
        Ok(Self { _file: file, path })
    }

    /// The lock file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

/// The lock file path for a target: a dotfile sibling of the target
/// directory, so the lock survives the target being created and removed.
#[must_use]
pub fn lock_path_for(target: &Utf8Path) -> Utf8PathBuf {
    let name = target.file_name().unwrap_or("gantry");
    target
        .parent()
        .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_owned)
        .join(format!(".{name}.lock"))
}
