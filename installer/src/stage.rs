//! Staging for fetched artifacts prior to atomic publication.
//!
//! Verified artifacts accumulate in a temporary directory created in the
//! install target's parent, so the final publish is a single `rename` on
//! one filesystem. Readers of the target either see the fully-prior state
//! or the fully-new state, never a mix; dropping the stager before
//! publication discards everything.

use crate::error::{InstallError, Result};
use crate::manifest::ArtifactName;
use camino::Utf8Path;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix for staging directory names, so interrupted runs are
/// recognisable in the target's parent directory.
const STAGING_PREFIX: &str = ".gantry-stage-";

/// A staging directory bound to one install target.
#[derive(Debug)]
pub struct Stager {
    staging: tempfile::TempDir,
}

impl Stager {
    /// Create a staging directory next to `target`.
    ///
    /// The target must not yet exist: it is created by [`Stager::publish`]
    /// in one atomic rename, and installing over an existing directory
    /// would make partial states observable.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::TargetExists`] when the target is already
    /// present, or [`InstallError::Staging`] when the staging directory
    /// cannot be created.
    pub fn prepare(target: &Utf8Path) -> Result<Self> {
        if target.symlink_metadata().is_ok() {
            return Err(InstallError::TargetExists {
                path: target.to_owned(),
            });
        }
        let parent = target.parent().ok_or_else(|| InstallError::Staging {
            reason: format!("install target {target} has no parent directory"),
        })?;
        fs::create_dir_all(parent)?;
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| InstallError::Staging {
                reason: format!("could not create staging directory in {parent}: {e}"),
            })?;
        Ok(Self { staging })
    }

    /// The staging directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.staging.path()
    }

    /// The staged file path for an artifact.
    #[must_use]
    pub fn dest_for(&self, name: &ArtifactName) -> PathBuf {
        self.staging.path().join(name.as_str())
    }

    /// Remove one staged file.
    ///
    /// Used to drop buildtime artifacts after verification, before the
    /// runtime set is published.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be removed.
    pub fn discard(&self, name: &ArtifactName) -> Result<()> {
        fs::remove_file(self.dest_for(name))?;
        Ok(())
    }

    /// Atomically publish the staged contents as `target`.
    ///
    /// Consumes the stager; after a successful rename the staging directory
    /// *is* the target and no cleanup runs.
    ///
    /// # Errors
    ///
    /// Returns an error when the rename fails; the staging directory is
    /// then discarded and the target remains absent.
    pub fn publish(self, target: &Utf8Path) -> Result<()> {
        fs::rename(self.staging.path(), target.as_std_path())?;
        // Already renamed into place; the temp handle must not delete it.
        let _ = self.staging.keep();
        Ok(())
    }
}

/// Mark a staged tool binary executable (owner/group/other read-execute).
///
/// No-op on platforms without Unix permissions.
///
/// # Errors
///
/// Returns an error when permissions cannot be read or set.
#[cfg(unix)]
pub fn mark_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions)
}

/// Mark a staged tool binary executable (no-op off Unix).
///
/// # Errors
///
/// Never fails on this platform.
#[cfg(not(unix))]
pub fn mark_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
