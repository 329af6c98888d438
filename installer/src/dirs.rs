//! Directory resolution abstraction for platform-specific paths.
//!
//! Wraps `directories-next` behind a trait so tests can inject fixed
//! locations instead of the real user directories.

use camino::Utf8PathBuf;

/// Provider of per-user base directories.
pub trait BaseDirs {
    /// The platform's per-user local data directory, when resolvable to a
    /// UTF-8 path.
    fn data_local_dir(&self) -> Option<Utf8PathBuf>;

    /// The user's home directory, when resolvable to a UTF-8 path.
    fn home_dir(&self) -> Option<Utf8PathBuf>;
}

/// Resolves base directories from the host environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn data_local_dir(&self) -> Option<Utf8PathBuf> {
        let dirs = directories_next::BaseDirs::new()?;
        Utf8PathBuf::try_from(dirs.data_local_dir().to_path_buf()).ok()
    }

    fn home_dir(&self) -> Option<Utf8PathBuf> {
        let dirs = directories_next::BaseDirs::new()?;
        Utf8PathBuf::try_from(dirs.home_dir().to_path_buf()).ok()
    }
}

/// Return the default install target directory for the current platform.
///
/// The base comes from the per-user local data directory (for example
/// `~/.local/share` on many Linux distributions); the installer appends
/// `gantry/tools` under it.
#[must_use]
pub fn default_target_dir(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    dirs.data_local_dir().map(|p| p.join("gantry").join("tools"))
}
