//! Error types for the cluster provisioner.
//!
//! Every failure carries the identity of the tool or step being processed
//! and propagates unmodified; the run aborts at the first unrecoverable
//! error and never reaches the bring-up command after an install failure.

use camino::Utf8PathBuf;
use gantry_installer::error::InstallError;
use thiserror::Error;

/// Errors that can occur while provisioning a local test cluster.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The host platform has no published tool binaries.
    #[error("unsupported host platform {os}/{arch}")]
    UnsupportedHost {
        /// The host operating system.
        os: String,
        /// The host CPU architecture.
        arch: String,
    },

    /// Installing the cluster tools failed.
    #[error("tool installation failed: {0}")]
    Install(#[from] InstallError),

    /// An existing target directory was not created by a previous run, so
    /// it will not be replaced.
    #[error("refusing to replace {path}: it carries no install record")]
    ForeignTarget {
        /// The occupied target path.
        path: Utf8PathBuf,
    },

    /// The kubeconfig location could not be prepared.
    #[error("could not prepare kubeconfig at {path}: {reason}")]
    Kubeconfig {
        /// The kubeconfig path.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The cluster bring-up command failed, timed out, or exited nonzero.
    #[error("cluster bring-up failed ({command}): {reason}")]
    BringUp {
        /// The command that was run.
        command: String,
        /// Description of the failure.
        reason: String,
        /// The command's exit code, when it ran to completion.
        status: Option<i32>,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`ProvisionError`].
pub type Result<T> = std::result::Result<T, ProvisionError>;
