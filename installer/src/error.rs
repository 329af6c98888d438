//! Error types for the Gantry installer.
//!
//! This module defines the semantic error taxonomy for an installation run.
//! Every lower-layer failure is wrapped with the identity of the artifact
//! being processed and surfaced to the caller unmodified; nothing is
//! retried or downgraded to a warning.

use crate::fetch::FetchError;
use crate::manifest::{ArtifactName, ManifestError, Sha256Digest};
use crate::version::VersionResolutionError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during an installation run.
#[derive(Debug, Error)]
pub enum InstallError {
    /// A `latest` indirection could not be resolved.
    #[error("version resolution failed: {0}")]
    VersionResolution(#[from] VersionResolutionError),

    /// The manifest could not be read or validated.
    #[error("invalid manifest: {0}")]
    Manifest(#[from] ManifestError),

    /// Fetching one artifact failed.
    #[error("fetch failed for artifact {artifact} ({locator}): {source}")]
    Fetch {
        /// The artifact being fetched.
        artifact: ArtifactName,
        /// The concrete locator that failed.
        locator: String,
        /// The underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// One artifact's fetched bytes do not match its expected digest.
    #[error("digest mismatch for artifact {artifact}: expected {expected}, actual {actual}")]
    DigestMismatch {
        /// The artifact that failed verification.
        artifact: ArtifactName,
        /// The digest the manifest expects.
        expected: Sha256Digest,
        /// The digest actually computed over the fetched bytes.
        actual: Sha256Digest,
    },

    /// A companion checksum body did not contain a usable digest.
    #[error("companion checksum for artifact {artifact} ({url}) is malformed: {reason}")]
    CompanionDigest {
        /// The artifact whose checksum was being resolved.
        artifact: ArtifactName,
        /// The companion checksum URL.
        url: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// The install target already exists.
    ///
    /// A target is created by the atomic publish step; installing over an
    /// existing directory would make partial states observable.
    #[error("install target {path} already exists")]
    TargetExists {
        /// The offending target path.
        path: Utf8PathBuf,
    },

    /// The staging area could not be prepared.
    #[error("staging failed: {reason}")]
    Staging {
        /// Description of the staging failure.
        reason: String,
    },

    /// Another run holds the advisory lock for this target.
    #[error("install target is locked by another process ({path}): {reason}")]
    Locked {
        /// The lock file path.
        path: Utf8PathBuf,
        /// Description of the lock failure.
        reason: String,
    },

    /// The install record of a target could not be read or parsed.
    #[error("install record {path} is unreadable: {reason}")]
    Record {
        /// The record file path.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// Internal invariant violation: the staged set diverged from the
    /// manifest. Must never occur; presence indicates a bug, not a
    /// recoverable external condition.
    #[error("partial manifest: {reason}")]
    PartialManifest {
        /// Description of the violated invariant.
        reason: String,
    },

    /// The command line was usable by clap but semantically incomplete.
    #[error("{reason}")]
    Usage {
        /// Description of what is missing or malformed.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallError`].
pub type Result<T> = std::result::Result<T, InstallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_artifact_and_locator() {
        let err = InstallError::Fetch {
            artifact: ArtifactName::from("kubectl"),
            locator: "https://example.test/kubectl".to_owned(),
            source: FetchError::NotFound {
                url: "https://example.test/kubectl".to_owned(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("kubectl"));
        assert!(msg.contains("https://example.test/kubectl"));
    }

    #[test]
    fn digest_mismatch_names_both_digests() {
        let expected = Sha256Digest::try_from("a".repeat(64)).expect("valid digest");
        let actual = Sha256Digest::try_from("b".repeat(64)).expect("valid digest");
        let err = InstallError::DigestMismatch {
            artifact: ArtifactName::from("kind"),
            expected: expected.clone(),
            actual: actual.clone(),
        };
        let msg = err.to_string();
        assert!(msg.contains("kind"));
        assert!(msg.contains(expected.as_str()));
        assert!(msg.contains(actual.as_str()));
    }

    #[test]
    fn target_exists_names_the_path() {
        let err = InstallError::TargetExists {
            path: Utf8PathBuf::from("/opt/gantry/tools"),
        };
        assert!(err.to_string().contains("/opt/gantry/tools"));
    }
}
