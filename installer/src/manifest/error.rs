//! Error types for manifest parsing and validation.
//!
//! Each variant provides a descriptive message identifying the invalid input
//! and the constraint that was violated.

use thiserror::Error;

/// Errors arising from invalid manifest content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {reason}")]
    Read {
        /// Path that was being read.
        path: String,
        /// Description of the I/O failure.
        reason: String,
    },

    /// The manifest document is not valid TOML or has the wrong shape.
    #[error("manifest parse error: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },

    /// Two artifacts share a name; names must be unique within a manifest.
    #[error("duplicate artifact name \"{name}\"")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// An artifact declares neither a pinned digest nor a digest locator.
    #[error("artifact \"{name}\" must declare exactly one of `sha256` or `digest-url`")]
    MissingDigestSource {
        /// The offending artifact.
        name: String,
    },

    /// An artifact declares both a pinned digest and a digest locator.
    #[error("artifact \"{name}\" declares both `sha256` and `digest-url`; pick one")]
    ConflictingDigestSource {
        /// The offending artifact.
        name: String,
    },

    /// An artifact requests a digest algorithm this build does not support.
    #[error("artifact \"{name}\" uses unsupported digest algorithm \"{algorithm}\"")]
    UnsupportedAlgorithm {
        /// The offending artifact.
        name: String,
        /// The rejected algorithm tag.
        algorithm: String,
    },

    /// A SHA-256 digest is not a valid 64-character lowercase hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
