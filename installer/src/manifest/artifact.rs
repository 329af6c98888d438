//! Artifact specification records.
//!
//! An [`ArtifactSpec`] is one entry of a manifest: a named, immutable record
//! naming where the artifact's bytes come from, how their integrity is
//! established, and whether the artifact survives installation.

use super::locator::LocatorTemplate;
use super::name::ArtifactName;
use super::sha256_digest::Sha256Digest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an artifact is needed only while installing or afterwards too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Needed only during installation; discarded with the staging area.
    Buildtime,
    /// Published into the install target and kept for consumers.
    Runtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buildtime => write!(f, "buildtime"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// The digest algorithm an artifact's integrity check uses.
///
/// Only SHA-256 is supported; unknown tags are rejected at manifest parse
/// time so verification can never silently pass on an algorithm this build
/// does not implement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256, the only supported algorithm.
    #[default]
    Sha256,
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Where an artifact's expected digest comes from.
///
/// Artifacts addressed through the "latest" indirection cannot pin a digest
/// ahead of time; those declare a companion locator for the vendor-published
/// sidecar checksum file instead. Either way the integrity invariant is the
/// same: fetched bytes must match the expected digest exactly before the
/// artifact may reach the install target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestSource {
    /// A digest pinned in the manifest.
    Pinned(Sha256Digest),
    /// A locator template for a sidecar checksum file fetched at install
    /// time; may embed the same version placeholders as the artifact
    /// locator.
    Companion(LocatorTemplate),
}

/// One declarative manifest entry.
///
/// Immutable once declared; the resolver and installer consume specs by
/// reference and never mutate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    /// Name, unique within the manifest.
    pub name: ArtifactName,
    /// Source locator, possibly embedding version placeholders.
    pub locator: LocatorTemplate,
    /// Where the expected digest comes from.
    pub digest: DigestSource,
    /// Digest algorithm used for verification.
    pub algorithm: DigestAlgorithm,
    /// Build-time or run-time classification.
    pub phase: Phase,
}
