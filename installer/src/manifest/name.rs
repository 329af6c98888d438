//! Semantic wrapper for artifact names.
//!
//! This module provides the [`ArtifactName`] newtype for type-safe handling
//! of artifact names throughout the installer. Names are unique within a
//! manifest; uniqueness is enforced by the manifest parser, not by this type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The name of a single artifact in a manifest.
///
/// This newtype wrapper ensures artifact identities are passed explicitly
/// rather than as raw strings, so error messages and install records always
/// carry the manifest-declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Create a new artifact name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the artifact name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ArtifactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArtifactName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ArtifactName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
