//! The manifest document: an ordered list of artifact specifications.
//!
//! Order is preserved from declaration through resolution and installation
//! so diagnostics stay reproducible run to run.

use super::artifact::ArtifactSpec;
use super::error::{ManifestError, Result};
use super::parser::parse_manifest;
use crate::version::LatestEndpoint;
use camino::Utf8Path;
use std::collections::{BTreeMap, HashSet};

/// An ordered, validated collection of artifact specifications, plus the
/// version-resolution endpoints its placeholders may use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    artifacts: Vec<ArtifactSpec>,
    endpoints: BTreeMap<String, LatestEndpoint>,
}

impl Manifest {
    /// Build a manifest from artifact specifications.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::DuplicateName`] when two artifacts share a
    /// name.
    pub fn new(artifacts: Vec<ArtifactSpec>) -> Result<Self> {
        Self::with_endpoints(artifacts, BTreeMap::new())
    }

    /// Build a manifest with latest-resolution endpoints for placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::DuplicateName`] when two artifacts share a
    /// name.
    pub fn with_endpoints(
        artifacts: Vec<ArtifactSpec>,
        endpoints: BTreeMap<String, LatestEndpoint>,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &artifacts {
            if !seen.insert(spec.name.as_str().to_owned()) {
                return Err(ManifestError::DuplicateName {
                    name: spec.name.as_str().to_owned(),
                });
            }
        }
        Ok(Self {
            artifacts,
            endpoints,
        })
    }

    /// Parse a manifest from its TOML representation.
    ///
    /// # Errors
    ///
    /// Returns an error when the document is malformed or any artifact
    /// fails validation.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        parse_manifest(document)
    }

    /// Load and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Read`] when the file cannot be read, or a
    /// parse error when its content is invalid.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let document =
            std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_toml_str(&document)
    }

    /// The artifact specifications, in declaration order.
    #[must_use]
    pub fn artifacts(&self) -> &[ArtifactSpec] {
        &self.artifacts
    }

    /// The latest-resolution endpoint declared for a placeholder, if any.
    #[must_use]
    pub fn endpoint(&self, placeholder: &str) -> Option<&LatestEndpoint> {
        self.endpoints.get(placeholder)
    }

    /// All declared latest-resolution endpoints, keyed by placeholder.
    #[must_use]
    pub fn endpoints(&self) -> &BTreeMap<String, LatestEndpoint> {
        &self.endpoints
    }

    /// Number of artifacts in the manifest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the manifest declares no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::artifact::{DigestAlgorithm, DigestSource, Phase};
    use crate::manifest::locator::LocatorTemplate;
    use crate::manifest::name::ArtifactName;
    use crate::manifest::sha256_digest::Sha256Digest;

    fn spec(name: &str) -> ArtifactSpec {
        ArtifactSpec {
            name: ArtifactName::from(name),
            locator: LocatorTemplate::new("https://example.test/a"),
            digest: DigestSource::Pinned(
                Sha256Digest::try_from("a".repeat(64)).expect("valid digest"),
            ),
            algorithm: DigestAlgorithm::Sha256,
            phase: Phase::Runtime,
        }
    }

    #[test]
    fn preserves_declaration_order() {
        let manifest =
            Manifest::new(vec![spec("b"), spec("a"), spec("c")]).expect("valid manifest");
        let names: Vec<&str> = manifest
            .artifacts()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = Manifest::new(vec![spec("a"), spec("a")]);
        assert!(matches!(
            result,
            Err(ManifestError::DuplicateName { name }) if name == "a"
        ));
    }

    #[test]
    fn empty_manifest_is_empty() {
        let manifest = Manifest::new(Vec::new()).expect("valid manifest");
        assert!(manifest.is_empty());
        assert_eq!(manifest.len(), 0);
    }
}
