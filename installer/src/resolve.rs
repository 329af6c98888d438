//! Manifest resolution: version substitution over locator templates.
//!
//! Resolution turns a declarative manifest plus a set of version overrides
//! into concrete locators. The symbolic `latest` token is resolved through
//! a [`VersionSource`] exactly once per distinct placeholder and the same
//! concrete version is substituted everywhere that placeholder appears, so
//! one run can never observe two answers from a moving endpoint. This module
//! performs no network I/O of its own.

use crate::manifest::{ArtifactSpec, DigestSource, Manifest, Sha256Digest};
use crate::version::{LatestEndpoint, VersionReference, VersionResolutionError, VersionSource};
use std::collections::{BTreeMap, HashSet};

/// Binds a placeholder name to a version selection for one run.
#[derive(Debug, Clone)]
pub struct VersionOverride {
    /// The placeholder name as it appears in locator templates.
    pub placeholder: String,
    /// The version selection.
    pub reference: VersionReference,
    /// Endpoint to ask when the reference is `latest`. When absent, the
    /// manifest's own `[versions]` table is consulted.
    pub latest: Option<LatestEndpoint>,
}

impl VersionOverride {
    /// Bind a placeholder to a concrete tag.
    #[must_use]
    pub fn pinned(placeholder: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            reference: VersionReference::Pinned(tag.into()),
            latest: None,
        }
    }

    /// Bind a placeholder to run-time latest resolution via `endpoint`.
    #[must_use]
    pub fn latest(placeholder: impl Into<String>, endpoint: LatestEndpoint) -> Self {
        Self {
            placeholder: placeholder.into(),
            reference: VersionReference::Latest,
            latest: Some(endpoint),
        }
    }

    /// Bind a placeholder to a parsed [`VersionReference`], deferring the
    /// endpoint choice to the manifest.
    #[must_use]
    pub fn from_reference(placeholder: impl Into<String>, reference: VersionReference) -> Self {
        Self {
            placeholder: placeholder.into(),
            reference,
            latest: None,
        }
    }
}

/// The expected digest of one resolved artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedDigest {
    /// A digest pinned in the manifest.
    Pinned(Sha256Digest),
    /// A concrete URL for the sidecar checksum file to fetch at install
    /// time.
    Companion(String),
}

/// One manifest entry with its locators made concrete.
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    /// The originating specification.
    pub spec: ArtifactSpec,
    /// The concrete locator to fetch.
    pub locator: String,
    /// Where the expected digest comes from.
    pub digest: ResolvedDigest,
}

/// The outcome of resolving a manifest: concrete locators in manifest
/// order, plus the version map that produced them.
#[derive(Debug, Clone, Default)]
pub struct ResolvedManifest {
    artifacts: Vec<ResolvedArtifact>,
    versions: BTreeMap<String, String>,
}

impl ResolvedManifest {
    /// The resolved artifacts, in manifest order.
    #[must_use]
    pub fn artifacts(&self) -> &[ResolvedArtifact] {
        &self.artifacts
    }

    /// The concrete version substituted for a placeholder, if any.
    #[must_use]
    pub fn version(&self, placeholder: &str) -> Option<&str> {
        self.versions.get(placeholder).map(String::as_str)
    }

    /// The full placeholder-to-version map for this run.
    #[must_use]
    pub fn versions(&self) -> &BTreeMap<String, String> {
        &self.versions
    }
}

/// Resolve a manifest against version overrides.
///
/// Placeholders bound to concrete tags substitute verbatim. Placeholders
/// bound to `latest` are resolved through `source` once each (memoized for
/// the whole run). Overrides whose placeholder is referenced by no locator
/// are ignored without any resolution call. Templates with no applicable
/// override pass through unchanged.
///
/// # Errors
///
/// Returns an error when the same placeholder is bound twice, when a
/// `latest` binding has no endpoint (neither on the override nor in the
/// manifest), or when the endpoint query fails.
pub fn resolve<S: VersionSource + ?Sized>(
    manifest: &Manifest,
    overrides: &[VersionOverride],
    source: &S,
) -> Result<ResolvedManifest, VersionResolutionError> {
    let mut bound = HashSet::new();
    for binding in overrides {
        if !bound.insert(binding.placeholder.as_str()) {
            return Err(VersionResolutionError::DuplicateOverride {
                placeholder: binding.placeholder.clone(),
            });
        }
    }

    let referenced = referenced_placeholders(manifest);
    let mut versions = BTreeMap::new();
    for binding in overrides {
        if !referenced.contains(binding.placeholder.as_str()) {
            log::debug!(
                "placeholder \"{}\" is not referenced by any locator; skipping",
                binding.placeholder
            );
            continue;
        }
        let concrete = match &binding.reference {
            VersionReference::Pinned(tag) => tag.clone(),
            VersionReference::Latest => {
                let endpoint = binding
                    .latest
                    .as_ref()
                    .or_else(|| manifest.endpoint(&binding.placeholder))
                    .ok_or_else(|| VersionResolutionError::MissingEndpoint {
                        placeholder: binding.placeholder.clone(),
                    })?;
                source.resolve_latest(endpoint)?
            }
        };
        versions.insert(binding.placeholder.clone(), concrete);
    }

    let artifacts = manifest
        .artifacts()
        .iter()
        .map(|spec| ResolvedArtifact {
            locator: spec.locator.substitute(&versions),
            digest: match &spec.digest {
                DigestSource::Pinned(digest) => ResolvedDigest::Pinned(digest.clone()),
                DigestSource::Companion(template) => {
                    ResolvedDigest::Companion(template.substitute(&versions))
                }
            },
            spec: spec.clone(),
        })
        .collect();

    Ok(ResolvedManifest {
        artifacts,
        versions,
    })
}

/// Collect every placeholder referenced by any locator in the manifest,
/// including companion digest locators.
fn referenced_placeholders(manifest: &Manifest) -> HashSet<String> {
    let mut referenced = HashSet::new();
    for spec in manifest.artifacts() {
        for name in spec.locator.placeholders() {
            referenced.insert(name.to_owned());
        }
        if let DigestSource::Companion(template) = &spec.digest {
            for name in template.placeholders() {
                referenced.insert(name.to_owned());
            }
        }
    }
    referenced
}
