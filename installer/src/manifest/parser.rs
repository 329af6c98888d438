//! Manifest deserialization from TOML.
//!
//! Parses the declarative artifact list into a validated [`Manifest`].
//! Structural validation (digest shape, duplicate names, exactly one digest
//! source, supported algorithm) runs at parse time so later stages only see
//! well-formed specifications.

use super::artifact::{ArtifactSpec, DigestAlgorithm, DigestSource, Phase};
use super::document::Manifest;
use super::error::{ManifestError, Result};
use super::locator::LocatorTemplate;
use super::name::ArtifactName;
use super::sha256_digest::Sha256Digest;
use crate::version::LatestEndpoint;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw manifest document as written on disk.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    /// The ordered artifact list.
    #[serde(default)]
    artifact: Vec<RawArtifact>,
    /// Latest-resolution endpoints keyed by placeholder name.
    #[serde(default)]
    versions: BTreeMap<String, LatestEndpoint>,
}

/// One raw `[[artifact]]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawArtifact {
    name: String,
    locator: String,
    sha256: Option<String>,
    digest_url: Option<String>,
    algorithm: Option<String>,
    phase: Phase,
}

/// Parse a TOML document into a validated [`Manifest`].
///
/// # Errors
///
/// Returns an error when the TOML is malformed, an artifact declares an
/// unsupported algorithm, declares both or neither of `sha256` and
/// `digest-url`, carries an invalid digest, or reuses a name.
///
/// # Examples
///
/// ```
/// use gantry_installer::manifest::parser::parse_manifest;
///
/// let document = r#"
/// [[artifact]]
/// name = "kubectl"
/// locator = "https://dl.k8s.io/release/{version}/bin/linux/amd64/kubectl"
/// digest-url = "https://dl.k8s.io/release/{version}/bin/linux/amd64/kubectl.sha256"
/// phase = "runtime"
/// "#;
/// let manifest = parse_manifest(document).expect("valid manifest");
/// assert_eq!(manifest.len(), 1);
/// ```
pub fn parse_manifest(document: &str) -> Result<Manifest> {
    let raw: RawManifest = toml::from_str(document).map_err(|e| ManifestError::Parse {
        reason: e.to_string(),
    })?;
    let artifacts = raw
        .artifact
        .into_iter()
        .map(validate_artifact)
        .collect::<Result<Vec<_>>>()?;
    Manifest::with_endpoints(artifacts, raw.versions)
}

/// Validate one raw artifact table into an [`ArtifactSpec`].
fn validate_artifact(raw: RawArtifact) -> Result<ArtifactSpec> {
    let algorithm = validate_algorithm(&raw.name, raw.algorithm.as_deref())?;
    let digest = match (raw.sha256, raw.digest_url) {
        (Some(hex), None) => DigestSource::Pinned(Sha256Digest::try_from(hex)?),
        (None, Some(url)) => DigestSource::Companion(LocatorTemplate::new(url)),
        (Some(_), Some(_)) => {
            return Err(ManifestError::ConflictingDigestSource { name: raw.name });
        }
        (None, None) => return Err(ManifestError::MissingDigestSource { name: raw.name }),
    };
    Ok(ArtifactSpec {
        name: ArtifactName::from(raw.name),
        locator: LocatorTemplate::new(raw.locator),
        digest,
        algorithm,
        phase: raw.phase,
    })
}

/// Reject any digest algorithm this build does not implement.
fn validate_algorithm(name: &str, tag: Option<&str>) -> Result<DigestAlgorithm> {
    match tag {
        None | Some("sha256") => Ok(DigestAlgorithm::Sha256),
        Some(other) => Err(ManifestError::UnsupportedAlgorithm {
            name: name.to_owned(),
            algorithm: other.to_owned(),
        }),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
