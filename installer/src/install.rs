//! Installation orchestration: resolve, fetch, verify, publish.
//!
//! An installation run is all-or-nothing. Artifacts are fetched into a
//! staging directory and verified there; only after every artifact in the
//! manifest has passed verification is the staged set made visible, with a
//! single atomic rename onto the install target. If any step fails for any
//! artifact, the whole operation fails and the target is left exactly as it
//! was before the call.

use crate::digest::{self, DigestError};
use crate::error::{InstallError, Result};
use crate::fetch::ArtifactFetcher;
use crate::manifest::{ArtifactName, Manifest, Phase, Sha256Digest};
use crate::record::{InstallRecord, RecordedArtifact};
use crate::resolve::{ResolvedArtifact, ResolvedDigest, VersionOverride, resolve};
use crate::stage::{Stager, mark_executable};
use crate::version::FetcherVersionSource;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use std::collections::BTreeMap;

/// One artifact after successful installation.
#[derive(Debug, Clone, Serialize)]
pub struct InstalledArtifact {
    /// The manifest-declared name.
    pub name: ArtifactName,
    /// Build-time or run-time classification.
    pub phase: Phase,
    /// The concrete locator the bytes came from.
    pub locator: String,
    /// The verified digest of the fetched bytes.
    pub sha256: Sha256Digest,
    /// The installed path; `None` for buildtime artifacts, which are
    /// verified and then discarded with the staging area.
    pub path: Option<Utf8PathBuf>,
}

/// The successful outcome of an installation run.
#[derive(Debug, Clone, Serialize)]
pub struct InstalledSet {
    /// The populated install target.
    pub target: Utf8PathBuf,
    /// Every manifest artifact, in manifest order.
    pub artifacts: Vec<InstalledArtifact>,
    /// The placeholder-to-version map the run resolved, for callers that
    /// pass resolved versions on to later commands.
    pub versions: BTreeMap<String, String>,
}

impl InstalledSet {
    /// The installed path of a runtime artifact, by name.
    #[must_use]
    pub fn path_of(&self, name: &str) -> Option<&Utf8Path> {
        self.artifacts
            .iter()
            .find(|a| a.name.as_str() == name)
            .and_then(|a| a.path.as_deref())
    }
}

/// Fetch, verify, and atomically install every artifact of a manifest.
///
/// The target must not yet exist; it is created by the final rename. On any
/// failure the target is untouched and the staging area is discarded.
/// Runtime artifacts are published into the target (and marked executable
/// on Unix); buildtime artifacts are verified, reported, and discarded.
///
/// # Errors
///
/// Returns the first failure encountered, wrapped with the identity of the
/// artifact being processed: version resolution, fetch, digest mismatch,
/// staging, or publication. A pre-existing target fails before any network
/// I/O is performed.
pub fn install(
    manifest: &Manifest,
    target: &Utf8Path,
    overrides: &[VersionOverride],
    fetcher: &dyn ArtifactFetcher,
) -> Result<InstalledSet> {
    if target.symlink_metadata().is_ok() {
        return Err(InstallError::TargetExists {
            path: target.to_owned(),
        });
    }

    let resolved = resolve(manifest, overrides, &FetcherVersionSource::new(fetcher))?;
    let stager = Stager::prepare(target)?;

    let mut installed = Vec::with_capacity(resolved.artifacts().len());
    for artifact in resolved.artifacts() {
        installed.push(stage_one(artifact, &stager, target, fetcher)?);
    }

    if installed.len() != manifest.len() {
        return Err(InstallError::PartialManifest {
            reason: format!(
                "staged {} artifacts for a manifest of {}",
                installed.len(),
                manifest.len()
            ),
        });
    }

    for artifact in &installed {
        if artifact.phase == Phase::Buildtime {
            stager.discard(&artifact.name)?;
        }
    }

    runtime_record(&installed).write_to(stager.path())?;
    stager.publish(target)?;
    log::debug!("installed {} artifacts into {target}", installed.len());

    Ok(InstalledSet {
        target: target.to_owned(),
        artifacts: installed,
        versions: resolved.versions().clone(),
    })
}

/// Fetch and verify one resolved artifact into the staging directory.
fn stage_one(
    artifact: &ResolvedArtifact,
    stager: &Stager,
    target: &Utf8Path,
    fetcher: &dyn ArtifactFetcher,
) -> Result<InstalledArtifact> {
    let name = &artifact.spec.name;
    let dest = stager.dest_for(name);
    log::debug!("fetching {name} from {}", artifact.locator);
    fetcher
        .fetch_to_file(&artifact.locator, &dest)
        .map_err(|source| InstallError::Fetch {
            artifact: name.clone(),
            locator: artifact.locator.clone(),
            source,
        })?;

    let expected = expected_digest(artifact, fetcher)?;
    match digest::verify_file(&dest, &expected) {
        Ok(()) => {}
        Err(DigestError::Mismatch { expected, actual }) => {
            return Err(InstallError::DigestMismatch {
                artifact: name.clone(),
                expected,
                actual,
            });
        }
        Err(DigestError::Io(e)) => return Err(InstallError::Io(e)),
    }

    let path = match artifact.spec.phase {
        Phase::Runtime => {
            mark_executable(&dest)?;
            Some(target.join(name.as_str()))
        }
        Phase::Buildtime => None,
    };

    Ok(InstalledArtifact {
        name: name.clone(),
        phase: artifact.spec.phase,
        locator: artifact.locator.clone(),
        sha256: expected,
        path,
    })
}

/// Determine the expected digest for one resolved artifact, fetching the
/// companion checksum when the manifest did not pin one.
fn expected_digest(
    artifact: &ResolvedArtifact,
    fetcher: &dyn ArtifactFetcher,
) -> Result<Sha256Digest> {
    let name = &artifact.spec.name;
    match &artifact.digest {
        ResolvedDigest::Pinned(digest) => Ok(digest.clone()),
        ResolvedDigest::Companion(url) => {
            let body = fetcher
                .fetch_text(url)
                .map_err(|source| InstallError::Fetch {
                    artifact: name.clone(),
                    locator: url.clone(),
                    source,
                })?;
            Sha256Digest::from_checksum_body(&body).map_err(|e| InstallError::CompanionDigest {
                artifact: name.clone(),
                url: url.clone(),
                reason: e.to_string(),
            })
        }
    }
}

/// Build the install record for the runtime subset of the installed set.
fn runtime_record(installed: &[InstalledArtifact]) -> InstallRecord {
    InstallRecord {
        artifacts: installed
            .iter()
            .filter(|a| a.phase == Phase::Runtime)
            .map(|a| RecordedArtifact {
                name: a.name.clone(),
                locator: a.locator.clone(),
                sha256: a.sha256.clone(),
            })
            .collect(),
    }
}
