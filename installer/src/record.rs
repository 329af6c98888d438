//! The install record published alongside installed artifacts.
//!
//! Each successful installation stages a small JSON file naming the runtime
//! artifacts the target was populated with. The record rides the same
//! atomic rename as the artifacts themselves, so a target either has a
//! complete record or none at all. The `list` command reads it back.

use crate::error::{InstallError, Result};
use crate::manifest::{ArtifactName, Sha256Digest};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name of the install record inside a target directory.
pub const RECORD_FILE_NAME: &str = ".gantry-install.json";

/// One recorded artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedArtifact {
    /// The manifest-declared artifact name (also the installed file name).
    pub name: ArtifactName,
    /// The concrete locator the artifact was fetched from.
    pub locator: String,
    /// The verified SHA-256 digest of the installed bytes.
    pub sha256: Sha256Digest,
}

/// The record of what one installation run published.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstallRecord {
    /// Runtime artifacts, in manifest order.
    pub artifacts: Vec<RecordedArtifact>,
}

impl InstallRecord {
    /// Write the record into a directory (normally the staging directory,
    /// just before publication).
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the file write fails.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let body = serde_json::to_string_pretty(self).map_err(|e| InstallError::Record {
            path: Utf8Path::new(RECORD_FILE_NAME).to_owned(),
            reason: e.to_string(),
        })?;
        fs::write(dir.join(RECORD_FILE_NAME), body)?;
        Ok(())
    }

    /// Load the record from an installed target directory.
    ///
    /// # Errors
    ///
    /// Returns [`InstallError::Record`] when the record is absent,
    /// unreadable, or not valid JSON.
    pub fn load(target: &Utf8Path) -> Result<Self> {
        let path = target.join(RECORD_FILE_NAME);
        let body = fs::read_to_string(&path).map_err(|e| InstallError::Record {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| InstallError::Record {
            path,
            reason: e.to_string(),
        })
    }
}
