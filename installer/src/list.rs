//! Listing of installed artifacts.
//!
//! Reads the install record a previous run published into a target and
//! renders it for humans or for scripting.

use crate::error::Result;
use crate::record::InstallRecord;
use camino::Utf8Path;
use log::trace;

/// Render the record as human-readable text.
#[must_use]
pub fn render_text(record: &InstallRecord, target: &Utf8Path) -> String {
    trace!("rendering {} artifacts from {target}", record.artifacts.len());
    if record.artifacts.is_empty() {
        return format!("No artifacts installed in {target}");
    }
    let mut lines = vec![format!("Artifacts installed in {target}:")];
    for artifact in &record.artifacts {
        lines.push(format!("  {}  sha256:{}", artifact.name, artifact.sha256));
    }
    lines.join("\n")
}

/// Render the record as JSON for scripting.
///
/// # Errors
///
/// Returns an error when serialization fails.
pub fn render_json(record: &InstallRecord) -> Result<String> {
    serde_json::to_string_pretty(record).map_err(|e| crate::error::InstallError::Record {
        path: Utf8Path::new(crate::record::RECORD_FILE_NAME).to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ArtifactName, Sha256Digest};
    use crate::record::RecordedArtifact;
    use camino::Utf8PathBuf;

    fn record() -> InstallRecord {
        InstallRecord {
            artifacts: vec![
                RecordedArtifact {
                    name: ArtifactName::from("kubectl"),
                    locator: "https://example.test/kubectl".to_owned(),
                    sha256: Sha256Digest::try_from("a".repeat(64)).expect("valid digest"),
                },
                RecordedArtifact {
                    name: ArtifactName::from("kind"),
                    locator: "https://example.test/kind".to_owned(),
                    sha256: Sha256Digest::try_from("b".repeat(64)).expect("valid digest"),
                },
            ],
        }
    }

    #[test]
    fn text_lists_names_in_record_order() {
        let target = Utf8PathBuf::from("/opt/tools");
        let text = render_text(&record(), &target);
        let kubectl = text.find("kubectl").expect("kubectl listed");
        let kind = text.find("kind").expect("kind listed");
        assert!(kubectl < kind);
        assert!(text.contains("/opt/tools"));
    }

    #[test]
    fn text_reports_empty_targets() {
        let target = Utf8PathBuf::from("/opt/tools");
        let text = render_text(&InstallRecord::default(), &target);
        assert!(text.contains("No artifacts"));
    }

    #[test]
    fn json_round_trips() {
        let json = render_json(&record()).expect("render json");
        let parsed: InstallRecord = serde_json::from_str(&json).expect("parse json");
        assert_eq!(parsed, record());
    }
}
