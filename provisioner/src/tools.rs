//! The fixed tool manifest: kubectl and kind.
//!
//! The provisioner installs exactly two runtime tools. Both publish sidecar
//! checksum files next to their release binaries, so integrity is enforced
//! even when the version is only known after `latest` resolution: kubectl
//! through the Kubernetes release CDN (`.sha256`), kind through its GitHub
//! release assets (`.sha256sum`).

use crate::config::{HostPlatform, ProvisionConfig};
use gantry_installer::manifest::{
    ArtifactName, ArtifactSpec, DigestAlgorithm, DigestSource, LocatorTemplate, Manifest,
    ManifestError, Phase,
};
use gantry_installer::resolve::VersionOverride;
use gantry_installer::version::LatestEndpoint;

/// Placeholder bound to the Kubernetes release tag.
pub const KUBERNETES_PLACEHOLDER: &str = "kubernetes-version";
/// Placeholder bound to the kind release tag.
pub const KIND_PLACEHOLDER: &str = "kind-version";

/// Installed name of the Kubernetes CLI.
pub const KUBECTL: &str = "kubectl";
/// Installed name of the kind CLI.
pub const KIND: &str = "kind";

/// Plain-text endpoint answering the current stable Kubernetes version.
const KUBERNETES_STABLE_URL: &str = "https://dl.k8s.io/release/stable.txt";
/// Redirecting endpoint whose target names the latest kind release tag.
const KIND_LATEST_URL: &str = "https://github.com/kubernetes-sigs/kind/releases/latest";

/// Build the two-tool manifest for the given host.
///
/// # Errors
///
/// Never fails in practice; the error type is inherited from manifest
/// validation.
pub fn tool_manifest(host: &HostPlatform) -> Result<Manifest, ManifestError> {
    let kubectl_base = format!(
        "https://dl.k8s.io/release/{{{KUBERNETES_PLACEHOLDER}}}/bin/{os}/{arch}/kubectl",
        os = host.os,
        arch = host.arch
    );
    let kind_base = format!(
        "https://github.com/kubernetes-sigs/kind/releases/download/{{{KIND_PLACEHOLDER}}}/kind-{os}-{arch}",
        os = host.os,
        arch = host.arch
    );
    Manifest::new(vec![
        ArtifactSpec {
            name: ArtifactName::from(KUBECTL),
            locator: LocatorTemplate::new(kubectl_base.clone()),
            digest: DigestSource::Companion(LocatorTemplate::new(format!(
                "{kubectl_base}.sha256"
            ))),
            algorithm: DigestAlgorithm::Sha256,
            phase: Phase::Runtime,
        },
        ArtifactSpec {
            name: ArtifactName::from(KIND),
            locator: LocatorTemplate::new(kind_base.clone()),
            digest: DigestSource::Companion(LocatorTemplate::new(format!(
                "{kind_base}.sha256sum"
            ))),
            algorithm: DigestAlgorithm::Sha256,
            phase: Phase::Runtime,
        },
    ])
}

/// Build the run's version overrides from the configured selections.
#[must_use]
pub fn version_overrides(config: &ProvisionConfig) -> Vec<VersionOverride> {
    vec![
        VersionOverride {
            placeholder: KUBERNETES_PLACEHOLDER.to_owned(),
            reference: config.kubernetes_version.clone(),
            latest: Some(LatestEndpoint::StableText(KUBERNETES_STABLE_URL.to_owned())),
        },
        VersionOverride {
            placeholder: KIND_PLACEHOLDER.to_owned(),
            reference: config.kind_version.clone(),
            latest: Some(LatestEndpoint::ReleaseRedirect(KIND_LATEST_URL.to_owned())),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use gantry_installer::version::VersionReference;

    fn host() -> HostPlatform {
        HostPlatform::from_consts("linux", "x86_64").expect("supported host")
    }

    fn config() -> ProvisionConfig {
        ProvisionConfig {
            kubernetes_version: VersionReference::Latest,
            kind_version: VersionReference::Pinned("v0.23.0".to_owned()),
            kubeconfig: Utf8PathBuf::from("/home/ci/.kube/config-gantry"),
            target_dir: Utf8PathBuf::from("/home/ci/.local/share/gantry/tools"),
            host: host(),
        }
    }

    #[test]
    fn manifest_declares_exactly_two_runtime_tools() {
        let manifest = tool_manifest(&host()).expect("manifest");
        assert_eq!(manifest.len(), 2);
        assert!(
            manifest
                .artifacts()
                .iter()
                .all(|spec| spec.phase == Phase::Runtime)
        );
    }

    #[test]
    fn kubectl_locator_embeds_host_platform_and_placeholder() {
        let manifest = tool_manifest(&host()).expect("manifest");
        let kubectl = &manifest.artifacts()[0];
        assert_eq!(kubectl.name.as_str(), KUBECTL);
        assert_eq!(
            kubectl.locator.as_str(),
            "https://dl.k8s.io/release/{kubernetes-version}/bin/linux/amd64/kubectl"
        );
        assert!(matches!(
            &kubectl.digest,
            DigestSource::Companion(template)
                if template.as_str().ends_with("kubectl.sha256")
        ));
    }

    #[test]
    fn kind_locator_uses_github_release_assets() {
        let manifest = tool_manifest(&host()).expect("manifest");
        let kind = &manifest.artifacts()[1];
        assert_eq!(kind.name.as_str(), KIND);
        assert_eq!(
            kind.locator.as_str(),
            "https://github.com/kubernetes-sigs/kind/releases/download/{kind-version}/kind-linux-amd64"
        );
        assert!(matches!(
            &kind.digest,
            DigestSource::Companion(template)
                if template.as_str().ends_with(".sha256sum")
        ));
    }

    #[test]
    fn overrides_pair_each_placeholder_with_its_endpoint() {
        let overrides = version_overrides(&config());
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides[0].placeholder, KUBERNETES_PLACEHOLDER);
        assert!(overrides[0].reference.is_latest());
        assert!(matches!(
            overrides[0].latest,
            Some(LatestEndpoint::StableText(_))
        ));
        assert_eq!(overrides[1].placeholder, KIND_PLACEHOLDER);
        assert_eq!(
            overrides[1].reference,
            VersionReference::Pinned("v0.23.0".to_owned())
        );
        assert!(matches!(
            overrides[1].latest,
            Some(LatestEndpoint::ReleaseRedirect(_))
        ));
    }
}
