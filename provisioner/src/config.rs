//! Provisioner configuration from the environment.
//!
//! The provisioner takes no flags. It reads `KUBERNETES_VERSION` and
//! `KIND_VERSION` (each defaulting to the literal token `latest` when unset
//! or empty) and `KUBECONFIG` for the cluster credentials location, once at
//! startup, into a typed configuration.

use crate::error::{ProvisionError, Result};
use camino::Utf8PathBuf;
use gantry_installer::dirs::{BaseDirs, default_target_dir};
use gantry_installer::version::VersionReference;
use std::env;
use std::fmt;

/// Environment variable selecting the Kubernetes release.
pub const KUBERNETES_VERSION_VAR: &str = "KUBERNETES_VERSION";
/// Environment variable selecting the kind release.
pub const KIND_VERSION_VAR: &str = "KIND_VERSION";
/// Environment variable naming the kubeconfig file to create.
pub const KUBECONFIG_VAR: &str = "KUBECONFIG";

/// The host platform, in the `os`/`arch` vocabulary release artifacts use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    /// Operating system segment (`linux` or `darwin`).
    pub os: &'static str,
    /// Architecture segment (`amd64` or `arm64`).
    pub arch: &'static str,
}

impl HostPlatform {
    /// Detect the host platform.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::UnsupportedHost`] when no published tool
    /// binaries exist for this host.
    pub fn detect() -> Result<Self> {
        Self::from_consts(env::consts::OS, env::consts::ARCH)
    }

    /// Map Rust's platform constants onto release artifact names.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::UnsupportedHost`] for unmapped platforms.
    pub fn from_consts(os: &str, arch: &str) -> Result<Self> {
        let os = match os {
            "linux" => "linux",
            "macos" => "darwin",
            other => {
                return Err(ProvisionError::UnsupportedHost {
                    os: other.to_owned(),
                    arch: arch.to_owned(),
                });
            }
        };
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            other => {
                return Err(ProvisionError::UnsupportedHost {
                    os: os.to_owned(),
                    arch: other.to_owned(),
                });
            }
        };
        Ok(Self { os, arch })
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// One provisioning run's configuration.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Kubernetes version selection.
    pub kubernetes_version: VersionReference,
    /// kind version selection.
    pub kind_version: VersionReference,
    /// Where the cluster credentials file is created.
    pub kubeconfig: Utf8PathBuf,
    /// Where the tool binaries are installed.
    pub target_dir: Utf8PathBuf,
    /// The host platform the tools are downloaded for.
    pub host: HostPlatform,
}

impl ProvisionConfig {
    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the host platform is unsupported or no
    /// default directory can be resolved.
    pub fn from_env(dirs: &dyn BaseDirs) -> Result<Self> {
        let kubernetes_version = version_from_env(KUBERNETES_VERSION_VAR);
        let kind_version = version_from_env(KIND_VERSION_VAR);
        let kubeconfig = kubeconfig_from_env(dirs)?;
        let target_dir = default_target_dir(dirs).ok_or_else(|| {
            ProvisionError::Io(std::io::Error::other(
                "could not determine default tool directory",
            ))
        })?;
        Ok(Self {
            kubernetes_version,
            kind_version,
            kubeconfig,
            target_dir,
            host: HostPlatform::detect()?,
        })
    }
}

/// Read a version selection from the environment; unset or empty means
/// `latest`.
fn version_from_env(var: &str) -> VersionReference {
    match env::var(var) {
        Ok(value) => VersionReference::from_token(&value),
        Err(_) => VersionReference::Latest,
    }
}

/// Resolve the kubeconfig location: `KUBECONFIG` when set, otherwise
/// `~/.kube/config-gantry`.
fn kubeconfig_from_env(dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    if let Ok(value) = env::var(KUBECONFIG_VAR)
        && !value.trim().is_empty()
    {
        return Ok(Utf8PathBuf::from(value));
    }
    let home = dirs.home_dir().ok_or_else(|| ProvisionError::Kubeconfig {
        path: Utf8PathBuf::from("~/.kube/config-gantry"),
        reason: "home directory is unknown and KUBECONFIG is unset".to_owned(),
    })?;
    Ok(home.join(".kube").join("config-gantry"))
}
