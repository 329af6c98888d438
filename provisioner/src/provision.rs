//! The provisioning sequence: install both tools, then one bring-up.
//!
//! Strictly sequential with no internal state machine: resolve-and-install
//! kubectl and kind in one atomic run, then invoke the bring-up command
//! once. Any failure in the install step aborts before the bring-up
//! command runs.

use crate::cluster::{CommandExecutor, bring_up, node_image};
use crate::config::ProvisionConfig;
use crate::error::{ProvisionError, Result};
use crate::tools::{KIND, KUBERNETES_PLACEHOLDER, tool_manifest, version_overrides};
use camino::Utf8Path;
use gantry_installer::error::InstallError;
use gantry_installer::fetch::ArtifactFetcher;
use gantry_installer::install::install;
use gantry_installer::lock::TargetLock;
use gantry_installer::output::{success_message, write_stderr_line};
use gantry_installer::record::InstallRecord;
use std::fs;
use std::io::Write;

/// Provision a local test cluster: install the tools, bring up kind.
///
/// # Errors
///
/// Returns the first failing step's error: host/manifest preparation, tool
/// installation (the target is then untouched), or cluster bring-up.
pub fn provision(
    config: &ProvisionConfig,
    fetcher: &dyn ArtifactFetcher,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<()> {
    let manifest = tool_manifest(&config.host).map_err(InstallError::Manifest)?;
    let overrides = version_overrides(config);

    prepare_kubeconfig(&config.kubeconfig)?;
    let _lock = TargetLock::acquire(&config.target_dir)?;
    replace_previous_install(&config.target_dir)?;

    write_stderr_line(
        stderr,
        format!("Installing cluster tools to {}...", config.target_dir),
    );
    let installed = install(&manifest, &config.target_dir, &overrides, fetcher)?;
    write_stderr_line(
        stderr,
        success_message(installed.artifacts.len(), &config.target_dir),
    );

    let kind_path = installed.path_of(KIND).ok_or_else(|| {
        ProvisionError::Install(InstallError::PartialManifest {
            reason: "kind missing from the installed set".to_owned(),
        })
    })?;
    let kubernetes_version = installed
        .versions
        .get(KUBERNETES_PLACEHOLDER)
        .ok_or_else(|| {
            ProvisionError::Install(InstallError::PartialManifest {
                reason: "no Kubernetes version was resolved".to_owned(),
            })
        })?;

    write_stderr_line(
        stderr,
        format!(
            "Creating kind cluster (node image {})...",
            node_image(kubernetes_version)
        ),
    );
    bring_up(executor, kind_path, kubernetes_version, &config.kubeconfig)?;
    write_stderr_line(stderr, "Cluster is up.");
    Ok(())
}

/// Ensure the kubeconfig file exists and is writable before kind runs.
fn prepare_kubeconfig(path: &Utf8Path) -> Result<()> {
    let prepare = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path.as_std_path())?;
        Ok(())
    };
    prepare().map_err(|e| ProvisionError::Kubeconfig {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}

/// Remove a target left by a previous run, refusing to touch directories
/// this tool did not populate.
fn replace_previous_install(target: &Utf8Path) -> Result<()> {
    if target.symlink_metadata().is_err() {
        return Ok(());
    }
    if InstallRecord::load(target).is_err() {
        return Err(ProvisionError::ForeignTarget {
            path: target.to_owned(),
        });
    }
    log::debug!("removing previous install at {target}");
    fs::remove_dir_all(target.as_std_path())?;
    Ok(())
}
