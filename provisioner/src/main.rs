//! Gantry cluster provisioner entrypoint.
//!
//! Installs kubectl and kind (verified against vendor checksums) and brings
//! up a local kind cluster. Configuration comes from the environment:
//! `KUBERNETES_VERSION` and `KIND_VERSION` default to `latest`, and
//! `KUBECONFIG` names the credentials file to create. Exits nonzero on any
//! fetch, verify, install, or bring-up failure.

use gantry_installer::dirs::SystemBaseDirs;
use gantry_installer::fetch::HttpFetcher;
use gantry_installer::output::write_stderr_line;
use gantry_provision::cluster::SystemCommandExecutor;
use gantry_provision::config::ProvisionConfig;
use gantry_provision::error::{ProvisionError, Result};
use gantry_provision::provision::provision;
use std::io::Write;

fn main() {
    let mut stderr = std::io::stderr();
    let exit_code = match run(&mut stderr) {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(&mut stderr, &err);
            exit_code_for(&err)
        }
    };
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(stderr: &mut dyn Write) -> Result<()> {
    let config = ProvisionConfig::from_env(&SystemBaseDirs)?;
    provision(&config, &HttpFetcher, &SystemCommandExecutor, stderr)
}

/// Map a failure to the process exit code, propagating the bring-up
/// command's own status when it ran to completion.
fn exit_code_for(err: &ProvisionError) -> i32 {
    match err {
        ProvisionError::BringUp {
            status: Some(code), ..
        } if *code != 0 => *code,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bring_up_status_propagates() {
        let err = ProvisionError::BringUp {
            command: "kind create cluster".to_owned(),
            reason: "exited with status 3".to_owned(),
            status: Some(3),
        };
        assert_eq!(exit_code_for(&err), 3);
    }

    #[test]
    fn other_failures_exit_one() {
        let err = ProvisionError::UnsupportedHost {
            os: "plan9".to_owned(),
            arch: "mips".to_owned(),
        };
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn timed_out_bring_up_exits_one() {
        let err = ProvisionError::BringUp {
            command: "kind create cluster".to_owned(),
            reason: "timed out".to_owned(),
            status: None,
        };
        assert_eq!(exit_code_for(&err), 1);
    }
}
