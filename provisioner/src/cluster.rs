//! Cluster bring-up through the installed kind binary.
//!
//! The provisioner issues exactly one external command after a successful
//! tool install: `kind create cluster`, with the resolved Kubernetes
//! version passed through as the node image tag and `KUBECONFIG` pointing
//! at the configured credentials file. The command runs under a timeout to
//! prevent hangs on stuck container runtimes.

use crate::error::{ProvisionError, Result};
use camino::Utf8Path;
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Timeout for the bring-up command (10 minutes).
const BRING_UP_TIMEOUT: Duration = Duration::from_secs(600);

/// How long kind itself waits for the control plane before giving up.
const CONTROL_PLANE_WAIT: &str = "5m";

/// Abstraction for running external commands with an environment.
pub trait CommandExecutor {
    /// Runs a command with arguments and extra environment variables,
    /// returning the captured output.
    ///
    /// # Errors
    ///
    /// Returns any error encountered while spawning or running the
    /// command, including a timeout.
    fn run(&self, cmd: &str, args: &[&str], envs: &[(&str, &str)]) -> Result<Output>;
}

/// Executes commands on the host system with a hang timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
        let mut command = Command::new(cmd);
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in envs {
            command.env(key, value);
        }

        let mut child = command.spawn()?;
        match child.wait_timeout(BRING_UP_TIMEOUT)? {
            Some(status) => {
                let stdout = child
                    .stdout
                    .take()
                    .map(std::io::read_to_string)
                    .transpose()?
                    .unwrap_or_default();
                let stderr = child
                    .stderr
                    .take()
                    .map(std::io::read_to_string)
                    .transpose()?
                    .unwrap_or_default();
                Ok(Output {
                    status,
                    stdout: stdout.into_bytes(),
                    stderr: stderr.into_bytes(),
                })
            }
            None => {
                let _ = child.kill();
                let _ = child.wait();
                Err(ProvisionError::BringUp {
                    command: cmd.to_owned(),
                    reason: format!(
                        "timed out after {} seconds",
                        BRING_UP_TIMEOUT.as_secs()
                    ),
                    status: None,
                })
            }
        }
    }
}

/// Bring up a kind cluster with the installed binary.
///
/// Issues one `kind create cluster` invocation, tagging the node image with
/// the resolved Kubernetes version and exporting `KUBECONFIG`.
///
/// # Errors
///
/// Returns [`ProvisionError::BringUp`] when the command cannot be run or
/// exits nonzero.
pub fn bring_up(
    executor: &dyn CommandExecutor,
    kind_path: &Utf8Path,
    kubernetes_version: &str,
    kubeconfig: &Utf8Path,
) -> Result<()> {
    let image = node_image(kubernetes_version);
    let args = [
        "create",
        "cluster",
        "--wait",
        CONTROL_PLANE_WAIT,
        "--image",
        image.as_str(),
    ];
    log::debug!("bringing up cluster with {kind_path} {args:?}");
    let output = executor.run(
        kind_path.as_str(),
        &args,
        &[("KUBECONFIG", kubeconfig.as_str())],
    )?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProvisionError::BringUp {
            command: format!("{kind_path} create cluster"),
            reason: stderr.trim().to_owned(),
            status: output.status.code(),
        });
    }
    Ok(())
}

/// The kindest/node image tag for a Kubernetes version.
#[must_use]
pub fn node_image(kubernetes_version: &str) -> String {
    format!("kindest/node:{kubernetes_version}")
}

/// Test support: canned command execution without touching the system.
#[cfg(any(test, feature = "test-support"))]
pub mod stub {
    use super::{CommandExecutor, Output, Result};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::process::ExitStatus;

    /// Creates an `ExitStatus` from an exit code (Unix implementation).
    #[cfg(unix)]
    #[must_use]
    pub fn exit_status(code: i32) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;

        ExitStatus::from_raw(code << 8)
    }

    /// Creates an `ExitStatus` from an exit code (Windows implementation).
    #[cfg(windows)]
    #[must_use]
    pub fn exit_status(code: i32) -> ExitStatus {
        use std::os::windows::process::ExitStatusExt;

        ExitStatus::from_raw(code.unsigned_abs())
    }

    /// Creates a command `Output` with the given exit code and stderr.
    #[must_use]
    pub fn output_with(code: i32, stderr: &str) -> Output {
        Output {
            status: exit_status(code),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    /// One recorded command invocation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        /// The command that was run.
        pub cmd: String,
        /// Its arguments.
        pub args: Vec<String>,
        /// Extra environment variables passed to it.
        pub envs: Vec<(String, String)>,
    }

    /// A stub [`CommandExecutor`] that records invocations and returns
    /// scripted outputs in order.
    #[derive(Debug, Default)]
    pub struct StubExecutor {
        outputs: RefCell<VecDeque<Output>>,
        calls: RefCell<Vec<RecordedCall>>,
    }

    impl StubExecutor {
        /// A stub answering the given outputs in order.
        #[must_use]
        pub fn with_outputs(outputs: Vec<Output>) -> Self {
            Self {
                outputs: RefCell::new(outputs.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        /// The invocations recorded so far.
        #[must_use]
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.borrow().clone()
        }
    }

    impl CommandExecutor for StubExecutor {
        fn run(&self, cmd: &str, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
            self.calls.borrow_mut().push(RecordedCall {
                cmd: cmd.to_owned(),
                args: args.iter().map(|a| (*a).to_owned()).collect(),
                envs: envs
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                    .collect(),
            });
            self.outputs
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| super::ProvisionError::BringUp {
                    command: cmd.to_owned(),
                    reason: "unexpected command invocation".to_owned(),
                    status: None,
                })
        }
    }
}
