//! Gantry cluster provisioner library.
//!
//! A thin CI driver over the Gantry installer: it declares a fixed manifest
//! of exactly two runtime tools (kubectl and kind), installs both in one
//! verified, atomic run, and then issues a single `kind create cluster`
//! command with the resolved Kubernetes version. It reads its configuration
//! from `KUBERNETES_VERSION`, `KIND_VERSION`, and `KUBECONFIG`; there is no
//! other surface.
//!
//! # Modules
//!
//! - [`cluster`] - Command execution and the bring-up step
//! - [`config`] - Environment-derived configuration
//! - [`error`] - Semantic error types for provisioning runs
//! - [`provision`] - The sequential install-then-bring-up flow
//! - [`tools`] - The fixed kubectl/kind manifest

pub mod cluster;
pub mod config;
pub mod error;
pub mod provision;
pub mod tools;
