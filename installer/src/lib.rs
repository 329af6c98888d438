//! Gantry installer library.
//!
//! This crate implements a declarative fetch-verify-install pipeline: a
//! manifest names artifacts (source locator, expected SHA-256 digest,
//! buildtime/runtime phase), the resolver substitutes run-time-resolved
//! versions into locator templates, and the installer fetches, verifies,
//! and atomically publishes the whole set or nothing at all. It is used by
//! the `gantry-installer` CLI binary and by `gantry-provision`, and can be
//! consumed programmatically for custom installation workflows.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`digest`] - SHA-256 computation and verification
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Semantic error types for installation runs
//! - [`fetch`] - HTTP retrieval trait and `ureq` implementation
//! - [`install`] - Fetch-verify-publish orchestration
//! - [`list`] - Rendering of installed-artifact records
//! - [`lock`] - Advisory locking scoped to install targets
//! - [`manifest`] - Declarative artifact manifests and their TOML format
//! - [`output`] - Progress output helpers for the binaries
//! - [`record`] - The install record published with each target
//! - [`resolve`] - Version substitution with memoized latest resolution
//! - [`stage`] - Staging and atomic publication
//! - [`version`] - Version references and resolution endpoints

pub mod cli;
pub mod digest;
pub mod dirs;
pub mod error;
pub mod fetch;
pub mod install;
pub mod list;
pub mod lock;
pub mod manifest;
pub mod output;
pub mod record;
pub mod resolve;
pub mod stage;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
