//! Declarative artifact manifests.
//!
//! A manifest is the ordered list of artifacts an installation run must
//! fetch and verify. This module implements the type-safe data model and
//! its TOML representation:
//!
//! - [`name`] — Artifact name newtype (`ArtifactName`).
//! - [`sha256_digest`] — SHA-256 digest newtype (`Sha256Digest`).
//! - [`locator`] — Locator templates with version placeholders.
//! - [`artifact`] — Artifact specification records (`ArtifactSpec`).
//! - [`document`] — The validated manifest collection (`Manifest`).
//! - [`parser`] — TOML deserialization and validation.
//! - [`error`] — Semantic error types for validation failures.

pub mod artifact;
pub mod document;
pub mod error;
pub mod locator;
pub mod name;
pub mod parser;
pub mod sha256_digest;

pub use artifact::{ArtifactSpec, DigestAlgorithm, DigestSource, Phase};
pub use document::Manifest;
pub use error::ManifestError;
pub use locator::LocatorTemplate;
pub use name::ArtifactName;
pub use sha256_digest::Sha256Digest;
