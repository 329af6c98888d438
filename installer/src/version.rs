//! Version references and "latest" resolution.
//!
//! A manifest placeholder is bound to either a concrete tag or the symbolic
//! `latest` token. Resolving `latest` requires a live network query, so it
//! is an explicit, typed step behind the [`VersionSource`] trait rather than
//! a side effect buried in locator construction; the resolver stays free of
//! network code and tests substitute fake sources.

use crate::fetch::{ArtifactFetcher, FetchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The literal token that selects "latest" resolution.
const LATEST_TOKEN: &str = "latest";

/// A version selection: a concrete tag, or the symbolic `latest` token that
/// must be resolved before locator substitution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionReference {
    /// Resolve the concrete version at run time via a [`LatestEndpoint`].
    Latest,
    /// Use the given tag verbatim.
    Pinned(String),
}

impl VersionReference {
    /// Return true when this reference requires run-time resolution.
    #[must_use]
    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }

    /// Parse a version reference. The token `latest` (case-insensitive) and
    /// the empty string select [`VersionReference::Latest`]; anything else
    /// is a pinned tag.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        let trimmed = token.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(LATEST_TOKEN) {
            Self::Latest
        } else {
            Self::Pinned(trimmed.to_owned())
        }
    }
}

impl FromStr for VersionReference {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(s))
    }
}

impl fmt::Display for VersionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "{LATEST_TOKEN}"),
            Self::Pinned(tag) => write!(f, "{tag}"),
        }
    }
}

/// A well-known endpoint that answers "what is the current version?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LatestEndpoint {
    /// An endpoint whose response body is the version tag as plain text
    /// (e.g. the Kubernetes `stable.txt` release channel).
    StableText(String),
    /// An endpoint that redirects to a location whose final path segment is
    /// the version tag (e.g. a GitHub `releases/latest` URL).
    ReleaseRedirect(String),
}

impl LatestEndpoint {
    /// Return the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::StableText(url) | Self::ReleaseRedirect(url) => url,
        }
    }
}

/// Errors arising from "latest" version resolution.
#[derive(Debug, thiserror::Error)]
pub enum VersionResolutionError {
    /// The resolution endpoint could not be queried.
    #[error("version endpoint {url} failed: {source}")]
    Endpoint {
        /// The endpoint URL.
        url: String,
        /// The underlying fetch failure.
        #[source]
        source: FetchError,
    },

    /// The endpoint answered with an empty version string.
    #[error("version endpoint {url} returned an empty version")]
    EmptyVersion {
        /// The endpoint URL.
        url: String,
    },

    /// The redirect target does not encode a version tag in its path.
    #[error("redirect from {url} has no version tag in its target {location}")]
    MalformedRedirect {
        /// The endpoint URL.
        url: String,
        /// The redirect target that could not be interpreted.
        location: String,
    },

    /// A placeholder requested `latest` but declared no endpoint to ask.
    #[error("placeholder \"{placeholder}\" requests latest but has no resolution endpoint")]
    MissingEndpoint {
        /// The placeholder name.
        placeholder: String,
    },

    /// The same placeholder was bound twice in one run.
    #[error("placeholder \"{placeholder}\" has more than one version override")]
    DuplicateOverride {
        /// The placeholder name.
        placeholder: String,
    },
}

/// Trait answering "latest" queries against a [`LatestEndpoint`].
///
/// Production code asks the network through [`FetcherVersionSource`]; tests
/// substitute fakes that return scripted versions and count calls.
pub trait VersionSource {
    /// Resolve the endpoint to a concrete version tag.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint cannot be queried or its answer
    /// does not contain a version tag.
    fn resolve_latest(&self, endpoint: &LatestEndpoint) -> Result<String, VersionResolutionError>;
}

/// A [`VersionSource`] that answers queries through an [`ArtifactFetcher`]:
/// plain-text endpoints are fetched and trimmed, redirect endpoints are
/// probed and the tag taken from the target's final path segment.
pub struct FetcherVersionSource<'a>(&'a dyn ArtifactFetcher);

impl<'a> FetcherVersionSource<'a> {
    /// Wrap a fetcher as a version source.
    #[must_use]
    pub fn new(fetcher: &'a dyn ArtifactFetcher) -> Self {
        Self(fetcher)
    }
}

impl VersionSource for FetcherVersionSource<'_> {
    fn resolve_latest(&self, endpoint: &LatestEndpoint) -> Result<String, VersionResolutionError> {
        match endpoint {
            LatestEndpoint::StableText(url) => {
                let body = self
                    .0
                    .fetch_text(url)
                    .map_err(|source| VersionResolutionError::Endpoint {
                        url: url.clone(),
                        source,
                    })?;
                let tag = body.trim();
                if tag.is_empty() {
                    return Err(VersionResolutionError::EmptyVersion { url: url.clone() });
                }
                log::debug!("resolved {url} to {tag}");
                Ok(tag.to_owned())
            }
            LatestEndpoint::ReleaseRedirect(url) => {
                let location = self
                    .0
                    .probe_redirect(url)
                    .map_err(|source| VersionResolutionError::Endpoint {
                        url: url.clone(),
                        source,
                    })?;
                let tag = tag_from_location(&location).ok_or_else(|| {
                    VersionResolutionError::MalformedRedirect {
                        url: url.clone(),
                        location: location.clone(),
                    }
                })?;
                log::debug!("resolved {url} to {tag} via {location}");
                Ok(tag.to_owned())
            }
        }
    }
}

/// Extract the version tag from a redirect target: the final non-empty path
/// segment, with any query or fragment stripped. A target with no path
/// (a bare host) carries no tag.
fn tag_from_location(location: &str) -> Option<&str> {
    let trimmed = location.split(['?', '#']).next().unwrap_or(location);
    let after_scheme = trimmed.split_once("://").map_or(trimmed, |(_, rest)| rest);
    let (_, path) = after_scheme.split_once('/')?;
    path.rsplit('/').find(|segment| !segment.is_empty())
}
