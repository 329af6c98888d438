//! Shared test utilities for the installer crate.
//!
//! Exposed to external test suites through the `test-support` feature.

use crate::digest::sha256_of_bytes;
use crate::fetch::{ArtifactFetcher, FetchError};
use crate::version::{LatestEndpoint, VersionResolutionError, VersionSource};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

/// Hex-encode the SHA-256 digest of a byte slice.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    sha256_of_bytes(bytes).as_str().to_owned()
}

/// A scripted [`VersionSource`] that counts resolution calls.
///
/// Answers are consumed in order; a second call observes a *different*
/// answer, so memoization failures surface as inconsistent versions as well
/// as inflated call counts.
#[derive(Debug)]
pub struct FakeVersionSource {
    answers: RefCell<VecDeque<String>>,
    calls: Cell<usize>,
}

impl FakeVersionSource {
    /// A source answering the given versions in order.
    #[must_use]
    pub fn new(answers: Vec<&str>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().map(ToOwned::to_owned).collect()),
            calls: Cell::new(0),
        }
    }

    /// A source answering one version, once.
    #[must_use]
    pub fn single(tag: &str) -> Self {
        Self::new(vec![tag])
    }

    /// Number of resolution calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl VersionSource for FakeVersionSource {
    fn resolve_latest(&self, endpoint: &LatestEndpoint) -> Result<String, VersionResolutionError> {
        self.calls.set(self.calls.get() + 1);
        self.answers.borrow_mut().pop_front().ok_or_else(|| {
            VersionResolutionError::EmptyVersion {
                url: endpoint.url().to_owned(),
            }
        })
    }
}

/// A canned [`ArtifactFetcher`] serving predefined bodies without network
/// access.
///
/// Unknown URLs answer with [`FetchError::NotFound`]. Text fetches are
/// recorded so tests can assert which endpoints were (or were not)
/// consulted.
#[derive(Debug, Default)]
pub struct StubFetcher {
    bodies: BTreeMap<String, Vec<u8>>,
    texts: BTreeMap<String, String>,
    redirects: BTreeMap<String, String>,
    text_requests: RefCell<Vec<String>>,
    file_requests: RefCell<Vec<String>>,
}

impl StubFetcher {
    /// An empty stub; every fetch answers not-found.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` for file fetches of `url`.
    #[must_use]
    pub fn with_body(mut self, url: &str, bytes: &[u8]) -> Self {
        self.bodies.insert(url.to_owned(), bytes.to_vec());
        self
    }

    /// Serve `text` for text fetches of `url`.
    #[must_use]
    pub fn with_text(mut self, url: &str, text: &str) -> Self {
        self.texts.insert(url.to_owned(), text.to_owned());
        self
    }

    /// Answer redirect probes of `url` with `location`.
    #[must_use]
    pub fn with_redirect(mut self, url: &str, location: &str) -> Self {
        self.redirects.insert(url.to_owned(), location.to_owned());
        self
    }

    /// The text URLs fetched so far, in order.
    #[must_use]
    pub fn text_requests(&self) -> Vec<String> {
        self.text_requests.borrow().clone()
    }

    /// The file URLs fetched so far, in order.
    #[must_use]
    pub fn file_requests(&self) -> Vec<String> {
        self.file_requests.borrow().clone()
    }
}

impl ArtifactFetcher for StubFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.text_requests.borrow_mut().push(url.to_owned());
        self.texts
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_owned(),
            })
    }

    fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        self.file_requests.borrow_mut().push(url.to_owned());
        let bytes = self.bodies.get(url).ok_or_else(|| FetchError::NotFound {
            url: url.to_owned(),
        })?;
        std::fs::write(dest, bytes)?;
        Ok(())
    }

    fn probe_redirect(&self, url: &str) -> Result<String, FetchError> {
        self.redirects
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotRedirected {
                url: url.to_owned(),
                status: 200,
            })
    }
}
