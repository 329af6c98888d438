//! Artifact retrieval over HTTP.
//!
//! Provides a trait-based abstraction for fetching artifact bytes, checksum
//! bodies, and redirect targets, enabling dependency injection for testing.
//! This component performs network I/O only: callers decide where (and
//! whether) fetched content is persisted.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout applied to every fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Trait for retrieving artifact content from the network.
///
/// Abstractions allow tests to stub HTTP behaviour without network access.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactFetcher {
    /// Fetch a URL and return the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or any non-2xx status; a
    /// failed fetch is never an empty result.
    fn fetch_text(&self, url: &str) -> Result<String, FetchError>;

    /// Fetch a URL and stream the response body into `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, any non-2xx status, or a
    /// failed file write.
    fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<(), FetchError>;

    /// Issue a request with redirect following disabled and return the
    /// `Location` target.
    ///
    /// Used to resolve "latest release" endpoints whose redirect target
    /// encodes a version tag in its path.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, or when the response is not a
    /// redirect carrying a `Location` header.
    fn probe_redirect(&self, url: &str) -> Result<String, FetchError>;
}

/// Errors arising from fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("fetch failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested content was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// A redirect probe received a response that does not redirect.
    #[error("expected a redirect from {url}, got status {status}")]
    NotRedirected {
        /// The URL that was probed.
        url: String,
        /// The status code actually received.
        status: u16,
    },

    /// I/O error writing fetched content.
    #[error("I/O error writing fetched content: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based fetcher using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl ArtifactFetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }

    fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = std::fs::File::create(dest)?;
        std::io::copy(&mut response.into_body().as_reader(), &mut file)
            .map_err(FetchError::Io)?;
        Ok(())
    }

    fn probe_redirect(&self, url: &str) -> Result<String, FetchError> {
        let response = probe_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let status = response.status();
        if !status.is_redirection() {
            return Err(FetchError::NotRedirected {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }
        response
            .headers()
            .get(ureq::http::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned)
            .ok_or_else(|| FetchError::NotRedirected {
                url: url.to_owned(),
                status: status.as_u16(),
            })
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Agent for redirect probes: no following, and 3xx/4xx statuses surface as
/// plain responses so the `Location` header can be inspected.
fn probe_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .max_redirects(0)
            .http_status_as_error(false)
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
