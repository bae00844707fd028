//! Blocking HTTP downloads for the remote datasets.
//!
//! Each request is attempted exactly once; the timeout is explicit
//! configuration rather than a platform default.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Network policy for remote fetches
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchPolicy {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

impl FetchPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HTTP client shared by the relief and seismicity downloads
pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new(policy: &FetchPolicy) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(policy.timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    /// GET a URL and return the body as text. Non-2xx responses are errors.
    pub fn get_text(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

/// Whether a source string names a remote resource rather than a local file.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
