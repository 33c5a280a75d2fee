//! Page retrieval.
//!
//! One blocking request per source, no retries. Callers that need offline or
//! scripted behaviour implement [`PageFetcher`] themselves.

use overlap_engine::SourceError;
use reqwest::blocking::Client;
use tracing::info;

const USER_AGENT: &str = concat!("when2meet-overlap/", env!("CARGO_PKG_VERSION"));

/// Retrieves the raw markup of a page.
pub trait PageFetcher {
    /// # Errors
    /// Returns `SourceError::Fetch` on network failure or a non-2xx status.
    fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

/// [`PageFetcher`] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// # Errors
    /// Returns `SourceError::Fetch` if the HTTP client cannot be initialised
    /// (e.g. the TLS backend fails to load).
    pub fn new() -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SourceError::Fetch(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, SourceError> {
        info!(url, "fetching page");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| SourceError::Fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Fetch(format!(
                "{url}: Status {}",
                status.as_u16()
            )));
        }

        response
            .text()
            .map_err(|e| SourceError::Fetch(format!("{url}: cannot read body: {e}")))
    }
}
