//! [`SourceLoader`] for When2Meet links and saved pages.

use std::fs;
use std::path::Path;

use overlap_engine::{LoadedSource, SourceError, SourceLoader};
use tracing::debug;

use crate::extract::{extract_page, ExtractedPage};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::link::{event_id, is_remote};

/// Loads sources given as When2Meet URLs or as paths to saved page copies.
///
/// URLs must carry an event id and are retrieved through the fetcher; any
/// other source is read from disk.
#[derive(Debug, Clone)]
pub struct When2MeetLoader<F = HttpFetcher> {
    fetcher: F,
}

impl When2MeetLoader<HttpFetcher> {
    /// Loader backed by a fresh [`HttpFetcher`].
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_fetcher(HttpFetcher::new()?))
    }
}

impl<F: PageFetcher> When2MeetLoader<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch (or read) and extract one source, keeping the roster.
    pub fn load_page(&self, source: &str) -> Result<ExtractedPage, SourceError> {
        let markup = self.read_markup(source)?;
        extract_page(&markup)
    }

    fn read_markup(&self, source: &str) -> Result<String, SourceError> {
        if is_remote(source) {
            let id = event_id(source)?;
            debug!(source, event_id = id, "loading remote page");
            return self.fetcher.fetch(source.trim());
        }

        let path = Path::new(source);
        if !path.is_file() {
            return Err(SourceError::InvalidSource(format!(
                "not a When2Meet link or saved page: {source}"
            )));
        }
        debug!(source, "loading saved page");
        fs::read_to_string(path).map_err(|e| SourceError::Fetch(format!("{source}: {e}")))
    }
}

impl<F: PageFetcher> SourceLoader for When2MeetLoader<F> {
    fn load(&self, source: &str) -> Result<LoadedSource, SourceError> {
        let page = self.load_page(source)?;
        Ok(LoadedSource {
            name: page.name,
            catalog: page.catalog,
        })
    }
}
