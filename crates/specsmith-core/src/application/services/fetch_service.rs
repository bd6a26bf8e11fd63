//! Source Fetcher - raw bytes for one configured source.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::ports::ResourceFetcher,
    domain::{SourceFormat, SpecSource, entities::source::resolve_file, extract_embedded_document},
    error::SpecsmithResult,
};

/// Retrieves the bytes of a [`SpecSource`].
///
/// Scraped-UI sources fetch the documentation bootstrap script and return
/// only the embedded document literal.
#[derive(Clone)]
pub struct SourceFetcher {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl SourceFetcher {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch `source`, resolving relative file locations against `base_dir`.
    #[instrument(skip_all, fields(source = %source))]
    pub fn fetch(&self, base_dir: &Path, source: &SpecSource) -> SpecsmithResult<Vec<u8>> {
        let resource = resolve_file(base_dir, &source.resource());
        let bytes = self.fetcher.fetch(&resource)?;
        debug!(bytes = bytes.len(), resource = %resource, "fetched");

        match source.format() {
            SourceFormat::RawSpec => Ok(bytes),
            SourceFormat::ScrapedUi => {
                let script = String::from_utf8_lossy(&bytes);
                let embedded = extract_embedded_document(&script, &resource.to_string())?;
                Ok(embedded.as_bytes().to_vec())
            }
        }
    }
}
