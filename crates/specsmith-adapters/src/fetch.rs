//! Resource fetchers: HTTP(S) + local files, and an in-memory double.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, instrument};

use specsmith_core::{
    application::{ApplicationError, ports::ResourceFetcher},
    domain::Location,
    error::{SpecsmithError, SpecsmithResult},
};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("specsmith/", env!("CARGO_PKG_VERSION"));

/// HTTP client settings for [`DefaultFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Fetches URLs with a blocking HTTP client and files from disk.
///
/// Any non-success HTTP status is a fetch error. Nothing is retried.
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    client: Client,
}

impl DefaultFetcher {
    pub fn new(settings: &FetchSettings) -> SpecsmithResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| SpecsmithError::Configuration {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    fn fetch_url(&self, url: &str) -> SpecsmithResult<Vec<u8>> {
        let fail = |reason: String| ApplicationError::Fetch {
            location: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fail(e.to_string()))?
            .error_for_status()
            .map_err(|e| match e.status() {
                Some(status) => fail(format!("HTTP {status}")),
                None => fail(e.to_string()),
            })?;

        let bytes = response.bytes().map_err(|e| fail(e.to_string()))?;
        debug!(url, bytes = bytes.len(), "downloaded");
        Ok(bytes.to_vec())
    }
}

impl ResourceFetcher for DefaultFetcher {
    #[instrument(skip_all, fields(location = %location))]
    fn fetch(&self, location: &Location) -> SpecsmithResult<Vec<u8>> {
        match location {
            Location::Url(url) if url.starts_with("file://") => {
                read_file(location, PathBuf::from(url.trim_start_matches("file://")))
            }
            Location::Url(url) => self.fetch_url(url),
            Location::File(path) => read_file(location, path.clone()),
        }
    }
}

fn read_file(location: &Location, path: PathBuf) -> SpecsmithResult<Vec<u8>> {
    std::fs::read(&path).map_err(|e| {
        ApplicationError::Fetch {
            location: location.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// In-memory fetcher for tests; records every requested location.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    resources: HashMap<Location, Vec<u8>>,
    requests: Mutex<Vec<Location>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.resources.insert(Location::Url(url.into()), body.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, body: impl Into<Vec<u8>>) -> Self {
        self.resources.insert(Location::File(path.into()), body.into());
        self
    }

    /// Locations requested so far, in call order.
    pub fn requests(&self) -> Vec<Location> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ResourceFetcher for MemoryFetcher {
    fn fetch(&self, location: &Location) -> SpecsmithResult<Vec<u8>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(location.clone());
        }
        self.resources.get(location).cloned().ok_or_else(|| {
            ApplicationError::Fetch {
                location: location.to_string(),
                reason: "HTTP 404 Not Found".into(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_local_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("api.json");
        std::fs::write(&path, "{}").unwrap();

        let fetcher = DefaultFetcher::new(&FetchSettings::default()).unwrap();
        assert_eq!(fetcher.fetch(&Location::File(path.clone())).unwrap(), b"{}");

        let url = format!("file://{}", path.display());
        assert_eq!(fetcher.fetch(&Location::Url(url)).unwrap(), b"{}");
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let fetcher = DefaultFetcher::new(&FetchSettings::default()).unwrap();
        let err = fetcher
            .fetch(&Location::File("/definitely/not/here.yaml".into()))
            .unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn unreachable_host_is_a_fetch_error() {
        let settings = FetchSettings {
            timeout: Duration::from_secs(2),
            ..Default::default()
        };
        let fetcher = DefaultFetcher::new(&settings).unwrap();
        let err = fetcher
            .fetch(&Location::Url("http://127.0.0.1:9/openapi.yaml".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            SpecsmithError::Application(ApplicationError::Fetch { .. })
        ));
    }

    #[test]
    fn memory_fetcher_records_requests() {
        let fetcher = MemoryFetcher::new().with_url("https://x.io/a.yaml", "openapi: 3.0.0");
        assert!(fetcher.fetch(&Location::Url("https://x.io/a.yaml".into())).is_ok());
        assert!(fetcher.fetch(&Location::Url("https://x.io/b.yaml".into())).is_err());
        assert_eq!(fetcher.requests().len(), 2);
    }
}
