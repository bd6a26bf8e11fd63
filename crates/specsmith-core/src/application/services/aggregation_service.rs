//! Aggregation Service - fetch, normalize, merge, patch and publish.
//!
//! ```text
//! sources ─fetch (parallel)─▶ bytes ─normalize─▶ docs ─merge (in order)─▶ ─patch─▶ document
//! ```
//!
//! Fetching may run on a bounded pool; merging always follows the
//! configured source order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ports::{DocumentConverter, Filesystem, ResourceFetcher},
        services::{fetch_service::SourceFetcher, normalizer::Normalizer},
    },
    domain::{
        Diff, Dialect, Document, DomainValidator, ProjectConfig, SpecConfig, SpecSource, Syntax,
        decode, diff, merge, patch, render,
    },
    error::{SpecsmithError, SpecsmithResult},
};

/// Default size of the fetch pool.
pub const DEFAULT_FETCH_WORKERS: usize = 4;

/// Result of [`AggregationService::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// No sources configured; the existing file was left untouched.
    Skipped { path: PathBuf },
    Written {
        path: PathBuf,
        sources: usize,
        /// Changes against the file that was there before, if it parsed.
        changes: Option<Diff>,
    },
}

/// Produces the canonical document of a project.
pub struct AggregationService {
    fetcher: SourceFetcher,
    normalizer: Normalizer,
    filesystem: Arc<dyn Filesystem>,
    workers: usize,
}

impl AggregationService {
    /// Create a service targeting the newer dialect with the default pool size.
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher>,
        converter: Arc<dyn DocumentConverter>,
        filesystem: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            fetcher: SourceFetcher::new(fetcher),
            normalizer: Normalizer::new(converter, Dialect::SchemaV2),
            filesystem,
            workers: DEFAULT_FETCH_WORKERS,
        }
    }

    /// Bound the fetch pool; `1` fetches sequentially.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_target_dialect(mut self, target: Dialect) -> Self {
        self.normalizer = self.normalizer.with_target(target);
        self
    }

    /// Build the canonical document described by `spec`.
    ///
    /// The first failing source aborts the whole aggregation.
    #[instrument(skip_all, fields(sources = spec.sources.len()))]
    pub fn aggregate(&self, base_dir: &Path, spec: &SpecConfig) -> SpecsmithResult<Document> {
        let fetched = self.fetch_all(base_dir, &spec.sources)?;

        let mut merged = Document::default();
        for (source, bytes) in spec.sources.iter().zip(fetched) {
            let document = self.normalizer.normalize(source, &bytes)?;
            info!(source = %source, "merged source");
            merged = merge(merged, document);
        }

        Ok(patch(merged, &spec.customization))
    }

    /// Aggregate and write the project's document file.
    #[instrument(skip_all, fields(project = %project.name))]
    pub fn update(&self, base_dir: &Path, project: &ProjectConfig) -> SpecsmithResult<UpdateOutcome> {
        let spec = &project.spec;
        let path = base_dir.join(&spec.file);

        if spec.sources.is_empty() {
            info!(path = %path.display(), "no spec sources configured, leaving document untouched");
            return Ok(UpdateOutcome::Skipped { path });
        }

        let syntax = DomainValidator::output_syntax(project)?;
        let previous = self.read_previous(&path, syntax);

        let document = self.aggregate(base_dir, spec)?;
        let rendered = render(&document, syntax)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&path, &rendered)?;
        info!(path = %path.display(), "wrote aggregated document");

        Ok(UpdateOutcome::Written {
            path,
            sources: spec.sources.len(),
            changes: previous.map(|old| diff(&old, &document)),
        })
    }

    fn fetch_all(&self, base_dir: &Path, sources: &[SpecSource]) -> SpecsmithResult<Vec<Vec<u8>>> {
        let fetch = |source: &SpecSource| self.fetcher.fetch(base_dir, source);

        let results: Vec<SpecsmithResult<Vec<u8>>> = if self.workers <= 1 || sources.len() <= 1 {
            sources.iter().map(fetch).collect()
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.workers.min(sources.len()))
                .thread_name(|i| format!("specsmith-fetch-{i}"))
                .build()
                .map_err(|e| SpecsmithError::Internal {
                    message: format!("failed to start fetch pool: {e}"),
                })?;
            pool.install(|| sources.par_iter().map(fetch).collect())
        };

        // Results are in configured order, so this surfaces the first failing source.
        results.into_iter().collect()
    }

    fn read_previous(&self, path: &Path, syntax: Syntax) -> Option<Document> {
        if !self.filesystem.exists(path) {
            return None;
        }
        let ext = syntax.to_string();
        let parsed = self
            .filesystem
            .read_file(path)
            .and_then(|bytes| decode(&bytes, Some(ext.as_str()), &path.display().to_string()).map_err(SpecsmithError::from));
        match parsed {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "previous document unreadable, skipping change report");
                None
            }
        }
    }
}
