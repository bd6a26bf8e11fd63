//! Specsmith Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Specsmith
//! API-description pipeline, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          specsmith-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (Aggregation, Release, Generation)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Fetcher, Converter, Generator, Fs)     │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    specsmith-adapters (Infrastructure)  │
//! │  (HTTP fetch, processes, filesystem)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │   (Document, merge, patch, diff, bump)  │
//! │         No I/O                          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use specsmith_core::prelude::*;
//!
//! # fn run(fetcher: std::sync::Arc<dyn ResourceFetcher>,
//! #        converter: std::sync::Arc<dyn DocumentConverter>,
//! #        filesystem: std::sync::Arc<dyn Filesystem>,
//! #        project: ProjectConfig) -> SpecsmithResult<()> {
//! let service = AggregationService::new(fetcher, converter, filesystem);
//! let outcome = service.update(Path::new("."), &project)?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        AggregationService, ArgumentAllowList, GenerationService, ReleaseService,
        UpdateOutcome,
        ports::{CodeGenerator, DocumentConverter, Filesystem, ProjectLoader, ResourceFetcher},
    };
    pub use crate::domain::{
        BumpPolicy, Customization, Dialect, Diff, DiffEntry, Document, ProjectConfig, Severity,
        SpecSource, Syntax,
    };
    pub use crate::error::{SpecsmithError, SpecsmithResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
