//! Application layer for Specsmith.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (AggregationService, ReleaseService, GenerationService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! document logic itself. Merge, patch and diff rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    AggregationService, ArgumentAllowList, GenerationOutcome, GenerationService, ModuleOutcome,
    ModuleSpec, Normalizer, ReleaseProposal, ReleaseService, SourceFetcher, UpdateOutcome,
};

pub use ports::{
    CodeGenerator, DocumentConverter, Filesystem, GenerationRequest, ProjectLoader,
    ResourceFetcher,
};

pub use error::ApplicationError;
