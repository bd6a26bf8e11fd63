//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "update the aggregated document" or
//! "propose the next release version".

pub mod aggregation_service;
pub mod fetch_service;
pub mod generation_service;
pub mod normalizer;
pub mod release_service;

pub use aggregation_service::{AggregationService, DEFAULT_FETCH_WORKERS, UpdateOutcome};
pub use fetch_service::SourceFetcher;
pub use generation_service::{ArgumentAllowList, GenerationOutcome, GenerationService, generator_config};
pub use normalizer::Normalizer;
pub use release_service::{ModuleOutcome, ModuleSpec, ReleaseProposal, ReleaseService};
