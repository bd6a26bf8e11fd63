//! Infrastructure adapters for Specsmith.
//!
//! This crate implements the ports defined in `specsmith-core::application::ports`.
//! It contains all network, process and filesystem I/O.

pub mod fake;
pub mod fetch;
pub mod filesystem;
pub mod process;
pub mod project;

// Re-export commonly used adapters
pub use fake::{FakeConverter, RecordingGenerator};
pub use fetch::{DefaultFetcher, FetchSettings, MemoryFetcher};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{CommandLine, ProcessConverter, ProcessGenerator};
pub use project::YamlProjectLoader;
