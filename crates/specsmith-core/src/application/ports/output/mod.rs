//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `specsmith-adapters` crate provides implementations. Every port is
//! blocking; callers that need a deadline impose it from outside.

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::domain::{Dialect, Document, Location, ProjectConfig};
use crate::error::SpecsmithResult;

/// Port for retrieving raw bytes.
///
/// Implemented by:
/// - `specsmith_adapters::fetch::DefaultFetcher` (HTTP + local files)
/// - `specsmith_adapters::fetch::MemoryFetcher` (testing)
///
/// Failures map to `ApplicationError::Fetch`. No retries.
#[cfg_attr(test, automock)]
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, location: &Location) -> SpecsmithResult<Vec<u8>>;
}

/// Port for converting a document between dialects.
///
/// Implemented by:
/// - `specsmith_adapters::process::ProcessConverter` (external executable)
/// - `specsmith_adapters::fake::FakeConverter` (testing)
#[cfg_attr(test, automock)]
pub trait DocumentConverter: Send + Sync {
    fn convert(&self, document: &Document, from: Dialect, to: Dialect) -> SpecsmithResult<Document>;
}

/// Everything the generator needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub spec_file: PathBuf,
    pub output_dir: PathBuf,
    pub config_file: PathBuf,
    /// Allow-listed extra arguments, appended after the fixed ones.
    pub args: Vec<String>,
}

/// Port for the external code generator.
///
/// Implemented by:
/// - `specsmith_adapters::process::ProcessGenerator` (external executable)
/// - `specsmith_adapters::fake::RecordingGenerator` (testing)
///
/// A non-zero exit maps to `ApplicationError::Generation`.
#[cfg_attr(test, automock)]
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> SpecsmithResult<()>;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `specsmith_adapters::filesystem::LocalFilesystem` (production)
/// - `specsmith_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, automock)]
pub trait Filesystem: Send + Sync {
    /// Read a whole file.
    fn read_file(&self, path: &Path) -> SpecsmithResult<Vec<u8>>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> SpecsmithResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SpecsmithResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> SpecsmithResult<()>;
}

/// Port for reading the project configuration of a directory.
///
/// Implemented by `specsmith_adapters::project::YamlProjectLoader`.
pub trait ProjectLoader: Send + Sync {
    /// Load, default and validate the project file found in `dir`.
    fn load(&self, dir: &Path) -> SpecsmithResult<ProjectConfig>;
}
