//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `specsmith-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `ResourceFetcher`: raw bytes from a URL or file
//!   - `DocumentConverter`: older-dialect → newer-dialect conversion
//!   - `CodeGenerator`: the external client-library generator
//!   - `Filesystem`: file operations
//!   - `ProjectLoader`: project configuration file
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    CodeGenerator, DocumentConverter, Filesystem, GenerationRequest, ProjectLoader,
    ResourceFetcher,
};
