pub mod customization;
pub mod project;
pub mod source;

pub use customization::{Contact, Customization, License, Server};
pub use project::{
    DEFAULT_SPEC_FILE, GeneratorSettings, Maintainer, PROJECT_FILE_NAME, ProjectConfig, Repository,
    SpecConfig,
};
pub use source::{Location, SpecSource};
