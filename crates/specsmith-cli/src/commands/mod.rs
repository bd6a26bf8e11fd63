//! Command handlers.
//!
//! Each handler wires adapters into a core service, runs one use case and
//! renders the result. No document logic lives here.

use std::path::PathBuf;

use specsmith_adapters::YamlProjectLoader;
use specsmith_core::{application::ports::ProjectLoader, domain::ProjectConfig};

use crate::cli::ProjectArgs;
use crate::error::CliResult;

pub mod bump;
pub mod completions;
pub mod config;
pub mod diff;
pub mod generate;
pub mod update;

/// Load the project file selected by `args`.
fn load_project(args: &ProjectArgs) -> CliResult<(PathBuf, ProjectConfig)> {
    let loader = match &args.project {
        Some(file) => YamlProjectLoader::new().with_file_name(file),
        None => YamlProjectLoader::new(),
    };
    let project = loader.load(&args.dir)?;
    Ok((args.dir.clone(), project))
}
