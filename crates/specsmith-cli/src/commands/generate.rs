//! `specsmith generate`: run the external generator for a project.

use std::sync::Arc;

use serde_json::json;
use tracing::instrument;

use specsmith_adapters::{LocalFilesystem, ProcessGenerator, process::count_files};
use specsmith_core::application::GenerationService;

use crate::{
    cli::{GenerateArgs, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(dir = %args.project.dir.display()))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let (dir, project) = super::load_project(&args.project)?;

    let generator = Arc::new(ProcessGenerator::new(config.command_line()?));
    let service = GenerationService::new(generator, Arc::new(LocalFilesystem::new()))
        .with_allow_list(config.allow_list());

    let spinner = output.spinner(&format!("Generating '{}'...", project.name));
    let result = service.generate(&dir, &project, args.output.as_deref());
    spinner.finish_and_clear();
    let outcome = result?;

    let files = count_files(&outcome.output_dir);
    if output.format() == OutputFormat::Json {
        output.json(&json!({
            "output": outcome.output_dir,
            "removed": outcome.removed,
            "files": files,
            "args": outcome.args,
        }))?;
        return Ok(());
    }

    if outcome.removed > 0 {
        output.info(&format!("Removed {} previously generated file(s)", outcome.removed))?;
    }
    output.success(&format!(
        "Generated {files} file(s) in {}",
        outcome.output_dir.display()
    ))?;
    Ok(())
}
