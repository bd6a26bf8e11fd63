//! `specsmith update`: rebuild the aggregated document of a project.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, instrument};

use specsmith_adapters::{DefaultFetcher, LocalFilesystem, ProcessConverter};
use specsmith_core::application::{AggregationService, UpdateOutcome};

use crate::{
    cli::{OutputFormat, UpdateArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(dir = %args.project.dir.display()))]
pub fn execute(args: UpdateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let (dir, project) = super::load_project(&args.project)?;

    let fetcher = Arc::new(DefaultFetcher::new(&config.fetch_settings())?);
    let converter = Arc::new(ProcessConverter::new(config.command_line()?));
    let service = AggregationService::new(fetcher, converter, Arc::new(LocalFilesystem::new()))
        .with_workers(args.workers.unwrap_or(config.fetch.workers))
        .with_target_dialect(config.pipeline.target_dialect);

    let spinner = output.spinner(&format!(
        "Fetching {} source(s) for '{}'...",
        project.spec.sources.len(),
        project.name
    ));
    let result = service.update(&dir, &project);
    spinner.finish_and_clear();

    match result? {
        UpdateOutcome::Skipped { path } => {
            if output.format() == OutputFormat::Json {
                output.json(&json!({ "status": "skipped", "path": path }))?;
            } else {
                output.warning(&format!(
                    "No spec sources configured, left {} untouched",
                    path.display()
                ))?;
            }
        }
        UpdateOutcome::Written { path, sources, changes } => {
            info!(path = %path.display(), sources, "document updated");
            if output.format() == OutputFormat::Json {
                output.json(&json!({
                    "status": "written",
                    "path": path,
                    "sources": sources,
                    "changes": changes,
                    "updated_at": chrono::Utc::now().to_rfc3339(),
                }))?;
                return Ok(());
            }

            output.success(&format!("Wrote {} from {sources} source(s)", path.display()))?;
            match changes {
                None => output.info("No previous document to compare against")?,
                Some(changes) if changes.is_empty() => output.info("No changes")?,
                Some(changes) => {
                    if let Some(highest) = changes.highest_severity() {
                        output.header(&format!("Changes (highest severity: {highest})"))?;
                    }
                    output.diff_table(changes.truncated(config.report.limit), changes.len())?;
                }
            }
        }
    }

    Ok(())
}
