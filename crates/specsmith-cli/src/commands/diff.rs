//! `specsmith diff`: classify the changes between two documents.

use std::sync::Arc;

use specsmith_adapters::LocalFilesystem;
use specsmith_core::application::ReleaseService;

use crate::{
    cli::{DiffArgs, OutputFormat, ReportFormat},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: DiffArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = ReleaseService::new(Arc::new(LocalFilesystem::new()));
    let diff = service.compare(&args.old, &args.new)?;

    if args.format == ReportFormat::Json || output.format() == OutputFormat::Json {
        // JSON lists every entry unless a limit was asked for explicitly.
        let written = match args.limit {
            Some(limit) => output.json(&diff.truncated(limit)),
            None => output.json(&diff),
        };
        return written.with_cli_context(|| "writing change report");
    }

    match diff.highest_severity() {
        None => output.info("No changes")?,
        Some(highest) => {
            output.header(&format!(
                "{} change(s), highest severity: {highest}",
                diff.len()
            ))?;
            let limit = args.limit.unwrap_or(config.report.limit);
            output
                .diff_table(diff.truncated(limit), diff.len())
                .with_cli_context(|| "writing change report")?;
        }
    }
    Ok(())
}
