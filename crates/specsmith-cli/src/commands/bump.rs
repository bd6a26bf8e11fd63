//! `specsmith bump`: propose the next release version.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use tracing::instrument;

use specsmith_adapters::LocalFilesystem;
use specsmith_core::{
    application::{ModuleOutcome, ModuleSpec, ReleaseProposal, ReleaseService},
    domain::parse_version,
};

use crate::{
    cli::{BumpArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(modules = args.modules.len()))]
pub fn execute(args: BumpArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let mut policy = config.bump_policy();
    if args.strict {
        policy.pre_stable_breaking_bumps_minor = false;
    }
    let service = ReleaseService::new(Arc::new(LocalFilesystem::new())).with_policy(policy);

    let previous = args.previous.as_deref().map(parse_version).transpose()?;
    let modules = match (&args.old, &args.new) {
        (Some(old), Some(new)) => vec![ModuleSpec {
            name: module_name(new),
            previous,
            old_file: old.clone(),
            new_file: new.clone(),
        }],
        _ if !args.modules.is_empty() => args
            .modules
            .iter()
            .map(|value| parse_module(value, previous.as_ref()))
            .collect::<CliResult<Vec<_>>>()?,
        _ => {
            return Err(CliError::InvalidInput {
                message: "pass OLD and NEW documents or at least one --module".into(),
                source: None,
            });
        }
    };

    let proposal = service.propose(&modules);

    // A lone module surfaces its own error instead of being reported as skipped.
    if let ([module], [ModuleOutcome::Skipped { .. }]) = (modules.as_slice(), proposal.modules.as_slice()) {
        service.propose_module(module)?;
    }
    let skipped: Vec<String> = proposal
        .modules
        .iter()
        .filter_map(|m| match m {
            ModuleOutcome::Skipped { name, reason } => Some(format!("{name}: {reason}")),
            ModuleOutcome::Proposed { .. } => None,
        })
        .collect();
    if skipped.len() == proposal.modules.len() {
        return Err(CliError::NothingToRelease { skipped });
    }

    if output.format() == OutputFormat::Json {
        output
            .json(&proposal_json(&proposal))
            .with_cli_context(|| "writing release proposal")?;
        return Ok(());
    }

    for module in &proposal.modules {
        match module {
            ModuleOutcome::Proposed { name, previous, next, diff } => {
                let from = previous
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "unreleased".into());
                let highest = diff
                    .highest_severity()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "none".into());
                output.print(&format!(
                    "{name}: {from} -> {next} ({} change(s), highest: {highest})",
                    diff.len()
                ))?;
            }
            ModuleOutcome::Skipped { name, reason } => {
                output.warning(&format!("{name}: skipped ({reason})"))?;
            }
        }
    }
    output.data(&proposal.version.to_string())?;
    Ok(())
}

/// Parse `name[@version]=old,new`.
fn parse_module(value: &str, previous: Option<&semver::Version>) -> CliResult<ModuleSpec> {
    let invalid = |reason: &str| CliError::InvalidModule {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (head, files) = value.split_once('=').ok_or_else(|| invalid("missing '='"))?;
    let (old, new) = files.split_once(',').ok_or_else(|| invalid("expected old,new"))?;
    let (name, version) = match head.split_once('@') {
        Some((name, version)) => (name, Some(parse_version(version)?)),
        None => (head, previous.cloned()),
    };
    if name.trim().is_empty() || old.trim().is_empty() || new.trim().is_empty() {
        return Err(invalid("name and both documents are required"));
    }

    Ok(ModuleSpec {
        name: name.trim().to_string(),
        previous: version,
        old_file: PathBuf::from(old.trim()),
        new_file: PathBuf::from(new.trim()),
    })
}

fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".into())
}

fn proposal_json(proposal: &ReleaseProposal) -> serde_json::Value {
    let modules: Vec<serde_json::Value> = proposal
        .modules
        .iter()
        .map(|m| match m {
            ModuleOutcome::Proposed { name, previous, next, diff } => json!({
                "name": name,
                "previous": previous.as_ref().map(ToString::to_string),
                "next": next.to_string(),
                "highest": diff.highest_severity(),
                "changes": diff.len(),
            }),
            ModuleOutcome::Skipped { name, reason } => json!({
                "name": name,
                "skipped": reason,
            }),
        })
        .collect();
    json!({ "version": proposal.version.to_string(), "modules": modules })
}
