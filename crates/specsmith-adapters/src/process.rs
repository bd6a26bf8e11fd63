//! Process-backed converter and generator.
//!
//! Both run the same external executable. The configured command may carry
//! leading words (`java -jar openapi-generator.jar`); fixed arguments are
//! appended after them.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use specsmith_core::{
    application::{
        ApplicationError,
        ports::{CodeGenerator, DocumentConverter, GenerationRequest},
    },
    domain::{Dialect, Document, Syntax, decode, render},
    error::{SpecsmithError, SpecsmithResult},
};

/// Default generator executable.
pub const DEFAULT_EXECUTABLE: &str = "openapi-generator-cli";

/// A program plus leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    leading: Vec<String>,
}

impl CommandLine {
    pub fn new(words: Vec<String>) -> SpecsmithResult<Self> {
        let mut words = words.into_iter();
        let program = words.next().filter(|p| !p.trim().is_empty()).ok_or_else(|| {
            SpecsmithError::Configuration {
                message: "generator executable is empty".into(),
            }
        })?;
        Ok(Self {
            program,
            leading: words.collect(),
        })
    }

    /// Split a configured command line on whitespace.
    pub fn parse(line: &str) -> SpecsmithResult<Self> {
        Self::new(line.split_whitespace().map(str::to_string).collect())
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.leading);
        command
    }

    fn run(&self, args: &[&str]) -> Result<Output, std::io::Error> {
        self.command()
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
    }
}

impl Default for CommandLine {
    fn default() -> Self {
        Self {
            program: DEFAULT_EXECUTABLE.to_string(),
            leading: Vec::new(),
        }
    }
}

/// Converts older-dialect documents by shelling out to the generator's
/// `openapi-convert` subcommand.
#[derive(Debug, Clone, Default)]
pub struct ProcessConverter {
    command: CommandLine,
}

impl ProcessConverter {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }
}

impl DocumentConverter for ProcessConverter {
    #[instrument(skip_all, fields(%from, %to))]
    fn convert(&self, document: &Document, from: Dialect, to: Dialect) -> SpecsmithResult<Document> {
        let fail = |reason: String| ApplicationError::Conversion { reason };
        if !from.is_known() || !to.is_known() {
            return Err(fail(format!("cannot convert from {from} to {to}")).into());
        }

        let mut input = tempfile::Builder::new()
            .prefix("specsmith-convert-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| fail(format!("failed to create input file: {e}")))?;
        write_input(&mut input, document).map_err(|e| fail(e.to_string()))?;

        let input_path = input.path().to_string_lossy().into_owned();
        let output = self
            .command
            .run(&[
                "openapi-convert",
                "--format-in",
                from.converter_flag(),
                "--format-out",
                to.converter_flag(),
                "--input",
                input_path.as_str(),
            ])
            .map_err(|e| fail(format!("failed to start converter: {e}")))?;

        if !output.status.success() {
            return Err(fail(format!(
                "converter exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))
            .into());
        }

        debug!(bytes = output.stdout.len(), "converter finished");
        decode(&output.stdout, None, "converter output")
            .map_err(|e| fail(e.to_string()).into())
    }
}

fn write_input(file: &mut NamedTempFile, document: &Document) -> SpecsmithResult<()> {
    let json = render(document, Syntax::Json)?;
    file.write_all(json.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| SpecsmithError::Internal {
            message: format!("failed to write converter input: {e}"),
        })
}

const SKIP_VALIDATE_SPEC: &str = "--skip-validate-spec";

/// Runs the external code generator.
#[derive(Debug, Clone, Default)]
pub struct ProcessGenerator {
    command: CommandLine,
}

impl ProcessGenerator {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }
}

impl CodeGenerator for ProcessGenerator {
    #[instrument(skip_all, fields(output = %request.output_dir.display()))]
    fn generate(&self, request: &GenerationRequest) -> SpecsmithResult<()> {
        let spec = request.spec_file.to_string_lossy();
        let out = request.output_dir.to_string_lossy();
        let config = request.config_file.to_string_lossy();

        let mut args: Vec<&str> = vec![
            "generate",
            "-e",
            "auto",
            "-i",
            &*spec,
            "-o",
            &*out,
            "-c",
            &*config,
        ];
        if !request.args.iter().any(|a| a == SKIP_VALIDATE_SPEC) {
            args.push(SKIP_VALIDATE_SPEC);
        }
        args.extend(request.args.iter().map(String::as_str));
        debug!(?args, "running generator");

        let output = self.command.run(&args).map_err(|e| ApplicationError::Generation {
            exit_code: None,
            stderr: format!("failed to start generator: {e}"),
        })?;

        if !output.status.success() {
            return Err(ApplicationError::Generation {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        info!(files = count_files(&request.output_dir), "generator finished");
        Ok(())
    }
}

/// Number of regular files below `dir`.
pub fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count()
}
