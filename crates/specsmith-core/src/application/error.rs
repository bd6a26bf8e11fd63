//! Application layer errors.
//!
//! These errors represent failures in orchestration and at port boundaries,
//! not in document logic. Document errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A source could not be retrieved (network, HTTP status, missing file).
    #[error("Failed to fetch {location}: {reason}")]
    Fetch { location: String, reason: String },

    /// The external dialect converter failed.
    #[error("Dialect conversion failed: {reason}")]
    Conversion { reason: String },

    /// The external code generator exited unsuccessfully.
    #[error("Code generation failed (exit code {}): {stderr}", exit_label(.exit_code))]
    Generation { exit_code: Option<i32>, stderr: String },

    /// A generator argument is not on the allow-list.
    #[error("Generator argument not allowed: {arg}")]
    ArgumentNotAllowed { arg: String },

    /// No project file where one was expected.
    #[error("Project file not found at {path}")]
    ProjectNotFound { path: PathBuf },

    /// The project file exists but does not parse.
    #[error("Invalid project file {path}: {reason}")]
    InvalidProject { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Shared state behind a lock was poisoned.
    #[error("Internal state lock poisoned")]
    StoreLockError,
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Fetch { location, .. } => vec![
                format!("Could not retrieve {location}"),
                "Check the URL or path in spec.sources".into(),
                "Network failures are not retried; run the command again".into(),
            ],
            Self::Conversion { .. } => vec![
                "The converter could not upgrade an older-dialect document".into(),
                "Check that the generator executable is installed and on PATH".into(),
                "Set generator.executable or SPECSMITH_GENERATOR__EXECUTABLE".into(),
            ],
            Self::Generation { .. } => vec![
                "The code generator reported an error (see stderr above)".into(),
                "Validate the aggregated document and generator configuration".into(),
            ],
            Self::ArgumentNotAllowed { arg } => vec![
                format!("'{arg}' is not an allowed generator argument"),
                "Only normalizer switches and --skip-validate-spec are accepted".into(),
                "Run `specsmith config get generator.allowed_args` to see the list".into(),
            ],
            Self::ProjectNotFound { path } => vec![
                format!("No project file at {}", path.display()),
                "Run from the project root or pass --dir".into(),
            ],
            Self::InvalidProject { path, .. } => vec![
                format!("Fix the YAML in {}", path.display()),
                "Each spec source needs exactly one of `url` or `file`".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch { .. } | Self::Conversion { .. } | Self::Generation { .. } => {
                ErrorCategory::External
            }
            Self::ArgumentNotAllowed { .. } | Self::InvalidProject { .. } => {
                ErrorCategory::Validation
            }
            Self::ProjectNotFound { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
