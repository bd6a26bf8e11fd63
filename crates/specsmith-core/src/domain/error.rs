// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
///
/// Merging and patching never fail; every merge has a deterministic winner
/// and unknown customization fields are ignored.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid spec source: {0}")]
    InvalidSource(String),

    #[error("Invalid version '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },

    #[error("Unknown severity: {0}")]
    InvalidSeverity(String),

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Unsupported output file '{path}'")]
    UnsupportedOutput { path: String },

    // ========================================================================
    // Document Format Errors
    // ========================================================================
    /// The embedded document literal was not found in a scraped UI script.
    #[error("No embedded document found in {location}")]
    Extraction { location: String },

    /// Neither YAML nor JSON decoding succeeded.
    #[error("Unparseable document from {source_name}: {reason}")]
    UnparseableDocument { source_name: String, reason: String },

    #[error("Failed to render document: {reason}")]
    Render { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidSource(msg) => vec![
                "Each spec source needs exactly one of `url` or `file`".into(),
                format!("Details: {msg}"),
            ],
            Self::InvalidVersion { value, .. } => vec![
                format!("'{value}' is not a semantic version"),
                "Use MAJOR.MINOR.PATCH, optionally prefixed with 'v' (e.g. v1.2.3)".into(),
            ],
            Self::Extraction { location } => vec![
                format!("Fetched {location} but found no embedded document"),
                "The documentation UI may have changed its bundling format".into(),
                "Point the source at the raw spec endpoint and use format: spec".into(),
            ],
            Self::UnsupportedOutput { path } => vec![
                format!("Cannot tell how to write {path}"),
                "Use a .yaml, .yml or .json file name for spec.file".into(),
            ],
            Self::UnparseableDocument { source_name, .. } => vec![
                format!("{source_name} is neither valid YAML nor valid JSON"),
                "Check that the URL serves the document and not an HTML page".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSource(_)
            | Self::InvalidVersion { .. }
            | Self::InvalidSeverity(_)
            | Self::MissingRequiredField { .. }
            | Self::UnsupportedOutput { .. } => ErrorCategory::Validation,
            Self::Extraction { .. } | Self::UnparseableDocument { .. } => ErrorCategory::Format,
            Self::Render { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Format,
    Internal,
}
