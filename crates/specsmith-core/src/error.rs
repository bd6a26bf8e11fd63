//! Unified error handling for Specsmith Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Specsmith Core operations.
///
/// Every pipeline stage returns on the first error; there is no partial
/// recovery inside a single aggregation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpecsmithError {
    /// Errors from the domain layer (invalid input, unreadable documents).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (ports and orchestration).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl SpecsmithError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Run `specsmith config list` to inspect the effective settings".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Specsmith".into(),
                "Please report this issue at: https://github.com/specsmith/specsmith/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Format => ErrorCategory::Format,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether re-running the whole pipeline may succeed.
    ///
    /// Nothing is retried internally.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::Fetch { .. }))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Format,
    NotFound,
    Configuration,
    /// A network endpoint or external process failed.
    External,
    Internal,
}

/// Convenient result type alias.
pub type SpecsmithResult<T> = Result<T, SpecsmithError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> SpecsmithResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> SpecsmithResult<T> {
        self.map_err(|e| SpecsmithError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
