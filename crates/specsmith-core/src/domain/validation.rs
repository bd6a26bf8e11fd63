use crate::domain::{
    codec::Syntax,
    entities::project::ProjectConfig,
    error::DomainError,
};

/// Centralized domain validation.
///
/// Source shape is already enforced when a [`SpecSource`] is built; this
/// covers the cross-field rules of a whole project file.
///
/// [`SpecSource`]: crate::domain::entities::source::SpecSource
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_project(project: &ProjectConfig) -> Result<(), DomainError> {
        project.validate()?;
        Self::output_syntax(project)?;
        Ok(())
    }

    /// Serialization of the aggregated document, from its file extension.
    pub fn output_syntax(project: &ProjectConfig) -> Result<Syntax, DomainError> {
        let file = &project.spec.file;
        let ext = file.extension().and_then(|e| e.to_str());
        Syntax::from_extension(ext).ok_or_else(|| DomainError::UnsupportedOutput {
            path: file.display().to_string(),
        })
    }
}
