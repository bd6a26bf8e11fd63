//! Project file loader.

use std::path::{Path, PathBuf};

use tracing::debug;

use specsmith_core::{
    application::{ApplicationError, ports::ProjectLoader},
    domain::{DomainValidator, PROJECT_FILE_NAME, ProjectConfig},
    error::SpecsmithResult,
};

/// Reads `specsmith.yaml` (or a custom file name) from a directory.
#[derive(Debug, Clone)]
pub struct YamlProjectLoader {
    file_name: PathBuf,
}

impl YamlProjectLoader {
    pub fn new() -> Self {
        Self {
            file_name: PathBuf::from(PROJECT_FILE_NAME),
        }
    }

    /// Use a different file, relative to the directory passed to `load`.
    pub fn with_file_name(mut self, file_name: impl Into<PathBuf>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }
}

impl Default for YamlProjectLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectLoader for YamlProjectLoader {
    fn load(&self, dir: &Path) -> SpecsmithResult<ProjectConfig> {
        let path = self.path_in(dir);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ApplicationError::ProjectNotFound { path }.into());
            }
            Err(e) => {
                return Err(ApplicationError::FilesystemError {
                    path,
                    reason: e.to_string(),
                }
                .into());
            }
        };

        let project: ProjectConfig =
            serde_yaml::from_str(&text).map_err(|e| ApplicationError::InvalidProject {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        let project = project.with_defaults();
        DomainValidator::validate_project(&project)?;

        debug!(path = %path.display(), sources = project.spec.sources.len(), "loaded project");
        Ok(project)
    }
}
