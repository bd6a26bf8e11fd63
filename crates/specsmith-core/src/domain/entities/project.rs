//! Project configuration document.
//!
//! One file per client-library repository declares what the library is,
//! where its API description comes from and how it is customized. The
//! adapters crate reads it from disk; this module only owns its shape and
//! defaulting rules.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::{
    document::Document,
    entities::{customization::Customization, source::SpecSource},
    error::DomainError,
};

/// Default name of the project configuration file.
pub const PROJECT_FILE_NAME: &str = "specsmith.yaml";

/// Default output path of the aggregated document.
pub const DEFAULT_SPEC_FILE: &str = "openapi.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub summary: String,
    pub description: String,
    /// Output directory for generated code, relative to the project root.
    pub output: Option<PathBuf>,
    pub repository: Repository,
    pub maintainers: Vec<Maintainer>,
    pub spec: SpecConfig,
    pub generator: GeneratorSettings,
}

impl ProjectConfig {
    /// Fill derived defaults the way a hand-written file would expect.
    ///
    /// - `repository.name` ← `name`
    /// - `repository.description` ← `summary`
    /// - `spec.customization.title` ← `name`
    pub fn with_defaults(mut self) -> Self {
        if self.repository.name.is_empty() {
            self.repository.name = self.name.clone();
        }
        if self.repository.description.is_empty() {
            self.repository.description = self.summary.clone();
        }
        if self.spec.customization.title.is_empty() {
            self.spec.customization.title = self.name.clone();
        }
        if self.spec.file.as_os_str().is_empty() {
            self.spec.file = PathBuf::from(DEFAULT_SPEC_FILE);
        }
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Repository {
    pub name: String,
    pub description: String,
    pub url: String,
    pub inception_year: Option<i32>,
    pub license_name: String,
    #[serde(rename = "licenseURL", alias = "licenseUrl")]
    pub license_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Maintainer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub url: String,
}

/// `spec:` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecConfig {
    /// Where the aggregated document is written, relative to the project root.
    pub file: PathBuf,
    /// Sources, merged strictly in this order.
    pub sources: Vec<SpecSource>,
    pub customization: Customization,
}

impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_SPEC_FILE),
            sources: Vec::new(),
            customization: Customization::default(),
        }
    }
}

/// `generator:` section, handed to the external generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Generator configuration object, written out as JSON.
    pub config: Document,
    /// Extra command-line arguments; each must be allow-listed.
    pub args: Vec<String>,
}
