//! Release Service - diff documents and propose versions.
//!
//! Modules are versioned independently. A module whose documents cannot be
//! read is skipped with a warning; the others still get a proposal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use semver::Version;
use tracing::{info, instrument, warn};

use crate::{
    application::ports::Filesystem,
    domain::{BumpPolicy, Diff, Document, decode, diff, highest_version, next_version},
    error::SpecsmithResult,
};

/// One independently versioned module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub name: String,
    /// Last released version; `None` for a first release.
    pub previous: Option<Version>,
    /// Document of the last release.
    pub old_file: PathBuf,
    /// Document about to be released.
    pub new_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleOutcome {
    Proposed {
        name: String,
        previous: Option<Version>,
        next: Version,
        diff: Diff,
    },
    Skipped {
        name: String,
        reason: String,
    },
}

impl ModuleOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Proposed { name, .. } | Self::Skipped { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseProposal {
    /// Highest proposal across modules.
    pub version: Version,
    pub modules: Vec<ModuleOutcome>,
}

pub struct ReleaseService {
    filesystem: Arc<dyn Filesystem>,
    policy: BumpPolicy,
}

impl ReleaseService {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            policy: BumpPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: BumpPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> BumpPolicy {
        self.policy
    }

    /// Read and decode a document file.
    pub fn load_document(&self, path: &Path) -> SpecsmithResult<Document> {
        let bytes = self.filesystem.read_file(path)?;
        let ext = path.extension().and_then(|e| e.to_str());
        Ok(decode(&bytes, ext, &path.display().to_string())?)
    }

    /// Diff two document files.
    #[instrument(skip_all, fields(old = %old.display(), new = %new.display()))]
    pub fn compare(&self, old: &Path, new: &Path) -> SpecsmithResult<Diff> {
        let old = self.load_document(old)?;
        let new = self.load_document(new)?;
        Ok(diff(&old, &new))
    }

    /// Diff and propose a version for a single module.
    pub fn propose_module(&self, module: &ModuleSpec) -> SpecsmithResult<(Diff, Version)> {
        // A first release may not have an old document yet.
        let old = if module.previous.is_none() && !self.filesystem.exists(&module.old_file) {
            Document::default()
        } else {
            self.load_document(&module.old_file)?
        };
        let new = self.load_document(&module.new_file)?;
        let changes = diff(&old, &new);
        let next = next_version(module.previous.as_ref(), &changes, self.policy);
        Ok((changes, next))
    }

    /// Propose versions for every module and the overall highest one.
    #[instrument(skip_all, fields(modules = modules.len()))]
    pub fn propose(&self, modules: &[ModuleSpec]) -> ReleaseProposal {
        let outcomes: Vec<ModuleOutcome> = modules
            .iter()
            .map(|module| match self.propose_module(module) {
                Ok((diff, next)) => {
                    info!(module = %module.name, next = %next, changes = diff.len(), "proposed version");
                    ModuleOutcome::Proposed {
                        name: module.name.clone(),
                        previous: module.previous.clone(),
                        next,
                        diff,
                    }
                }
                Err(e) => {
                    warn!(module = %module.name, error = %e, "skipping module");
                    ModuleOutcome::Skipped {
                        name: module.name.clone(),
                        reason: e.to_string(),
                    }
                }
            })
            .collect();

        let version = highest_version(outcomes.iter().filter_map(|o| match o {
            ModuleOutcome::Proposed { next, .. } => Some(next.clone()),
            ModuleOutcome::Skipped { .. } => None,
        }));

        ReleaseProposal {
            version,
            modules: outcomes,
        }
    }
}
