//! Generation Service - hand the canonical document to the code generator.
//!
//! 1. Resolve generator arguments against the allow-list
//! 2. Delete files recorded by the previous generation run
//! 3. Write generator configuration (unless the module ships its own)
//! 4. Invoke the [`CodeGenerator`] port

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, trace, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CodeGenerator, Filesystem, GenerationRequest},
    },
    domain::{Document, ProjectConfig, Syntax, render},
    error::SpecsmithResult,
};

/// File list the generator writes into its output directory.
pub const GENERATED_FILE_LIST: &str = ".openapi-generator/FILES";

/// Hand-maintained generator configuration inside a module.
pub const MODULE_GENERATOR_CONFIG: &str = "openapi-generator.json";

/// Where generated configuration is written for the duration of a run.
pub const GENERATED_CONFIG_FILE: &str = ".openapi-generator/specsmith-config.json";

const NORMALIZER_FLAG: &str = "--openapi-normalizer";

const NORMALIZER_RULES: [&str; 10] = [
    "SIMPLIFY_ANYOF_STRING_AND_ENUM_STRING",
    "SIMPLIFY_BOOLEAN_ENUM",
    "SIMPLIFY_ONEOF_ANYOF",
    "ADD_UNSIGNED_TO_INTEGER_WITH_INVALID_MAX_VALUE",
    "REFACTOR_ALLOF_WITH_PROPERTIES_ONLY",
    "REF_AS_PARENT_IN_ALLOF",
    "REMOVE_ANYOF_ONEOF_AND_KEEP_PROPERTIES_ONLY",
    "KEEP_ONLY_FIRST_TAG_IN_OPERATION",
    "SET_TAGS_FOR_ALL_OPERATIONS",
    "DISABLE_ALL",
];

const DEFAULT_NORMALIZER_RULES: [&str; 5] = [
    "SIMPLIFY_ANYOF_STRING_AND_ENUM_STRING",
    "SIMPLIFY_BOOLEAN_ENUM",
    "SIMPLIFY_ONEOF_ANYOF",
    "ADD_UNSIGNED_TO_INTEGER_WITH_INVALID_MAX_VALUE",
    "REFACTOR_ALLOF_WITH_PROPERTIES_ONLY",
];

/// Generator arguments a project may pass through.
///
/// Injected into [`GenerationService`] so callers can narrow or widen it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentAllowList {
    allowed: Vec<String>,
    defaults: Vec<String>,
}

impl Default for ArgumentAllowList {
    fn default() -> Self {
        let mut allowed = vec!["--skip-validate-spec".to_string(), NORMALIZER_FLAG.to_string()];
        for rule in NORMALIZER_RULES {
            allowed.push(format!("{rule}=true"));
            if rule != "DISABLE_ALL" {
                allowed.push(format!("{rule}=false"));
            }
        }
        let defaults = DEFAULT_NORMALIZER_RULES
            .iter()
            .flat_map(|rule| [NORMALIZER_FLAG.to_string(), format!("{rule}=true")])
            .collect();
        Self { allowed, defaults }
    }
}

impl ArgumentAllowList {
    /// An allow-list of exactly `allowed`, keeping the default arguments.
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Arguments used when a project configures none.
    pub fn with_defaults(mut self, defaults: Vec<String>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    pub fn allows(&self, arg: &str) -> bool {
        self.allowed.iter().any(|a| a == arg)
    }

    /// Effective arguments for `args`; defaults apply when it is empty.
    ///
    /// Defaults are checked like user arguments.
    pub fn resolve(&self, args: &[String]) -> Result<Vec<String>, ApplicationError> {
        let args = if args.is_empty() { self.defaults.clone() } else { args.to_vec() };
        if let Some(arg) = args.iter().find(|a| !self.allows(a)) {
            return Err(ApplicationError::ArgumentNotAllowed { arg: arg.clone() });
        }
        Ok(args)
    }
}

/// Summary of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub output_dir: PathBuf,
    /// Stale files deleted before generating.
    pub removed: usize,
    pub args: Vec<String>,
}

pub struct GenerationService {
    generator: Arc<dyn CodeGenerator>,
    filesystem: Arc<dyn Filesystem>,
    allow_list: ArgumentAllowList,
}

impl GenerationService {
    pub fn new(generator: Arc<dyn CodeGenerator>, filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            generator,
            filesystem,
            allow_list: ArgumentAllowList::default(),
        }
    }

    pub fn with_allow_list(mut self, allow_list: ArgumentAllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Run the generator for `project`.
    ///
    /// `output` overrides the project's output directory; either is
    /// resolved against `base_dir`.
    #[instrument(skip_all, fields(project = %project.name))]
    pub fn generate(
        &self,
        base_dir: &Path,
        project: &ProjectConfig,
        output: Option<&Path>,
    ) -> SpecsmithResult<GenerationOutcome> {
        let args = self.allow_list.resolve(&project.generator.args)?;

        let spec_file = base_dir.join(&project.spec.file);
        if !self.filesystem.exists(&spec_file) {
            return Err(ApplicationError::FilesystemError {
                path: spec_file,
                reason: "aggregated document not found, run `specsmith update` first".into(),
            }
            .into());
        }

        let output_dir = match output.or(project.output.as_deref()) {
            Some(dir) => base_dir.join(dir),
            None => base_dir.to_path_buf(),
        };
        self.filesystem.create_dir_all(&output_dir)?;

        let removed = self.remove_generated_files(&output_dir)?;

        let module_config = output_dir.join(MODULE_GENERATOR_CONFIG);
        let (config_file, temporary) = if self.filesystem.exists(&module_config) {
            debug!(config = %module_config.display(), "using module generator config");
            (module_config, false)
        } else {
            let path = output_dir.join(GENERATED_CONFIG_FILE);
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            let content = render(&generator_config(project), Syntax::Json)?;
            self.filesystem.write_file(&path, &content)?;
            (path, true)
        };

        let request = GenerationRequest {
            spec_file,
            output_dir: output_dir.clone(),
            config_file: config_file.clone(),
            args: args.clone(),
        };
        let result = self.generator.generate(&request);

        if temporary {
            if let Err(e) = self.filesystem.remove_file(&config_file) {
                warn!(error = %e, path = %config_file.display(), "failed to remove generated config");
            }
        }
        result?;

        info!(output = %output_dir.display(), removed, "code generation completed");
        Ok(GenerationOutcome {
            output_dir,
            removed,
            args,
        })
    }

    /// Delete files listed by the previous run; missing ones are skipped.
    fn remove_generated_files(&self, output_dir: &Path) -> SpecsmithResult<usize> {
        let list = output_dir.join(GENERATED_FILE_LIST);
        if !self.filesystem.exists(&list) {
            return Ok(0);
        }

        let bytes = self.filesystem.read_file(&list)?;
        let text = String::from_utf8_lossy(&bytes);
        let mut removed = 0;
        for entry in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let relative = Path::new(entry);
            if !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            {
                warn!(entry, "ignoring file list entry outside the output directory");
                continue;
            }
            let path = output_dir.join(relative);
            if !self.filesystem.exists(&path) {
                continue;
            }
            trace!(path = %path.display(), "deleting generated file");
            self.filesystem.remove_file(&path)?;
            removed += 1;
        }
        info!(count = removed, "deleted generated files");
        Ok(removed)
    }
}

/// Generator configuration with defaults taken from repository metadata.
///
/// Values already present in `additionalProperties` are kept.
pub fn generator_config(project: &ProjectConfig) -> Document {
    let mut config = project.generator.config.as_mapping().cloned().unwrap_or_default();
    config.insert("enablePostProcessFile", Document::from(true));

    let repo = &project.repository;
    let defaults = [
        ("projectName", Some(Document::string(&repo.name))),
        ("projectDescription", Some(Document::string(&repo.description))),
        ("projectRepository", Some(Document::string(&repo.url))),
        ("projectInceptionYear", repo.inception_year.map(|y| Document::from(i64::from(y)))),
        ("projectLicenseName", Some(Document::string(&repo.license_name))),
        ("projectLicenseUrl", Some(Document::string(&repo.license_url))),
    ];

    let mut props = config
        .remove("additionalProperties")
        .and_then(|p| p.as_mapping().cloned())
        .unwrap_or_default();
    for (key, value) in defaults {
        if let Some(value) = value {
            if !props.contains_key(key) {
                props.insert(key, value);
            }
        }
    }
    config.insert("additionalProperties", Document::from(props));
    Document::from(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::{MockCodeGenerator, MockFilesystem};
    use crate::domain::{GeneratorSettings, Repository, decode};
    use crate::error::SpecsmithError;
    use mockall::predicate::{always, eq};
    use pretty_assertions::assert_eq;

    fn project(args: &[&str]) -> ProjectConfig {
        ProjectConfig {
            name: "petstore".into(),
            summary: "Petstore client".into(),
            output: Some("client".into()),
            repository: Repository {
                url: "https://github.com/acme/petstore".into(),
                inception_year: Some(2023),
                ..Default::default()
            },
            generator: GeneratorSettings {
                config: decode(b"generatorName: java\nadditionalProperties: {projectName: custom}\n", None, "cfg")
                    .unwrap(),
                args: args.iter().map(|a| a.to_string()).collect(),
            },
            ..Default::default()
        }
        .with_defaults()
    }

    #[test]
    fn default_allow_list_and_defaults() {
        let list = ArgumentAllowList::default();
        assert!(list.allows("--skip-validate-spec"));
        assert!(list.allows("SIMPLIFY_BOOLEAN_ENUM=false"));
        assert!(list.allows("DISABLE_ALL=true"));
        assert!(!list.allows("DISABLE_ALL=false"));
        assert!(!list.allows("--template-dir"));

        let resolved = list.resolve(&[]).unwrap();
        assert_eq!(resolved.len(), 10);
        assert_eq!(resolved[0], "--openapi-normalizer");
        assert_eq!(resolved[1], "SIMPLIFY_ANYOF_STRING_AND_ENUM_STRING=true");
    }

    #[test]
    fn disallowed_argument_is_rejected() {
        let err = ArgumentAllowList::default()
            .resolve(&["--skip-validate-spec".into(), "--template-dir".into()])
            .unwrap_err();
        assert_eq!(err, ApplicationError::ArgumentNotAllowed { arg: "--template-dir".into() });
    }

    #[test]
    fn restricted_allow_list_also_checks_defaults() {
        let strict = ArgumentAllowList::new(["--skip-validate-spec"]);
        assert!(strict.resolve(&[]).is_err());
        assert!(strict.resolve(&["--skip-validate-spec".into()]).is_ok());
        let strict = strict.with_defaults(vec!["--skip-validate-spec".into()]);
        assert_eq!(strict.resolve(&[]).unwrap(), vec!["--skip-validate-spec".to_string()]);
    }

    #[test]
    fn config_defaults_fill_from_repository() {
        let config = generator_config(&project(&[]));
        let expected = decode(
            br#"{
              "generatorName": "java",
              "enablePostProcessFile": true,
              "additionalProperties": {
                "projectName": "custom",
                "projectDescription": "Petstore client",
                "projectRepository": "https://github.com/acme/petstore",
                "projectInceptionYear": 2023,
                "projectLicenseName": "",
                "projectLicenseUrl": ""
              }
            }"#,
            Some("json"),
            "expected",
        )
        .unwrap();
        assert_eq!(config, expected);
    }

    #[test]
    fn generate_cleans_up_and_invokes_generator() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|p| {
            [
                "/work/openapi.yaml",
                "/work/client/.openapi-generator/FILES",
                "/work/client/src/Api.java",
            ]
            .iter()
            .any(|known| Path::new(known) == p)
        });
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_read_file()
            .with(eq(PathBuf::from("/work/client/.openapi-generator/FILES")))
            .returning(|_| Ok(b"src/Api.java\nsrc/Gone.java\n../outside.txt\n\n".to_vec()));
        fs.expect_remove_file()
            .with(eq(PathBuf::from("/work/client/src/Api.java")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_write_file()
            .with(eq(PathBuf::from("/work/client/.openapi-generator/specsmith-config.json")), always())
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_remove_file()
            .with(eq(PathBuf::from("/work/client/.openapi-generator/specsmith-config.json")))
            .times(1)
            .returning(|_| Ok(()));

        let mut generator = MockCodeGenerator::new();
        generator
            .expect_generate()
            .withf(|req| {
                req.spec_file == Path::new("/work/openapi.yaml")
                    && req.output_dir == Path::new("/work/client")
                    && req.args == vec!["--skip-validate-spec".to_string()]
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = GenerationService::new(Arc::new(generator), Arc::new(fs));
        let outcome = service
            .generate(Path::new("/work"), &project(&["--skip-validate-spec"]), None)
            .unwrap();
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.output_dir, PathBuf::from("/work/client"));
    }

    #[test]
    fn generator_failure_is_surfaced_after_cleanup() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|p| p == Path::new("/work/openapi.yaml"));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs.expect_remove_file().times(1).returning(|_| Ok(()));

        let mut generator = MockCodeGenerator::new();
        generator.expect_generate().returning(|_| {
            Err(ApplicationError::Generation {
                exit_code: Some(1),
                stderr: "invalid spec".into(),
            }
            .into())
        });

        let service = GenerationService::new(Arc::new(generator), Arc::new(fs));
        let err = service.generate(Path::new("/work"), &project(&[]), None).unwrap_err();
        assert_eq!(
            err,
            SpecsmithError::Application(ApplicationError::Generation {
                exit_code: Some(1),
                stderr: "invalid spec".into(),
            })
        );
    }

    #[test]
    fn missing_document_fails_before_generating() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        let mut generator = MockCodeGenerator::new();
        generator.expect_generate().never();

        let service = GenerationService::new(Arc::new(generator), Arc::new(fs));
        let err = service.generate(Path::new("/work"), &project(&[]), None).unwrap_err();
        assert!(matches!(
            err,
            SpecsmithError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
