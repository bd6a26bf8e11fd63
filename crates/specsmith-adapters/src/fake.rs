//! In-process stand-ins for the external executable, for tests and dry runs.

use std::sync::Mutex;

use specsmith_core::{
    application::{
        ApplicationError,
        ports::{CodeGenerator, DocumentConverter, GenerationRequest},
    },
    domain::{Dialect, Document, Mapping},
    error::SpecsmithResult,
};

/// Structural Swagger 2.0 → OpenAPI 3.0 conversion, enough for tests.
///
/// Moves `definitions` to `components/schemas` and retargets `$ref`s; all
/// other content is carried over untouched.
#[derive(Debug, Default)]
pub struct FakeConverter {
    calls: Mutex<Vec<(Dialect, Dialect)>>,
}

impl FakeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(from, to)` of every conversion so far.
    pub fn calls(&self) -> Vec<(Dialect, Dialect)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl DocumentConverter for FakeConverter {
    fn convert(&self, document: &Document, from: Dialect, to: Dialect) -> SpecsmithResult<Document> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((from, to));
        }
        if (from, to) != (Dialect::SchemaV1, Dialect::SchemaV2) {
            return Err(ApplicationError::Conversion {
                reason: format!("cannot convert from {from} to {to}"),
            }
            .into());
        }

        let mut root = document.as_mapping().cloned().unwrap_or_default();
        root.remove("swagger");
        root.insert("openapi", Document::from("3.0.3"));
        if let Some(definitions) = root.remove("definitions") {
            let mut components = Mapping::new();
            components.insert("schemas", definitions);
            root.insert("components", Document::from(components));
        }

        let mut converted = Document::from(root);
        retarget_refs(&mut converted);
        Ok(converted)
    }
}

fn retarget_refs(node: &mut Document) {
    match node {
        Document::Mapping(map) => {
            for (key, value) in map.iter_mut() {
                if key == "$ref" {
                    let retargeted = value
                        .as_str()
                        .and_then(|r| r.strip_prefix("#/definitions/"))
                        .map(|target| format!("#/components/schemas/{target}"));
                    if let Some(retargeted) = retargeted {
                        *value = Document::string(retargeted);
                    }
                } else {
                    retarget_refs(value);
                }
            }
        }
        Document::Sequence(items) => items.iter_mut().for_each(retarget_refs),
        Document::Scalar(_) => {}
    }
}

/// Records generation requests instead of running anything.
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    requests: Mutex<Vec<GenerationRequest>>,
    failure: Option<(Option<i32>, String)>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator that records, then fails like a non-zero exit.
    pub fn failing(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            failure: Some((Some(exit_code), stderr.into())),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl CodeGenerator for RecordingGenerator {
    fn generate(&self, request: &GenerationRequest) -> SpecsmithResult<()> {
        self.requests
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?
            .push(request.clone());
        match &self.failure {
            Some((exit_code, stderr)) => Err(ApplicationError::Generation {
                exit_code: *exit_code,
                stderr: stderr.clone(),
            }
            .into()),
            None => Ok(()),
        }
    }
}
