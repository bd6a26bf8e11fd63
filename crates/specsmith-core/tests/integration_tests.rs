//! Integration tests for specsmith-core, wired with in-test port doubles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use semver::Version;
use specsmith_core::{
    application::{ApplicationError, ModuleOutcome, ModuleSpec},
    domain::{Location, SpecConfig, decode},
    prelude::*,
};

#[derive(Default)]
struct Files(Mutex<HashMap<PathBuf, Vec<u8>>>);

impl Filesystem for Files {
    fn read_file(&self, path: &Path) -> SpecsmithResult<Vec<u8>> {
        self.0.lock().unwrap().get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "missing".into(),
            }
            .into()
        })
    }

    fn write_file(&self, path: &Path, content: &str) -> SpecsmithResult<()> {
        self.0.lock().unwrap().insert(path.to_path_buf(), content.as_bytes().to_vec());
        Ok(())
    }

    fn create_dir_all(&self, _path: &Path) -> SpecsmithResult<()> {
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.0.lock().unwrap().contains_key(path)
    }

    fn remove_file(&self, path: &Path) -> SpecsmithResult<()> {
        self.0.lock().unwrap().remove(path);
        Ok(())
    }
}

struct Served(HashMap<String, &'static str>);

impl ResourceFetcher for Served {
    fn fetch(&self, location: &Location) -> SpecsmithResult<Vec<u8>> {
        self.0
            .get(&location.to_string())
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| {
                ApplicationError::Fetch {
                    location: location.to_string(),
                    reason: "404 Not Found".into(),
                }
                .into()
            })
    }
}

struct Unused;

impl DocumentConverter for Unused {
    fn convert(&self, _: &Document, from: Dialect, _: Dialect) -> SpecsmithResult<Document> {
        panic!("no conversion expected for {from}");
    }
}

const USERS: &str = r#"
openapi: 3.0.3
info: {title: users, version: "1"}
paths:
  /users:
    get:
      operationId: listUsers
      responses: {"200": {description: ok}}
"#;

const ORDERS: &str = r#"{
  "openapi": "3.0.3",
  "paths": {
    "/orders": {
      "get": {"operationId": "listOrders", "responses": {"200": {"description": "ok"}}},
      "delete": {"operationId": "purgeOrders", "responses": {"204": {"description": "gone"}}}
    }
  }
}"#;

fn project(sources: &[&str]) -> ProjectConfig {
    ProjectConfig {
        name: "shop".into(),
        spec: SpecConfig {
            sources: sources.iter().map(|u| SpecSource::url(*u).unwrap()).collect(),
            customization: Customization {
                version: "2.0.0".into(),
                prune_operations: vec!["purgeOrders".into()],
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    }
    .with_defaults()
}

fn served() -> Arc<Served> {
    Arc::new(Served(HashMap::from([
        ("https://users.example.com/openapi.yaml".to_string(), USERS),
        ("https://orders.example.com/openapi.json".to_string(), ORDERS),
    ])))
}

#[test]
fn update_then_release_flow() {
    let files = Arc::new(Files::default());
    let service = AggregationService::new(served(), Arc::new(Unused), files.clone());

    let first = project(&["https://users.example.com/openapi.yaml"]);
    let outcome = service.update(Path::new("/repo"), &first).unwrap();
    assert!(matches!(outcome, UpdateOutcome::Written { changes: None, sources: 1, .. }));

    let old = files.read_file(Path::new("/repo/openapi.yaml")).unwrap();
    files.write_file(Path::new("/repo/previous.yaml"), std::str::from_utf8(&old).unwrap()).unwrap();

    let second = project(&[
        "https://users.example.com/openapi.yaml",
        "https://orders.example.com/openapi.json",
    ]);
    let outcome = service.update(Path::new("/repo"), &second).unwrap();
    let UpdateOutcome::Written { changes: Some(changes), .. } = outcome else {
        panic!("expected a change report, got {outcome:?}");
    };
    assert_eq!(changes.highest_severity(), Some(Severity::Minor));

    let written = files.read_file(Path::new("/repo/openapi.yaml")).unwrap();
    let doc = decode(&written, Some("yaml"), "openapi.yaml").unwrap();
    assert!(doc.pointer("/paths/~1orders/get").is_some());
    assert!(doc.pointer("/paths/~1orders/delete").is_none());
    assert_eq!(doc.pointer("/info/version").and_then(Document::as_str), Some("2.0.0"));

    let release = ReleaseService::new(files.clone());
    let proposal = release.propose(&[ModuleSpec {
        name: "shop".into(),
        previous: Some(Version::new(1, 3, 0)),
        old_file: "/repo/previous.yaml".into(),
        new_file: "/repo/openapi.yaml".into(),
    }]);
    assert_eq!(proposal.version, Version::new(1, 4, 0));
    assert!(matches!(&proposal.modules[0], ModuleOutcome::Proposed { .. }));
}

#[test]
fn unreachable_source_aborts_without_writing() {
    let files = Arc::new(Files::default());
    let service = AggregationService::new(served(), Arc::new(Unused), files.clone()).with_workers(2);

    let err = service
        .update(
            Path::new("/repo"),
            &project(&[
                "https://users.example.com/openapi.yaml",
                "https://missing.example.com/openapi.yaml",
            ]),
        )
        .unwrap_err();

    assert!(err.is_retryable());
    assert!(!files.exists(Path::new("/repo/openapi.yaml")));
}
