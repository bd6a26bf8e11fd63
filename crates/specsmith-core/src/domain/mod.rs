// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Specsmith.
//!
//! Pure transformations over parsed API descriptions. Fetching, dialect
//! conversion and code generation are reached through ports defined in the
//! application layer.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ─decode─▶ Document ─merge─▶ Document ─patch─▶ Document ─render─▶ text
//!                                     old, new ─diff─▶ Diff ─next_version─▶ Version
//! ```
//!
//! - **No I/O**: no filesystem, network or process calls
//! - **Never fails on content**: merge and patch always produce a result
//! - **Owned trees**: every stage takes its input by value or by shared reference

pub mod codec;
pub mod diff;
pub mod document;
pub mod entities;
pub mod error;
pub mod extract;
pub mod merge;
pub mod patch;
pub mod sections;
pub mod value_objects;
pub mod version;

mod validation;

pub use codec::{Syntax, declared_version, decode, detect_dialect, render};
pub use diff::{Diff, DiffEntry, diff};
pub use document::{Document, Mapping, Scalar};
pub use entities::{
    Contact, Customization, DEFAULT_SPEC_FILE, GeneratorSettings, License, Location, Maintainer,
    PROJECT_FILE_NAME, ProjectConfig, Repository, Server, SpecConfig, SpecSource,
};
pub use error::{DomainError, ErrorCategory};
pub use extract::extract_embedded_document;
pub use merge::{merge, merge_all};
pub use patch::patch;
pub use validation::DomainValidator;
pub use value_objects::{ChangeKind, Dialect, Severity, SourceFormat};
pub use version::{BOOTSTRAP_VERSION, Bump, BumpPolicy, highest_version, next_version, parse_version};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE_A: &str = r#"
openapi: 3.0.3
info: {title: Pets, version: 1.0.0}
servers: [{url: https://a.example.com}]
paths:
  /pets:
    get:
      operationId: listPets
      responses: {"200": {description: ok}}
"#;

    const SOURCE_B: &str = r#"{
  "openapi": "3.0.3",
  "info": {"title": "Owners", "version": "1.0.0"},
  "paths": {"/owners": {"get": {"operationId": "listOwners", "responses": {"200": {"description": "ok"}}}}}
}"#;

    // ========================================================================
    // Pipeline Tests
    // ========================================================================

    #[test]
    fn merge_then_patch_then_render_is_stable() {
        let a = decode(SOURCE_A.as_bytes(), Some("yaml"), "a.yaml").unwrap();
        let b = decode(SOURCE_B.as_bytes(), None, "b").unwrap();
        let customization = Customization {
            title: "Pet Store".into(),
            servers: vec![Server::new("https://api.example.com")],
            ..Default::default()
        };

        let merged = patch(merge_all([a, b]), &customization);
        assert_eq!(merged.pointer("/info/title").and_then(Document::as_str), Some("Pet Store"));
        assert!(merged.pointer("/paths/~1pets/get").is_some());
        assert!(merged.pointer("/paths/~1owners/get").is_some());
        assert_eq!(merged.get("servers").and_then(Document::as_sequence).map(<[_]>::len), Some(1));

        let rendered = render(&merged, Syntax::Yaml).unwrap();
        assert_eq!(decode(rendered.as_bytes(), Some("yaml"), "out.yaml").unwrap(), merged);
    }

    #[test]
    fn single_source_round_trip_without_customization() {
        let original = decode(SOURCE_A.as_bytes(), Some("yaml"), "a.yaml").unwrap();
        let published = patch(merge_all([original.clone()]), &Customization::default());
        let rendered = render(&published, Syntax::Yaml).unwrap();
        assert_eq!(decode(rendered.as_bytes(), None, "out").unwrap(), original);
    }

    #[test]
    fn release_flow_from_documents() {
        let old = decode(SOURCE_A.as_bytes(), Some("yaml"), "old").unwrap();
        let new = merge(old.clone(), decode(SOURCE_B.as_bytes(), None, "b").unwrap());
        let changes = diff(&old, &new);
        assert_eq!(changes.highest_severity(), Some(Severity::Minor));

        let previous = parse_version("v1.4.2").unwrap();
        let next = next_version(Some(&previous), &changes, BumpPolicy::default());
        assert_eq!(next.to_string(), "1.5.0");
    }
}
