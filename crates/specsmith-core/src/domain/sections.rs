//! Where the well-known sections live inside a document tree.
//!
//! Both dialects are covered: schema definitions sit under
//! `components/schemas` in the newer one and `definitions` in the older.

use crate::domain::document::{Document, Mapping};

/// Path-item keys that hold operations.
pub const OPERATION_METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

pub fn is_operation_method(key: &str) -> bool {
    OPERATION_METHODS.contains(&key)
}

pub fn paths(doc: &Document) -> Option<&Mapping> {
    doc.get("paths").and_then(Document::as_mapping)
}

pub fn paths_mut(doc: &mut Document) -> Option<&mut Mapping> {
    doc.get_mut("paths").and_then(Document::as_mapping_mut)
}

/// Schema definitions together with the pointer prefix they live under.
pub fn schemas(doc: &Document) -> Option<(&'static str, &Mapping)> {
    if let Some(schemas) = doc.pointer("/components/schemas").and_then(Document::as_mapping) {
        return Some(("/components/schemas", schemas));
    }
    doc.get("definitions")
        .and_then(Document::as_mapping)
        .map(|defs| ("/definitions", defs))
}

/// Every schema-definition mapping present, in either location.
pub fn schemas_mut(doc: &mut Document) -> Vec<&mut Mapping> {
    let Some(root) = doc.as_mapping_mut() else {
        return Vec::new();
    };
    let mut found = Vec::new();
    for (key, value) in root.iter_mut() {
        match key {
            "definitions" => found.extend(value.as_mapping_mut()),
            "components" => found.extend(value.get_mut("schemas").and_then(Document::as_mapping_mut)),
            _ => {}
        }
    }
    found
}

/// Reusable parameter definitions (`components/parameters` or `parameters`).
pub fn component_parameters(doc: &Document) -> Option<(&'static str, &Mapping)> {
    if let Some(params) = doc.pointer("/components/parameters").and_then(Document::as_mapping) {
        return Some(("/components/parameters", params));
    }
    doc.get("parameters")
        .and_then(Document::as_mapping)
        .map(|params| ("/parameters", params))
}
