//! Decoding raw bytes into a [`Document`] and rendering it back.
//!
//! Decoding order:
//! 1. An explicit extension decides (`json` → JSON, `yaml`/`yml` → YAML).
//! 2. Otherwise YAML is tried first, then JSON.
//!
//! Rendering always re-serializes the whole tree; formatting and key order
//! of untouched input are not preserved byte-for-byte.

use std::fmt;

use crate::domain::{document::Document, error::DomainError, value_objects::Dialect};

/// Textual serialization of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Json,
    Yaml,
}

impl Syntax {
    pub fn from_extension(ext: Option<&str>) -> Option<Self> {
        match ext?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

/// Decode raw bytes into a document tree.
///
/// The root must be a mapping; anything else (an HTML error page decodes
/// as a YAML string) is rejected as unparseable.
pub fn decode(bytes: &[u8], extension: Option<&str>, source_name: &str) -> Result<Document, DomainError> {
    let unparseable = |reason: String| DomainError::UnparseableDocument {
        source_name: source_name.to_string(),
        reason,
    };

    let text = std::str::from_utf8(bytes).map_err(|e| unparseable(format!("not UTF-8: {e}")))?;
    let text = text.trim_start_matches('\u{feff}');

    let document = match Syntax::from_extension(extension) {
        Some(Syntax::Json) => serde_json::from_str::<Document>(text).map_err(|e| unparseable(format!("json: {e}")))?,
        Some(Syntax::Yaml) => serde_yaml::from_str::<Document>(text).map_err(|e| unparseable(format!("yaml: {e}")))?,
        None => match serde_yaml::from_str::<Document>(text) {
            Ok(doc) => doc,
            Err(yaml_err) => serde_json::from_str::<Document>(text).map_err(|json_err| {
                unparseable(format!("attempts: yaml ({yaml_err}), json ({json_err})"))
            })?,
        },
    };

    if document.as_mapping().is_none() {
        return Err(unparseable(format!(
            "document root must be a mapping, found {}",
            document.kind()
        )));
    }
    Ok(document)
}

/// Render a document in the given syntax.
pub fn render(document: &Document, syntax: Syntax) -> Result<String, DomainError> {
    let render_err = |reason: String| DomainError::Render { reason };
    match syntax {
        Syntax::Json => serde_json::to_string_pretty(document)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| render_err(e.to_string())),
        Syntax::Yaml => serde_yaml::to_string(document).map_err(|e| render_err(e.to_string())),
    }
}

/// Detect the dialect a document declares at its root.
pub fn detect_dialect(document: &Document) -> Dialect {
    if let Some(v) = document.get("swagger").and_then(version_text) {
        if v.starts_with("2.") || v == "2" {
            return Dialect::SchemaV1;
        }
    }
    if let Some(v) = document.get("openapi").and_then(version_text) {
        if v.starts_with("3.") || v == "3" {
            return Dialect::SchemaV2;
        }
    }
    Dialect::Unknown
}

/// `(major, minor)` of the declared `openapi`/`swagger` version.
pub fn declared_version(document: &Document) -> Option<(u64, u64)> {
    let text = document
        .get("openapi")
        .or_else(|| document.get("swagger"))
        .and_then(version_text)?;
    let mut parts = text.split('.');
    let major = parts.next()?.trim().parse().ok()?;
    let minor = parts.next().and_then(|m| m.trim().parse().ok()).unwrap_or(0);
    Some((major, minor))
}

// `swagger: 2.0` in YAML decodes as a float, so accept any scalar.
fn version_text(node: &Document) -> Option<String> {
    node.as_scalar().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extension_selects_json() {
        let doc = decode(br#"{"openapi":"3.0.0"}"#, Some("json"), "a.json").unwrap();
        assert_eq!(doc.get("openapi").and_then(Document::as_str), Some("3.0.0"));
    }

    #[test]
    fn explicit_json_extension_rejects_yaml() {
        let err = decode(b"openapi: 3.0.0", Some("json"), "a.json").unwrap_err();
        assert!(matches!(err, DomainError::UnparseableDocument { .. }));
    }

    #[test]
    fn no_extension_falls_back_through_yaml_then_json() {
        let doc = decode(b"openapi: 3.1.0\ninfo:\n  title: t\n", None, "spec").unwrap();
        assert_eq!(declared_version(&doc), Some((3, 1)));
        let doc = decode(br#"{"swagger":"2.0"}"#, None, "spec").unwrap();
        assert_eq!(detect_dialect(&doc), Dialect::SchemaV1);
    }

    #[test]
    fn garbage_is_unparseable() {
        let err = decode(b"{ not: [valid", None, "spec").unwrap_err();
        match err {
            DomainError::UnparseableDocument { source_name, reason } => {
                assert_eq!(source_name, "spec");
                assert!(reason.contains("yaml") && reason.contains("json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn tagged_yaml_values_decode() {
        let doc = decode(b"openapi: 3.0.3\nx-t: !custom x\n", None, "tagged").unwrap();
        assert_eq!(doc.get("x-t").and_then(Document::as_str), Some("x"));
    }

    #[test]
    fn scalar_root_is_unparseable() {
        assert!(decode(b"<html>nope</html>", None, "page").is_err());
    }

    #[test]
    fn yaml_float_swagger_version_is_detected() {
        let doc = decode(b"swagger: 2.0\n", Some("yaml"), "s.yaml").unwrap();
        assert_eq!(detect_dialect(&doc), Dialect::SchemaV1);
    }

    #[test]
    fn unknown_dialect_without_marker() {
        let doc = decode(b"info: {}\n", None, "x").unwrap();
        assert_eq!(detect_dialect(&doc), Dialect::Unknown);
    }

    #[test]
    fn render_round_trips_structurally() {
        let src = "openapi: 3.0.3\npaths:\n  /a:\n    get:\n      responses:\n        200:\n          description: ok\n";
        let doc = decode(src.as_bytes(), Some("yaml"), "a.yaml").unwrap();
        for syntax in [Syntax::Yaml, Syntax::Json] {
            let text = render(&doc, syntax).unwrap();
            let back = decode(text.as_bytes(), None, "rendered").unwrap();
            assert_eq!(back, doc);
        }
    }
}
