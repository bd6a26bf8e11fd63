//! Pulling an embedded document out of a documentation UI bootstrap script.
//!
//! The script assigns an options object whose `swaggerDoc` member is the
//! whole API description, immediately followed by `customOptions`. No
//! JavaScript parsing happens here; if the bundling format changes the
//! pattern stops matching and extraction fails loudly.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

static EMBEDDED_DOC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""swaggerDoc":([\S\s]*),[\n\s]*"customOptions""#)
        .expect("embedded document pattern is a valid regex")
});

/// Return the embedded document literal found in `script`.
///
/// `location` names the script in the error.
pub fn extract_embedded_document<'a>(script: &'a str, location: &str) -> Result<&'a str, DomainError> {
    EMBEDDED_DOC
        .captures(script)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|doc| !doc.is_empty())
        .ok_or_else(|| DomainError::Extraction {
            location: location.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_literal_between_markers() {
        let body = r#"window.onload = function() {
  var options = {"swaggerDoc":{"openapi":"3.0.0"},"customOptions":{}};
};"#;
        assert_eq!(
            extract_embedded_document(body, "init.js").unwrap(),
            r#"{"openapi":"3.0.0"}"#
        );
    }

    #[test]
    fn tolerates_newline_before_trailing_marker() {
        let body = "{\"swaggerDoc\":{\"openapi\":\"3.1.0\",\"paths\":{}},\n   \"customOptions\": {}}";
        assert_eq!(
            extract_embedded_document(body, "init.js").unwrap(),
            r#"{"openapi":"3.1.0","paths":{}}"#
        );
    }

    #[test]
    fn missing_trailing_marker_fails() {
        let err = extract_embedded_document(r#"{"swaggerDoc":{"openapi":"3.0.0"}}"#, "init.js").unwrap_err();
        assert_eq!(
            err,
            DomainError::Extraction {
                location: "init.js".into()
            }
        );
    }

    #[test]
    fn missing_document_marker_fails() {
        assert!(extract_embedded_document(r#"{"customOptions":{}}"#, "init.js").is_err());
    }
}
