//! Format Normalizer - bytes to a document in the target dialect.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::ports::DocumentConverter,
    domain::{Dialect, Document, SpecSource, decode, detect_dialect},
    error::SpecsmithResult,
};

/// Decodes fetched bytes and converts older-dialect documents.
///
/// Only the decision to convert lives here; the conversion itself is
/// delegated to the [`DocumentConverter`] port.
#[derive(Clone)]
pub struct Normalizer {
    converter: Arc<dyn DocumentConverter>,
    target: Dialect,
}

impl Normalizer {
    pub fn new(converter: Arc<dyn DocumentConverter>, target: Dialect) -> Self {
        Self { converter, target }
    }

    pub fn with_target(mut self, target: Dialect) -> Self {
        self.target = target;
        self
    }

    pub fn target(&self) -> Dialect {
        self.target
    }

    /// Unknown dialects are never converted.
    pub fn needs_conversion(&self, dialect: Dialect) -> bool {
        dialect.is_known() && self.target.is_known() && dialect != self.target
    }

    #[instrument(skip_all, fields(source = %source))]
    pub fn normalize(&self, source: &SpecSource, bytes: &[u8]) -> SpecsmithResult<Document> {
        let hint = source.extension_hint();
        let document = decode(bytes, hint.as_deref(), &source.location().to_string())?;

        let dialect = if source.dialect().is_known() {
            source.dialect()
        } else {
            detect_dialect(&document)
        };

        if self.needs_conversion(dialect) {
            debug!(from = %dialect, to = %self.target, "converting dialect");
            self.converter.convert(&document, dialect, self.target)
        } else {
            debug!(dialect = %dialect, "no conversion needed");
            Ok(document)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ApplicationError, ports::output::MockDocumentConverter};
    use crate::error::SpecsmithError;
    use mockall::predicate::{always, eq};

    fn never_called() -> Arc<dyn DocumentConverter> {
        let mut mock = MockDocumentConverter::new();
        mock.expect_convert().never();
        Arc::new(mock)
    }

    #[test]
    fn target_dialect_is_left_alone() {
        let normalizer = Normalizer::new(never_called(), Dialect::SchemaV2);
        let source = SpecSource::url("https://x.io/openapi.json").unwrap();
        let doc = normalizer.normalize(&source, br#"{"openapi":"3.0.1"}"#).unwrap();
        assert_eq!(doc.get("openapi").and_then(Document::as_str), Some("3.0.1"));
    }

    #[test]
    fn unknown_dialect_is_never_converted() {
        let normalizer = Normalizer::new(never_called(), Dialect::SchemaV2);
        let source = SpecSource::file("partial.yaml").unwrap();
        assert!(normalizer.normalize(&source, b"paths: {}\n").is_ok());
    }

    #[test]
    fn detected_older_dialect_is_converted() {
        let mut mock = MockDocumentConverter::new();
        mock.expect_convert()
            .with(always(), eq(Dialect::SchemaV1), eq(Dialect::SchemaV2))
            .times(1)
            .returning(|_, _, _| Ok(Document::from(crate::domain::Mapping::from_iter([(
                "openapi".to_string(),
                Document::string("3.0.3"),
            )]))));

        let normalizer = Normalizer::new(Arc::new(mock), Dialect::SchemaV2);
        let source = SpecSource::url("https://x.io/v2/swagger").unwrap();
        let doc = normalizer.normalize(&source, b"swagger: '2.0'\n").unwrap();
        assert_eq!(doc.get("openapi").and_then(Document::as_str), Some("3.0.3"));
    }

    #[test]
    fn declared_dialect_wins_over_detection() {
        let mut mock = MockDocumentConverter::new();
        mock.expect_convert()
            .times(1)
            .returning(|_, _, _| Err(ApplicationError::Conversion { reason: "exit 1".into() }.into()));

        let normalizer = Normalizer::new(Arc::new(mock), Dialect::SchemaV2);
        let source = SpecSource::file("legacy.json").unwrap().with_dialect(Dialect::SchemaV1);
        let err = normalizer.normalize(&source, br#"{"info":{}}"#).unwrap_err();
        assert!(matches!(err, SpecsmithError::Application(ApplicationError::Conversion { .. })));
    }
}
