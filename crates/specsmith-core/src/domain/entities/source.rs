//! Spec sources and the locations they resolve to.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{Dialect, SourceFormat},
};

/// Script served next to a documentation UI that embeds the document.
pub const SCRAPED_UI_SCRIPT: &str = "swagger-ui-init.js";

/// Where raw bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    Url(String),
    File(PathBuf),
}

impl Location {
    /// Lower-cased file extension, if the location has one.
    ///
    /// Query strings and fragments are ignored for URLs.
    pub fn extension(&self) -> Option<String> {
        let path = match self {
            Self::Url(url) => {
                let end = url.find(['?', '#']).unwrap_or(url.len());
                let path = &url[..end];
                let name = path.rsplit('/').next().unwrap_or(path);
                return name
                    .rsplit_once('.')
                    .map(|(_, ext)| ext.to_ascii_lowercase())
                    .filter(|ext| !ext.is_empty());
            }
            Self::File(path) => path,
        };
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }

    fn join(&self, segment: &str) -> Self {
        match self {
            Self::Url(url) => Self::Url(format!("{}/{segment}", url.trim_end_matches('/'))),
            Self::File(path) => Self::File(path.join(segment)),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One raw API description to fetch, normalize and merge.
///
/// Invariant: exactly one of `url`/`file` is set. Constructed through
/// [`SpecSource::new`] or deserialization (which validates the same way)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpecSource", into = "RawSpecSource")]
pub struct SpecSource {
    location: Location,
    format: SourceFormat,
    dialect: Dialect,
}

impl SpecSource {
    pub fn new(
        url: Option<String>,
        file: Option<PathBuf>,
        format: SourceFormat,
        dialect: Dialect,
    ) -> Result<Self, DomainError> {
        let location = match (url, file) {
            (Some(url), None) if !url.trim().is_empty() => Location::Url(url),
            (None, Some(file)) if !file.as_os_str().is_empty() => Location::File(file),
            (Some(_), Some(_)) => {
                return Err(DomainError::InvalidSource(
                    "both `url` and `file` are set".into(),
                ));
            }
            _ => {
                return Err(DomainError::InvalidSource(
                    "one of `url` or `file` is required".into(),
                ));
            }
        };
        Ok(Self {
            location,
            format,
            dialect,
        })
    }

    /// A raw spec served at `url`, dialect detected after decoding.
    pub fn url(url: impl Into<String>) -> Result<Self, DomainError> {
        Self::new(Some(url.into()), None, SourceFormat::RawSpec, Dialect::Unknown)
    }

    /// A raw spec read from a local file, dialect detected after decoding.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        Self::new(None, Some(path.into()), SourceFormat::RawSpec, Dialect::Unknown)
    }

    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The resource that actually has to be fetched.
    ///
    /// For scraped-UI sources this is the bootstrap script derived from the
    /// configured base location.
    pub fn resource(&self) -> Location {
        match self.format {
            SourceFormat::RawSpec => self.location.clone(),
            SourceFormat::ScrapedUi => self.location.join(SCRAPED_UI_SCRIPT),
        }
    }

    /// File-extension hint for the decoder.
    ///
    /// The scraped body is the `swaggerDoc` value of a serialized JS object,
    /// so it is decoded as strict JSON rather than through the YAML fallback;
    /// a truncated match then fails as JSON instead of decoding as a YAML
    /// string.
    pub fn extension_hint(&self) -> Option<String> {
        match self.format {
            SourceFormat::RawSpec => self.location.extension(),
            SourceFormat::ScrapedUi => Some("json".into()),
        }
    }
}

impl fmt::Display for SpecSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.location, self.format)
    }
}

/// Configuration shape of a source: `{url|file, format, type}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawSpecSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<PathBuf>,
    #[serde(default)]
    format: SourceFormat,
    #[serde(default, rename = "type")]
    dialect: Dialect,
}

impl TryFrom<RawSpecSource> for SpecSource {
    type Error = DomainError;

    fn try_from(raw: RawSpecSource) -> Result<Self, Self::Error> {
        SpecSource::new(raw.url, raw.file, raw.format, raw.dialect)
    }
}

impl From<SpecSource> for RawSpecSource {
    fn from(source: SpecSource) -> Self {
        let (url, file) = match source.location {
            Location::Url(url) => (Some(url), None),
            Location::File(path) => (None, Some(path)),
        };
        Self {
            url,
            file,
            format: source.format,
            dialect: source.dialect,
        }
    }
}

/// Resolve a file source relative to a project directory.
pub fn resolve_file(base: &Path, location: &Location) -> Location {
    match location {
        Location::File(path) if path.is_relative() => Location::File(base.join(path)),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_both_url_and_file() {
        let err = SpecSource::new(
            Some("https://x/openapi.yaml".into()),
            Some("openapi.yaml".into()),
            SourceFormat::RawSpec,
            Dialect::Unknown,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSource(_)));
    }

    #[test]
    fn rejects_neither_url_nor_file() {
        assert!(SpecSource::new(None, None, SourceFormat::RawSpec, Dialect::Unknown).is_err());
        assert!(SpecSource::url("  ").is_err());
    }

    #[test]
    fn scraped_ui_resource_is_derived_script() {
        let source = SpecSource::url("https://api.example.com/docs/")
            .unwrap()
            .with_format(SourceFormat::ScrapedUi);
        assert_eq!(
            source.resource(),
            Location::Url("https://api.example.com/docs/swagger-ui-init.js".into())
        );
    }

    #[test]
    fn raw_resource_is_location_itself() {
        let source = SpecSource::file("specs/a.json").unwrap();
        assert_eq!(source.resource(), Location::File("specs/a.json".into()));
    }

    #[test]
    fn scraped_ui_decodes_as_json_regardless_of_location() {
        let source = SpecSource::url("https://api.example.com/docs.yaml")
            .unwrap()
            .with_format(SourceFormat::ScrapedUi);
        assert_eq!(source.extension_hint().as_deref(), Some("json"));
        let raw = SpecSource::url("https://api.example.com/docs.yaml").unwrap();
        assert_eq!(raw.extension_hint().as_deref(), Some("yaml"));
    }

    #[test]
    fn url_extension_ignores_query() {
        let loc = Location::Url("https://x.io/v1/openapi.JSON?token=abc".into());
        assert_eq!(loc.extension().as_deref(), Some("json"));
        let loc = Location::Url("https://x.io/v1/spec".into());
        assert_eq!(loc.extension(), None);
    }

    #[test]
    fn deserializes_configuration_form() {
        let yaml = "url: https://x.io/swagger.json\nformat: spec\ntype: swagger2\n";
        let source: SpecSource = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(source.dialect(), Dialect::SchemaV1);
        assert_eq!(source.format(), SourceFormat::RawSpec);
        assert_eq!(source.location(), &Location::Url("https://x.io/swagger.json".into()));
    }

    #[test]
    fn deserialization_enforces_exactly_one_location() {
        let yaml = "format: spec\n";
        assert!(serde_yaml::from_str::<SpecSource>(yaml).is_err());
    }

    #[test]
    fn relative_files_resolve_against_base() {
        let loc = resolve_file(Path::new("/work"), &Location::File("api.yaml".into()));
        assert_eq!(loc, Location::File("/work/api.yaml".into()));
    }
}
