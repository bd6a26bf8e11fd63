//! Domain value objects: SourceFormat, Dialect, Severity, ChangeKind.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity. This
//! file defines the types, their string representations, and their `FromStr`
//! parsers. Behavior that depends on a document lives with the algorithms
//! that use it.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── SourceFormat ─────────────────────────────────────────────────────────────

/// How the bytes of a spec source are obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceFormat {
    /// The location serves the API description itself.
    #[default]
    #[serde(rename = "spec", alias = "raw")]
    RawSpec,
    /// The location hosts a documentation UI whose bootstrap script embeds
    /// the API description.
    #[serde(rename = "swagger-ui", alias = "scraped-ui")]
    ScrapedUi,
}

impl SourceFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RawSpec => "spec",
            Self::ScrapedUi => "swagger-ui",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "spec" | "raw" => Ok(Self::RawSpec),
            "swagger-ui" | "swaggerui" | "scraped-ui" => Ok(Self::ScrapedUi),
            other => Err(DomainError::InvalidSource(format!(
                "unknown source format: {other}"
            ))),
        }
    }
}

// ── Dialect ──────────────────────────────────────────────────────────────────

/// Schema generation of an API description.
///
/// `SchemaV1` is the older Swagger 2.0 shape, `SchemaV2` the OpenAPI 3.x
/// shape that the pipeline treats as canonical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "swagger2")]
    SchemaV1,
    #[serde(rename = "openapi3")]
    SchemaV2,
}

impl Dialect {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::SchemaV1 => "swagger2",
            Self::SchemaV2 => "openapi3",
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Flag value understood by the external converter.
    pub const fn converter_flag(&self) -> &'static str {
        match self {
            Self::Unknown => "auto",
            Self::SchemaV1 => "swagger20",
            Self::SchemaV2 => "openapi30",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "unknown" | "auto" => Ok(Self::Unknown),
            "swagger2" | "swagger" | "swagger20" | "v1" => Ok(Self::SchemaV1),
            "openapi3" | "openapi" | "openapi30" | "oas3" | "v2" => Ok(Self::SchemaV2),
            other => Err(DomainError::InvalidSource(format!(
                "unknown spec type: {other}"
            ))),
        }
    }
}

// ── Severity ─────────────────────────────────────────────────────────────────

/// Impact of a single change between two documents.
///
/// Ordered from least to most severe, so `Ord` sorts `Patch` first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Patch,
    Minor,
    Major,
    Breaking,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Breaking,
        Severity::Major,
        Severity::Minor,
        Severity::Patch,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Breaking => "breaking",
        }
    }

    /// Whether clients built against the old document may stop working.
    pub const fn is_incompatible(self) -> bool {
        matches!(self, Self::Major | Self::Breaking)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            "breaking" => Ok(Self::Breaking),
            other => Err(DomainError::InvalidSeverity(other.to_string())),
        }
    }
}

// ── ChangeKind ───────────────────────────────────────────────────────────────

/// What happened to a comparable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

impl ChangeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
