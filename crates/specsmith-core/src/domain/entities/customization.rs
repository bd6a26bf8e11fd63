use serde::{Deserialize, Serialize};

/// Declarative overrides applied to the merged document.
///
/// Every field is optional; an empty field means "leave the document alone".
/// Unknown fields in configuration are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Customization {
    pub title: String,
    pub summary: String,
    pub description: String,
    pub version: String,
    pub contact: Contact,
    pub license: License,
    /// Replaces the document's server list when non-empty.
    pub servers: Vec<Server>,

    /// Operations to remove, by `operationId` or `"METHOD /path"`.
    pub prune_operations: Vec<String>,
    /// Tag definitions to remove, by name.
    pub prune_tags: Vec<String>,
    /// Schema definitions to remove, by name.
    pub prune_schemas: Vec<String>,
}

impl Customization {
    /// True when applying this customization changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub name: String,
    pub url: String,
    pub email: String,
}

impl Contact {
    pub fn is_set(&self) -> bool {
        !(self.name.is_empty() && self.url.is_empty() && self.email.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct License {
    pub name: String,
    pub url: String,
    pub identifier: String,
}

impl License {
    pub fn is_set(&self) -> bool {
        !(self.name.is_empty() && self.url.is_empty() && self.identifier.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub url: String,
    pub description: String,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
