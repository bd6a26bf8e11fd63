//! Dynamically shaped document tree.
//!
//! A parsed API description is held as a [`Document`]: a tagged variant of
//! scalar, mapping and sequence nodes. The tree is independent of the
//! serialization it came from; both `serde_json` and `serde_yaml` decode
//! straight into it and render straight from it.
//!
//! # Invariants
//!
//! - Mapping keys are unique strings. Non-string scalar keys (YAML allows
//!   `200:` as an integer key) are stringified on decode.
//! - Mappings keep insertion order for rendering, but compare equal
//!   regardless of key order.

use std::fmt;

use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

// ── Scalar ────────────────────────────────────────────────────────────────────

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    /// Only for integers above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    String(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render this scalar as a mapping key.
    pub fn to_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Unsigned(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

// ── Mapping ───────────────────────────────────────────────────────────────────

/// Insertion-ordered string-keyed mapping.
///
/// Equality ignores key order.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, Document)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Document> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Document> {
        self.position(key).map(move |i| &mut self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Insert a value, returning the previous one.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn insert(&mut self, key: impl Into<String>, value: Document) -> Option<Document> {
        let key = key.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Document> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Document) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Document)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl FromIterator<(String, Document)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Document)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Document);
    type IntoIter = std::vec::IntoIter<(String, Document)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ── Document ──────────────────────────────────────────────────────────────────

/// A node of a parsed API description.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Scalar(Scalar),
    Mapping(Mapping),
    Sequence(Vec<Document>),
}

impl Default for Document {
    /// An empty mapping, the neutral start of a merge.
    fn default() -> Self {
        Self::Mapping(Mapping::new())
    }
}

impl Document {
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    /// Node kind name for log and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Mapping(_) => "mapping",
            Self::Sequence(_) => "sequence",
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Document>> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a key if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Document> {
        self.as_mapping_mut().and_then(|m| m.get_mut(key))
    }

    /// Resolve an RFC 6901 JSON pointer (`""` is the node itself).
    pub fn pointer(&self, pointer: &str) -> Option<&Document> {
        if pointer.is_empty() {
            return Some(self);
        }
        let rest = pointer.strip_prefix('/')?;
        rest.split('/').map(unescape_token).try_fold(self, |node, token| match node {
            Self::Mapping(m) => m.get(&token),
            Self::Sequence(items) => token.parse::<usize>().ok().and_then(|i| items.get(i)),
            Self::Scalar(_) => None,
        })
    }

    pub fn pointer_mut(&mut self, pointer: &str) -> Option<&mut Document> {
        if pointer.is_empty() {
            return Some(self);
        }
        let rest = pointer.strip_prefix('/')?;
        rest.split('/').map(unescape_token).try_fold(self, |node, token| match node {
            Self::Mapping(m) => m.get_mut(&token),
            Self::Sequence(items) => token.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
            Self::Scalar(_) => None,
        })
    }
}

/// Escape a single pointer token (`~` → `~0`, `/` → `~1`).
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Join pointer tokens into a pointer string.
pub fn pointer_of<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    tokens
        .into_iter()
        .map(|t| format!("/{}", escape_token(t)))
        .collect()
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Integer(value))
    }
}

impl From<f64> for Document {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }
}

impl From<Mapping> for Document {
    fn from(value: Mapping) -> Self {
        Self::Mapping(value)
    }
}

impl From<Vec<Document>> for Document {
    fn from(value: Vec<Document>) -> Self {
        Self::Sequence(value)
    }
}

// ── serde ─────────────────────────────────────────────────────────────────────

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Self::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Self::Scalar(Scalar::Integer(i)) => serializer.serialize_i64(*i),
            Self::Scalar(Scalar::Unsigned(u)) => serializer.serialize_u64(*u),
            Self::Scalar(Scalar::Float(x)) => serializer.serialize_f64(*x),
            Self::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            Self::Mapping(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar, mapping or sequence")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Document, E> {
        Ok(Document::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Document, E> {
        Ok(Document::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Document, E> {
        Ok(match i64::try_from(v) {
            Ok(i) => Document::from(i),
            Err(_) => Document::Scalar(Scalar::Unsigned(v)),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Document, E> {
        Ok(Document::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Document, E> {
        Ok(Document::string(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Document, E> {
        Ok(Document::string(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Document, E> {
        Ok(Document::null())
    }

    fn visit_none<E: de::Error>(self) -> Result<Document, E> {
        Ok(Document::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Document, D::Error> {
        Document::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Document, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Document::Sequence(items))
    }

    /// YAML tags (`!custom value`) arrive as enums; the tag is dropped and
    /// the tagged value kept.
    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Document, A::Error> {
        let (_tag, value): (String, _) = data.variant()?;
        value.newtype_variant()
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut mapping = Mapping::new();
        while let Some(key) = map.next_key::<Document>()? {
            let key = match key {
                Document::Scalar(s) => s.to_key(),
                other => {
                    return Err(de::Error::custom(format!(
                        "mapping keys must be scalars, found {}",
                        other.kind()
                    )));
                }
            };
            let value = map.next_value()?;
            mapping.insert(key, value);
        }
        Ok(Document::Mapping(mapping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(src: &str) -> Document {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn mapping_equality_ignores_key_order() {
        assert_eq!(yaml("a: 1\nb: 2"), yaml("b: 2\na: 1"));
        assert_ne!(yaml("a: 1\nb: 2"), yaml("a: 1\nb: 3"));
    }

    #[test]
    fn sequence_equality_respects_order() {
        assert_ne!(yaml("[1, 2]"), yaml("[2, 1]"));
    }

    #[test]
    fn integer_keys_are_stringified() {
        let doc = yaml("responses:\n  200:\n    description: ok");
        assert_eq!(
            doc.pointer("/responses/200/description").and_then(Document::as_str),
            Some("ok")
        );
    }

    #[test]
    fn insert_keeps_existing_position() {
        let mut m = Mapping::new();
        m.insert("a", Document::from(1i64));
        m.insert("b", Document::from(2i64));
        m.insert("a", Document::from(3i64));
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(m.get("a"), Some(&Document::from(3i64)));
    }

    #[test]
    fn remove_preserves_order() {
        let mut m: Mapping = [("a", 1i64), ("b", 2), ("c", 3)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), Document::from(v)))
            .collect();
        m.remove("b");
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn pointer_unescapes_slashes() {
        let doc = yaml("paths:\n  /pets/{id}:\n    get:\n      operationId: getPet");
        let ptr = pointer_of(["paths", "/pets/{id}", "get", "operationId"]);
        assert_eq!(ptr, "/paths/~1pets~1{id}/get/operationId");
        assert_eq!(doc.pointer(&ptr).and_then(Document::as_str), Some("getPet"));
    }

    #[test]
    fn pointer_indexes_sequences() {
        let doc = yaml("servers:\n  - url: a\n  - url: b");
        assert_eq!(
            doc.pointer("/servers/1/url").and_then(Document::as_str),
            Some("b")
        );
        assert!(doc.pointer("/servers/9").is_none());
    }

    #[test]
    fn json_and_yaml_decode_to_same_tree() {
        let from_json: Document =
            serde_json::from_str(r#"{"openapi":"3.0.0","tags":[{"name":"a"}],"x":null}"#)
                .unwrap();
        let from_yaml = yaml("openapi: 3.0.0\ntags:\n  - name: a\nx: ~");
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn large_unsigned_is_kept_exact() {
        let doc: Document = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(doc, Document::Scalar(Scalar::Unsigned(u64::MAX)));
        assert_eq!(serde_json::to_string(&doc).unwrap(), "18446744073709551615");
        assert_eq!(serde_yaml::from_str::<Document>("x: 18446744073709551615").unwrap().get("x"), Some(&doc));
    }

    #[test]
    fn yaml_tags_keep_the_tagged_value() {
        let doc = yaml("x-t: !custom value
x-m: !vendor {a: 1}
");
        assert_eq!(doc.get("x-t").and_then(Document::as_str), Some("value"));
        assert_eq!(doc.pointer("/x-m/a"), Some(&Document::from(1_i64)));
    }
}
