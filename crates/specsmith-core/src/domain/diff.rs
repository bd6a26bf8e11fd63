//! Severity-ranked structural diff between two API descriptions.
//!
//! The walk knows the document's sections rather than diffing generic
//! trees: operations under `paths`, parameters keyed by location and name,
//! request bodies, responses keyed by status, schema definitions and
//! reusable parameters. Everything else falls back to a key-by-key
//! comparison where documentation-only keys rank as [`Severity::Patch`] and
//! anything structural as [`Severity::Major`].
//!
//! Entry paths are JSON pointers into the newer document, or into the older
//! one for removals.

use serde::{Deserialize, Serialize};

use crate::domain::{
    document::{Document, Mapping, escape_token, pointer_of},
    sections::{OPERATION_METHODS, component_parameters, is_operation_method, paths, schemas},
    value_objects::{ChangeKind, Severity},
};

/// Keys whose changes never affect generated code.
const DOC_KEYS: [&str; 8] = [
    "description",
    "summary",
    "title",
    "example",
    "examples",
    "externalDocs",
    "deprecated",
    "tags",
];

/// Top-level keys treated as release metadata.
const METADATA_KEYS: [&str; 8] = [
    "openapi",
    "swagger",
    "servers",
    "tags",
    "externalDocs",
    "host",
    "basePath",
    "schemes",
];

/// Schema keys with dedicated rules.
const SCHEMA_KEYS: [&str; 8] = [
    "$ref",
    "type",
    "format",
    "enum",
    "required",
    "properties",
    "items",
    "additionalProperties",
];

/// Parameter keys that are not part of its value schema.
const PARAMETER_KEYS: [&str; 4] = ["name", "in", "required", "schema"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// JSON pointer to the changed node.
    pub path: String,
    pub severity: Severity,
    pub kind: ChangeKind,
    pub message: String,
}

impl DiffEntry {
    pub fn new(path: impl Into<String>, severity: Severity, kind: ChangeKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            severity,
            kind,
            message: message.into(),
        }
    }
}

/// Ordered diff: most severe first, ties broken by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diff {
    entries: Vec<DiffEntry>,
}

impl Diff {
    pub fn from_entries(mut entries: Vec<DiffEntry>) -> Self {
        entries.sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.path.cmp(&b.path)));
        Self { entries }
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.entries.first().map(|e| e.severity)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }

    /// The `limit` most severe entries, for display.
    pub fn truncated(&self, limit: usize) -> &[DiffEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }
}

impl<'a> IntoIterator for &'a Diff {
    type Item = &'a DiffEntry;
    type IntoIter = std::slice::Iter<'a, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Compare `old` with `new`.
pub fn diff(old: &Document, new: &Document) -> Diff {
    let mut c = Collector::new(old, new);
    if old != new {
        diff_paths(&mut c, old, new);
        diff_schemas(&mut c, old, new);
        diff_component_parameters(&mut c, old, new);
        diff_other_components(&mut c, old, new);
        diff_metadata(&mut c, old, new);
        if let (Some(o), Some(n)) = (old.as_mapping(), new.as_mapping()) {
            let mut handled = vec!["paths", "components", "definitions", "parameters", "info"];
            handled.extend(METADATA_KEYS);
            c.generic("", o, n, &handled);
        }
    }
    Diff::from_entries(c.entries)
}

struct Collector<'a> {
    entries: Vec<DiffEntry>,
    /// Roots that local `$ref`s resolve against.
    old_root: &'a Document,
    new_root: &'a Document,
}

impl<'a> Collector<'a> {
    fn new(old_root: &'a Document, new_root: &'a Document) -> Self {
        Self {
            entries: Vec::new(),
            old_root,
            new_root,
        }
    }

    fn push(&mut self, path: impl Into<String>, severity: Severity, kind: ChangeKind, message: impl Into<String>) {
        self.entries.push(DiffEntry::new(path, severity, kind, message));
    }

    /// Key-by-key comparison of everything not in `handled`.
    fn generic(&mut self, ptr: &str, old: &Mapping, new: &Mapping, handled: &[&str]) {
        for key in union_keys(Some(old), Some(new)) {
            if handled.contains(&key) {
                continue;
            }
            let (o, n) = (old.get(key), new.get(key));
            let Some(kind) = kind_of(o, n) else { continue };
            let severity = if is_doc_key(key) { Severity::Patch } else { Severity::Major };
            self.push(child(ptr, key), severity, kind, format!("`{key}` {kind}"));
        }
    }
}

fn is_doc_key(key: &str) -> bool {
    key.starts_with("x-") || DOC_KEYS.contains(&key)
}

fn child(ptr: &str, token: &str) -> String {
    format!("{ptr}/{}", escape_token(token))
}

fn kind_of(old: Option<&Document>, new: Option<&Document>) -> Option<ChangeKind> {
    match (old, new) {
        (Some(_), None) => Some(ChangeKind::Removed),
        (None, Some(_)) => Some(ChangeKind::Added),
        (Some(o), Some(n)) if o != n => Some(ChangeKind::Changed),
        _ => None,
    }
}

/// Keys of `old` in order, then keys only in `new`.
fn union_keys<'a>(old: Option<&'a Mapping>, new: Option<&'a Mapping>) -> Vec<&'a str> {
    let mut keys: Vec<&str> = old.map(|m| m.keys().collect()).unwrap_or_default();
    if let Some(new) = new {
        keys.extend(new.keys().filter(|k| old.is_none_or(|o| !o.contains_key(k))));
    }
    keys
}

fn describe(node: Option<&Document>) -> String {
    match node {
        None => "none".into(),
        Some(Document::Scalar(s)) => s.to_string(),
        Some(Document::Sequence(items)) => items
            .iter()
            .map(|i| describe(Some(i)))
            .collect::<Vec<_>>()
            .join("|"),
        Some(other) => other.kind().into(),
    }
}

// ── paths ────────────────────────────────────────────────────────────────────

fn diff_paths(c: &mut Collector, old: &Document, new: &Document) {
    let (op, np) = (paths(old), paths(new));
    for path in union_keys(op, np) {
        let base = pointer_of(["paths", path]);
        let oi = op.and_then(|m| m.get(path)).and_then(Document::as_mapping);
        let ni = np.and_then(|m| m.get(path)).and_then(Document::as_mapping);

        for method in OPERATION_METHODS {
            let label = format!("{} {path}", method.to_ascii_uppercase());
            let ptr = child(&base, method);
            match (oi.and_then(|m| m.get(method)), ni.and_then(|m| m.get(method))) {
                (Some(_), None) => c.push(ptr, Severity::Breaking, ChangeKind::Removed, format!("operation {label} removed")),
                (None, Some(_)) => c.push(ptr, Severity::Minor, ChangeKind::Added, format!("operation {label} added")),
                (Some(a), Some(b)) => diff_operation(c, &ptr, a, b),
                (None, None) => {}
            }
        }

        match (oi, ni) {
            (Some(o), Some(n)) => {
                diff_parameter_list(c, &child(&base, "parameters"), o.get("parameters"), n.get("parameters"));
                let mut handled = OPERATION_METHODS.to_vec();
                handled.push("parameters");
                c.generic(&base, o, n, &handled);
            }
            (Some(o), None) if !o.keys().any(is_operation_method) => {
                c.push(base, Severity::Major, ChangeKind::Removed, format!("path {path} removed"));
            }
            (None, Some(n)) if !n.keys().any(is_operation_method) => {
                c.push(base, Severity::Minor, ChangeKind::Added, format!("path {path} added"));
            }
            _ => {}
        }
    }
}

fn diff_operation(c: &mut Collector, ptr: &str, old: &Document, new: &Document) {
    if old == new {
        return;
    }
    let (Some(o), Some(n)) = (old.as_mapping(), new.as_mapping()) else {
        c.push(ptr, Severity::Major, ChangeKind::Changed, "operation changed");
        return;
    };
    diff_parameter_list(c, &child(ptr, "parameters"), o.get("parameters"), n.get("parameters"));
    diff_request_body(c, &child(ptr, "requestBody"), o.get("requestBody"), n.get("requestBody"));
    diff_responses(c, &child(ptr, "responses"), o.get("responses"), n.get("responses"));
    c.generic(ptr, o, n, &["parameters", "requestBody", "responses"]);
}

// ── parameters ───────────────────────────────────────────────────────────────

fn parameter_key(param: &Document) -> Option<String> {
    if let Some(target) = param.get("$ref").and_then(Document::as_str) {
        return Some(format!("$ref {target}"));
    }
    let name = param.get("name")?.as_str()?;
    let location = param.get("in").and_then(Document::as_str).unwrap_or("");
    Some(format!("{location} parameter `{name}`"))
}

/// Follow a local `$ref` (`#/components/parameters/X`, `#/parameters/X`).
/// Unresolvable or remote references yield the reference object itself.
fn resolve_parameter<'d>(root: &'d Document, param: &'d Document) -> &'d Document {
    param
        .get("$ref")
        .and_then(Document::as_str)
        .and_then(|target| target.strip_prefix('#'))
        .and_then(|pointer| root.pointer(pointer))
        .unwrap_or(param)
}

fn parameter_required(param: &Document) -> bool {
    param.get("required").and_then(Document::as_bool) == Some(true)
        || param.get("in").and_then(Document::as_str) == Some("path")
}

fn index_parameters(list: Option<&Document>) -> Vec<(String, usize, &Document)> {
    list.and_then(Document::as_sequence)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter_map(|(i, p)| parameter_key(p).map(|key| (key, i, p)))
        .collect()
}

fn diff_parameter_list(c: &mut Collector, base: &str, old: Option<&Document>, new: Option<&Document>) {
    if old == new {
        return;
    }
    let (olds, news) = (index_parameters(old), index_parameters(new));
    let (old_root, new_root) = (c.old_root, c.new_root);

    for (key, index, param) in &olds {
        let ptr = child(base, &index.to_string());
        match news.iter().find(|(k, _, _)| k == key) {
            None if parameter_required(resolve_parameter(old_root, param)) => {
                c.push(ptr, Severity::Breaking, ChangeKind::Removed, format!("required {key} removed"))
            }
            None => c.push(ptr, Severity::Major, ChangeKind::Removed, format!("optional {key} removed")),
            Some((_, new_index, new_param)) => {
                diff_parameter(c, &child(base, &new_index.to_string()), key, param, new_param)
            }
        }
    }
    for (key, index, param) in &news {
        if olds.iter().any(|(k, _, _)| k == key) {
            continue;
        }
        let ptr = child(base, &index.to_string());
        if parameter_required(resolve_parameter(new_root, param)) {
            c.push(ptr, Severity::Major, ChangeKind::Added, format!("required {key} added"));
        } else {
            c.push(ptr, Severity::Minor, ChangeKind::Added, format!("optional {key} added"));
        }
    }
}

fn diff_parameter(c: &mut Collector, ptr: &str, label: &str, old: &Document, new: &Document) {
    if old == new {
        return;
    }
    let (Some(o), Some(n)) = (old.as_mapping(), new.as_mapping()) else {
        c.push(ptr, Severity::Major, ChangeKind::Changed, format!("{label} changed"));
        return;
    };

    match (parameter_required(old), parameter_required(new)) {
        (false, true) => c.push(
            child(ptr, "required"),
            Severity::Major,
            ChangeKind::Changed,
            format!("{label} became required"),
        ),
        (true, false) => c.push(
            child(ptr, "required"),
            Severity::Minor,
            ChangeKind::Changed,
            format!("{label} became optional"),
        ),
        _ => {}
    }

    match (o.get("schema"), n.get("schema")) {
        (Some(a), Some(b)) => diff_schema(c, &child(ptr, "schema"), a, b),
        (a, b) => {
            if let Some(kind) = kind_of(a, b) {
                c.push(child(ptr, "schema"), Severity::Major, kind, format!("{label} schema {kind}"));
            }
        }
    }

    // Older-dialect parameters carry type, format and enum inline.
    let strip = |m: &Mapping| -> Document {
        m.iter()
            .filter(|(k, _)| !PARAMETER_KEYS.contains(k))
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<Mapping>()
            .into()
    };
    diff_schema(c, ptr, &strip(o), &strip(n));
}

fn diff_component_parameters(c: &mut Collector, old: &Document, new: &Document) {
    let (o, n) = (component_parameters(old), component_parameters(new));
    let (om, nm) = (o.map(|(_, m)| m), n.map(|(_, m)| m));
    for name in union_keys(om, nm) {
        match (om.and_then(|m| m.get(name)), nm.and_then(|m| m.get(name))) {
            (Some(_), None) => {
                let prefix = o.map_or("", |(p, _)| p);
                c.push(
                    child(prefix, name),
                    Severity::Breaking,
                    ChangeKind::Removed,
                    format!("parameter `{name}` removed"),
                );
            }
            (None, Some(_)) => {
                let prefix = n.map_or("", |(p, _)| p);
                c.push(child(prefix, name), Severity::Minor, ChangeKind::Added, format!("parameter `{name}` added"));
            }
            (Some(a), Some(b)) => {
                let prefix = n.map_or("", |(p, _)| p);
                diff_parameter(c, &child(prefix, name), &format!("parameter `{name}`"), a, b);
            }
            (None, None) => {}
        }
    }
}

// ── bodies and responses ─────────────────────────────────────────────────────

fn diff_request_body(c: &mut Collector, ptr: &str, old: Option<&Document>, new: Option<&Document>) {
    let required = |b: &Document| b.get("required").and_then(Document::as_bool) == Some(true);
    match (old, new) {
        (None, Some(b)) if required(b) => {
            c.push(ptr, Severity::Major, ChangeKind::Added, "required request body added")
        }
        (None, Some(_)) => c.push(ptr, Severity::Minor, ChangeKind::Added, "optional request body added"),
        (Some(_), None) => c.push(ptr, Severity::Major, ChangeKind::Removed, "request body removed"),
        (Some(a), Some(b)) if a != b => {
            let (Some(o), Some(n)) = (a.as_mapping(), b.as_mapping()) else {
                c.push(ptr, Severity::Major, ChangeKind::Changed, "request body changed");
                return;
            };
            if o.get("$ref") != n.get("$ref") {
                c.push(child(ptr, "$ref"), Severity::Major, ChangeKind::Changed, "request body reference changed");
                return;
            }
            match (required(a), required(b)) {
                (false, true) => c.push(
                    child(ptr, "required"),
                    Severity::Major,
                    ChangeKind::Changed,
                    "request body became required",
                ),
                (true, false) => c.push(
                    child(ptr, "required"),
                    Severity::Minor,
                    ChangeKind::Changed,
                    "request body became optional",
                ),
                _ => {}
            }
            diff_content(c, &child(ptr, "content"), o.get("content"), n.get("content"));
            c.generic(ptr, o, n, &["$ref", "required", "content"]);
        }
        _ => {}
    }
}

fn diff_content(c: &mut Collector, ptr: &str, old: Option<&Document>, new: Option<&Document>) {
    let (om, nm) = (old.and_then(Document::as_mapping), new.and_then(Document::as_mapping));
    for media in union_keys(om, nm) {
        let mptr = child(ptr, media);
        match (om.and_then(|m| m.get(media)), nm.and_then(|m| m.get(media))) {
            (Some(_), None) => c.push(mptr, Severity::Major, ChangeKind::Removed, format!("media type {media} removed")),
            (None, Some(_)) => c.push(mptr, Severity::Minor, ChangeKind::Added, format!("media type {media} added")),
            (Some(a), Some(b)) if a != b => {
                diff_schema_slot(c, &mptr, a, b);
                if let (Some(o), Some(n)) = (a.as_mapping(), b.as_mapping()) {
                    c.generic(&mptr, o, n, &["schema"]);
                }
            }
            _ => {}
        }
    }
}

/// Compare the `schema` member of two containers.
fn diff_schema_slot(c: &mut Collector, ptr: &str, old: &Document, new: &Document) {
    let sptr = child(ptr, "schema");
    match (old.get("schema"), new.get("schema")) {
        (Some(a), Some(b)) => diff_schema(c, &sptr, a, b),
        (a, b) => {
            if let Some(kind) = kind_of(a, b) {
                c.push(sptr, Severity::Major, kind, format!("schema {kind}"));
            }
        }
    }
}

fn diff_responses(c: &mut Collector, ptr: &str, old: Option<&Document>, new: Option<&Document>) {
    let (om, nm) = (old.and_then(Document::as_mapping), new.and_then(Document::as_mapping));
    for status in union_keys(om, nm) {
        let rptr = child(ptr, status);
        match (om.and_then(|m| m.get(status)), nm.and_then(|m| m.get(status))) {
            (Some(_), None) => c.push(rptr, Severity::Major, ChangeKind::Removed, format!("response {status} removed")),
            (None, Some(_)) => c.push(rptr, Severity::Minor, ChangeKind::Added, format!("response {status} added")),
            (Some(a), Some(b)) if a != b => {
                let (Some(o), Some(n)) = (a.as_mapping(), b.as_mapping()) else {
                    c.push(rptr, Severity::Major, ChangeKind::Changed, format!("response {status} changed"));
                    continue;
                };
                if o.get("$ref") != n.get("$ref") {
                    c.push(
                        child(&rptr, "$ref"),
                        Severity::Major,
                        ChangeKind::Changed,
                        format!("response {status} reference changed"),
                    );
                    continue;
                }
                diff_content(c, &child(&rptr, "content"), o.get("content"), n.get("content"));
                if o.contains_key("schema") || n.contains_key("schema") {
                    diff_schema_slot(c, &rptr, a, b);
                }
                c.generic(&rptr, o, n, &["$ref", "content", "schema"]);
            }
            _ => {}
        }
    }
}

// ── schemas ──────────────────────────────────────────────────────────────────

fn diff_schemas(c: &mut Collector, old: &Document, new: &Document) {
    let (o, n) = (schemas(old), schemas(new));
    let (om, nm) = (o.map(|(_, m)| m), n.map(|(_, m)| m));
    for name in union_keys(om, nm) {
        match (om.and_then(|m| m.get(name)), nm.and_then(|m| m.get(name))) {
            (Some(_), None) => {
                let prefix = o.map_or("", |(p, _)| p);
                c.push(child(prefix, name), Severity::Breaking, ChangeKind::Removed, format!("schema `{name}` removed"));
            }
            (None, Some(_)) => {
                let prefix = n.map_or("", |(p, _)| p);
                c.push(child(prefix, name), Severity::Minor, ChangeKind::Added, format!("schema `{name}` added"));
            }
            (Some(a), Some(b)) => {
                let prefix = n.map_or("", |(p, _)| p);
                diff_schema(c, &child(prefix, name), a, b);
            }
            (None, None) => {}
        }
    }
}

fn type_set(node: Option<&Document>) -> Vec<String> {
    let mut types: Vec<String> = match node {
        Some(Document::Sequence(items)) => items.iter().filter_map(Document::as_str).map(str::to_string).collect(),
        Some(other) => other.as_str().map(str::to_string).into_iter().collect(),
        None => Vec::new(),
    };
    types.sort();
    types
}

fn string_set(node: Option<&Document>) -> Vec<&str> {
    node.and_then(Document::as_sequence)
        .unwrap_or_default()
        .iter()
        .filter_map(Document::as_str)
        .collect()
}

fn diff_schema(c: &mut Collector, ptr: &str, old: &Document, new: &Document) {
    if old == new {
        return;
    }
    let (Some(o), Some(n)) = (old.as_mapping(), new.as_mapping()) else {
        c.push(ptr, Severity::Major, ChangeKind::Changed, "schema changed");
        return;
    };

    if o.get("$ref") != n.get("$ref") {
        c.push(
            child(ptr, "$ref"),
            Severity::Major,
            ChangeKind::Changed,
            format!(
                "reference changed from {} to {}",
                describe(o.get("$ref")),
                describe(n.get("$ref"))
            ),
        );
        return;
    }

    diff_type(c, ptr, o, n);

    if let Some(kind) = kind_of(o.get("format"), n.get("format")) {
        c.push(
            child(ptr, "format"),
            Severity::Major,
            kind,
            format!("format changed from {} to {}", describe(o.get("format")), describe(n.get("format"))),
        );
    }

    diff_enum(c, &child(ptr, "enum"), o.get("enum"), n.get("enum"));
    diff_properties(c, ptr, o, n);

    match (o.get("items"), n.get("items")) {
        (Some(a), Some(b)) => diff_schema(c, &child(ptr, "items"), a, b),
        (a, b) => {
            if let Some(kind) = kind_of(a, b) {
                c.push(child(ptr, "items"), Severity::Major, kind, format!("items {kind}"));
            }
        }
    }

    match (o.get("additionalProperties"), n.get("additionalProperties")) {
        (Some(a), Some(b)) if a.as_mapping().is_some() && b.as_mapping().is_some() => {
            diff_schema(c, &child(ptr, "additionalProperties"), a, b)
        }
        (a, b) => {
            if let Some(kind) = kind_of(a, b) {
                c.push(
                    child(ptr, "additionalProperties"),
                    Severity::Major,
                    kind,
                    format!("additionalProperties {kind}"),
                );
            }
        }
    }

    c.generic(ptr, o, n, &SCHEMA_KEYS);
}

fn diff_type(c: &mut Collector, ptr: &str, o: &Mapping, n: &Mapping) {
    let (ot, nt) = (type_set(o.get("type")), type_set(n.get("type")));
    if ot == nt {
        return;
    }
    let widened = !ot.is_empty()
        && (nt.is_empty()
            || ot
                .iter()
                .all(|t| nt.contains(t) || (t == "integer" && nt.iter().any(|x| x == "number"))));
    let (severity, verb) = if widened {
        (Severity::Minor, "widened")
    } else {
        (Severity::Breaking, "narrowed")
    };
    c.push(
        child(ptr, "type"),
        severity,
        kind_of(o.get("type"), n.get("type")).unwrap_or(ChangeKind::Changed),
        format!("type {verb} from {} to {}", describe(o.get("type")), describe(n.get("type"))),
    );
}

fn diff_enum(c: &mut Collector, ptr: &str, old: Option<&Document>, new: Option<&Document>) {
    let (oe, ne) = (old.and_then(Document::as_sequence), new.and_then(Document::as_sequence));
    match (oe, ne) {
        (Some(oe), Some(ne)) => {
            let removed: Vec<String> = oe.iter().filter(|v| !ne.contains(v)).map(|v| describe(Some(v))).collect();
            let added: Vec<String> = ne.iter().filter(|v| !oe.contains(v)).map(|v| describe(Some(v))).collect();
            if !removed.is_empty() {
                c.push(
                    ptr,
                    Severity::Breaking,
                    ChangeKind::Removed,
                    format!("enum values removed: {}", removed.join(", ")),
                );
            }
            if !added.is_empty() {
                c.push(ptr, Severity::Minor, ChangeKind::Added, format!("enum values added: {}", added.join(", ")));
            }
        }
        (None, Some(_)) => c.push(ptr, Severity::Breaking, ChangeKind::Added, "enum constraint added"),
        (Some(_), None) => c.push(ptr, Severity::Minor, ChangeKind::Removed, "enum constraint removed"),
        (None, None) => {}
    }
}

fn diff_properties(c: &mut Collector, ptr: &str, o: &Mapping, n: &Mapping) {
    let (or, nr) = (string_set(o.get("required")), string_set(n.get("required")));
    let op = o.get("properties").and_then(Document::as_mapping);
    let np = n.get("properties").and_then(Document::as_mapping);
    let props = child(ptr, "properties");

    for name in union_keys(op, np) {
        let pptr = child(&props, name);
        let (was_required, is_required) = (or.contains(&name), nr.contains(&name));
        match (op.and_then(|m| m.get(name)), np.and_then(|m| m.get(name))) {
            (Some(_), None) if was_required => c.push(
                pptr,
                Severity::Breaking,
                ChangeKind::Removed,
                format!("required property `{name}` removed"),
            ),
            (Some(_), None) => c.push(
                pptr,
                Severity::Major,
                ChangeKind::Removed,
                format!("optional property `{name}` removed"),
            ),
            (None, Some(_)) if is_required => c.push(
                pptr,
                Severity::Major,
                ChangeKind::Added,
                format!("required property `{name}` added"),
            ),
            (None, Some(_)) => c.push(
                pptr,
                Severity::Minor,
                ChangeKind::Added,
                format!("optional property `{name}` added"),
            ),
            (Some(a), Some(b)) => {
                if !was_required && is_required {
                    c.push(
                        &pptr,
                        Severity::Major,
                        ChangeKind::Changed,
                        format!("property `{name}` became required"),
                    );
                } else if was_required && !is_required {
                    c.push(
                        &pptr,
                        Severity::Minor,
                        ChangeKind::Changed,
                        format!("property `{name}` became optional"),
                    );
                }
                diff_schema(c, &pptr, a, b);
            }
            (None, None) => {}
        }
    }

    // Requirements on names declared elsewhere (e.g. through composition).
    let declared = |name: &str| op.is_some_and(|m| m.contains_key(name)) || np.is_some_and(|m| m.contains_key(name));
    let rptr = child(ptr, "required");
    for name in nr.iter().filter(|r| !or.contains(r) && !declared(r)) {
        c.push(&rptr, Severity::Major, ChangeKind::Added, format!("`{name}` became required"));
    }
    for name in or.iter().filter(|r| !nr.contains(r) && !declared(r)) {
        c.push(&rptr, Severity::Minor, ChangeKind::Removed, format!("`{name}` became optional"));
    }
}

// ── components and metadata ──────────────────────────────────────────────────

fn diff_other_components(c: &mut Collector, old: &Document, new: &Document) {
    let (oc, nc) = (
        old.get("components").and_then(Document::as_mapping),
        new.get("components").and_then(Document::as_mapping),
    );
    for section in union_keys(oc, nc) {
        if section == "schemas" || section == "parameters" {
            continue;
        }
        let sptr = pointer_of(["components", section]);
        let (om, nm) = (
            oc.and_then(|m| m.get(section)).and_then(Document::as_mapping),
            nc.and_then(|m| m.get(section)).and_then(Document::as_mapping),
        );
        for name in union_keys(om, nm) {
            let (a, b) = (om.and_then(|m| m.get(name)), nm.and_then(|m| m.get(name)));
            let Some(kind) = kind_of(a, b) else { continue };
            let severity = match kind {
                ChangeKind::Added => Severity::Minor,
                _ => Severity::Major,
            };
            c.push(child(&sptr, name), severity, kind, format!("{section} `{name}` {kind}"));
        }
    }
}

fn diff_metadata(c: &mut Collector, old: &Document, new: &Document) {
    match (old.get("info"), new.get("info")) {
        (Some(Document::Mapping(o)), Some(Document::Mapping(n))) => {
            for key in union_keys(Some(o), Some(n)) {
                if let Some(kind) = kind_of(o.get(key), n.get(key)) {
                    c.push(child("/info", key), Severity::Patch, kind, format!("info `{key}` {kind}"));
                }
            }
        }
        (a, b) => {
            if let Some(kind) = kind_of(a, b) {
                c.push("/info", Severity::Patch, kind, format!("info {kind}"));
            }
        }
    }

    for key in METADATA_KEYS {
        if let Some(kind) = kind_of(old.get(key), new.get(key)) {
            c.push(child("", key), Severity::Patch, kind, format!("`{key}` {kind}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::decode;
    use pretty_assertions::assert_eq;

    fn yaml(text: &str) -> Document {
        decode(text.as_bytes(), Some("yaml"), "test").unwrap()
    }

    const BASE: &str = r##"
openapi: 3.0.3
info: {title: Pets, version: 1.0.0}
paths:
  /pets:
    get:
      operationId: listPets
      parameters:
        - {name: limit, in: query, schema: {type: integer}}
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: {type: array, items: {$ref: "#/components/schemas/Pet"}}
    post:
      operationId: createPet
      requestBody:
        content:
          application/json:
            schema: {$ref: "#/components/schemas/Pet"}
      responses:
        "201": {description: created}
components:
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id: {type: integer}
        name: {type: string}
        status: {type: string, enum: [available, sold]}
        tag: {type: string}
"##;

    fn with(edit: impl FnOnce(&mut Document)) -> Document {
        let mut doc = yaml(BASE);
        edit(&mut doc);
        doc
    }

    fn single(d: &Diff) -> &DiffEntry {
        assert_eq!(d.len(), 1, "expected one entry, got {:#?}", d.entries());
        &d.entries()[0]
    }

    #[test]
    fn identical_documents_have_empty_diff() {
        let doc = yaml(BASE);
        assert!(diff(&doc, &doc).is_empty());
    }

    #[test]
    fn key_order_does_not_matter() {
        let a = yaml("info: {title: t, version: '1'}\nopenapi: 3.0.0\n");
        let b = yaml("openapi: 3.0.0\ninfo: {version: '1', title: t}\n");
        assert!(diff(&a, &b).is_empty());
    }

    #[test]
    fn removed_operation_is_breaking() {
        let new = with(|d| {
            d.pointer_mut("/paths/~1pets").unwrap().as_mapping_mut().unwrap().remove("post");
        });
        let d = diff(&yaml(BASE), &new);
        let e = single(&d);
        assert_eq!(e.severity, Severity::Breaking);
        assert_eq!(e.kind, ChangeKind::Removed);
        assert_eq!(e.path, "/paths/~1pets/post");
        assert_eq!(e.message, "operation POST /pets removed");
    }

    #[test]
    fn added_operation_is_minor() {
        let new = with(|d| {
            let paths = d.get_mut("paths").unwrap().as_mapping_mut().unwrap();
            paths.insert("/owners", yaml("get: {operationId: listOwners}\n"));
        });
        let d = diff(&yaml(BASE), &new);
        let e = single(&d);
        assert_eq!((e.severity, e.kind), (Severity::Minor, ChangeKind::Added));
        assert_eq!(e.path, "/paths/~1owners/get");
    }

    #[test]
    fn entries_sorted_by_severity_then_path() {
        let new = with(|d| {
            let info = d.get_mut("info").unwrap().as_mapping_mut().unwrap();
            info.insert("description", Document::string("now documented"));
            let paths = d.get_mut("paths").unwrap().as_mapping_mut().unwrap();
            paths.insert("/owners", yaml("get: {operationId: listOwners}\n"));
            paths.get_mut("/pets").unwrap().as_mapping_mut().unwrap().remove("post");
        });
        let d = diff(&yaml(BASE), &new);
        let severities: Vec<_> = d.iter().map(|e| e.severity).collect();
        assert_eq!(severities, vec![Severity::Breaking, Severity::Minor, Severity::Patch]);
        assert_eq!(d.highest_severity(), Some(Severity::Breaking));
    }

    #[test]
    fn from_entries_orders_breaking_first() {
        let d = Diff::from_entries(vec![
            DiffEntry::new("/b", Severity::Minor, ChangeKind::Added, "m"),
            DiffEntry::new("/a", Severity::Breaking, ChangeKind::Removed, "b"),
            DiffEntry::new("/c", Severity::Patch, ChangeKind::Changed, "p"),
            DiffEntry::new("/a", Severity::Minor, ChangeKind::Added, "m2"),
        ]);
        let order: Vec<_> = d.iter().map(|e| (e.severity, e.path.as_str())).collect();
        assert_eq!(
            order,
            vec![
                (Severity::Breaking, "/a"),
                (Severity::Minor, "/a"),
                (Severity::Minor, "/b"),
                (Severity::Patch, "/c"),
            ]
        );
        assert_eq!(d.count(Severity::Minor), 2);
        assert_eq!(d.truncated(2).len(), 2);
        assert_eq!(d.truncated(10).len(), 4);
    }

    #[test]
    fn required_property_removal_is_breaking() {
        let new = with(|d| {
            let props = d.pointer_mut("/components/schemas/Pet/properties").unwrap();
            props.as_mapping_mut().unwrap().remove("name");
        });
        let d = diff(&yaml(BASE), &new);
        assert_eq!(d.highest_severity(), Some(Severity::Breaking));
        assert_eq!(d.entries()[0].path, "/components/schemas/Pet/properties/name");
    }

    #[test]
    fn optional_property_changes() {
        let removed = with(|d| {
            let props = d.pointer_mut("/components/schemas/Pet/properties").unwrap();
            props.as_mapping_mut().unwrap().remove("tag");
        });
        assert_eq!(single(&diff(&yaml(BASE), &removed)).severity, Severity::Major);

        let added = with(|d| {
            let props = d.pointer_mut("/components/schemas/Pet/properties").unwrap();
            props.as_mapping_mut().unwrap().insert("age", yaml("type: integer\n"));
        });
        let d = diff(&yaml(BASE), &added);
        let e = single(&d);
        assert_eq!((e.severity, e.kind), (Severity::Minor, ChangeKind::Added));
        assert_eq!(e.message, "optional property `age` added");
    }

    #[test]
    fn type_changes() {
        let widened = with(|d| {
            *d.pointer_mut("/components/schemas/Pet/properties/id/type").unwrap() = Document::string("number");
        });
        assert_eq!(single(&diff(&yaml(BASE), &widened)).severity, Severity::Minor);

        let narrowed = with(|d| {
            *d.pointer_mut("/components/schemas/Pet/properties/name/type").unwrap() = Document::string("integer");
        });
        let d = diff(&yaml(BASE), &narrowed);
        let e = single(&d);
        assert_eq!(e.severity, Severity::Breaking);
        assert_eq!(e.path, "/components/schemas/Pet/properties/name/type");
    }

    #[test]
    fn enum_value_removal_and_addition() {
        let new = with(|d| {
            *d.pointer_mut("/components/schemas/Pet/properties/status/enum").unwrap() =
                yaml("e: [available, pending]\n").get("e").cloned().unwrap();
        });
        let d = diff(&yaml(BASE), &new);
        let got: Vec<_> = d.iter().map(|e| (e.severity, e.kind)).collect();
        assert_eq!(
            got,
            vec![(Severity::Breaking, ChangeKind::Removed), (Severity::Minor, ChangeKind::Added)]
        );
        assert_eq!(d.entries()[0].message, "enum values removed: sold");
    }

    #[test]
    fn parameter_changes() {
        let required = with(|d| {
            let params = d.pointer_mut("/paths/~1pets/get/parameters").unwrap().as_sequence_mut().unwrap();
            params.push(yaml("{name: owner, in: query, required: true, schema: {type: string}}"));
        });
        let d = diff(&yaml(BASE), &required);
        let e = single(&d);
        assert_eq!(e.severity, Severity::Major);
        assert_eq!(e.path, "/paths/~1pets/get/parameters/1");
        assert_eq!(e.message, "required query parameter `owner` added");

        let removed = with(|d| {
            d.pointer_mut("/paths/~1pets/get/parameters").unwrap().as_sequence_mut().unwrap().clear();
        });
        assert_eq!(single(&diff(&yaml(BASE), &removed)).severity, Severity::Major);
    }

    #[test]
    fn referenced_parameter_requirement_is_resolved() {
        let old = yaml(
            r##"
openapi: 3.0.3
paths:
  /p/{id}:
    get:
      parameters: [{$ref: "#/components/parameters/Id"}]
      responses: {"200": {description: ok}}
components:
  parameters:
    Id: {name: id, in: path, required: true, schema: {type: string}}
"##,
        );
        let mut new = old.clone();
        new.pointer_mut("/paths/~1p~1{id}/get/parameters").unwrap().as_sequence_mut().unwrap().clear();

        let d = diff(&old, &new);
        let e = single(&d);
        assert_eq!((e.severity, e.kind), (Severity::Breaking, ChangeKind::Removed));
        assert_eq!(e.path, "/paths/~1p~1{id}/get/parameters/0");
        assert_eq!(e.message, "required $ref #/components/parameters/Id removed");

        // Adding it back resolves against the new document.
        assert_eq!(single(&diff(&new, &old)).severity, Severity::Major);

        let legacy = yaml(
            r##"
swagger: '2.0'
paths:
  /pets:
    get:
      parameters: [{$ref: "#/parameters/Owner"}]
      responses: {"200": {description: ok}}
parameters:
  Owner: {name: owner, in: query, required: true, type: string}
"##,
        );
        let mut stripped = legacy.clone();
        stripped.pointer_mut("/paths/~1pets/get/parameters").unwrap().as_sequence_mut().unwrap().clear();
        assert_eq!(single(&diff(&legacy, &stripped)).severity, Severity::Breaking);
    }

    #[test]
    fn response_removed_is_major_and_description_is_patch() {
        let removed = with(|d| {
            d.pointer_mut("/paths/~1pets/post/responses").unwrap().as_mapping_mut().unwrap().remove("201");
        });
        assert_eq!(single(&diff(&yaml(BASE), &removed)).severity, Severity::Major);

        let reworded = with(|d| {
            *d.pointer_mut("/paths/~1pets/post/responses/201/description").unwrap() = Document::string("made");
        });
        let d = diff(&yaml(BASE), &reworded);
        let e = single(&d);
        assert_eq!(e.severity, Severity::Patch);
        assert_eq!(e.path, "/paths/~1pets/post/responses/201/description");
    }

    #[test]
    fn vendor_extensions_are_patch() {
        let new = with(|d| {
            let op = d.pointer_mut("/paths/~1pets/get").unwrap().as_mapping_mut().unwrap();
            op.insert("x-codegen-name", Document::string("list"));
        });
        assert_eq!(single(&diff(&yaml(BASE), &new)).severity, Severity::Patch);
    }

    #[test]
    fn schema_removed_is_breaking_in_older_dialect() {
        let old = yaml("swagger: '2.0'\ndefinitions: {Pet: {type: object}, Owner: {type: object}}\n");
        let new = yaml("swagger: '2.0'\ndefinitions: {Pet: {type: object}}\n");
        let d = diff(&old, &new);
        let e = single(&d);
        assert_eq!(e.path, "/definitions/Owner");
        assert_eq!(e.severity, Severity::Breaking);
    }

    #[test]
    fn reference_retarget_is_major() {
        let new = with(|d| {
            *d.pointer_mut("/paths/~1pets/post/requestBody/content/application~1json/schema/$ref").unwrap() =
                Document::string("#/components/schemas/NewPet");
        });
        let d = diff(&yaml(BASE), &new);
        let e = single(&d);
        assert_eq!(e.severity, Severity::Major);
        assert_eq!(e.path, "/paths/~1pets/post/requestBody/content/application~1json/schema/$ref");
    }
}
