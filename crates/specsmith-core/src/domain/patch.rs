//! Applying a [`Customization`] to a merged document.
//!
//! Each override only fires when its field is non-empty, so an empty
//! customization leaves the document untouched. Prune lists name elements
//! that may or may not exist; unknown names are skipped silently.

use crate::domain::{
    codec::declared_version,
    document::{Document, Mapping},
    entities::customization::{Contact, Customization, License, Server},
    sections::{is_operation_method, paths_mut, schemas_mut},
};

/// First dialect revision whose `info` object accepts `summary`.
const SUMMARY_SINCE: (u64, u64) = (3, 1);

/// Apply `customization` to `document` and return the result.
pub fn patch(mut document: Document, customization: &Customization) -> Document {
    let supports_summary = declared_version(&document).is_some_and(|v| v >= SUMMARY_SINCE);
    if let Some(root) = document.as_mapping_mut() {
        apply_info(root, customization, supports_summary);
        if !customization.servers.is_empty() {
            root.insert("servers", servers_node(&customization.servers));
        }
    }

    prune_operations(&mut document, &customization.prune_operations);
    prune_tags(&mut document, &customization.prune_tags);
    prune_schemas(&mut document, &customization.prune_schemas);

    document
}

fn apply_info(root: &mut Mapping, c: &Customization, supports_summary: bool) {
    let summary = if supports_summary { c.summary.as_str() } else { "" };
    let strings = [
        ("title", c.title.as_str()),
        ("summary", summary),
        ("description", c.description.as_str()),
        ("version", c.version.as_str()),
    ];
    let touches_info = strings.iter().any(|(_, v)| !v.is_empty()) || c.contact.is_set() || c.license.is_set();
    if !touches_info {
        return;
    }
    let Some(info) = child_mapping(root, "info") else {
        return;
    };

    for (key, value) in strings {
        if !value.is_empty() {
            info.insert(key, Document::string(value));
        }
    }
    if c.contact.is_set() {
        info.insert("contact", contact_node(&c.contact));
    }
    if c.license.is_set() {
        info.insert("license", license_node(&c.license));
    }
}

/// Borrow `parent[key]` as a mapping, replacing any non-mapping value.
fn child_mapping<'a>(parent: &'a mut Mapping, key: &str) -> Option<&'a mut Mapping> {
    if parent.get(key).and_then(Document::as_mapping).is_none() {
        parent.insert(key, Document::default());
    }
    parent.get_mut(key).and_then(Document::as_mapping_mut)
}

fn non_empty_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Document {
    fields
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.to_string(), Document::string(v)))
        .collect::<Mapping>()
        .into()
}

fn contact_node(contact: &Contact) -> Document {
    non_empty_fields([
        ("name", contact.name.as_str()),
        ("url", contact.url.as_str()),
        ("email", contact.email.as_str()),
    ])
}

fn license_node(license: &License) -> Document {
    non_empty_fields([
        ("name", license.name.as_str()),
        ("identifier", license.identifier.as_str()),
        ("url", license.url.as_str()),
    ])
}

fn servers_node(servers: &[Server]) -> Document {
    servers
        .iter()
        .map(|s| non_empty_fields([("url", s.url.as_str()), ("description", s.description.as_str())]))
        .collect::<Vec<_>>()
        .into()
}

/// `name` selects an operation by `operationId` or as `"METHOD /path"`.
fn selects_operation(name: &str, method: &str, path: &str, operation: &Document) -> bool {
    if operation.get("operationId").and_then(Document::as_str) == Some(name) {
        return true;
    }
    name.split_once(' ')
        .is_some_and(|(m, p)| m.eq_ignore_ascii_case(method) && p.trim() == path)
}

fn prune_operations(document: &mut Document, names: &[String]) {
    if names.is_empty() {
        return;
    }
    let Some(paths) = paths_mut(document) else {
        return;
    };
    let mut emptied = Vec::new();
    for (path, item) in paths.iter_mut() {
        let Some(item) = item.as_mapping_mut() else { continue };
        let before = count_operations(item);
        item.retain(|method, op| {
            !(is_operation_method(method) && names.iter().any(|n| selects_operation(n, method, path, op)))
        });
        if before > 0 && count_operations(item) == 0 {
            emptied.push(path.to_string());
        }
    }
    paths.retain(|path, _| !emptied.iter().any(|p| p == path));
}

fn count_operations(item: &Mapping) -> usize {
    item.keys().filter(|k| is_operation_method(k)).count()
}

fn prune_tags(document: &mut Document, names: &[String]) {
    if names.is_empty() {
        return;
    }
    let pruned = |tag: &Document| tag.as_str().is_some_and(|t| names.iter().any(|n| n == t));

    if let Some(tags) = document.get_mut("tags").and_then(Document::as_sequence_mut) {
        tags.retain(|tag| !tag.get("name").is_some_and(&pruned));
    }

    let Some(paths) = paths_mut(document) else {
        return;
    };
    for (_, item) in paths.iter_mut() {
        let Some(item) = item.as_mapping_mut() else { continue };
        for (method, op) in item.iter_mut() {
            if !is_operation_method(method) {
                continue;
            }
            if let Some(tags) = op.get_mut("tags").and_then(Document::as_sequence_mut) {
                tags.retain(|t| !pruned(t));
            }
        }
    }
}

fn prune_schemas(document: &mut Document, names: &[String]) {
    if names.is_empty() {
        return;
    }
    for schemas in schemas_mut(document) {
        schemas.retain(|name, _| !names.iter().any(|n| n == name));
    }
}
