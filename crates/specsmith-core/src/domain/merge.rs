//! Deep merge of document trees.
//!
//! | target   | source   | result                              |
//! |----------|----------|-------------------------------------|
//! | mapping  | mapping  | key-wise merge, recursing on values |
//! | sequence | sequence | target items then source items      |
//! | anything | anything | source                              |
//!
//! Merging never fails. Sequences are concatenated without removing
//! duplicates, so merging two documents that share a server list yields the
//! list twice.

use crate::domain::document::Document;

/// Merge `source` into `target` and return the result.
///
/// Both inputs are taken by value; nothing in the result aliases a caller's
/// tree.
pub fn merge(target: Document, source: Document) -> Document {
    match (target, source) {
        (Document::Mapping(mut target), Document::Mapping(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(slot) => {
                        let existing = std::mem::take(slot);
                        *slot = merge(existing, value);
                    }
                    None => {
                        target.insert(key, value);
                    }
                }
            }
            Document::Mapping(target)
        }
        (Document::Sequence(mut target), Document::Sequence(source)) => {
            target.extend(source);
            Document::Sequence(target)
        }
        (_, source) => source,
    }
}

/// Fold `documents` left to right with [`merge`], starting from an empty
/// mapping.
pub fn merge_all(documents: impl IntoIterator<Item = Document>) -> Document {
    documents.into_iter().fold(Document::default(), merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::decode;
    use pretty_assertions::assert_eq;

    fn yaml(text: &str) -> Document {
        decode(text.as_bytes(), Some("yaml"), "test").unwrap()
    }

    #[test]
    fn disjoint_keys_are_unioned() {
        let merged = merge(yaml("a: 1\n"), yaml("b: 2\n"));
        assert_eq!(merged, yaml("a: 1\nb: 2\n"));
    }

    #[test]
    fn nested_mappings_recurse() {
        let merged = merge(
            yaml("paths:\n  /a: {get: {}}\n"),
            yaml("paths:\n  /b: {post: {}}\n"),
        );
        assert_eq!(merged, yaml("paths:\n  /a: {get: {}}\n  /b: {post: {}}\n"));
    }

    #[test]
    fn sequences_concatenate_without_dedup() {
        let servers = "servers:\n  - url: https://a\n";
        let merged = merge(yaml(servers), yaml(servers));
        assert_eq!(merged.get("servers").and_then(Document::as_sequence).map(<[_]>::len), Some(2));
    }

    #[test]
    fn later_scalar_wins() {
        let merged = merge_all([
            yaml("info: {title: A, version: '1'}\n"),
            yaml("info: {title: B}\n"),
        ]);
        assert_eq!(merged, yaml("info: {title: B, version: '1'}\n"));
    }

    #[test]
    fn kind_mismatch_takes_source() {
        assert_eq!(merge(yaml("a: [1]\n"), yaml("a: {b: 1}\n")), yaml("a: {b: 1}\n"));
        assert_eq!(merge(yaml("a: {b: 1}\n"), yaml("a: x\n")), yaml("a: x\n"));
    }

    #[test]
    fn existing_key_keeps_its_position() {
        let merged = merge(yaml("a: 1\nb: 2\n"), yaml("a: 3\n"));
        let keys: Vec<_> = merged.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn sequential_fold_matches_stepwise_merge() {
        let (a, b, c) = (
            yaml("x: 1\nl: [1]\n"),
            yaml("x: 2\ny: {z: 1}\nl: [2]\n"),
            yaml("y: {w: 2}\nl: [3]\n"),
        );
        let folded = merge_all([a.clone(), b.clone(), c.clone()]);
        let stepwise = merge(merge(merge(Document::default(), a), b), c);
        assert_eq!(folded, stepwise);
    }

    #[test]
    fn self_merge_without_sequences_is_identity() {
        let d = yaml("openapi: 3.0.0\ninfo: {title: t, version: '1'}\npaths:\n  /a: {get: {operationId: a}}\n");
        assert_eq!(merge(d.clone(), d.clone()), d);
    }
}
