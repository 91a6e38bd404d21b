//! # Entity Table
//!
//! A typesafe, insertion-ordered collection of records keyed by string id.
//!
//! [`EntityTable`] is the storage behind every entity kind of the
//! [`ReconciliationStore`](super::ReconciliationStore):
//! - Stores records by id in an `IndexMap` so rendering order is stable and
//!   matches the order the producer sent them in
//! - Exposes the same query methods (`get`, `all`, `ids`, `len`) for every kind
//! - Exposes the reconciliation mutations (`replace`, `upsert`, `delete`,
//!   `merge_partial`)
//!
//! Mutation is only reachable through the store so the cross-entity
//! invariants run on every write.

use indexmap::IndexMap;

/// A record type that supports shallow field-wise merging.
pub trait Mergeable: Default {
    /// Overwrite every field that `patch` carries; keep the rest.
    fn merge_from(&mut self, patch: Self);
}

/// Insertion-ordered records keyed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTable<E> {
    items: IndexMap<String, E>,
}

impl<E> Default for EntityTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EntityTable<E> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    // ─── Queries ─────────────────────────────────────────────

    /// Get a record by id.
    pub fn get(&self, id: &str) -> Option<&E> {
        self.items.get(id)
    }

    /// Check if a record exists.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// All `(id, record)` pairs in insertion order.
    pub fn all(&self) -> impl Iterator<Item = (&String, &E)> {
        self.items.iter()
    }

    /// All ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.items.keys()
    }

    /// Number of records (computed, not stored).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ─── Mutations ───────────────────────────────────────────

    /// Drop every record and take the given set wholesale.
    pub(crate) fn replace(&mut self, items: impl IntoIterator<Item = (String, E)>) {
        self.items.clear();
        self.items.extend(items);
    }

    /// Insert or overwrite a record, keeping its position if it existed.
    pub(crate) fn upsert(&mut self, id: String, record: E) -> Option<E> {
        self.items.insert(id, record)
    }

    /// Remove a record, preserving the order of the rest.
    pub(crate) fn delete(&mut self, id: &str) -> Option<E> {
        self.items.shift_remove(id)
    }
}

impl<E: Mergeable> EntityTable<E> {
    /// Merge a partial patch into a record, creating it from the patch if absent.
    pub(crate) fn merge_partial(&mut self, id: &str, patch: E) -> &E {
        let entry = self.items.entry(id.to_string()).or_default();
        entry.merge_from(patch);
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Pair {
        a: Option<u8>,
        b: Option<u8>,
    }

    impl Mergeable for Pair {
        fn merge_from(&mut self, patch: Self) {
            if patch.a.is_some() {
                self.a = patch.a;
            }
            if patch.b.is_some() {
                self.b = patch.b;
            }
        }
    }

    #[test]
    fn test_replace_drops_previous_entries() {
        let mut table = EntityTable::new();
        table.upsert("old".to_string(), 1);
        table.replace([("x".to_string(), 2), ("y".to_string(), 3)]);
        let ids: Vec<&str> = table.ids().map(String::as_str).collect();
        assert_eq!(ids, ["x", "y"]);
        assert!(!table.contains("old"));
    }

    #[test]
    fn test_upsert_keeps_position() {
        let mut table = EntityTable::new();
        table.upsert("a".to_string(), 1);
        table.upsert("b".to_string(), 2);
        assert_eq!(table.upsert("a".to_string(), 9), Some(1));
        let pairs: Vec<(&str, i32)> = table.all().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(pairs, [("a", 9), ("b", 2)]);
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut table = EntityTable::new();
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            table.upsert((*id).to_string(), i);
        }
        assert_eq!(table.delete("b"), Some(1));
        assert_eq!(table.delete("b"), None);
        let ids: Vec<&str> = table.ids().map(String::as_str).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_merge_partial_creates_then_merges() {
        let mut table: EntityTable<Pair> = EntityTable::new();
        table.merge_partial("p", Pair { a: Some(1), b: None });
        table.merge_partial("p", Pair { a: None, b: Some(2) });
        table.merge_partial("p", Pair { a: Some(3), b: None });
        assert_eq!(table.get("p"), Some(&Pair { a: Some(3), b: Some(2) }));
    }
}
