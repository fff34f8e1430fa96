// ABOUTME: In-process document store backend over concurrent hash maps
// ABOUTME: Implements exactly the limited query primitives, for tests and local development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use super::{CursorKey, Document, DocumentStore, ScalarValue, SortDirection, StoreError, StoreQuery};

/// In-memory backend implementing the store's limited primitives
///
/// Matching, ordering, cursor traversal, and counting behave exactly like the
/// managed backend they stand in for, except that `fast_count` is exact here
/// (the contract still only promises an approximate snapshot). Collections
/// are materialized lazily on first write.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, BTreeMap<String, Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently in a collection (test convenience)
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map_or(0, |docs| docs.len())
    }

    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn matching_documents(&self, query: &StoreQuery) -> Vec<Document> {
        let Some(docs) = self.collections.get(&query.collection) else {
            return Vec::new();
        };
        docs.iter()
            .filter(|(_, data)| matches_filters(data, query))
            .map(|(id, data)| Document {
                id: id.clone(),
                data: data.clone(),
            })
            .collect()
    }
}

fn matches_filters(data: &Value, query: &StoreQuery) -> bool {
    for (field, expected) in &query.eq_filters {
        let actual = data
            .as_object()
            .and_then(|map| map.get(field))
            .map_or(ScalarValue::Null, ScalarValue::from_json);
        if actual != *expected {
            return false;
        }
    }
    if let Some(range) = &query.range {
        let actual = data
            .as_object()
            .and_then(|map| map.get(&range.field))
            .map_or(ScalarValue::Null, ScalarValue::from_json);
        if !range.contains(&actual) {
            return false;
        }
    }
    true
}

fn key_ordering(a: &CursorKey, b: &CursorKey, direction: SortDirection) -> Ordering {
    let natural = a
        .sort_value
        .cmp(&b.sort_value)
        .then_with(|| a.doc_id.cmp(&b.doc_id));
    match direction {
        SortDirection::Ascending => natural,
        SortDirection::Descending => natural.reverse(),
    }
}

fn project(data: &Value, fields: &[String]) -> Value {
    let mut projected = serde_json::Map::new();
    if let Some(map) = data.as_object() {
        for field in fields {
            if let Some(value) = map.get(field) {
                projected.insert(field.clone(), value.clone());
            }
        }
    }
    Value::Object(projected)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn run_query(&self, query: &StoreQuery) -> Result<Vec<Document>, StoreError> {
        let mut matched = self.matching_documents(query);
        matched.sort_by(|a, b| {
            key_ordering(
                &a.cursor_key(&query.order_by),
                &b.cursor_key(&query.order_by),
                query.direction,
            )
        });

        if let Some(cursor) = &query.start_after {
            matched.retain(|doc| {
                key_ordering(&doc.cursor_key(&query.order_by), cursor, query.direction)
                    == Ordering::Greater
            });
        }

        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        if let Some(fields) = &query.projection {
            for doc in &mut matched {
                doc.data = project(&doc.data, fields);
            }
        }

        Ok(matched)
    }

    async fn fast_count(&self, query: &StoreQuery) -> Result<u64, StoreError> {
        Ok(self.matching_documents(query).len() as u64)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.collections.get(collection).and_then(|docs| {
            docs.get(id).map(|data| Document {
                id: id.to_owned(),
                data: data.clone(),
            })
        }))
    }

    async fn insert(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let mut docs = self.collections.entry(collection.to_owned()).or_default();
        if docs.contains_key(id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_owned(),
                id: id.to_owned(),
            });
        }
        docs.insert(id.to_owned(), data);
        Ok(())
    }

    async fn update_merge(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> Result<(), StoreError> {
        let mut docs = self.collections.entry(collection.to_owned()).or_default();
        let target = docs
            .entry(id.to_owned())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        merge_value(target, patch);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(mut docs) = self.collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}

/// Recursive merge: objects merge per key, everything else (including
/// explicit null) replaces the existing value
fn merge_value(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
