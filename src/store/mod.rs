// ABOUTME: Document store abstraction for the directory engine
// ABOUTME: Plugin-style trait exposing the limited query primitives of the managed backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

//! # Document Store Abstraction
//!
//! The directory engine targets a managed, schemaless document database with
//! deliberately limited query composition: equality predicates, at most one
//! range predicate per query, ordering by a single field (with document-id
//! tiebreak), "fetch N starting after a sorted key" pagination, field
//! projection, and an approximate fast count. [`DocumentStore`] exposes
//! exactly those primitives and nothing more; everything richer (offset
//! pagination, multi-range filtering, aggregation) is built on top of it by
//! the `directory` module.
//!
//! [`StoreClient`] wraps a backend with the deployment-configured
//! per-operation timeout and converts backend failures into [`AppError`]s
//! carrying the operation name and target collection.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::errors::{AppError, AppResult};

pub mod memory;

pub use memory::MemoryStore;

/// A raw document: its collection-unique id plus schemaless JSON fields
#[derive(Debug, Clone)]
pub struct Document {
    /// Collection-unique document identifier
    pub id: String,
    /// Document fields as a JSON object
    pub data: Value,
}

impl Document {
    /// Read a top-level field, if present
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.as_object().and_then(|map| map.get(name))
    }

    /// Read a top-level field as a comparable scalar (missing fields compare as null)
    #[must_use]
    pub fn scalar(&self, name: &str) -> ScalarValue {
        self.field(name)
            .map_or(ScalarValue::Null, ScalarValue::from_json)
    }

    /// Cursor key for this document under the given sort field
    #[must_use]
    pub fn cursor_key(&self, sort_field: &str) -> CursorKey {
        CursorKey {
            sort_value: self.scalar(sort_field),
            doc_id: self.id.clone(),
        }
    }
}

/// A comparable scalar value used in predicates, sort keys, and cursors
///
/// Cross-type ordering follows the backend's convention:
/// null < bool < integer < string. Timestamps are stored as epoch
/// milliseconds and therefore compare as integers. Non-scalar field values
/// (arrays, objects, non-integer numbers) compare as null.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl ScalarValue {
    /// Classify a JSON value into its comparable scalar form
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => number.as_i64().map_or(Self::Null, Self::Int),
            Value::String(text) => Self::Text(text.clone()),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Null,
        }
    }
}

/// Sort direction for a query's single order-by instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// One inclusive or exclusive endpoint of a range predicate
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBound {
    pub value: ScalarValue,
    pub inclusive: bool,
}

impl RangeBound {
    #[must_use]
    pub const fn inclusive(value: ScalarValue) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    #[must_use]
    pub const fn exclusive(value: ScalarValue) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// The single range predicate a query may carry
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter {
    pub field: String,
    pub lower: Option<RangeBound>,
    pub upper: Option<RangeBound>,
}

impl RangeFilter {
    /// Whether a field value falls inside this range
    #[must_use]
    pub fn contains(&self, value: &ScalarValue) -> bool {
        if let Some(lower) = &self.lower {
            let ord = value.cmp(&lower.value);
            if ord == Ordering::Less || (ord == Ordering::Equal && !lower.inclusive) {
                return false;
            }
        }
        if let Some(upper) = &self.upper {
            let ord = value.cmp(&upper.value);
            if ord == Ordering::Greater || (ord == Ordering::Equal && !upper.inclusive) {
                return false;
            }
        }
        true
    }
}

/// Position key for "start after" pagination: the last-seen sort value plus
/// the document id as tiebreak
#[derive(Debug, Clone, PartialEq)]
pub struct CursorKey {
    pub sort_value: ScalarValue,
    pub doc_id: String,
}

/// A composed query within the backend's limits: any number of equality
/// predicates, at most one range predicate (structurally enforced), one
/// order-by instruction with id tiebreak, optional start-after cursor,
/// optional limit, optional field projection
#[derive(Debug, Clone)]
pub struct StoreQuery {
    pub collection: String,
    pub eq_filters: Vec<(String, ScalarValue)>,
    pub range: Option<RangeFilter>,
    pub order_by: String,
    pub direction: SortDirection,
    pub start_after: Option<CursorKey>,
    pub limit: Option<usize>,
    pub projection: Option<Vec<String>>,
}

impl StoreQuery {
    /// New query over a collection, ordered by the given field
    #[must_use]
    pub fn new(
        collection: impl Into<String>,
        order_by: impl Into<String>,
        direction: SortDirection,
    ) -> Self {
        Self {
            collection: collection.into(),
            eq_filters: Vec::new(),
            range: None,
            order_by: order_by.into(),
            direction,
            start_after: None,
            limit: None,
            projection: None,
        }
    }
}

/// Errors produced by store backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend refused the connection or is unreachable
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Backend reported an operation failure
    #[error("store backend failure: {0}")]
    Backend(String),
    /// Insert target id already exists
    #[error("document '{id}' already exists in '{collection}'")]
    AlreadyExists { collection: String, id: String },
    /// Write target does not exist
    #[error("document '{id}' not found in '{collection}'")]
    NotFound { collection: String, id: String },
}

/// Core document store abstraction
///
/// All backends implement this trait to give the directory engine a
/// consistent interface over the managed database's limited primitives.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Execute a composed query and return matching documents in sort order
    async fn run_query(&self, query: &StoreQuery) -> Result<Vec<Document>, StoreError>;

    /// Approximate, eventually consistent count of documents matching a query
    ///
    /// The count may lag recent writes; callers must treat it as a snapshot.
    async fn fast_count(&self, query: &StoreQuery) -> Result<u64, StoreError>;

    /// Fetch a single document by id
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Create a document; fails if the id already exists
    async fn insert(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    /// Merge fields into a document, creating it if absent
    ///
    /// JSON objects merge recursively; scalars, arrays, and explicit nulls
    /// replace the existing value. Fields absent from the patch are preserved.
    async fn update_merge(&self, collection: &str, id: &str, patch: Value)
        -> Result<(), StoreError>;

    /// Remove a document; succeeds even if the id is already absent
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Store handle shared by the directory services
///
/// Wraps a backend with the per-operation timeout and maps [`StoreError`]s
/// into [`AppError`]s with operation and collection context. A store call
/// that does not return within the timeout surfaces as `StoreTimeout`; it
/// never hangs, and no partial result is returned as if complete.
#[derive(Clone)]
pub struct StoreClient {
    backend: Arc<dyn DocumentStore>,
    op_timeout: Duration,
}

impl StoreClient {
    #[must_use]
    pub fn new(backend: Arc<dyn DocumentStore>, op_timeout: Duration) -> Self {
        Self {
            backend,
            op_timeout,
        }
    }

    async fn guard<T>(
        &self,
        operation: &'static str,
        collection: &str,
        call: impl std::future::Future<Output = Result<T, StoreError>> + Send,
    ) -> AppResult<T> {
        let started = Instant::now();
        match tokio::time::timeout(self.op_timeout, call).await {
            Err(_) => Err(AppError::store_timeout(operation, collection)),
            Ok(Err(error)) => Err(map_store_error(error, operation, collection)),
            Ok(Ok(value)) => {
                debug!(
                    operation,
                    collection,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "store call completed"
                );
                Ok(value)
            }
        }
    }

    /// Execute a composed query
    ///
    /// # Errors
    ///
    /// Returns `StoreTimeout` on timeout, or the mapped backend error.
    pub async fn run_query(&self, query: &StoreQuery) -> AppResult<Vec<Document>> {
        self.guard("run_query", &query.collection, self.backend.run_query(query))
            .await
    }

    /// Approximate count of documents matching a query
    ///
    /// # Errors
    ///
    /// Returns `StoreTimeout` on timeout, or the mapped backend error.
    pub async fn fast_count(&self, query: &StoreQuery) -> AppResult<u64> {
        self.guard(
            "fast_count",
            &query.collection,
            self.backend.fast_count(query),
        )
        .await
    }

    /// Fetch a single document by id
    ///
    /// # Errors
    ///
    /// Returns `StoreTimeout` on timeout, or the mapped backend error.
    pub async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        self.guard("get", collection, self.backend.get(collection, id))
            .await
    }

    /// Create a document
    ///
    /// # Errors
    ///
    /// Returns `StoreTimeout` on timeout, or the mapped backend error.
    pub async fn insert(&self, collection: &str, id: &str, data: Value) -> AppResult<()> {
        self.guard("insert", collection, self.backend.insert(collection, id, data))
            .await
    }

    /// Merge fields into a document, creating it if absent
    ///
    /// # Errors
    ///
    /// Returns `StoreTimeout` on timeout, or the mapped backend error.
    pub async fn update_merge(&self, collection: &str, id: &str, patch: Value) -> AppResult<()> {
        self.guard(
            "update_merge",
            collection,
            self.backend.update_merge(collection, id, patch),
        )
        .await
    }

    /// Remove a document
    ///
    /// # Errors
    ///
    /// Returns `StoreTimeout` on timeout, or the mapped backend error.
    pub async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        self.guard("delete", collection, self.backend.delete(collection, id))
            .await
    }
}

fn map_store_error(error: StoreError, operation: &'static str, collection: &str) -> AppError {
    let mapped = match &error {
        StoreError::Unavailable(message) => AppError::store_unavailable(message.clone()),
        StoreError::Backend(message) => {
            AppError::store(format!("operation '{operation}' on '{collection}' failed: {message}"))
        }
        StoreError::AlreadyExists { id, .. } => {
            AppError::store(format!("document '{id}' already exists in '{collection}'"))
        }
        StoreError::NotFound { id, .. } => {
            AppError::not_found(format!("document '{id}' in '{collection}'"))
        }
    };
    mapped
        .with_operation(operation)
        .with_collection(collection)
        .with_source(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_cross_type_ordering() {
        assert!(ScalarValue::Null < ScalarValue::Bool(false));
        assert!(ScalarValue::Bool(true) < ScalarValue::Int(0));
        assert!(ScalarValue::Int(i64::MAX) < ScalarValue::Text(String::new()));
        assert!(ScalarValue::Text("a".into()) < ScalarValue::Text("b".into()));
    }

    #[test]
    fn test_scalar_from_json_non_scalars_compare_as_null() {
        assert_eq!(
            ScalarValue::from_json(&serde_json::json!([1, 2])),
            ScalarValue::Null
        );
        assert_eq!(
            ScalarValue::from_json(&serde_json::json!({"nested": true})),
            ScalarValue::Null
        );
        assert_eq!(
            ScalarValue::from_json(&serde_json::json!(1.5)),
            ScalarValue::Null
        );
    }

    #[test]
    fn test_range_bounds() {
        let range = RangeFilter {
            field: "createdAt".into(),
            lower: Some(RangeBound::inclusive(ScalarValue::Int(10))),
            upper: Some(RangeBound::exclusive(ScalarValue::Int(20))),
        };
        assert!(!range.contains(&ScalarValue::Int(9)));
        assert!(range.contains(&ScalarValue::Int(10)));
        assert!(range.contains(&ScalarValue::Int(19)));
        assert!(!range.contains(&ScalarValue::Int(20)));
        // a missing field never satisfies a lower-bounded range
        assert!(!range.contains(&ScalarValue::Null));
    }

    #[test]
    fn test_half_open_lower_range() {
        let range = RangeFilter {
            field: "lockedUntil".into(),
            lower: Some(RangeBound::exclusive(ScalarValue::Int(100))),
            upper: None,
        };
        assert!(!range.contains(&ScalarValue::Int(100)));
        assert!(range.contains(&ScalarValue::Int(101)));
        assert!(!range.contains(&ScalarValue::Null));
    }
}
