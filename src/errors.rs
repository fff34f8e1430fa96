// ABOUTME: Unified error handling for the directory engine
// ABOUTME: Defines error codes, the AppError type, and the controller-facing response shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

//! # Unified Error Handling
//!
//! Centralized error types for the directory engine. Every error that crosses
//! the crate boundary carries a stable [`ErrorCode`] and a human-readable
//! message; backend failures are wrapped with the operation name and target
//! collection, never raw connection details.
//!
//! Validation errors (`FilterConflict`, `InvalidSortField`, `InvalidInput`)
//! are produced before any store round trip. Store errors are transient and
//! safe to retry for read-only operations only; mutating operations must not
//! be blindly retried after an ambiguous failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes surfaced past the crate boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Two range-type filters were requested for a single query
    #[serde(rename = "FILTER_CONFLICT")]
    FilterConflict,
    /// Requested sort field is not in the allow-list
    #[serde(rename = "INVALID_SORT_FIELD")]
    InvalidSortField,
    /// Malformed or out-of-range request parameter
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// Target record does not exist
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// Store operation exceeded the deployment-configured timeout
    #[serde(rename = "STORE_TIMEOUT")]
    StoreTimeout,
    /// Store backend refused the connection or is unreachable
    #[serde(rename = "STORE_UNAVAILABLE")]
    StoreUnavailable,
    /// Store backend reported an operation failure
    #[serde(rename = "STORE_ERROR")]
    StoreError,
    /// Document could not be encoded or decoded
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
    /// Deployment configuration is missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::FilterConflict | Self::InvalidSortField | Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::StoreUnavailable => 503,
            Self::StoreTimeout => 504,
            Self::StoreError
            | Self::SerializationError
            | Self::ConfigError
            | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::FilterConflict => "The requested filters cannot be combined in a single query",
            Self::InvalidSortField => "The requested sort field is not sortable",
            Self::InvalidInput => "The provided input is invalid",
            Self::NotFound => "The requested resource was not found",
            Self::StoreTimeout => "The data store did not respond in time",
            Self::StoreUnavailable => "The data store is currently unavailable",
            Self::StoreError => "Data store operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
        }
    }

    /// Whether a read-only operation that failed with this code may be retried
    ///
    /// Mutating operations must not be blindly retried even for these codes,
    /// since a retry after an ambiguous failure could double-apply a change.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::StoreTimeout | Self::StoreUnavailable)
    }
}

/// Additional context attached to errors for diagnosis
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ErrorContext {
    /// Store operation that failed (e.g. `run_query`, `fast_count`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    /// Target collection of the failed operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Identifier of the resource involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Additional key-value context
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

/// Unified error type for the directory engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Attach the store operation name
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Attach the target collection
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.context.collection = Some(collection.into());
        self
    }

    /// Attach the identifier of the resource involved
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Attach free-form details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Attach a source error for chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors for common errors
impl AppError {
    /// Two range-type filters requested in one query
    pub fn filter_conflict(first: impl Into<String>, second: impl Into<String>) -> Self {
        let (first, second) = (first.into(), second.into());
        Self::new(
            ErrorCode::FilterConflict,
            format!(
                "filters '{first}' and '{second}' cannot be combined: the store accepts at most one range filter per query"
            ),
        )
        .with_details(serde_json::json!({ "first": first, "second": second }))
    }

    /// Sort field outside the allow-list
    pub fn invalid_sort_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            ErrorCode::InvalidSortField,
            format!("'{field}' is not a sortable field"),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::NotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Store operation timed out
    pub fn store_timeout(operation: impl Into<String>, collection: impl Into<String>) -> Self {
        let operation = operation.into();
        let collection = collection.into();
        Self::new(
            ErrorCode::StoreTimeout,
            format!("store operation '{operation}' on '{collection}' timed out"),
        )
        .with_operation(operation)
        .with_collection(collection)
    }

    /// Store backend unavailable
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    /// Store backend failure
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreError, message)
    }

    /// Serialization failure
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string())
    }
}

/// Error response format for the (external) controller layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorResponseDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.context.details,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::FilterConflict.http_status(), 400);
        assert_eq!(ErrorCode::NotFound.http_status(), 404);
        assert_eq!(ErrorCode::StoreUnavailable.http_status(), 503);
        assert_eq!(ErrorCode::StoreTimeout.http_status(), 504);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_transient_codes() {
        assert!(ErrorCode::StoreTimeout.is_transient());
        assert!(ErrorCode::StoreUnavailable.is_transient());
        assert!(!ErrorCode::FilterConflict.is_transient());
        assert!(!ErrorCode::NotFound.is_transient());
    }

    #[test]
    fn test_filter_conflict_names_both_predicates() {
        let error = AppError::filter_conflict("emailPrefix", "createdRange");
        assert_eq!(error.code, ErrorCode::FilterConflict);
        assert!(error.message.contains("emailPrefix"));
        assert!(error.message.contains("createdRange"));
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::store_timeout("run_query", "users");
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("STORE_TIMEOUT"));
        assert!(json.contains("run_query"));
    }

    #[test]
    fn test_context_attachment() {
        let error = AppError::store("backend failure")
            .with_operation("fast_count")
            .with_collection("users")
            .with_resource_id("user-42");

        assert_eq!(error.context.operation.as_deref(), Some("fast_count"));
        assert_eq!(error.context.collection.as_deref(), Some("users"));
        assert_eq!(error.context.resource_id.as_deref(), Some("user-42"));
    }
}
