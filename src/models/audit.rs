// ABOUTME: Immutable audit entry model for administrative mutations
// ABOUTME: Created once with a generated id and server timestamp, never mutated
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One append-only record of an administrative mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Generated identifier
    pub id: String,
    /// Acting administrator
    pub admin_id: String,
    /// Action name, e.g. `user.update`
    pub action: String,
    /// Kind of target the action applied to
    pub target_type: String,
    /// Target identifier, when the action has a single target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Structured detail, enough to reconstruct the change
    #[serde(default)]
    pub details: Value,
    /// Server timestamp at creation
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Create an entry with a generated id and the current server time
    #[must_use]
    pub fn new(
        admin_id: impl Into<String>,
        action: impl Into<String>,
        target_type: impl Into<String>,
        target_id: Option<String>,
        details: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            admin_id: admin_id.into(),
            action: action.into(),
            target_type: target_type.into(),
            target_id,
            details,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_get_unique_ids() {
        let a = AuditEntry::new("admin-1", "user.update", "user", None, Value::Null);
        let b = AuditEntry::new("admin-1", "user.update", "user", None, Value::Null);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_entry_round_trip() {
        let entry = AuditEntry::new(
            "admin-1",
            "user.delete_soft",
            "user",
            Some("user-7".into()),
            serde_json::json!({ "email": "x@example.com" }),
        );
        let encoded = serde_json::to_value(&entry).unwrap();
        let decoded: AuditEntry = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.target_id.as_deref(), Some("user-7"));
        assert_eq!(decoded.action, "user.delete_soft");
    }
}
