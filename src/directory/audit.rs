// ABOUTME: Best-effort audit recorder for administrative mutations
// ABOUTME: Appends immutable entries; write failures are logged and swallowed, never surfaced
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

//! Append-only audit trail of administrative mutations.
//!
//! Recording is a best-effort side channel: a failed audit write must never
//! fail, delay, or roll back the operation that triggered it. The failure is
//! logged and discarded inside [`AuditRecorder::record`] itself, so callers
//! cannot observe audit failures at all.

use serde_json::Value;
use tracing::warn;

use super::collections;
use crate::errors::AppResult;
use crate::models::AuditEntry;
use crate::store::{ScalarValue, SortDirection, StoreClient, StoreQuery};

/// Audit action names
pub mod actions {
    pub const USER_UPDATE: &str = "user.update";
    pub const USER_SOFT_DELETE: &str = "user.delete_soft";
    pub const USER_HARD_DELETE: &str = "user.delete_hard";
    pub const CONFIG_UPDATE: &str = "system_config.update";
    pub const BACKUP_CREATE: &str = "backup.create";
}

/// Appends immutable audit entries and reads them back newest-first
#[derive(Clone)]
pub struct AuditRecorder {
    store: StoreClient,
}

impl AuditRecorder {
    #[must_use]
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Append one audit entry, best-effort
    ///
    /// Infallible by contract: any underlying write failure is logged at
    /// `warn` and swallowed.
    pub async fn record(
        &self,
        admin_id: &str,
        action: &str,
        target_type: &str,
        target_id: Option<&str>,
        details: Value,
    ) {
        let entry = AuditEntry::new(
            admin_id,
            action,
            target_type,
            target_id.map(str::to_owned),
            details,
        );
        let data = match serde_json::to_value(&entry) {
            Ok(data) => data,
            Err(error) => {
                warn!(action, admin_id, %error, "audit entry could not be encoded, dropping");
                return;
            }
        };
        if let Err(error) = self
            .store
            .insert(collections::AUDIT_LOG, &entry.id, data)
            .await
        {
            warn!(
                action,
                admin_id,
                entry_id = %entry.id,
                %error,
                "audit write failed, continuing without it"
            );
        }
    }

    /// List entries newest-first, optionally filtered to one administrator
    ///
    /// # Errors
    ///
    /// Propagates store failures; malformed entries fail with a
    /// serialization error rather than being silently dropped.
    pub async fn list(&self, admin_id: Option<&str>, limit: usize) -> AppResult<Vec<AuditEntry>> {
        let mut query = StoreQuery::new(
            collections::AUDIT_LOG,
            "createdAt",
            SortDirection::Descending,
        );
        if let Some(admin_id) = admin_id {
            query
                .eq_filters
                .push(("adminId".into(), ScalarValue::Text(admin_id.into())));
        }
        query.limit = Some(limit);

        let documents = self.store.run_query(&query).await?;
        documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value(doc.data).map_err(|e| {
                    crate::errors::AppError::serialization(format!(
                        "malformed audit entry '{}': {e}",
                        doc.id
                    ))
                    .with_collection(collections::AUDIT_LOG)
                })
            })
            .collect()
    }
}

impl super::DirectoryRepository {
    /// Append a free-form audit entry on behalf of the controller layer
    pub async fn record_audit_entry(
        &self,
        ctx: &crate::models::AdminContext,
        action: &str,
        target_type: &str,
        target_id: Option<&str>,
        details: Value,
    ) {
        self.audit
            .record(&ctx.admin_id, action, target_type, target_id, details)
            .await;
    }

    /// List audit entries newest-first, optionally for one administrator
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_audit_entries(
        &self,
        admin_id: Option<&str>,
        limit: usize,
    ) -> AppResult<Vec<AuditEntry>> {
        self.audit
            .list(admin_id, limit.min(self.config.max_page_size))
            .await
    }
}
