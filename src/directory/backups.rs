// ABOUTME: Backup-record bookkeeping on the facade: insert, list newest-first, fetch by id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

use serde_json::json;

use super::audit::actions;
use super::{collections, DirectoryRepository};
use crate::errors::{AppError, AppResult};
use crate::models::{AdminContext, BackupRecord, NewBackup};
use crate::store::{SortDirection, StoreQuery};

impl DirectoryRepository {
    /// Insert a backup bookkeeping record
    ///
    /// Generates the identifier and creation timestamp; `triggered_by` is
    /// taken from the acting administrator.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn insert_backup_record(
        &self,
        ctx: &AdminContext,
        input: NewBackup,
    ) -> AppResult<BackupRecord> {
        let record = BackupRecord::new(&ctx.admin_id, input);
        let data = serde_json::to_value(&record)?;
        self.store
            .insert(collections::BACKUPS, &record.id, data)
            .await?;

        self.audit
            .record(
                &ctx.admin_id,
                actions::BACKUP_CREATE,
                "backup",
                Some(&record.id),
                json!({ "label": record.label, "status": record.status }),
            )
            .await;

        Ok(record)
    }

    /// List backup records newest-first
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_backups(&self, limit: usize) -> AppResult<Vec<BackupRecord>> {
        let mut query = StoreQuery::new(
            collections::BACKUPS,
            "createdAt",
            SortDirection::Descending,
        );
        query.limit = Some(limit.min(self.config.max_page_size));

        let documents = self.store.run_query(&query).await?;
        documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value(doc.data).map_err(|e| {
                    AppError::serialization(format!("malformed backup record '{}': {e}", doc.id))
                        .with_collection(collections::BACKUPS)
                })
            })
            .collect()
    }

    /// Fetch a backup record by id
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent; store failures otherwise.
    pub async fn get_backup(&self, id: &str) -> AppResult<BackupRecord> {
        let document = self
            .store
            .get(collections::BACKUPS, id)
            .await?
            .ok_or_else(|| AppError::not_found("backup record").with_resource_id(id))?;
        serde_json::from_value(document.data).map_err(|e| {
            AppError::serialization(format!("malformed backup record '{id}': {e}"))
                .with_collection(collections::BACKUPS)
        })
    }
}
