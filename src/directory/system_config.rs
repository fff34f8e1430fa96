// ABOUTME: System configuration read and merge-write operations on the facade
// ABOUTME: Lazily materialized defaults; updates merge fields, never replace the document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

use serde_json::json;

use super::audit::actions;
use super::{collections, DirectoryRepository, CONFIG_DOC_ID};
use crate::errors::{AppError, AppResult};
use crate::models::{AdminContext, SystemConfig, SystemConfigPatch};

impl DirectoryRepository {
    /// Read the system configuration
    ///
    /// Returns the documented defaults when the singleton document has not
    /// been written yet; a partially written document is filled up with
    /// defaults field by field.
    ///
    /// # Errors
    ///
    /// Propagates store failures; a malformed document fails with a
    /// serialization error.
    pub async fn get_system_config(&self) -> AppResult<SystemConfig> {
        match self.store.get(collections::SYSTEM, CONFIG_DOC_ID).await? {
            None => Ok(SystemConfig::default()),
            Some(doc) => serde_json::from_value(doc.data).map_err(|e| {
                AppError::serialization(format!("malformed system configuration: {e}"))
                    .with_collection(collections::SYSTEM)
                    .with_resource_id(CONFIG_DOC_ID)
            }),
        }
    }

    /// Apply a partial configuration update
    ///
    /// Merge semantics: only the fields present in the patch are written,
    /// everything else is preserved; the document is never replaced. The
    /// singleton is created on first update. Audits the change and returns
    /// the merged configuration.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty patch; store failures otherwise.
    pub async fn update_system_config(
        &self,
        ctx: &AdminContext,
        patch: SystemConfigPatch,
    ) -> AppResult<SystemConfig> {
        if patch.is_empty() {
            return Err(AppError::invalid_input("configuration patch is empty"));
        }

        let patch_json = serde_json::to_value(&patch)?;
        self.store
            .update_merge(collections::SYSTEM, CONFIG_DOC_ID, patch_json.clone())
            .await?;
        let merged = self.get_system_config().await?;

        self.audit
            .record(
                &ctx.admin_id,
                actions::CONFIG_UPDATE,
                "system_config",
                None,
                json!({ "changes": patch_json }),
            )
            .await;

        Ok(merged)
    }
}
