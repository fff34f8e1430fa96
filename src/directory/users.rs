// ABOUTME: User listing and administrative mutations on the directory facade
// ABOUTME: Listing composes validation, compilation, pagination, and the approximate count
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::audit::actions;
use super::filter::{validate_list_params, ListUsersParams};
use super::pagination::fetch_page;
use super::query::compile_user_query;
use super::{collections, DirectoryRepository};
use crate::errors::{AppError, AppResult};
use crate::models::{AdminContext, UserRecord, UserUpdate};

/// One page of the user directory
///
/// `approximate_total` comes from the store's eventually consistent count
/// and may disagree with what is actually paginable; the page itself is
/// exact for the moment each request executed. Accepted skew, not a bug.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    pub page: u32,
    pub limit: usize,
    pub has_more: bool,
    pub approximate_total: u64,
}

impl DirectoryRepository {
    /// List users by filter, sort, and page
    ///
    /// Validation and compilation run before any store round trip; the page
    /// fetch and the approximate total are then issued concurrently.
    ///
    /// # Errors
    ///
    /// `InvalidInput`/`InvalidSortField` from validation, `FilterConflict`
    /// from compilation, store errors from execution.
    pub async fn list_users(&self, params: ListUsersParams) -> AppResult<UserPage> {
        let request = validate_list_params(params, &self.config)?;
        let base = compile_user_query(&request.filter, request.sort, Utc::now())?;

        let (slice, approximate_total) = tokio::try_join!(
            fetch_page(&self.store, &base, request.page, self.config.scan_batch_size),
            self.store.fast_count(&base),
        )?;

        let users = slice
            .documents
            .into_iter()
            .map(UserRecord::from_document)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(UserPage {
            users,
            page: request.page.page,
            limit: request.page.limit,
            has_more: slice.has_more,
            approximate_total,
        })
    }

    /// Fetch a single user by id
    ///
    /// Soft-deleted records are still returned, with the flag set; only hard
    /// deletion makes an id unresolvable.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent; store errors otherwise.
    pub async fn get_user(&self, id: &str) -> AppResult<UserRecord> {
        let document = self
            .store
            .get(collections::USERS, id)
            .await?
            .ok_or_else(|| AppError::not_found("user").with_resource_id(id))?;
        UserRecord::from_document(document)
    }

    /// Apply a partial administrative update to a user
    ///
    /// Always stamps `updatedAt`. Audits the change with before/after values
    /// of the touched fields.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty update, `NotFound` if the id is absent,
    /// store errors otherwise.
    pub async fn update_user(
        &self,
        ctx: &AdminContext,
        id: &str,
        update: UserUpdate,
    ) -> AppResult<UserRecord> {
        if update.is_empty() {
            return Err(AppError::invalid_input("update contains no fields"));
        }
        let before = self.get_user(id).await?;

        let patch = update.to_patch(Utc::now());
        self.store
            .update_merge(collections::USERS, id, patch.clone())
            .await?;
        let after = self.get_user(id).await?;

        self.audit
            .record(
                &ctx.admin_id,
                actions::USER_UPDATE,
                "user",
                Some(id),
                json!({
                    "changes": patch,
                    "previous": {
                        "displayName": before.display_name,
                        "role": before.role,
                        "plan": before.plan,
                        "lockedUntil": before.locked_until.map(|ts| ts.timestamp_millis()),
                    },
                }),
            )
            .await;

        Ok(after)
    }

    /// Soft- or hard-delete a user
    ///
    /// Soft deletion sets the flag and a deletion timestamp, keeping the
    /// record readable; hard deletion removes it irreversibly and its id is
    /// never reused.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is absent; store errors otherwise.
    pub async fn delete_user(&self, ctx: &AdminContext, id: &str, soft: bool) -> AppResult<()> {
        let existing = self.get_user(id).await?;
        let now = Utc::now();

        if soft {
            let patch = json!({
                "isDeleted": true,
                "deletedAt": now.timestamp_millis(),
                "updatedAt": now.timestamp_millis(),
            });
            self.store
                .update_merge(collections::USERS, id, patch)
                .await?;
        } else {
            self.store.delete(collections::USERS, id).await?;
        }

        let action = if soft {
            actions::USER_SOFT_DELETE
        } else {
            actions::USER_HARD_DELETE
        };
        self.audit
            .record(
                &ctx.admin_id,
                action,
                "user",
                Some(id),
                json!({ "email": existing.email, "soft": soft }),
            )
            .await;

        Ok(())
    }
}
