// ABOUTME: Integration tests for administrative user mutations
// ABOUTME: Partial updates, soft and hard deletion, and their visibility guarantees
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration as TimeDelta, Utc};
use common::{admin_ctx, create_test_directory, seed_users, test_user};
use planner_directory::errors::ErrorCode;
use planner_directory::models::{SubscriptionPlan, UserRole, UserUpdate};

#[tokio::test]
async fn test_update_changes_fields_and_stamps_updated_at() {
    let (directory, client) = create_test_directory();
    seed_users(&client, [test_user(0)]).await;
    let before = directory.get_user("user-000").await.unwrap();

    let update = UserUpdate {
        role: Some(UserRole::Admin),
        plan: Some(SubscriptionPlan::Team),
        ..UserUpdate::default()
    };
    let updated = directory
        .update_user(&admin_ctx(), "user-000", update)
        .await
        .unwrap();

    assert_eq!(updated.role, UserRole::Admin);
    assert_eq!(updated.plan, SubscriptionPlan::Team);
    assert!(updated.updated_at > before.updated_at);
    // untouched fields survive the merge
    assert_eq!(updated.email, before.email);
    assert_eq!(updated.created_at, before.created_at);
}

#[tokio::test]
async fn test_update_sets_and_clears_lock() {
    let (directory, client) = create_test_directory();
    seed_users(&client, [test_user(0)]).await;

    let until = Utc::now() + TimeDelta::days(3);
    let locked = directory
        .update_user(
            &admin_ctx(),
            "user-000",
            UserUpdate {
                locked_until: Some(Some(until)),
                ..UserUpdate::default()
            },
        )
        .await
        .unwrap();
    assert!(locked.is_banned(Utc::now()));

    let unlocked = directory
        .update_user(
            &admin_ctx(),
            "user-000",
            UserUpdate {
                locked_until: Some(None),
                ..UserUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(unlocked.locked_until, None);
    assert!(!unlocked.is_banned(Utc::now()));
}

#[tokio::test]
async fn test_empty_update_is_rejected() {
    let (directory, client) = create_test_directory();
    seed_users(&client, [test_user(0)]).await;

    let error = directory
        .update_user(&admin_ctx(), "user-000", UserUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_update_of_missing_user_is_not_found() {
    let (directory, _client) = create_test_directory();

    let error = directory
        .update_user(
            &admin_ctx(),
            "user-999",
            UserUpdate {
                role: Some(UserRole::Admin),
                ..UserUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_soft_delete_keeps_the_record_readable() {
    let (directory, client) = create_test_directory();
    seed_users(&client, [test_user(0)]).await;

    directory
        .delete_user(&admin_ctx(), "user-000", true)
        .await
        .unwrap();

    let user = directory.get_user("user-000").await.unwrap();
    assert!(user.is_deleted);
    assert!(user.deleted_at.is_some());
}

#[tokio::test]
async fn test_hard_delete_removes_the_record() {
    let (directory, client) = create_test_directory();
    seed_users(&client, [test_user(0)]).await;

    directory
        .delete_user(&admin_ctx(), "user-000", true)
        .await
        .unwrap();
    directory
        .delete_user(&admin_ctx(), "user-000", false)
        .await
        .unwrap();

    let error = directory.get_user("user-000").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_delete_of_missing_user_is_not_found() {
    let (directory, _client) = create_test_directory();

    let error = directory
        .delete_user(&admin_ctx(), "user-404", true)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::NotFound);
}
