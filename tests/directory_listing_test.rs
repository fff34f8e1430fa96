// ABOUTME: Integration tests for user listing: filtering, sorting, and offset pagination
// ABOUTME: Covers page bounds, has_more exactness, contiguity, and filter combinations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    banned, create_test_directory, seed_users, soft_deleted, test_user, with_plan, with_role,
};
use planner_directory::directory::ListUsersParams;
use planner_directory::errors::ErrorCode;
use planner_directory::models::{SubscriptionPlan, UserRole};

fn active_filter(page: u32, limit: u32) -> ListUsersParams {
    ListUsersParams {
        status: Some("active".into()),
        page: Some(page),
        limit: Some(limit),
        ..ListUsersParams::default()
    }
}

#[tokio::test]
async fn test_active_listing_scenario_25_active_5_deleted() {
    let (directory, client) = create_test_directory();
    seed_users(&client, (0..25).map(test_user)).await;
    seed_users(&client, (25..30).map(|n| soft_deleted(test_user(n)))).await;

    let first = directory.list_users(active_filter(1, 20)).await.unwrap();
    assert_eq!(first.users.len(), 20);
    assert!(first.has_more);
    assert_eq!(first.approximate_total, 25);

    let second = directory.list_users(active_filter(2, 20)).await.unwrap();
    assert_eq!(second.users.len(), 5);
    assert!(!second.has_more);
}

#[tokio::test]
async fn test_pages_concatenate_without_duplicates_or_omissions() {
    let (directory, client) = create_test_directory();
    seed_users(&client, (0..30).map(test_user)).await;

    let mut collected = Vec::new();
    for page in 1..=5 {
        let params = ListUsersParams {
            sort_by: Some("email".into()),
            sort_direction: Some("asc".into()),
            page: Some(page),
            limit: Some(7),
            ..ListUsersParams::default()
        };
        let result = directory.list_users(params).await.unwrap();
        assert_eq!(result.has_more, page < 5);
        collected.extend(result.users.into_iter().map(|user| user.email));
    }

    let expected: Vec<String> = (0..30).map(|n| format!("user{n:03}@example.com")).collect();
    assert_eq!(collected, expected);
}

#[tokio::test]
async fn test_page_beyond_the_end_is_empty() {
    let (directory, client) = create_test_directory();
    seed_users(&client, (0..5).map(test_user)).await;

    let result = directory.list_users(active_filter(4, 20)).await.unwrap();
    assert!(result.users.is_empty());
    assert!(!result.has_more);
}

#[tokio::test]
async fn test_default_sort_is_created_at_descending() {
    let (directory, client) = create_test_directory();
    seed_users(&client, (0..3).map(test_user)).await;

    let result = directory
        .list_users(ListUsersParams::default())
        .await
        .unwrap();
    let ids: Vec<&str> = result.users.iter().map(|user| user.id.as_str()).collect();
    assert_eq!(ids, ["user-002", "user-001", "user-000"]);
}

#[tokio::test]
async fn test_email_prefix_search() {
    let (directory, client) = create_test_directory();
    seed_users(&client, (0..12).map(test_user)).await;

    let params = ListUsersParams {
        search: Some("user00".into()),
        sort_by: Some("email".into()),
        sort_direction: Some("asc".into()),
        ..ListUsersParams::default()
    };
    let result = directory.list_users(params).await.unwrap();
    assert_eq!(result.users.len(), 10);
    assert!(result
        .users
        .iter()
        .all(|user| user.email.starts_with("user00")));
}

#[tokio::test]
async fn test_equality_filters_combine() {
    let (directory, client) = create_test_directory();
    seed_users(
        &client,
        (0..4).map(|n| with_plan(with_role(test_user(n), UserRole::Admin), SubscriptionPlan::Pro)),
    )
    .await;
    seed_users(&client, (4..10).map(test_user)).await;

    let params = ListUsersParams {
        role: Some("admin".into()),
        plan: Some("pro".into()),
        ..ListUsersParams::default()
    };
    let result = directory.list_users(params).await.unwrap();
    assert_eq!(result.users.len(), 4);
    assert_eq!(result.approximate_total, 4);
}

#[tokio::test]
async fn test_banned_filter_combines_with_role() {
    let (directory, client) = create_test_directory();
    seed_users(&client, (0..3).map(|n| banned(test_user(n)))).await;
    seed_users(
        &client,
        (3..5).map(|n| banned(with_role(test_user(n), UserRole::Admin))),
    )
    .await;
    seed_users(&client, (5..9).map(test_user)).await;

    let params = ListUsersParams {
        status: Some("banned".into()),
        role: Some("admin".into()),
        ..ListUsersParams::default()
    };
    let result = directory.list_users(params).await.unwrap();
    assert_eq!(result.users.len(), 2);
}

#[tokio::test]
async fn test_banned_with_created_range_is_a_filter_conflict() {
    let (directory, _client) = create_test_directory();

    let params = ListUsersParams {
        status: Some("banned".into()),
        created_after: Some(chrono::Utc::now() - chrono::Duration::days(30)),
        ..ListUsersParams::default()
    };
    let error = directory.list_users(params).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::FilterConflict);
}

#[tokio::test]
async fn test_search_with_created_range_is_a_filter_conflict() {
    let (directory, _client) = create_test_directory();

    let params = ListUsersParams {
        search: Some("user".into()),
        created_before: Some(chrono::Utc::now()),
        ..ListUsersParams::default()
    };
    let error = directory.list_users(params).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::FilterConflict);
}

#[tokio::test]
async fn test_unknown_sort_field_is_rejected_before_any_store_call() {
    let (directory, _client) = create_test_directory();

    let params = ListUsersParams {
        sort_by: Some("passwordHash".into()),
        ..ListUsersParams::default()
    };
    let error = directory.list_users(params).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidSortField);
}

#[tokio::test]
async fn test_limit_above_maximum_is_clamped() {
    let (directory, client) = create_test_directory();
    seed_users(&client, (0..110).map(test_user)).await;

    let params = ListUsersParams {
        limit: Some(1_000),
        ..ListUsersParams::default()
    };
    let result = directory.list_users(params).await.unwrap();
    assert_eq!(result.users.len(), 100);
    assert!(result.has_more);
    assert_eq!(result.limit, 100);
}
