// ABOUTME: Integration tests for the system configuration singleton
// ABOUTME: Lazily materialized defaults and strict merge-not-replace update semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::BTreeMap;

use common::{admin_ctx, create_test_directory};
use planner_directory::errors::ErrorCode;
use planner_directory::models::system_config::{RateLimitPatch, UploadPatch};
use planner_directory::models::{SystemConfig, SystemConfigPatch};

#[tokio::test]
async fn test_defaults_are_returned_before_any_write() {
    let (directory, _client) = create_test_directory();

    let config = directory.get_system_config().await.unwrap();
    assert_eq!(config, SystemConfig::default());
    assert!(!config.maintenance_mode);
    assert!(config.registration_enabled);
    assert_eq!(config.rate_limit.requests_per_minute, 120);
    assert_eq!(config.upload.max_size_bytes, 10 * 1024 * 1024);
}

#[tokio::test]
async fn test_maintenance_mode_merge_scenario() {
    let (directory, _client) = create_test_directory();

    directory
        .update_system_config(
            &admin_ctx(),
            SystemConfigPatch {
                maintenance_mode: Some(true),
                ..SystemConfigPatch::default()
            },
        )
        .await
        .unwrap();

    let config = directory.get_system_config().await.unwrap();
    assert!(config.maintenance_mode);
    // every other field still carries its documented default
    assert_eq!(
        config,
        SystemConfig {
            maintenance_mode: true,
            ..SystemConfig::default()
        }
    );
}

#[tokio::test]
async fn test_nested_sections_merge_field_by_field() {
    let (directory, _client) = create_test_directory();
    let ctx = admin_ctx();

    directory
        .update_system_config(
            &ctx,
            SystemConfigPatch {
                rate_limit: Some(RateLimitPatch {
                    burst: Some(80),
                    ..RateLimitPatch::default()
                }),
                ..SystemConfigPatch::default()
            },
        )
        .await
        .unwrap();
    directory
        .update_system_config(
            &ctx,
            SystemConfigPatch {
                upload: Some(UploadPatch {
                    max_size_bytes: Some(1024),
                    ..UploadPatch::default()
                }),
                ..SystemConfigPatch::default()
            },
        )
        .await
        .unwrap();

    let config = directory.get_system_config().await.unwrap();
    assert_eq!(config.rate_limit.burst, 80);
    assert_eq!(config.rate_limit.requests_per_minute, 120);
    assert_eq!(config.upload.max_size_bytes, 1024);
    assert_eq!(config.upload.allowed_mime_types.len(), 3);
}

#[tokio::test]
async fn test_feature_flags_merge_per_key() {
    let (directory, _client) = create_test_directory();
    let ctx = admin_ctx();

    directory
        .update_system_config(
            &ctx,
            SystemConfigPatch {
                feature_flags: Some(BTreeMap::from([("shared_boards".to_owned(), true)])),
                ..SystemConfigPatch::default()
            },
        )
        .await
        .unwrap();
    directory
        .update_system_config(
            &ctx,
            SystemConfigPatch {
                feature_flags: Some(BTreeMap::from([("ocr_import".to_owned(), false)])),
                ..SystemConfigPatch::default()
            },
        )
        .await
        .unwrap();

    let config = directory.get_system_config().await.unwrap();
    assert_eq!(config.feature_flags.get("shared_boards"), Some(&true));
    assert_eq!(config.feature_flags.get("ocr_import"), Some(&false));
}

#[tokio::test]
async fn test_update_returns_the_merged_configuration() {
    let (directory, _client) = create_test_directory();

    let merged = directory
        .update_system_config(
            &admin_ctx(),
            SystemConfigPatch {
                registration_enabled: Some(false),
                ..SystemConfigPatch::default()
            },
        )
        .await
        .unwrap();
    assert!(!merged.registration_enabled);
    assert!(!merged.maintenance_mode);
}

#[tokio::test]
async fn test_empty_patch_is_rejected() {
    let (directory, _client) = create_test_directory();

    let error = directory
        .update_system_config(&admin_ctx(), SystemConfigPatch::default())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}
