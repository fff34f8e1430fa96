// ABOUTME: Shared test utilities for the directory engine integration tests
// ABOUTME: Quiet logging setup, facade construction over the memory store, user seeding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use chrono::{Duration as TimeDelta, Utc};
use planner_directory::config::DirectoryConfig;
use planner_directory::directory::{AuditRecorder, DirectoryRepository};
use planner_directory::models::{AdminContext, SubscriptionPlan, UserRecord, UserRole};
use planner_directory::store::{MemoryStore, StoreClient};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Test tuning: small scan batches so batching paths are actually exercised
pub fn test_config() -> DirectoryConfig {
    DirectoryConfig {
        scan_batch_size: 8,
        ..DirectoryConfig::default()
    }
}

/// Fresh facade over an empty in-memory store
pub fn create_test_directory() -> (DirectoryRepository, StoreClient) {
    init_test_logging();
    let client = StoreClient::new(Arc::new(MemoryStore::new()), Duration::from_secs(5));
    let audit = AuditRecorder::new(client.clone());
    let directory = DirectoryRepository::new(client.clone(), audit, test_config());
    (directory, client)
}

/// Facade over a caller-provided backend (for failure-injection tests)
pub fn create_directory_with_backend(
    backend: Arc<dyn planner_directory::store::DocumentStore>,
) -> DirectoryRepository {
    init_test_logging();
    let client = StoreClient::new(backend, Duration::from_secs(5));
    let audit = AuditRecorder::new(client.clone());
    DirectoryRepository::new(client, audit, test_config())
}

pub fn admin_ctx() -> AdminContext {
    AdminContext::new("admin-1", UserRole::Admin)
}

/// Deterministic user fixture: ids, emails, and timestamps are a strict
/// function of `n`, spaced one minute apart and well in the past
pub fn test_user(n: u32) -> UserRecord {
    let base = Utc::now() - TimeDelta::days(90);
    let created_at = base + TimeDelta::minutes(i64::from(n));
    UserRecord {
        created_at,
        last_active_at: created_at,
        updated_at: created_at,
        ..UserRecord::new(format!("user-{n:03}"), format!("user{n:03}@example.com"))
    }
}

pub fn with_role(mut user: UserRecord, role: UserRole) -> UserRecord {
    user.role = role;
    user
}

pub fn with_plan(mut user: UserRecord, plan: SubscriptionPlan) -> UserRecord {
    user.plan = plan;
    user
}

pub fn soft_deleted(mut user: UserRecord) -> UserRecord {
    user.is_deleted = true;
    user.deleted_at = Some(user.created_at + TimeDelta::days(1));
    user
}

pub fn banned(mut user: UserRecord) -> UserRecord {
    user.locked_until = Some(Utc::now() + TimeDelta::days(7));
    user
}

/// Write user records straight into the store, as the upstream account
/// subsystem would
pub async fn seed_users(client: &StoreClient, users: impl IntoIterator<Item = UserRecord>) {
    for user in users {
        let data = user.to_document_data().expect("encode user fixture");
        client
            .insert("users", &user.id, data)
            .await
            .expect("seed user fixture");
    }
}
