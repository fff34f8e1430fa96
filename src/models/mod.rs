// ABOUTME: Domain models for the directory engine
// ABOUTME: User records, audit entries, backup records, system configuration, admin principal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

pub mod admin;
pub mod audit;
pub mod backup;
pub mod system_config;
pub mod user;

pub use admin::AdminContext;
pub use audit::AuditEntry;
pub use backup::{BackupRecord, BackupStatus, NewBackup};
pub use system_config::{SystemConfig, SystemConfigPatch};
pub use user::{SubscriptionPlan, UserRecord, UserRole, UserUpdate};
