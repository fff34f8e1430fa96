// ABOUTME: Administrative directory engine: filtering, query compilation, pagination,
// ABOUTME: aggregation, auditing, and the repository facade composing them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

//! # Administrative Directory Engine
//!
//! Searching, filtering, sorting, and paginating the user collection of a
//! store that only offers equality predicates, a single range predicate,
//! single-field ordering, start-after cursors, and an approximate count.
//!
//! The pieces compose in one direction: raw listing parameters are validated
//! into a [`filter::UserFilter`], compiled by [`query`] into a
//! [`crate::store::StoreQuery`], and executed either through
//! [`pagination`] (a page of records) or [`stats`] (summary statistics).
//! Every administrative mutation additionally appends an [`audit`] entry,
//! best-effort. [`DirectoryRepository`] is the public surface.

pub mod audit;
pub mod backups;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod stats;
pub mod system_config;
pub mod users;

pub use audit::AuditRecorder;
pub use filter::{ListUsersParams, ListUsersQuery, PageRequest, SortField, SortSpec, UserFilter};
pub use pagination::PageSlice;
pub use stats::{SystemStats, UserStats};
pub use users::UserPage;

use crate::config::DirectoryConfig;
use crate::store::StoreClient;

/// Collections this engine touches
pub mod collections {
    /// User records, owned by the upstream account subsystem
    pub const USERS: &str = "users";
    /// Append-only audit log, owned by this engine
    pub const AUDIT_LOG: &str = "audit_log";
    /// Singleton documents (system configuration), owned by this engine
    pub const SYSTEM: &str = "system";
    /// Backup bookkeeping, owned by this engine
    pub const BACKUPS: &str = "backups";
}

/// Document id of the configuration singleton in [`collections::SYSTEM`]
pub(crate) const CONFIG_DOC_ID: &str = "config";

/// Public surface of the directory engine
///
/// A stateless service value over a shared [`StoreClient`]; cloning is cheap
/// and instances may serve concurrent requests. Constructed explicitly from
/// its collaborators; there is no process-wide registry.
#[derive(Clone)]
pub struct DirectoryRepository {
    pub(crate) store: StoreClient,
    pub(crate) audit: AuditRecorder,
    pub(crate) config: DirectoryConfig,
}

impl DirectoryRepository {
    #[must_use]
    pub fn new(store: StoreClient, audit: AuditRecorder, config: DirectoryConfig) -> Self {
        Self {
            store,
            audit,
            config,
        }
    }
}
