// ABOUTME: Library entry point for the Planner administrative directory engine
// ABOUTME: Query compilation, cursor pagination, aggregation, and auditing over a document store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

#![deny(unsafe_code)]

//! # Planner Directory
//!
//! The administrative directory engine of the Planner backend: search,
//! filter, sort, and paginate a large user collection held in a managed,
//! schemaless document store that only offers limited native query
//! composition: equality filters plus at most one range filter per query,
//! single-field ordering, "start after a sorted key" pagination, and an
//! approximate fast count.
//!
//! ## Architecture
//!
//! - **`store`**: the document-store seam, a trait exposing exactly the
//!   backend's limited primitives, a timeout-enforcing client, and an
//!   in-memory backend for tests and local development
//! - **`directory`**: the engine itself: filter validation, query
//!   compilation, offset-style pagination over cursors, aggregation, the
//!   best-effort audit trail, and the repository facade composing them
//! - **`models`**: user records, audit entries, backup records, the system
//!   configuration singleton, and the administrator principal
//! - **`errors`** / **`logging`** / **`config`**: the ambient stack
//!
//! HTTP routing, request validation, and authentication live outside this
//! crate; the facade receives an already-authenticated [`models::AdminContext`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use planner_directory::config::DirectoryConfig;
//! use planner_directory::directory::{AuditRecorder, DirectoryRepository, ListUsersParams};
//! use planner_directory::store::{MemoryStore, StoreClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = StoreClient::new(Arc::new(MemoryStore::new()), Duration::from_secs(5));
//!     let audit = AuditRecorder::new(store.clone());
//!     let directory = DirectoryRepository::new(store, audit, DirectoryConfig::default());
//!
//!     let page = directory.list_users(ListUsersParams::default()).await?;
//!     println!("{} users on page 1", page.users.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod directory;
pub mod errors;
pub mod logging;
pub mod models;
pub mod store;

pub use directory::DirectoryRepository;
pub use errors::{AppError, AppResult, ErrorCode};
