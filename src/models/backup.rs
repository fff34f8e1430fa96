// ABOUTME: Backup bookkeeping records kept by the directory facade
// ABOUTME: BackupStatus, BackupRecord, and the insertion input type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome state of a backup run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackupStatus {
    /// Backup still in progress
    #[default]
    Running,
    /// Backup finished successfully
    Completed,
    /// Backup aborted with an error
    Failed,
}

impl Display for BackupStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Bookkeeping record of one backup run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    /// Generated identifier
    pub id: String,
    /// Administrator who triggered the run
    pub triggered_by: String,
    /// Operator-facing label
    pub label: String,
    /// Run state
    pub status: BackupStatus,
    /// Collections included in the backup
    pub collections: Vec<String>,
    /// Total size of the produced archive
    pub size_bytes: u64,
    /// Number of documents captured
    pub document_count: u64,
    /// When the record was created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a backup record
#[derive(Debug, Clone, Default)]
pub struct NewBackup {
    pub label: String,
    pub status: BackupStatus,
    pub collections: Vec<String>,
    pub size_bytes: u64,
    pub document_count: u64,
}

impl BackupRecord {
    /// Materialize a record from insertion input, generating id and timestamp
    #[must_use]
    pub fn new(triggered_by: impl Into<String>, input: NewBackup) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            triggered_by: triggered_by.into(),
            label: input.label,
            status: input.status,
            collections: input.collections,
            size_bytes: input.size_bytes,
            document_count: input.document_count,
            created_at: Utc::now(),
        }
    }
}
