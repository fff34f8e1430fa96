// ABOUTME: User record model for the administrative directory
// ABOUTME: UserRole, SubscriptionPlan, UserRecord, and the partial-update type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::store::Document;

/// Store field names of the user document (camelCase on the wire)
pub mod fields {
    pub const ID: &str = "id";
    pub const EMAIL: &str = "email";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const ROLE: &str = "role";
    pub const PLAN: &str = "plan";
    pub const IS_DELETED: &str = "isDeleted";
    pub const DELETED_AT: &str = "deletedAt";
    pub const LOCKED_UNTIL: &str = "lockedUntil";
    pub const CREATED_AT: &str = "createdAt";
    pub const LAST_ACTIVE_AT: &str = "lastActiveAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// User role for the permission system
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular planner user
    #[default]
    User,
    /// Tenant administrator
    Admin,
    /// Platform operator with full access
    SuperAdmin,
}

impl UserRole {
    /// String form used in stored documents
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(AppError::invalid_input(format!("invalid user role: {s}"))),
        }
    }
}

/// Subscription plan of a user account
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    /// Free plan with basic limits
    #[default]
    Free,
    /// Paid individual plan
    Pro,
    /// Paid multi-seat plan
    Team,
}

impl SubscriptionPlan {
    /// String form used in stored documents
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Team => "team",
        }
    }
}

impl Display for SubscriptionPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "team" => Ok(Self::Team),
            _ => Err(AppError::invalid_input(format!(
                "invalid subscription plan: {s}"
            ))),
        }
    }
}

/// A user record in the directory
///
/// Records are owned by the upstream account subsystem; this core reads them
/// and applies administrative mutations. The identifier is assigned at
/// creation and never reused after hard deletion. Emails are stored
/// lowercase so prefix search is a plain lexicographic range. Timestamps are
/// stored as epoch milliseconds, which keeps range predicates and sort keys
/// integer comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique identifier (immutable)
    pub id: String,
    /// Email address, lowercase
    pub email: String,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Permission role
    #[serde(default)]
    pub role: UserRole,
    /// Subscription plan
    #[serde(default)]
    pub plan: SubscriptionPlan,
    /// Soft-delete flag; the record stays in storage until hard deletion
    #[serde(default)]
    pub is_deleted: bool,
    /// When the record was soft-deleted
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Account is banned while this lies in the future
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub locked_until: Option<DateTime<Utc>>,
    /// When the account was created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Last time the user was seen
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_active_at: DateTime<Utc>,
    /// Last administrative or upstream update
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a record with defaults (used by tests and seeding tools;
    /// production records are created by the upstream account subsystem)
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into().to_lowercase(),
            display_name: None,
            role: UserRole::User,
            plan: SubscriptionPlan::Free,
            is_deleted: false,
            deleted_at: None,
            locked_until: None,
            created_at: now,
            last_active_at: now,
            updated_at: now,
        }
    }

    /// Whether the account is banned at the given instant
    #[must_use]
    pub fn is_banned(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Decode a store document into a record
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the document does not match the
    /// record shape.
    pub fn from_document(doc: Document) -> Result<Self, AppError> {
        serde_json::from_value(doc.data).map_err(|e| {
            AppError::serialization(format!("malformed user document: {e}"))
                .with_collection("users")
                .with_resource_id(doc.id)
        })
    }

    /// Encode the record for storage
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_document_data(&self) -> Result<Value, AppError> {
        serde_json::to_value(self).map_err(AppError::from)
    }
}

/// Partial administrative update to a user record
///
/// `None` leaves a field unchanged. For `locked_until`, `Some(None)` clears
/// an existing lock and `Some(Some(ts))` sets one; the merge write turns a
/// cleared lock into an explicit null. Soft-delete state is owned by the
/// delete path and is not updatable here.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub plan: Option<SubscriptionPlan>,
    pub locked_until: Option<Option<DateTime<Utc>>>,
}

impl UserUpdate {
    /// Whether the update changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.role.is_none()
            && self.plan.is_none()
            && self.locked_until.is_none()
    }

    /// Build the merge patch for this update, stamping `updatedAt`
    #[must_use]
    pub fn to_patch(&self, now: DateTime<Utc>) -> Value {
        let mut patch = serde_json::Map::new();
        if let Some(name) = &self.display_name {
            patch.insert(fields::DISPLAY_NAME.into(), Value::String(name.clone()));
        }
        if let Some(role) = self.role {
            patch.insert(fields::ROLE.into(), Value::String(role.as_str().into()));
        }
        if let Some(plan) = self.plan {
            patch.insert(fields::PLAN.into(), Value::String(plan.as_str().into()));
        }
        match self.locked_until {
            None => {}
            Some(None) => {
                patch.insert(fields::LOCKED_UNTIL.into(), Value::Null);
            }
            Some(Some(until)) => {
                patch.insert(
                    fields::LOCKED_UNTIL.into(),
                    Value::from(until.timestamp_millis()),
                );
            }
        }
        patch.insert(
            fields::UPDATED_AT.into(),
            Value::from(now.timestamp_millis()),
        );
        Value::Object(patch)
    }
}
