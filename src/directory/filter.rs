// ABOUTME: Listing parameter validation: raw request values into a typed filter specification
// ABOUTME: Separate stage from query compilation, with its own failure kinds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

//! Validation of raw listing parameters into a typed filter specification.
//!
//! Validation runs before any store round trip and has its own failure
//! kinds (`InvalidInput`, `InvalidSortField`); detecting *incompatible*
//! filter combinations is the compiler's job (`FilterConflict`), keeping
//! the two stages and their errors separate.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::DirectoryConfig;
use crate::errors::{AppError, AppResult};
use crate::models::user::{fields, SubscriptionPlan, UserRole};
use crate::store::SortDirection;

/// Raw listing parameters, as the (external) controller layer hands them over
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListUsersParams {
    /// Email prefix search term
    pub search: Option<String>,
    /// Role equality filter
    pub role: Option<String>,
    /// Subscription plan equality filter
    pub plan: Option<String>,
    /// Status filter: `active`, `deleted`, or `banned`
    pub status: Option<String>,
    /// Inclusive lower creation-date bound
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper creation-date bound
    pub created_before: Option<DateTime<Utc>>,
    /// Sort field, from the allow-list
    pub sort_by: Option<String>,
    /// Sort direction: `asc` or `desc`
    pub sort_direction: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

/// Account status filter
///
/// `Active` and `Deleted` compile to equality predicates on the soft-delete
/// flag. `Banned` is derived, not stored: it compiles to a range predicate
/// on the lock expiry and therefore counts against the one-range-per-query
/// store limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Deleted,
    Banned,
}

impl StatusFilter {
    fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "active" => Ok(Self::Active),
            "deleted" => Ok(Self::Deleted),
            "banned" => Ok(Self::Banned),
            other => Err(AppError::invalid_input(format!(
                "invalid status filter: {other}"
            ))),
        }
    }
}

/// Sortable fields (fixed allow-list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Email,
    LastActivity,
}

impl SortField {
    /// Wire name accepted from callers
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::Email => "email",
            Self::LastActivity => "lastActivity",
        }
    }

    /// Store field this sort key orders by
    #[must_use]
    pub const fn store_field(&self) -> &'static str {
        match self {
            Self::CreatedAt => fields::CREATED_AT,
            Self::UpdatedAt => fields::UPDATED_AT,
            Self::Email => fields::EMAIL,
            Self::LastActivity => fields::LAST_ACTIVE_AT,
        }
    }

    fn parse(raw: &str) -> AppResult<Self> {
        match raw {
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            "email" => Ok(Self::Email),
            "lastActivity" => Ok(Self::LastActivity),
            other => Err(AppError::invalid_sort_field(other)),
        }
    }
}

/// Validated sort instruction
#[derive(Debug, Clone, Copy, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Validated page request (1-based page, bounded limit)
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub limit: usize,
}

/// Inclusive creation-date window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedRange {
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

/// Validated filter specification
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Lowercased email prefix
    pub email_prefix: Option<String>,
    pub role: Option<UserRole>,
    pub plan: Option<SubscriptionPlan>,
    pub status: Option<StatusFilter>,
    pub created_range: Option<CreatedRange>,
}

/// The complete validated listing request
#[derive(Debug, Clone)]
pub struct ListUsersQuery {
    pub filter: UserFilter,
    pub sort: SortSpec,
    pub page: PageRequest,
}

/// Validate raw listing parameters into a typed request
///
/// Empty search terms are dropped, emails are matched lowercase, page sizes
/// above the configured maximum are clamped to it.
///
/// # Errors
///
/// `InvalidSortField` for a sort field outside the allow-list;
/// `InvalidInput` for unknown enum values, a zero page or limit, an empty
/// date window, or an unknown sort direction.
pub fn validate_list_params(
    params: ListUsersParams,
    config: &DirectoryConfig,
) -> AppResult<ListUsersQuery> {
    let email_prefix = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase);

    let role = params
        .role
        .as_deref()
        .map(str::parse::<UserRole>)
        .transpose()?;
    let plan = params
        .plan
        .as_deref()
        .map(str::parse::<SubscriptionPlan>)
        .transpose()?;
    let status = params
        .status
        .as_deref()
        .map(StatusFilter::parse)
        .transpose()?;

    let created_range = match (params.created_after, params.created_before) {
        (None, None) => None,
        (after, before) => {
            if let (Some(lo), Some(hi)) = (after, before) {
                if lo > hi {
                    return Err(AppError::invalid_input(
                        "createdAfter must not be later than createdBefore",
                    ));
                }
            }
            Some(CreatedRange { after, before })
        }
    };

    let field = params
        .sort_by
        .as_deref()
        .map(SortField::parse)
        .transpose()?
        .unwrap_or_default();
    let direction = match params.sort_direction.as_deref() {
        None => SortDirection::Descending,
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Ascending,
            "desc" => SortDirection::Descending,
            other => {
                return Err(AppError::invalid_input(format!(
                    "invalid sort direction: {other}"
                )))
            }
        },
    };

    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(AppError::invalid_input("page numbers are 1-based"));
    }
    let limit = match params.limit {
        None => config.default_page_size,
        Some(0) => return Err(AppError::invalid_input("limit must be positive")),
        Some(requested) => (requested as usize).min(config.max_page_size),
    };

    Ok(ListUsersQuery {
        filter: UserFilter {
            email_prefix,
            role,
            plan,
            status,
            created_range,
        },
        sort: SortSpec { field, direction },
        page: PageRequest { page, limit },
    })
}
