// ABOUTME: Query compiler: validated filter specification into a store-native query
// ABOUTME: Enforces the one-range-filter store limit, rejecting conflicts explicitly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

//! Compilation of a validated [`UserFilter`] into a [`StoreQuery`].
//!
//! The store accepts at most one range predicate per query. Three filter
//! sources compile to ranges: email prefix search, the creation-date window,
//! and the derived `banned` status (a live comparison on the lock expiry).
//! Requesting any two of them fails with `FilterConflict` naming both; a
//! constraint is never silently dropped. Equality filters (role, plan,
//! active/deleted status) compose freely with each other and with the single
//! range.
//!
//! Compilation is pure and deterministic: predicates are emitted in a fixed
//! field order and the clock is an explicit argument.

use chrono::{DateTime, Utc};

use super::collections;
use super::filter::{SortSpec, StatusFilter, UserFilter};
use crate::errors::AppResult;
use crate::models::user::fields;
use crate::store::{RangeBound, RangeFilter, ScalarValue, StoreQuery};

/// Sentinel appended to a prefix to form its exclusive upper bound: the
/// maximal Unicode scalar value, so the range covers every string with the
/// prefix
const PREFIX_UPPER_SENTINEL: char = '\u{10FFFF}';

/// Compile a validated filter and sort into a store query
///
/// The result carries no pagination state; the pagination engine clones it
/// per phase, and the same compiled query (without limit) feeds the
/// approximate total count.
///
/// # Errors
///
/// `FilterConflict` when two range-type filters are requested together.
pub fn compile_user_query(
    filter: &UserFilter,
    sort: SortSpec,
    now: DateTime<Utc>,
) -> AppResult<StoreQuery> {
    let mut query = StoreQuery::new(collections::USERS, sort.field.store_field(), sort.direction);

    if let Some(role) = filter.role {
        query.eq_filters.push((
            fields::ROLE.into(),
            ScalarValue::Text(role.as_str().into()),
        ));
    }
    if let Some(plan) = filter.plan {
        query.eq_filters.push((
            fields::PLAN.into(),
            ScalarValue::Text(plan.as_str().into()),
        ));
    }
    match filter.status {
        Some(StatusFilter::Active) => {
            query
                .eq_filters
                .push((fields::IS_DELETED.into(), ScalarValue::Bool(false)));
        }
        Some(StatusFilter::Deleted) => {
            query
                .eq_filters
                .push((fields::IS_DELETED.into(), ScalarValue::Bool(true)));
        }
        Some(StatusFilter::Banned) | None => {}
    }

    let mut ranges: Vec<(&'static str, RangeFilter)> = Vec::new();
    if let Some(prefix) = &filter.email_prefix {
        let mut upper = prefix.clone();
        upper.push(PREFIX_UPPER_SENTINEL);
        ranges.push((
            "emailPrefix",
            RangeFilter {
                field: fields::EMAIL.into(),
                lower: Some(RangeBound::inclusive(ScalarValue::Text(prefix.clone()))),
                upper: Some(RangeBound::exclusive(ScalarValue::Text(upper))),
            },
        ));
    }
    if let Some(window) = &filter.created_range {
        ranges.push((
            "createdRange",
            RangeFilter {
                field: fields::CREATED_AT.into(),
                lower: window
                    .after
                    .map(|ts| RangeBound::inclusive(ScalarValue::Int(ts.timestamp_millis()))),
                upper: window
                    .before
                    .map(|ts| RangeBound::inclusive(ScalarValue::Int(ts.timestamp_millis()))),
            },
        ));
    }
    if filter.status == Some(StatusFilter::Banned) {
        ranges.push((
            "bannedStatus",
            RangeFilter {
                field: fields::LOCKED_UNTIL.into(),
                lower: Some(RangeBound::exclusive(ScalarValue::Int(
                    now.timestamp_millis(),
                ))),
                upper: None,
            },
        ));
    }

    let mut ranges = ranges.into_iter();
    if let Some((label, range)) = ranges.next() {
        if let Some((second_label, _)) = ranges.next() {
            return Err(crate::errors::AppError::filter_conflict(
                label,
                second_label,
            ));
        }
        query.range = Some(range);
    }

    Ok(query)
}
