// ABOUTME: Aggregation service: scalar fast counts plus projected-scan tallies
// ABOUTME: Independent counts run concurrently; breakdowns never fetch whole records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

//! System- and user-level statistics without full collection scans where
//! avoidable.
//!
//! Scalar counts use the store's fast-count primitive, one round trip per
//! statistic, issued concurrently since they are independent. Categorical
//! breakdowns project only the fields needed for classification and tally
//! in memory. All results are approximate snapshots labeled with a
//! generation timestamp, not transactionally consistent values.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{collections, DirectoryRepository};
use crate::errors::AppResult;
use crate::models::user::fields;
use crate::store::{
    Document, RangeBound, RangeFilter, ScalarValue, SortDirection, StoreQuery,
};

/// Platform-level counters and the plan distribution
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_users: u64,
    /// Users seen within the last day / week / month
    pub active_last_day: u64,
    pub active_last_week: u64,
    pub active_last_month: u64,
    /// Accounts created within the last day / week / month
    pub new_last_day: u64,
    pub new_last_week: u64,
    pub new_last_month: u64,
    pub plan_distribution: BTreeMap<String, u64>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub generated_at: DateTime<Utc>,
}

/// Account status buckets and categorical breakdowns
///
/// The four status buckets always sum exactly to `total`: deleted, banned,
/// and active are classified from a projected scan, and inactive is derived
/// as the remainder rather than independently queried.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub banned: u64,
    pub deleted: u64,
    pub by_plan: BTreeMap<String, u64>,
    pub by_role: BTreeMap<String, u64>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub generated_at: DateTime<Utc>,
}

/// Status classification of one projected record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusBucket {
    Deleted,
    Banned,
    Active,
}

/// Classification precedence: soft-deleted wins, then a live lock, then active
pub(crate) fn classify(
    is_deleted: bool,
    locked_until_millis: Option<i64>,
    now: DateTime<Utc>,
) -> StatusBucket {
    if is_deleted {
        StatusBucket::Deleted
    } else if locked_until_millis.is_some_and(|until| until > now.timestamp_millis()) {
        StatusBucket::Banned
    } else {
        StatusBucket::Active
    }
}

fn unfiltered_users_query() -> StoreQuery {
    StoreQuery::new(
        collections::USERS,
        fields::CREATED_AT,
        SortDirection::Ascending,
    )
}

fn since_query(field: &str, since: DateTime<Utc>) -> StoreQuery {
    let mut query = unfiltered_users_query();
    query.range = Some(RangeFilter {
        field: field.into(),
        lower: Some(RangeBound::inclusive(ScalarValue::Int(
            since.timestamp_millis(),
        ))),
        upper: None,
    });
    query
}

impl DirectoryRepository {
    /// Platform-level statistics
    ///
    /// The seven scalar counts are independent single-predicate queries and
    /// are issued concurrently; the plan distribution comes from a projected
    /// scan.
    ///
    /// # Errors
    ///
    /// Propagates store failures; a partial aggregation is never returned
    /// as if complete.
    pub async fn get_system_statistics(&self) -> AppResult<SystemStats> {
        let now = Utc::now();
        let day = now - Duration::days(1);
        let week = now - Duration::days(7);
        let month = now - Duration::days(30);

        let q_total = unfiltered_users_query();
        let q_active_day = since_query(fields::LAST_ACTIVE_AT, day);
        let q_active_week = since_query(fields::LAST_ACTIVE_AT, week);
        let q_active_month = since_query(fields::LAST_ACTIVE_AT, month);
        let q_new_day = since_query(fields::CREATED_AT, day);
        let q_new_week = since_query(fields::CREATED_AT, week);
        let q_new_month = since_query(fields::CREATED_AT, month);

        let (
            total_users,
            active_last_day,
            active_last_week,
            active_last_month,
            new_last_day,
            new_last_week,
            new_last_month,
        ) = tokio::try_join!(
            self.store.fast_count(&q_total),
            self.store.fast_count(&q_active_day),
            self.store.fast_count(&q_active_week),
            self.store.fast_count(&q_active_month),
            self.store.fast_count(&q_new_day),
            self.store.fast_count(&q_new_week),
            self.store.fast_count(&q_new_month),
        )?;

        let mut plan_distribution = BTreeMap::new();
        self.scan_users(&[fields::PLAN], |doc| {
            let plan = match doc.scalar(fields::PLAN) {
                ScalarValue::Text(plan) => plan,
                _ => "unknown".to_owned(),
            };
            *plan_distribution.entry(plan).or_insert(0) += 1;
        })
        .await?;

        Ok(SystemStats {
            total_users,
            active_last_day,
            active_last_week,
            active_last_month,
            new_last_day,
            new_last_week,
            new_last_month,
            plan_distribution,
            generated_at: now,
        })
    }

    /// Per-account statistics: status buckets plus plan and role breakdowns
    ///
    /// `total` uses the fast count; the buckets come from one projected
    /// scan. When the eventually consistent count lags behind the scan,
    /// `total` is raised to the classified sum so the bucket identity
    /// `active + banned + deleted + inactive == total` holds exactly.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn get_user_statistics(&self) -> AppResult<UserStats> {
        let now = Utc::now();
        let total = self.store.fast_count(&unfiltered_users_query()).await?;

        let mut active = 0u64;
        let mut banned = 0u64;
        let mut deleted = 0u64;
        let mut by_plan: BTreeMap<String, u64> = BTreeMap::new();
        let mut by_role: BTreeMap<String, u64> = BTreeMap::new();

        self.scan_users(
            &[
                fields::IS_DELETED,
                fields::LOCKED_UNTIL,
                fields::PLAN,
                fields::ROLE,
            ],
            |doc| {
                let is_deleted = matches!(doc.scalar(fields::IS_DELETED), ScalarValue::Bool(true));
                let locked_until = match doc.scalar(fields::LOCKED_UNTIL) {
                    ScalarValue::Int(millis) => Some(millis),
                    _ => None,
                };
                match classify(is_deleted, locked_until, now) {
                    StatusBucket::Deleted => deleted += 1,
                    StatusBucket::Banned => banned += 1,
                    StatusBucket::Active => active += 1,
                }

                if let ScalarValue::Text(plan) = doc.scalar(fields::PLAN) {
                    *by_plan.entry(plan).or_insert(0) += 1;
                }
                if let ScalarValue::Text(role) = doc.scalar(fields::ROLE) {
                    *by_role.entry(role).or_insert(0) += 1;
                }
            },
        )
        .await?;

        let classified = active + banned + deleted;
        let total = total.max(classified);
        let inactive = total - classified;

        Ok(UserStats {
            total,
            active,
            inactive,
            banned,
            deleted,
            by_plan,
            by_role,
            generated_at: now,
        })
    }

    /// Walk the whole user collection with a field projection, batched by
    /// the configured scan size, feeding each projected document to `visit`
    async fn scan_users(
        &self,
        projection: &[&str],
        mut visit: impl FnMut(&Document),
    ) -> AppResult<()> {
        let mut query = unfiltered_users_query();
        query.limit = Some(self.config.scan_batch_size);
        // the sort field must survive projection, it forms the next cursor key
        let mut projected: Vec<String> = projection.iter().map(|&f| f.to_owned()).collect();
        if !projection.contains(&query.order_by.as_str()) {
            projected.push(query.order_by.clone());
        }
        query.projection = Some(projected);

        loop {
            let documents = self.store.run_query(&query).await?;
            let batch_len = documents.len();
            if let Some(last) = documents.last() {
                query.start_after = Some(last.cursor_key(&query.order_by));
            }
            for doc in &documents {
                visit(doc);
            }
            if batch_len < self.config.scan_batch_size {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_precedence() {
        let now = Utc::now();
        let future = now.timestamp_millis() + 60_000;
        let past = now.timestamp_millis() - 60_000;

        // soft deletion wins over an active lock
        assert_eq!(classify(true, Some(future), now), StatusBucket::Deleted);
        assert_eq!(classify(false, Some(future), now), StatusBucket::Banned);
        // an expired lock is not a ban
        assert_eq!(classify(false, Some(past), now), StatusBucket::Active);
        assert_eq!(classify(false, None, now), StatusBucket::Active);
    }
}
