// ABOUTME: Offset-style pagination emulated over the store's start-after cursor
// ABOUTME: Projected skip batches record only the last-seen sort key, then fetch limit+1
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

//! Page-number pagination on a store that only supports "fetch N starting
//! after document X".
//!
//! Reaching page `p` with size `l` advances through `(p-1)*l` documents with
//! the native forward cursor, keeping nothing but the last-seen sort key,
//! then fetches `l+1` documents; the surplus document, if present, is dropped
//! and sets `has_more`. That traversal costs **O(offset + limit)** store
//! reads per call. Deep pages are expensive by design, and callers needing
//! deep traversal should persist a cursor token instead of a page number
//! (a caller-side optimization, out of scope here).
//!
//! Page contents are only consistent with the collection's state at the
//! moment each constituent request executes: a concurrent writer between the
//! skip phase and the fetch phase can cause a document to be skipped or to
//! appear on two pages. That is the documented best-effort semantics of
//! offset paging over a cursor-only store, not a defect this engine hides.

use super::filter::PageRequest;
use crate::errors::AppResult;
use crate::store::{Document, StoreClient, StoreQuery};

/// One page worth of raw documents
#[derive(Debug, Clone)]
pub struct PageSlice {
    pub documents: Vec<Document>,
    pub has_more: bool,
}

impl PageSlice {
    const fn empty() -> Self {
        Self {
            documents: Vec::new(),
            has_more: false,
        }
    }
}

/// Fetch one page of a compiled query
///
/// `base` must carry no pagination state of its own (no limit, cursor, or
/// projection); this function clones it per phase. Page 1 skips the advance
/// phase entirely. An advance phase that exhausts the collection before
/// reaching the requested page yields an empty page with `has_more = false`.
///
/// # Errors
///
/// Propagates store failures (`StoreTimeout`, `StoreUnavailable`,
/// `StoreError`) from either phase; a partially advanced traversal is never
/// surfaced as a page.
pub async fn fetch_page(
    store: &StoreClient,
    base: &StoreQuery,
    page: PageRequest,
    scan_batch_size: usize,
) -> AppResult<PageSlice> {
    let offset = (page.page as usize - 1) * page.limit;

    let mut cursor = None;
    if offset > 0 {
        let mut remaining = offset;
        while remaining > 0 {
            let batch = remaining.min(scan_batch_size);
            let mut skip_query = base.clone();
            skip_query.limit = Some(batch);
            skip_query.start_after = cursor.clone();
            // the skip phase only needs the sort key to form the next cursor
            skip_query.projection = Some(vec![base.order_by.clone()]);

            let documents = store.run_query(&skip_query).await?;
            if let Some(last) = documents.last() {
                cursor = Some(last.cursor_key(&base.order_by));
            }
            let advanced = documents.len();
            remaining -= advanced;
            if advanced < batch {
                // collection exhausted before the requested page
                return Ok(PageSlice::empty());
            }
        }
    }

    let mut fetch_query = base.clone();
    fetch_query.limit = Some(page.limit + 1);
    fetch_query.start_after = cursor;

    let mut documents = store.run_query(&fetch_query).await?;
    let has_more = documents.len() > page.limit;
    documents.truncate(page.limit);

    Ok(PageSlice {
        documents,
        has_more,
    })
}
