//! Multi-page collection.
//!
//! The service pages differently depending on who is asking: anonymous
//! clients get numbered pages, logged-in clients get an opaque `next` hash in
//! the `pagination` object. [`Connector::execute_paginated`] handles both
//! without knowing in advance which one the server will use.

use serde_json::Value;
use tracing::debug;

use super::connector::{ApiRequest, Connector};
use super::envelope::{Cursor, Envelope, PageBudget};
use crate::error::Result;

/// Query parameter carrying the cursor.
pub const PAGE_PARAM: &str = "page";

/// What to do after a page has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStep {
    /// Fetch the page at this cursor next.
    Continue(Cursor),
    /// Stop; the cursor is what gets reported as `next`.
    Stop(Cursor),
}

/// Decide the follow-up for a fetched page.
///
/// Stops on an empty payload or a non-2xx status. Otherwise a
/// `pagination.next` value wins; failing that, numbered paging continues
/// (`None` → 2, `n` → `n + 1`). A hash cursor with no `next` cannot advance,
/// and neither can a page number already at `i64::MAX`.
#[must_use]
pub fn next_step(current: &Cursor, page: &Envelope) -> PageStep {
    if page.data_is_empty() || !page.is_success() {
        return PageStep::Stop(current.clone());
    }
    match (page.next_from_pagination(), current) {
        (next @ (Cursor::Hash(_) | Cursor::Numeric(_)), _) => PageStep::Continue(next),
        (Cursor::None, Cursor::None) => PageStep::Continue(Cursor::Numeric(2)),
        (Cursor::None, Cursor::Numeric(n)) => n
            .checked_add(1)
            .map_or_else(|| PageStep::Stop(current.clone()), |n| PageStep::Continue(Cursor::Numeric(n))),
        (Cursor::None, Cursor::Hash(_)) => PageStep::Stop(current.clone()),
    }
}

fn append_items(acc: &mut Vec<Value>, data: Value) {
    match data {
        Value::Array(items) => acc.extend(items),
        Value::Null => {}
        other => acc.push(other),
    }
}

impl Connector {
    /// Fetch up to `budget` pages starting at `start`.
    ///
    /// The returned envelope is the last page fetched, with `data` replaced
    /// by every page's items in fetch order and `next` set to the cursor that
    /// would be fetched next. When the budget runs out that cursor points one
    /// page past the last one fetched, so callers can resume from it.
    ///
    /// Status codes are not interpreted beyond stopping the loop: a failing
    /// page ends collection and is returned for the caller to classify.
    /// A `Limited(0)` budget sends nothing and yields an empty 200 envelope
    /// whose `next` is `start`.
    ///
    /// # Errors
    ///
    /// Propagates transport errors from any page.
    pub async fn execute_paginated(
        &self,
        request: &ApiRequest,
        start: Cursor,
        budget: PageBudget,
    ) -> Result<Envelope> {
        let mut request = request.clone();
        let mut cursor = start;
        let mut remaining = budget;
        let mut items: Vec<Value> = Vec::new();
        let mut last: Option<Envelope> = None;

        while !remaining.is_exhausted() {
            remaining = remaining.spend();

            if let Some(page) = cursor.as_query_value() {
                request.query.set(PAGE_PARAM, Some(page));
            }

            let mut page = self.execute(&request).await?;
            let step = next_step(&cursor, &page);
            append_items(&mut items, std::mem::take(&mut page.data));
            let pagination = serde_json::Value::Object(page.pagination.clone());
            debug!(
                endpoint = %request.endpoint,
                status = page.status,
                collected = items.len(),
                pagination = %pagination,
                "Fetched page"
            );
            last = Some(page);

            match step {
                PageStep::Continue(next) => cursor = next,
                PageStep::Stop(at) => {
                    cursor = at;
                    break;
                }
            }
        }

        let mut result = last.unwrap_or_else(|| Envelope::empty(200));
        result.data = Value::Array(items);
        result.next = cursor;
        Ok(result)
    }
}
