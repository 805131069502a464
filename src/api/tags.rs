//! Tag endpoints.

use chrono::NaiveDateTime;
use serde_json::Value;

use super::WykopApi;
use super::classify::{StatusPolicy, reasons};
use crate::core::connector::ApiRequest;
use crate::core::envelope::{Cursor, PageBudget};
use crate::core::params::Params;
use crate::error::Result;
use crate::util::time::datetime_to_string;

const AUTOCOMPLETE: StatusPolicy = StatusPolicy::new(&[(400, reasons::QUERY_TOO_SHORT)]);
const RELATED: StatusPolicy = StatusPolicy::new(&[(400, reasons::TAG_TOO_SHORT)]);
const PUT_TAG: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::TAG_EDIT_FORBIDDEN),
    (404, reasons::TAG_MISSING),
    (409, reasons::FORM_INVALID),
]);
const TAG_LOOKUP: StatusPolicy = StatusPolicy::new(&[(404, reasons::TAG_UNAVAILABLE)]);
const TAG_AUTHORS: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::PERMISSION_REQUIRED),
    (404, reasons::TAG_UNAVAILABLE),
]);

/// Options for [`WykopApi::get_tag_stream`].
///
/// `page` is a page number for anonymous sessions and a page hash for
/// logged-in ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagStreamQuery {
    pub page: Cursor,
    /// `all` or `best`.
    pub sort: String,
    /// `all`, `author`, `link` or `entry`.
    pub content_type: String,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub page_count: PageBudget,
}

impl Default for TagStreamQuery {
    fn default() -> Self {
        Self {
            page: Cursor::None,
            sort: "best".to_string(),
            content_type: "all".to_string(),
            year: None,
            month: None,
            page_count: PageBudget::default(),
        }
    }
}

impl TagStreamQuery {
    #[must_use]
    pub fn params(&self) -> Params {
        Params::new()
            .with("sort", Some(self.sort.as_str()))
            .with("type", Some(self.content_type.as_str()))
            .with("year", self.year)
            .with("month", self.month)
    }
}

/// Options for [`WykopApi::get_tag_newer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNewerQuery {
    /// `all`, `author`, `link` or `entry`.
    pub content_type: String,
    /// `all` or `best`.
    pub sort: String,
    /// Count content newer than this moment.
    pub date: Option<NaiveDateTime>,
    /// Last entry or link seen.
    pub id: Option<String>,
}

impl Default for TagNewerQuery {
    fn default() -> Self {
        Self {
            content_type: "all".to_string(),
            sort: "best".to_string(),
            date: None,
            id: None,
        }
    }
}

impl TagNewerQuery {
    #[must_use]
    pub fn params(&self) -> Params {
        Params::new()
            .with("sort", Some(self.sort.as_str()))
            .with("type", Some(self.content_type.as_str()))
            .with("date", self.date.as_ref().map(datetime_to_string))
            .with("id", self.id.as_deref())
    }
}

fn tag_path(tag: &str, rest: &str) -> String {
    let tag = tag.trim_start_matches('#');
    if rest.is_empty() {
        format!("tags/{tag}")
    } else {
        format!("tags/{tag}/{rest}")
    }
}

impl WykopApi {
    /// Tags matching `query` (at most 10).
    ///
    /// # Errors
    ///
    /// `Api(400)` when the query is missing or too short.
    pub async fn get_tags_autocomplete(&self, query: &str) -> Result<Value> {
        let request =
            ApiRequest::get("tags/autocomplete").query(Params::new().with("query", Some(query)));
        self.call(request, AUTOCOMPLETE).await
    }

    /// # Errors
    ///
    /// `Api` for any non-2xx answer.
    pub async fn get_tags_popular(&self) -> Result<Value> {
        self.call(ApiRequest::get("tags/popular"), StatusPolicy::GENERIC)
            .await
    }

    /// Popular author tags (at most 10).
    ///
    /// # Errors
    ///
    /// `Api` for any non-2xx answer.
    pub async fn get_tags_popular_user_tags(&self) -> Result<Value> {
        self.call(ApiRequest::get("tags/popular-user-tags"), StatusPolicy::GENERIC)
            .await
    }

    /// # Errors
    ///
    /// `Api(400)` when the tag is missing or too short.
    pub async fn get_tags_related(&self, tag: &str) -> Result<Value> {
        self.call(ApiRequest::get(tag_path(tag, "related")), RELATED)
            .await
    }

    /// # Errors
    ///
    /// `Api` for any non-2xx answer.
    pub async fn get_tag(&self, tag: &str) -> Result<Value> {
        self.call(ApiRequest::get(tag_path(tag, "")), StatusPolicy::GENERIC)
            .await
    }

    /// Update tag metadata (author tags only).
    ///
    /// # Errors
    ///
    /// `Api(400)` without permission, `Api(404)` for an unknown tag,
    /// `Api(409)` when validation fails.
    pub async fn put_tag(&self, tag: &str, data: Params) -> Result<()> {
        self.call_unit(ApiRequest::put(tag_path(tag, "")).body(data), PUT_TAG)
            .await
    }

    /// Entries and links tagged with `tag`, across `query.page_count` pages.
    ///
    /// # Errors
    ///
    /// `Api(404)` for an unknown tag.
    pub async fn get_tag_stream(&self, tag: &str, query: &TagStreamQuery) -> Result<Value> {
        let request = ApiRequest::get(tag_path(tag, "stream")).query(query.params());
        self.call_paginated(request, query.page.clone(), query.page_count, TAG_LOOKUP)
            .await
    }

    /// Number of new objects in the tag (0 when the service omits it).
    ///
    /// # Errors
    ///
    /// `Api(404)` for an unknown tag.
    pub async fn get_tag_newer(&self, tag: &str, query: &TagNewerQuery) -> Result<i64> {
        let request = ApiRequest::get(tag_path(tag, "newer")).query(query.params());
        self.call_count(request, TAG_LOOKUP, true).await
    }

    /// Co-authors of an author tag.
    ///
    /// # Errors
    ///
    /// `Api(404)` for an unknown tag.
    pub async fn get_tag_users(&self, tag: &str) -> Result<Value> {
        self.call(ApiRequest::get(tag_path(tag, "users")), TAG_LOOKUP)
            .await
    }

    /// # Errors
    ///
    /// `Api(400)` without permission, `Api(404)` for an unknown tag.
    pub async fn post_tag_user(&self, tag: &str, username: &str) -> Result<()> {
        let request = ApiRequest::post(tag_path(tag, &format!("users/{username}")));
        self.call_unit(request, TAG_AUTHORS).await
    }

    /// # Errors
    ///
    /// `Api(400)` without permission, `Api(404)` for an unknown tag.
    pub async fn delete_tag_user(&self, tag: &str, username: &str) -> Result<()> {
        let request = ApiRequest::delete(tag_path(tag, &format!("users/{username}")));
        self.call_unit(request, TAG_AUTHORS).await
    }
}
