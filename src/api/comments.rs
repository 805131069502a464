//! Microblog comment endpoints.

use chrono::NaiveDateTime;
use serde_json::Value;

use super::WykopApi;
use super::classify::{StatusPolicy, reasons};
use crate::core::connector::ApiRequest;
use crate::core::envelope::{Cursor, PageBudget};
use crate::core::pagination::PAGE_PARAM;
use crate::core::params::Params;
use crate::error::Result;
use crate::util::time::datetime_to_string;

const CREATE: StatusPolicy = StatusPolicy::new(&[
    (404, reasons::COMMENT_TARGET_MISSING),
    (409, reasons::FORM_INVALID),
]);
const LOOKUP: StatusPolicy = StatusPolicy::new(&[(404, reasons::COMMENT_MISSING)]);
const EDIT: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::COMMENT_EDIT_FORBIDDEN),
    (404, reasons::COMMENT_MISSING),
    (409, reasons::FORM_INVALID),
]);
const DELETE: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::COMMENT_DELETE_FORBIDDEN),
    (404, reasons::COMMENT_MISSING),
]);
const VOTE: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::COMMENT_ALREADY_VOTED),
    (404, reasons::COMMENT_MISSING),
]);
const UNVOTE: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::COMMENT_NOT_VOTED),
    (404, reasons::COMMENT_MISSING),
]);
const NEWER: StatusPolicy = StatusPolicy::new(&[(404, reasons::ENTRY_MISSING)]);

/// Body of a new or edited comment.
///
/// Content may be empty when a photo or embed is attached; otherwise the
/// service requires at least five characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub content: String,
    pub embed: Option<String>,
    pub photo: Option<String>,
    pub adult: bool,
}

impl CommentDraft {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn params(&self) -> Params {
        Params::new()
            .with("content", Some(self.content.as_str()))
            .with("embed", self.embed.as_deref())
            .with("photo", self.photo.as_deref())
            .with("adult", Some(self.adult))
    }
}

fn comments_path(entry_id: i64) -> String {
    format!("entries/{entry_id}/comments")
}

fn comment_path(entry_id: i64, comment_id: i64) -> String {
    format!("entries/{entry_id}/comments/{comment_id}")
}

impl WykopApi {
    /// Comments under an entry, starting at page 1 unless `page` says
    /// otherwise.
    ///
    /// # Errors
    ///
    /// `Api` for any non-2xx answer.
    pub async fn get_entry_comments(
        &self,
        entry_id: i64,
        page: Option<Cursor>,
        page_count: PageBudget,
    ) -> Result<Value> {
        let start = page.unwrap_or(Cursor::Numeric(1));
        self.call_paginated(
            ApiRequest::get(comments_path(entry_id)),
            start,
            page_count,
            StatusPolicy::GENERIC,
        )
        .await
    }

    /// # Errors
    ///
    /// `Api(404)` when the entry does not exist, `Api(409)` when validation
    /// fails.
    pub async fn post_entry_comment(&self, entry_id: i64, draft: &CommentDraft) -> Result<Value> {
        let request = ApiRequest::post(comments_path(entry_id)).body(draft.params());
        self.call(request, CREATE).await
    }

    /// # Errors
    ///
    /// `Api(404)` when the entry or comment does not exist.
    pub async fn get_entry_comment(&self, entry_id: i64, comment_id: i64) -> Result<Value> {
        self.call(ApiRequest::get(comment_path(entry_id, comment_id)), LOOKUP)
            .await
    }

    /// # Errors
    ///
    /// `Api(400)` without permission, `Api(404)` when the entry or comment
    /// does not exist, `Api(409)` when validation fails.
    pub async fn put_entry_comment(
        &self,
        entry_id: i64,
        comment_id: i64,
        draft: &CommentDraft,
    ) -> Result<Value> {
        let request = ApiRequest::put(comment_path(entry_id, comment_id)).body(draft.params());
        self.call(request, EDIT).await
    }

    /// # Errors
    ///
    /// `Api(400)` without permission, `Api(404)` when the entry or comment
    /// does not exist.
    pub async fn delete_entry_comment(&self, entry_id: i64, comment_id: i64) -> Result<()> {
        self.call_unit(ApiRequest::delete(comment_path(entry_id, comment_id)), DELETE)
            .await
    }

    /// Users who voted for a comment, one page at a time.
    ///
    /// # Errors
    ///
    /// `Api(404)` when the entry or comment does not exist.
    pub async fn get_entry_comment_votes(
        &self,
        entry_id: i64,
        comment_id: i64,
        page: &Cursor,
    ) -> Result<Value> {
        let path = format!("{}/votes", comment_path(entry_id, comment_id));
        let request =
            ApiRequest::get(path).query(Params::new().with(PAGE_PARAM, page.as_query_value()));
        self.call(request, LOOKUP).await
    }

    /// # Errors
    ///
    /// `Api(400)` when already voted, `Api(404)` when the entry or comment
    /// does not exist.
    pub async fn post_entry_comment_vote(&self, entry_id: i64, comment_id: i64) -> Result<()> {
        let path = format!("{}/votes", comment_path(entry_id, comment_id));
        self.call_unit(ApiRequest::post(path), VOTE).await
    }

    /// # Errors
    ///
    /// `Api(400)` when there is no vote to withdraw, `Api(404)` when the
    /// entry or comment does not exist.
    pub async fn delete_entry_comment_vote(&self, entry_id: i64, comment_id: i64) -> Result<()> {
        let path = format!("{}/votes", comment_path(entry_id, comment_id));
        self.call_unit(ApiRequest::delete(path), UNVOTE).await
    }

    /// Number of comments added after `date`.
    ///
    /// # Errors
    ///
    /// `Api(404)` for a missing entry; `ParseResponse` when the answer has
    /// no count.
    pub async fn get_entry_comments_newer(
        &self,
        entry_id: i64,
        date: &NaiveDateTime,
    ) -> Result<i64> {
        let request = ApiRequest::get(format!("{}/newer", comments_path(entry_id)))
            .query(Params::new().with("date", Some(datetime_to_string(date))));
        self.call_count(request, NEWER, false).await
    }
}
