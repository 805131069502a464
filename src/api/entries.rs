//! Microblog entry endpoints.

use serde_json::Value;

use super::WykopApi;
use super::classify::{StatusPolicy, reasons};
use crate::core::connector::ApiRequest;
use crate::core::envelope::{Cursor, PageBudget};
use crate::core::pagination::PAGE_PARAM;
use crate::core::params::Params;
use crate::error::Result;

const LIST: StatusPolicy = StatusPolicy::new(&[(400, reasons::PAGINATION_LIMIT)]);
const CREATE: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::BAD_REQUEST),
    (409, reasons::FORM_INVALID),
]);
const LOOKUP: StatusPolicy = StatusPolicy::new(&[(404, reasons::ENTRY_MISSING)]);
const EDIT: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::ENTRY_EDIT_FORBIDDEN),
    (404, reasons::ENTRY_MISSING),
    (409, reasons::FORM_INVALID),
]);
const DELETE: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::ENTRY_DELETE_FORBIDDEN),
    (404, reasons::ENTRY_MISSING),
]);
const VOTE: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::ENTRY_ALREADY_VOTED),
    (404, reasons::ENTRY_MISSING),
]);
const UNVOTE: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::ENTRY_NOT_VOTED),
    (404, reasons::ENTRY_MISSING),
]);

/// Options for [`WykopApi::get_entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntriesQuery {
    /// `newest`, `active` or `hot`.
    pub sort: String,
    /// Hours to look back (1, 2, 3, 6, 12 or 24); only honoured with `hot`.
    pub last_update: Option<u8>,
    pub page: Cursor,
    pub page_count: PageBudget,
    pub category: Option<String>,
    /// Hash of a user-defined category.
    pub bucket: Option<String>,
    /// Items per page.
    pub limit: Option<u32>,
}

impl Default for EntriesQuery {
    fn default() -> Self {
        Self {
            sort: "hot".to_string(),
            last_update: Some(12),
            page: Cursor::None,
            page_count: PageBudget::default(),
            category: None,
            bucket: None,
            limit: None,
        }
    }
}

impl EntriesQuery {
    #[must_use]
    pub fn params(&self) -> Params {
        Params::new()
            .with("sort", Some(self.sort.as_str()))
            .with("last_update", self.last_update)
            .with("category", self.category.as_deref())
            .with("bucket", self.bucket.as_deref())
            .with("limit", self.limit)
    }
}

/// Body of a new or edited entry.
///
/// `photo` is the key of an uploaded photo (see
/// [`WykopApi::post_media_photo`]); `survey` the id of a survey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub content: Option<String>,
    pub photo: Option<String>,
    pub embed: Option<String>,
    pub survey: Option<String>,
    pub adult: bool,
}

impl EntryDraft {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn adult(mut self, adult: bool) -> Self {
        self.adult = adult;
        self
    }

    #[must_use]
    pub fn photo(mut self, key: impl Into<String>) -> Self {
        self.photo = Some(key.into());
        self
    }

    #[must_use]
    pub fn params(&self) -> Params {
        Params::new()
            .with("content", self.content.as_deref())
            .with("photo", self.photo.as_deref())
            .with("embed", self.embed.as_deref())
            .with("survey", self.survey.as_deref())
            .with("adult", Some(self.adult))
    }
}

impl WykopApi {
    /// Microblog entries, across `query.page_count` pages.
    ///
    /// # Errors
    ///
    /// `Api(400)` when the pagination limit is reached.
    pub async fn get_entries(&self, query: &EntriesQuery) -> Result<Value> {
        let request = ApiRequest::get("entries").query(query.params());
        self.call_paginated(request, query.page.clone(), query.page_count, LIST)
            .await
    }

    /// Publish an entry and return it.
    ///
    /// # Errors
    ///
    /// `Api(400)` for a malformed request, `Api(409)` when validation fails.
    pub async fn post_entry(&self, draft: &EntryDraft) -> Result<Value> {
        self.call(ApiRequest::post("entries").body(draft.params()), CREATE)
            .await
    }

    /// # Errors
    ///
    /// `Api(404)` when the entry does not exist.
    pub async fn get_entry_by_id(&self, entry_id: i64) -> Result<Value> {
        self.call(ApiRequest::get(format!("entries/{entry_id}")), LOOKUP)
            .await
    }

    /// Replace an entry's body and return the updated entry.
    ///
    /// # Errors
    ///
    /// `Api(400)` without permission, `Api(404)` for a missing entry,
    /// `Api(409)` when validation fails.
    pub async fn put_entry(&self, entry_id: i64, draft: &EntryDraft) -> Result<Value> {
        let request = ApiRequest::put(format!("entries/{entry_id}")).body(draft.params());
        self.call(request, EDIT).await
    }

    /// # Errors
    ///
    /// `Api(400)` without permission, `Api(404)` for a missing entry.
    pub async fn delete_entry_by_id(&self, entry_id: i64) -> Result<()> {
        self.call_unit(ApiRequest::delete(format!("entries/{entry_id}")), DELETE)
            .await
    }

    /// Users who voted for an entry; `page` selects one page of voters
    /// (`Cursor::None` for the first).
    ///
    /// # Errors
    ///
    /// `Api(404)` when the entry does not exist.
    pub async fn get_entry_votes(&self, entry_id: i64, page: &Cursor) -> Result<Value> {
        let request = ApiRequest::get(format!("entries/{entry_id}/votes"))
            .query(Params::new().with(PAGE_PARAM, page.as_query_value()));
        self.call(request, LOOKUP).await
    }

    /// # Errors
    ///
    /// `Api(400)` when already voted (or voting on one's own entry),
    /// `Api(404)` for a missing entry.
    pub async fn post_entry_vote(&self, entry_id: i64) -> Result<()> {
        self.call_unit(ApiRequest::post(format!("entries/{entry_id}/votes")), VOTE)
            .await
    }

    /// # Errors
    ///
    /// `Api(400)` when there is no vote to withdraw, `Api(404)` for a
    /// missing entry.
    pub async fn delete_entry_vote(&self, entry_id: i64) -> Result<()> {
        self.call_unit(ApiRequest::delete(format!("entries/{entry_id}/votes")), UNVOTE)
            .await
    }

    /// Number of entries newer than `entry_id`.
    ///
    /// # Errors
    ///
    /// `Api(404)` for a missing entry; `ParseResponse` when the answer has
    /// no count.
    pub async fn get_entries_newer(&self, entry_id: i64, category: Option<&str>) -> Result<i64> {
        let request = ApiRequest::get(format!("entries/{entry_id}/newer"))
            .query(Params::new().with("category", category));
        self.call_count(request, LOOKUP, false).await
    }

    /// Follow the discussion under an entry.
    ///
    /// # Errors
    ///
    /// `Api(404)` when the entry does not exist.
    pub async fn observe_entry(&self, entry_id: i64) -> Result<()> {
        let request = ApiRequest::post(format!("entries/{entry_id}/observed-discussions"));
        self.call_unit(request, LOOKUP).await
    }

    /// # Errors
    ///
    /// `Api(404)` when the entry does not exist.
    pub async fn unobserve_entry(&self, entry_id: i64) -> Result<()> {
        let request = ApiRequest::delete(format!("entries/{entry_id}/observed-discussions"));
        self.call_unit(request, LOOKUP).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_query_params() {
        assert_eq!(
            EntriesQuery::default().params().to_value(),
            json!({"sort": "hot", "last_update": 12})
        );
    }

    #[test]
    fn query_params_include_filters_in_order() {
        let query = EntriesQuery {
            sort: "newest".into(),
            last_update: None,
            category: Some("hobby".into()),
            limit: Some(50),
            ..EntriesQuery::default()
        };
        let keys: Vec<String> = query.params().keys().map(str::to_string).collect();
        assert_eq!(keys, ["sort", "category", "limit"]);
    }

    #[test]
    fn draft_always_sends_adult_flag() {
        let draft = EntryDraft::new("hello").photo("k1");
        assert_eq!(
            draft.params().to_value(),
            json!({"content": "hello", "photo": "k1", "adult": false})
        );

        let edit = EntryDraft {
            adult: true,
            ..EntryDraft::default()
        };
        assert_eq!(edit.params().to_value(), json!({"adult": true}));
    }
}
