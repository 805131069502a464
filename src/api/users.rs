//! User endpoints.

use serde_json::Value;

use super::WykopApi;
use super::classify::{StatusPolicy, reasons};
use crate::core::connector::ApiRequest;
use crate::core::params::Params;
use crate::error::Result;

const AUTOCOMPLETE: StatusPolicy = StatusPolicy::new(&[(400, reasons::QUERY_TOO_SHORT)]);

impl WykopApi {
    /// Usernames matching `query`.
    ///
    /// # Errors
    ///
    /// `Api(400)` when the query is missing or too short.
    pub async fn get_users_autocomplete(&self, query: &str) -> Result<Value> {
        let request =
            ApiRequest::get("users/autocomplete").query(Params::new().with("query", Some(query)));
        self.call(request, AUTOCOMPLETE).await
    }
}
