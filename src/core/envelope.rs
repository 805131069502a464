//! Response envelope and pagination position types.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Result, WykopError};

/// Pagination position understood by the service.
///
/// Anonymous (key + secret) clients page by number; logged-in clients get
/// opaque page hashes back in `pagination.next`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cursor {
    /// No page requested (first page).
    #[default]
    None,
    /// Numeric page index.
    Numeric(i64),
    /// Opaque page hash.
    Hash(String),
}

impl Cursor {
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Value sent as the `page` query parameter.
    #[must_use]
    pub fn as_query_value(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Numeric(n) => Some(n.to_string()),
            Self::Hash(h) => Some(h.clone()),
        }
    }

    /// Interpret a `pagination.next` value. Null, empty strings and other
    /// JSON types mean "no cursor".
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) if !s.is_empty() => Self::Hash(s.clone()),
            Value::Number(n) => n.as_i64().map_or(Self::None, Self::Numeric),
            _ => Self::None,
        }
    }

    /// Parse user input: integers become numeric pages, anything else a hash.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::None;
        }
        trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Hash(trimmed.to_string()), Self::Numeric)
    }
}

impl From<i64> for Cursor {
    fn from(page: i64) -> Self {
        Self::Numeric(page)
    }
}

impl From<&str> for Cursor {
    fn from(hash: &str) -> Self {
        Self::Hash(hash.to_string())
    }
}

impl From<String> for Cursor {
    fn from(hash: String) -> Self {
        Self::Hash(hash)
    }
}

impl<T: Into<Self>> From<Option<T>> for Cursor {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("-"),
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Hash(h) => f.write_str(h),
        }
    }
}

/// Maximum number of pages a paginated call may fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBudget {
    Limited(u32),
    /// Keep fetching until the service runs out of pages.
    Unbounded,
}

impl PageBudget {
    /// Accept the integer form: any negative count (conventionally `-1`)
    /// means unbounded.
    #[must_use]
    pub fn from_count(count: i64) -> Self {
        if count < 0 {
            Self::Unbounded
        } else {
            Self::Limited(u32::try_from(count).unwrap_or(u32::MAX))
        }
    }

    #[must_use]
    pub const fn is_exhausted(self) -> bool {
        matches!(self, Self::Limited(0))
    }

    /// One page spent. `Unbounded` stays unbounded.
    #[must_use]
    pub const fn spend(self) -> Self {
        match self {
            Self::Limited(n) => Self::Limited(n.saturating_sub(1)),
            Self::Unbounded => Self::Unbounded,
        }
    }
}

impl Default for PageBudget {
    fn default() -> Self {
        Self::Limited(1)
    }
}

impl From<i64> for PageBudget {
    fn from(count: i64) -> Self {
        Self::from_count(count)
    }
}

/// Decoded `{data, error, pagination}` response.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// HTTP status code.
    pub status: u16,
    /// Unwrapped `data` (array or object); `[]` when missing.
    pub data: Value,
    /// `error` object; empty when missing.
    pub error: Map<String, Value>,
    /// `pagination` object; empty when missing.
    pub pagination: Map<String, Value>,
    /// Cursor for the page after the last one fetched (paginated calls only).
    pub next: Cursor,
}

impl Envelope {
    /// Envelope for a response with no usable body.
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            data: Value::Array(Vec::new()),
            error: Map::new(),
            pagination: Map::new(),
            next: Cursor::None,
        }
    }

    /// Build from a raw response body.
    ///
    /// An empty body yields empty defaults. A body that is not JSON is an
    /// error on a 2xx status; otherwise the raw text is kept as the error
    /// message so status classification still has something to report.
    ///
    /// # Errors
    ///
    /// Returns [`WykopError::ParseResponse`] for a non-JSON 2xx body.
    pub fn from_body(status: u16, body: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(body);
        if text.trim().is_empty() {
            return Ok(Self::empty(status));
        }

        let json: Value = match serde_json::from_str(&text) {
            Ok(json) => json,
            Err(e) if is_success(status) => {
                return Err(WykopError::ParseResponse(format!(
                    "HTTP {status}: {e}"
                )));
            }
            Err(_) => {
                let mut envelope = Self::empty(status);
                envelope
                    .error
                    .insert("message".to_string(), Value::String(text.into_owned()));
                return Ok(envelope);
            }
        };

        Ok(Self::from_json(status, json))
    }

    /// Build from an already decoded JSON document.
    #[must_use]
    pub fn from_json(status: u16, json: Value) -> Self {
        let Value::Object(mut root) = json else {
            return Self::empty(status);
        };

        let data = match root.remove("data") {
            Some(Value::Null) | None => Value::Array(Vec::new()),
            Some(value) => value,
        };
        let error = match root.remove("error") {
            Some(Value::Object(map)) => map,
            Some(Value::String(message)) => {
                let mut map = Map::new();
                map.insert("message".to_string(), Value::String(message));
                map
            }
            _ => Map::new(),
        };
        let pagination = match root.remove("pagination") {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        Self {
            status,
            data,
            error,
            pagination,
            next: Cursor::None,
        }
    }

    /// Status in `[200, 299]`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        is_success(self.status)
    }

    /// Payload carries nothing: empty array, empty object, or null.
    #[must_use]
    pub fn data_is_empty(&self) -> bool {
        match &self.data {
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Null => true,
            _ => false,
        }
    }

    /// `pagination.next` interpreted as a cursor.
    #[must_use]
    pub fn next_from_pagination(&self) -> Cursor {
        self.pagination
            .get("next")
            .map_or(Cursor::None, Cursor::from_json)
    }

    /// The server's error object rendered as JSON text.
    #[must_use]
    pub fn error_text(&self) -> String {
        Value::Object(self.error.clone()).to_string()
    }

    /// Deserialize the payload into a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

pub(crate) const fn is_success(status: u16) -> bool {
    status >= 200 && status <= 299
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cursor_from_pagination_values() {
        assert_eq!(Cursor::from_json(&json!("abc")), Cursor::Hash("abc".into()));
        assert_eq!(Cursor::from_json(&json!(3)), Cursor::Numeric(3));
        assert_eq!(Cursor::from_json(&json!("")), Cursor::None);
        assert_eq!(Cursor::from_json(&Value::Null), Cursor::None);
    }

    #[test]
    fn cursor_parse_user_input() {
        assert_eq!(Cursor::parse("2"), Cursor::Numeric(2));
        assert_eq!(Cursor::parse("a1b2"), Cursor::Hash("a1b2".into()));
        assert_eq!(Cursor::parse("  "), Cursor::None);
        assert_eq!(Cursor::from(None::<i64>), Cursor::None);
        assert_eq!(Cursor::Numeric(4).as_query_value().as_deref(), Some("4"));
    }

    #[test]
    fn budget_from_count() {
        assert_eq!(PageBudget::from_count(-1), PageBudget::Unbounded);
        assert_eq!(PageBudget::from_count(3), PageBudget::Limited(3));
        assert_eq!(PageBudget::Unbounded.spend(), PageBudget::Unbounded);
        assert!(PageBudget::Limited(1).spend().is_exhausted());
        assert!(PageBudget::Limited(0).spend().is_exhausted());
    }

    #[test]
    fn envelope_from_full_body() {
        let body = br#"{"data":[{"id":1}],"pagination":{"next":"h1","prev":null}}"#;
        let env = Envelope::from_body(200, body).unwrap();
        assert!(env.is_success());
        assert_eq!(env.data, json!([{"id": 1}]));
        assert!(env.error.is_empty());
        assert_eq!(env.next_from_pagination(), Cursor::Hash("h1".into()));
    }

    #[test]
    fn empty_body_yields_defaults() {
        let env = Envelope::from_body(204, b"").unwrap();
        assert_eq!(env.status, 204);
        assert!(env.data_is_empty());
        assert!(env.pagination.is_empty());
    }

    #[test]
    fn non_json_error_body_is_kept_as_message() {
        let env = Envelope::from_body(502, b"<html>Bad Gateway</html>").unwrap();
        assert_eq!(env.error.get("message"), Some(&json!("<html>Bad Gateway</html>")));
    }

    #[test]
    fn non_json_success_body_is_an_error() {
        let err = Envelope::from_body(200, b"not json").unwrap_err();
        assert!(matches!(err, WykopError::ParseResponse(_)));
    }

    #[test]
    fn error_payload_is_unwrapped() {
        let body = br#"{"error":{"code":404,"message":"Not found"}}"#;
        let env = Envelope::from_body(404, body).unwrap();
        assert!(!env.is_success());
        assert_eq!(env.error.get("message"), Some(&json!("Not found")));
        assert!(env.error_text().contains("Not found"));
    }
}
