//! Ordered request parameters with absent values dropped.
//!
//! Every query string and request body in the facade is assembled through
//! [`Params`]: assigning `None` is a no-op, so optional arguments can be
//! passed straight through without branching at each call site.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// Insertion-ordered key/value parameters.
///
/// Re-assigning a key replaces its value but keeps the position of the
/// first assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Assign `key`; `None` (or a JSON `null`) leaves the parameters untouched.
    pub fn set<V: Into<Value>>(&mut self, key: impl Into<String>, value: Option<V>) {
        let Some(value) = value.map(Into::into) else {
            return;
        };
        if value.is_null() {
            return;
        }
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Builder form of [`Params::set`].
    #[must_use]
    pub fn with<V: Into<Value>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Render as query-string pairs. Strings are sent verbatim, everything
    /// else in its JSON form (`true`, `12`).
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect()
    }

    /// Render as a JSON object, keys in insertion order when serialized.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.iter().cloned().collect())
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Build [`Params`] from `(key, optional value)` pairs, dropping absent values.
#[must_use]
pub fn build_params<K, V, I>(entries: I) -> Params
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, Option<V>)>,
{
    let mut params = Params::new();
    for (k, v) in entries {
        params.set(k, v);
    }
    params
}
