//! Raw query-string parameters

use std::collections::HashMap;

use serde::Deserialize;

/// Raw query-string parameters of one request
///
/// Empty values are treated as absent, so `?status=` never produces a
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    /// Build from key/value pairs, mostly useful in tests
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Non-empty value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Whether a non-empty value is present for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
