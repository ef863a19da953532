//! Typed values bound into storage queries

use chrono::{DateTime, Utc};

/// A typed value bound into a storage query
///
/// Used both for filter operands and for column values written by
/// create/update.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit integer (ids, counters)
    Integer(i64),
    /// Double precision float (ratings)
    Float(f64),
    /// Text
    Text(String),
    /// UTC timestamp
    Timestamp(DateTime<Utc>),
    /// SQL `NULL`, written as a literal rather than a bind
    Null,
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}
