//! Filter Builder
//!
//! Each entity declares a [`FilterSchema`]: the allow-list of query keys it
//! understands and the column each one constrains. Building a predicate is a
//! pure function of the query parameters. Unknown keys are ignored and a
//! column is constrained at most once.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use super::{QueryParams, Value};

/// A query value that could not be coerced to the type its key requires
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Invalid {param}: expected an integer, got '{value}'")]
    InvalidInteger { param: &'static str, value: String },

    #[error("Invalid {param}: expected a number, got '{value}'")]
    InvalidNumber { param: &'static str, value: String },

    #[error("Invalid {param}: expected a date, got '{value}'")]
    InvalidDate { param: &'static str, value: String },
}

/// Operator applied to one column
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// `column = value`
    Equals(Value),
    /// Case-sensitive substring match
    Contains(String),
    /// Numeric range, either bound optional, both inclusive
    Range { gte: Option<f64>, lte: Option<f64> },
    /// Inclusive timestamp range
    DateRange {
        gte: DateTime<Utc>,
        lte: DateTime<Utc>,
    },
}

/// A constraint bound to a column
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: &'static str,
    pub constraint: Constraint,
}

/// Conjunction of conditions, at most one per column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPredicate {
    conditions: Vec<Condition>,
}

impl FilterPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition, replacing any existing one on the same column
    pub fn push(&mut self, column: &'static str, constraint: Constraint) {
        match self.conditions.iter_mut().find(|c| c.column == column) {
            Some(existing) => existing.constraint = constraint,
            None => self.conditions.push(Condition { column, constraint }),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Constraint> {
        self.conditions
            .iter()
            .find(|c| c.column == column)
            .map(|c| &c.constraint)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// One recognised query key (or key pair) and how it maps to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    /// Identity or foreign key, integer equality
    Id {
        param: &'static str,
        column: &'static str,
    },
    /// Free text, substring containment
    Text {
        param: &'static str,
        column: &'static str,
    },
    /// Enumerated value, passed through as text equality
    Enumerated {
        param: &'static str,
        column: &'static str,
    },
    /// Numeric range from a min and a max key, one-sided allowed
    NumberRange {
        min: &'static str,
        max: &'static str,
        column: &'static str,
    },
    /// Timestamp range, applied only when both keys are present
    DateRange {
        start: &'static str,
        end: &'static str,
        column: &'static str,
    },
}

impl FilterKey {
    pub const fn id(param: &'static str, column: &'static str) -> Self {
        Self::Id { param, column }
    }

    pub const fn text(param: &'static str, column: &'static str) -> Self {
        Self::Text { param, column }
    }

    pub const fn enumerated(param: &'static str, column: &'static str) -> Self {
        Self::Enumerated { param, column }
    }

    pub const fn number_range(
        min: &'static str,
        max: &'static str,
        column: &'static str,
    ) -> Self {
        Self::NumberRange { min, max, column }
    }

    pub const fn date_range(start: &'static str, end: &'static str, column: &'static str) -> Self {
        Self::DateRange { start, end, column }
    }

    fn apply(&self, params: &QueryParams, predicate: &mut FilterPredicate) -> Result<(), FilterError> {
        match *self {
            Self::Id { param, column } => {
                if let Some(raw) = params.get(param) {
                    predicate.push(column, Constraint::Equals(Value::Integer(parse_integer(param, raw)?)));
                }
            }
            Self::Text { param, column } => {
                if let Some(raw) = params.get(param) {
                    predicate.push(column, Constraint::Contains(raw.to_string()));
                }
            }
            Self::Enumerated { param, column } => {
                if let Some(raw) = params.get(param) {
                    predicate.push(column, Constraint::Equals(Value::Text(raw.to_string())));
                }
            }
            Self::NumberRange { min, max, column } => {
                let gte = params.get(min).map(|raw| parse_number(min, raw)).transpose()?;
                let lte = params.get(max).map(|raw| parse_number(max, raw)).transpose()?;
                if gte.is_some() || lte.is_some() {
                    predicate.push(column, Constraint::Range { gte, lte });
                }
            }
            Self::DateRange { start, end, column } => {
                if let (Some(raw_start), Some(raw_end)) = (params.get(start), params.get(end)) {
                    let gte = parse_date(start, raw_start)?;
                    let lte = parse_date(end, raw_end)?;
                    predicate.push(column, Constraint::DateRange { gte, lte });
                }
            }
        }
        Ok(())
    }
}

/// Allow-list of filter keys for one entity
#[derive(Debug, Clone, Copy)]
pub struct FilterSchema(&'static [FilterKey]);

impl FilterSchema {
    pub const fn new(keys: &'static [FilterKey]) -> Self {
        Self(keys)
    }

    /// Build the predicate for `params`
    ///
    /// Fails only when a recognised key carries a value of the wrong type.
    pub fn build(&self, params: &QueryParams) -> Result<FilterPredicate, FilterError> {
        let mut predicate = FilterPredicate::new();
        for key in self.0 {
            key.apply(params, &mut predicate)?;
        }
        Ok(predicate)
    }
}

fn parse_integer(param: &'static str, raw: &str) -> Result<i64, FilterError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| FilterError::InvalidInteger {
            param,
            value: raw.to_string(),
        })
}

fn parse_number(param: &'static str, raw: &str) -> Result<f64, FilterError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FilterError::InvalidNumber {
            param,
            value: raw.to_string(),
        })
}

/// Accepts RFC 3339, a naive datetime (read as UTC) or a bare `YYYY-MM-DD`
/// (midnight UTC)
fn parse_date(param: &'static str, raw: &str) -> Result<DateTime<Utc>, FilterError> {
    let s = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(FilterError::InvalidDate {
        param,
        value: raw.to_string(),
    })
}
