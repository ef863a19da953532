//! Catalogue entities
//!
//! Each entity provides:
//! - the persisted record (JSON in camelCase, columns in snake_case)
//! - an input type with every field optional, used as the update payload and
//!   validated into the create payload
//! - a [`Resource`] impl tying in its filter allow-list and response messages

mod article;
mod character;
mod comment;
mod game_save;

pub use article::{Article, ArticleInput, NewArticle};
pub use character::{Character, CharacterInput, NewCharacter};
pub use comment::{Comment, CommentInput, NewComment};
pub use game_save::{GameSave, GameSaveInput, NewGameSave};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::query::{FilterSchema, Value};
use crate::repository::{IntoColumns, RepositoryError, RepositoryResult, Table};

/// Client-facing messages for one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    /// Identity lookup, update or delete matched nothing
    pub not_found: &'static str,
    /// Update or delete without an `id` parameter
    pub id_required: &'static str,
    /// `id` parameter is not an integer
    pub id_invalid: &'static str,
    /// Create payload is missing a required field
    pub required_fields: &'static str,
}

/// An entity served through the generic dispatcher
pub trait Resource: Table + Serialize + Send + Sync {
    /// Allowed filter keys for list requests
    const FILTERS: FilterSchema;

    const MESSAGES: Messages;

    /// Request body for create and update, every field optional
    type Input: DeserializeOwned + IntoColumns + Send + 'static;

    /// Create payload with required fields present
    type New: IntoColumns + Send + 'static;

    /// Check required fields, `None` if any is missing or falsy
    fn validate(input: Self::Input) -> Option<Self::New>;

    /// Create payload for storage, `ValidationFailed` with this resource's
    /// `required_fields` message when [`validate`](Resource::validate) rejects it
    fn prepare_create(input: Self::Input) -> RepositoryResult<Self::New> {
        Self::validate(input).ok_or_else(|| {
            RepositoryError::validation_failed(Self::MESSAGES.required_fields)
                .with_entity_type(Self::ENTITY)
        })
    }
}

/// Required text: absent and empty both count as missing
pub(crate) fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Required id: absent and zero both count as missing
pub(crate) fn required_id(value: Option<i64>) -> Option<i64> {
    value.filter(|id| *id != 0)
}

/// Keeps an explicit `null` apart from an absent field
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: absent is
/// `None`, `null` is `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Accumulates `(column, value)` pairs for [`IntoColumns`] impls
#[derive(Debug, Default)]
pub(crate) struct Columns(Vec<(&'static str, Value)>);

impl Columns {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.0.push((column, value.into()));
        self
    }

    pub(crate) fn set_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    /// Skip when absent, write `NULL` when explicitly cleared
    pub(crate) fn set_nullable<V: Into<Value>>(
        self,
        column: &'static str,
        value: Option<Option<V>>,
    ) -> Self {
        match value {
            Some(Some(value)) => self.set(column, value),
            Some(None) => self.set(column, Value::Null),
            None => self,
        }
    }

    pub(crate) fn finish(self) -> Vec<(&'static str, Value)> {
        self.0
    }
}

/// Every select column maps to exactly one camelCase JSON field of `record`
#[cfg(test)]
pub(crate) fn assert_columns_match<T: Table + Serialize>(record: &T) {
    let json = serde_json::to_value(record).unwrap();
    let fields = json.as_object().unwrap();

    let columns: Vec<String> = T::COLUMNS
        .split(',')
        .map(|column| {
            let mut parts = column.trim().split('_');
            let mut name = parts.next().unwrap_or_default().to_string();
            for part in parts {
                let mut chars = part.chars();
                if let Some(first) = chars.next() {
                    name.push(first.to_ascii_uppercase());
                    name.push_str(chars.as_str());
                }
            }
            name
        })
        .collect();

    assert_eq!(columns.len(), fields.len(), "{}: {:?}", T::TABLE, columns);
    for column in &columns {
        assert!(fields.contains_key(column), "{}: no field for {column}", T::TABLE);
    }
}
