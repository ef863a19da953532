//! User comments on articles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{nullable, required_id, required_text, Columns, Messages, Resource};
use crate::query::{FilterKey, FilterSchema, Value};
use crate::repository::{IntoColumns, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub article_id: i64,
    pub author_id: i64,
    /// Comment being replied to
    pub parent_id: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    pub content: Option<String>,
    pub article_id: Option<i64>,
    pub author_id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub parent_id: Option<Option<i64>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub content: String,
    pub article_id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    /// Defaults to `PUBLISHED` when omitted
    pub status: Option<String>,
}

impl Table for Comment {
    const ENTITY: &'static str = "Comment";
    const TABLE: &'static str = "comments";
    const COLUMNS: &'static str =
        "id, content, article_id, author_id, parent_id, status, created_at, updated_at";
}

impl IntoColumns for NewComment {
    fn into_columns(self) -> Vec<(&'static str, Value)> {
        Columns::new()
            .set("content", self.content)
            .set("article_id", self.article_id)
            .set("author_id", self.author_id)
            .set_opt("parent_id", self.parent_id)
            .set_opt("status", self.status)
            .finish()
    }
}

impl IntoColumns for CommentInput {
    fn into_columns(self) -> Vec<(&'static str, Value)> {
        Columns::new()
            .set_opt("content", self.content)
            .set_opt("article_id", self.article_id)
            .set_opt("author_id", self.author_id)
            .set_nullable("parent_id", self.parent_id)
            .set_opt("status", self.status)
            .finish()
    }
}

impl Resource for Comment {
    const FILTERS: FilterSchema = FilterSchema::new(&[
        FilterKey::text("content", "content"),
        FilterKey::id("articleId", "article_id"),
        FilterKey::id("authorId", "author_id"),
        FilterKey::id("parentId", "parent_id"),
        FilterKey::enumerated("status", "status"),
        FilterKey::date_range("startDate", "endDate", "created_at"),
    ]);

    const MESSAGES: Messages = Messages {
        not_found: "Comment not found",
        id_required: "Comment ID is required",
        id_invalid: "Comment ID must be an integer",
        required_fields: "Content, articleId and authorId are required",
    };

    type Input = CommentInput;
    type New = NewComment;

    fn validate(input: CommentInput) -> Option<NewComment> {
        Some(NewComment {
            content: required_text(input.content)?,
            article_id: required_id(input.article_id)?,
            author_id: required_id(input.author_id)?,
            parent_id: input.parent_id.flatten(),
            status: input.status,
        })
    }
}
