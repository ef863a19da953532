//! Catalogue articles, one per game

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{nullable, required_text, Columns, Messages, Resource};
use crate::query::{FilterKey, FilterSchema, Value};
use crate::repository::{IntoColumns, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    /// Cover image URL
    pub cover: Option<String>,
    pub status: String,
    pub views: i64,
    pub category_id: Option<i64>,
    pub author_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub developer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub summary: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub cover: Option<Option<String>>,
    pub status: Option<String>,
    pub views: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub category_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub author_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub publisher_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub developer_id: Option<Option<i64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    pub title: String,
    /// Every other field is optional on create; `rest.title` is always `None`
    pub rest: ArticleInput,
}

impl Table for Article {
    const ENTITY: &'static str = "Article";
    const TABLE: &'static str = "articles";
    const COLUMNS: &'static str = "id, title, summary, content, cover, status, views, \
                                   category_id, author_id, publisher_id, developer_id, \
                                   created_at, updated_at";
}

impl IntoColumns for NewArticle {
    fn into_columns(self) -> Vec<(&'static str, Value)> {
        let mut columns = vec![("title", Value::Text(self.title))];
        columns.extend(self.rest.into_columns());
        columns
    }
}

impl IntoColumns for ArticleInput {
    fn into_columns(self) -> Vec<(&'static str, Value)> {
        Columns::new()
            .set_opt("title", self.title)
            .set_nullable("summary", self.summary)
            .set_nullable("content", self.content)
            .set_nullable("cover", self.cover)
            .set_opt("status", self.status)
            .set_opt("views", self.views)
            .set_nullable("category_id", self.category_id)
            .set_nullable("author_id", self.author_id)
            .set_nullable("publisher_id", self.publisher_id)
            .set_nullable("developer_id", self.developer_id)
            .finish()
    }
}

impl Resource for Article {
    const FILTERS: FilterSchema = FilterSchema::new(&[
        FilterKey::text("title", "title"),
        FilterKey::id("categoryId", "category_id"),
        FilterKey::id("authorId", "author_id"),
        FilterKey::id("publisherId", "publisher_id"),
        FilterKey::id("developerId", "developer_id"),
        FilterKey::enumerated("status", "status"),
        FilterKey::date_range("startDate", "endDate", "created_at"),
    ]);

    const MESSAGES: Messages = Messages {
        not_found: "Article not found",
        id_required: "Article ID is required",
        id_invalid: "Article ID must be an integer",
        required_fields: "Title is required",
    };

    type Input = ArticleInput;
    type New = NewArticle;

    fn validate(mut input: ArticleInput) -> Option<NewArticle> {
        let title = required_text(input.title.take())?;
        Some(NewArticle { title, rest: input })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_match_record() {
        let now = Utc::now();
        crate::models::assert_columns_match(&Article {
            id: 1,
            title: "Hollow Knight".into(),
            summary: None,
            content: None,
            cover: None,
            status: "DRAFT".into(),
            views: 0,
            category_id: None,
            author_id: None,
            publisher_id: None,
            developer_id: None,
            created_at: now,
            updated_at: now,
        });
    }

    #[test]
    fn test_new_article_columns() {
        let input = ArticleInput {
            title: Some("Hollow Knight".into()),
            status: Some("PUBLISHED".into()),
            developer_id: Some(Some(4)),
            ..Default::default()
        };
        let new = Article::validate(input).unwrap();
        assert_eq!(
            new.into_columns(),
            vec![
                ("title", Value::from("Hollow Knight")),
                ("status", Value::from("PUBLISHED")),
                ("developer_id", Value::Integer(4)),
            ]
        );
    }

    #[test]
    fn test_title_required() {
        let input = ArticleInput {
            summary: Some(Some("No title".into())),
            ..Default::default()
        };
        assert!(Article::validate(input).is_none());
    }
}
