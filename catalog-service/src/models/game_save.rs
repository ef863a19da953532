//! Downloadable game save files

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{nullable, required_id, required_text, Columns, Messages, Resource};
use crate::query::{FilterKey, FilterSchema, Value};
use crate::repository::{IntoColumns, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GameSave {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Download link
    pub url: String,
    pub game_version: Option<String>,
    pub rating: Option<f64>,
    pub status: String,
    pub article_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSaveInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub game_version: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub rating: Option<Option<f64>>,
    pub status: Option<String>,
    pub article_id: Option<i64>,
    pub author_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGameSave {
    pub name: String,
    pub url: String,
    pub article_id: i64,
    pub author_id: i64,
    pub description: Option<String>,
    pub game_version: Option<String>,
    pub rating: Option<f64>,
    /// Defaults to `ACTIVE` when omitted
    pub status: Option<String>,
}

impl Table for GameSave {
    const ENTITY: &'static str = "GameSave";
    const TABLE: &'static str = "game_saves";
    const COLUMNS: &'static str = "id, name, description, url, game_version, rating, status, \
                                   article_id, author_id, created_at, updated_at";
}

impl IntoColumns for NewGameSave {
    fn into_columns(self) -> Vec<(&'static str, Value)> {
        Columns::new()
            .set("name", self.name)
            .set("url", self.url)
            .set("article_id", self.article_id)
            .set("author_id", self.author_id)
            .set_opt("description", self.description)
            .set_opt("game_version", self.game_version)
            .set_opt("rating", self.rating)
            .set_opt("status", self.status)
            .finish()
    }
}

impl IntoColumns for GameSaveInput {
    fn into_columns(self) -> Vec<(&'static str, Value)> {
        Columns::new()
            .set_opt("name", self.name)
            .set_nullable("description", self.description)
            .set_opt("url", self.url)
            .set_nullable("game_version", self.game_version)
            .set_nullable("rating", self.rating)
            .set_opt("status", self.status)
            .set_opt("article_id", self.article_id)
            .set_opt("author_id", self.author_id)
            .finish()
    }
}

impl Resource for GameSave {
    const FILTERS: FilterSchema = FilterSchema::new(&[
        FilterKey::text("name", "name"),
        FilterKey::id("articleId", "article_id"),
        FilterKey::id("authorId", "author_id"),
        FilterKey::enumerated("status", "status"),
        FilterKey::text("gameVersion", "game_version"),
        FilterKey::number_range("minRating", "maxRating", "rating"),
        FilterKey::date_range("startDate", "endDate", "created_at"),
    ]);

    const MESSAGES: Messages = Messages {
        not_found: "游戏存档不存在",
        id_required: "存档ID为必填项",
        id_invalid: "存档ID必须为整数",
        required_fields: "存档名称、下载链接、游戏ID和作者ID为必填项",
    };

    type Input = GameSaveInput;
    type New = NewGameSave;

    fn validate(input: GameSaveInput) -> Option<NewGameSave> {
        Some(NewGameSave {
            name: required_text(input.name)?,
            url: required_text(input.url)?,
            article_id: required_id(input.article_id)?,
            author_id: required_id(input.author_id)?,
            description: input.description.flatten(),
            game_version: input.game_version.flatten(),
            rating: input.rating.flatten(),
            status: input.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Constraint, QueryParams};

    #[test]
    fn test_columns_match_record() {
        let now = chrono::Utc::now();
        crate::models::assert_columns_match(&GameSave {
            id: 1,
            name: "Chapter 3".into(),
            description: None,
            url: "https://saves.example/3".into(),
            game_version: Some("1.2".into()),
            rating: None,
            status: "ACTIVE".into(),
            article_id: 1,
            author_id: 1,
            created_at: now,
            updated_at: now,
        });
    }

    #[test]
    fn test_empty_url_is_missing() {
        let input = GameSaveInput {
            name: Some("Chapter 3".into()),
            url: Some(String::new()),
            article_id: Some(1),
            author_id: Some(1),
            ..Default::default()
        };
        assert!(GameSave::validate(input).is_none());
    }

    #[test]
    fn test_rating_range_filter() {
        let params = QueryParams::from_pairs([("minRating", "3"), ("maxRating", "5"), ("page", "2")]);
        let filter = GameSave::FILTERS.build(&params).unwrap();
        assert_eq!(filter.len(), 1);
        assert_eq!(
            filter.get("rating"),
            Some(&Constraint::Range {
                gte: Some(3.0),
                lte: Some(5.0)
            })
        );
    }

    #[test]
    fn test_update_columns_only_present_fields() {
        let input: GameSaveInput = serde_json::from_str(r#"{"rating":4.5}"#).unwrap();
        assert_eq!(input.into_columns(), vec![("rating", Value::Float(4.5))]);
    }

    #[test]
    fn test_update_can_clear_optional_fields() {
        let input: GameSaveInput =
            serde_json::from_str(r#"{"rating":null,"gameVersion":null,"name":null}"#).unwrap();
        assert_eq!(
            input.into_columns(),
            vec![("game_version", Value::Null), ("rating", Value::Null)]
        );
    }
}
