//! Characters appearing in a catalogued game

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{nullable, required_id, required_text, Columns, Messages, Resource};
use crate::query::{FilterKey, FilterSchema, Value};
use crate::repository::{IntoColumns, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub article_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInput {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub avatar: Option<Option<String>>,
    pub article_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCharacter {
    pub name: String,
    pub article_id: i64,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

impl Table for Character {
    const ENTITY: &'static str = "Character";
    const TABLE: &'static str = "characters";
    const COLUMNS: &'static str =
        "id, name, description, avatar, article_id, created_at, updated_at";
}

impl IntoColumns for NewCharacter {
    fn into_columns(self) -> Vec<(&'static str, Value)> {
        Columns::new()
            .set("name", self.name)
            .set("article_id", self.article_id)
            .set_opt("description", self.description)
            .set_opt("avatar", self.avatar)
            .finish()
    }
}

impl IntoColumns for CharacterInput {
    fn into_columns(self) -> Vec<(&'static str, Value)> {
        Columns::new()
            .set_opt("name", self.name)
            .set_nullable("description", self.description)
            .set_nullable("avatar", self.avatar)
            .set_opt("article_id", self.article_id)
            .finish()
    }
}

impl Resource for Character {
    const FILTERS: FilterSchema = FilterSchema::new(&[
        FilterKey::text("name", "name"),
        FilterKey::id("articleId", "article_id"),
        FilterKey::date_range("startDate", "endDate", "created_at"),
    ]);

    const MESSAGES: Messages = Messages {
        not_found: "Character not found",
        id_required: "Character ID is required",
        id_invalid: "Character ID must be an integer",
        required_fields: "Name and articleId are required",
    };

    type Input = CharacterInput;
    type New = NewCharacter;

    fn validate(input: CharacterInput) -> Option<NewCharacter> {
        Some(NewCharacter {
            name: required_text(input.name)?,
            article_id: required_id(input.article_id)?,
            description: input.description.flatten(),
            avatar: input.avatar.flatten(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Constraint, QueryParams};

    #[test]
    fn test_columns_match_record() {
        let now = Utc::now();
        crate::models::assert_columns_match(&Character {
            id: 1,
            name: "Hornet".into(),
            description: None,
            avatar: None,
            article_id: 2,
            created_at: now,
            updated_at: now,
        });
    }

    #[test]
    fn test_zero_article_id_is_missing() {
        let input = CharacterInput {
            name: Some("Hornet".into()),
            article_id: Some(0),
            ..Default::default()
        };
        assert!(Character::validate(input).is_none());
    }

    #[test]
    fn test_filters_ignore_foreign_keys() {
        let params = QueryParams::from_pairs([
            ("name", "Horn"),
            ("articleId", "3"),
            ("authorId", "9"),
        ]);
        let filter = Character::FILTERS.build(&params).unwrap();

        assert_eq!(filter.len(), 2);
        assert!(matches!(filter.get("name"), Some(Constraint::Contains(s)) if s == "Horn"));
        assert!(matches!(
            filter.get("article_id"),
            Some(Constraint::Equals(Value::Integer(3)))
        ));
        assert!(filter.get("author_id").is_none());
    }
}
