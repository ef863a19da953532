//! PostgreSQL repository backend
//!
//! One generic [`PgRepository`] serves every entity. An entity describes its
//! table through [`Table`] and its write payloads through [`IntoColumns`];
//! statements are assembled with `sqlx::QueryBuilder` so every value is a
//! bind parameter and only `'static` column names are ever spliced in.

use std::marker::PhantomData;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{Pagination, Sort};
use super::traits::{Repository, RepositoryResult};
use crate::query::{Constraint, FilterPredicate, Value};

/// Storage mapping for an entity
pub trait Table: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    /// Entity name used in errors and logs
    const ENTITY: &'static str;
    /// Table name
    const TABLE: &'static str;
    /// Comma separated select list
    const COLUMNS: &'static str;
}

/// A write payload flattened to `(column, value)` pairs
///
/// `None` fields are omitted: on insert the column default applies, on
/// update the column is left unchanged.
pub trait IntoColumns {
    fn into_columns(self) -> Vec<(&'static str, Value)>;
}

/// PostgreSQL-backed repository for entity `E`
pub struct PgRepository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for PgRepository<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<E, N, P> Repository<i64, E, N, P> for PgRepository<E>
where
    E: Table,
    N: IntoColumns + Send + 'static,
    P: IntoColumns + Send + 'static,
{
    async fn find_by_id(&self, id: &i64) -> RepositoryResult<Option<E>> {
        let mut builder = select_by_id(E::TABLE, E::COLUMNS, *id);
        builder
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error::<E>(RepositoryOperation::FindById))
    }

    async fn find_all(
        &self,
        filter: &FilterPredicate,
        sort: Sort,
        pagination: Pagination,
    ) -> RepositoryResult<Vec<E>> {
        let mut builder = select_page(E::TABLE, E::COLUMNS, filter, sort, pagination);
        tracing::debug!(entity = E::ENTITY, sql = builder.sql(), "find_all");
        builder
            .build_query_as::<E>()
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error::<E>(RepositoryOperation::FindAll))
    }

    async fn count(&self, filter: &FilterPredicate) -> RepositoryResult<u64> {
        let mut builder = count_matching(E::TABLE, filter);
        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error::<E>(RepositoryOperation::Count))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn create(&self, data: N) -> RepositoryResult<E> {
        let mut builder = insert_returning(E::TABLE, E::COLUMNS, data.into_columns());
        builder
            .build_query_as::<E>()
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error::<E>(RepositoryOperation::Create))
    }

    async fn update(&self, id: &i64, data: P) -> RepositoryResult<E> {
        let columns = data.into_columns();
        let mut builder = if columns.is_empty() {
            select_by_id(E::TABLE, E::COLUMNS, *id)
        } else {
            update_returning(E::TABLE, E::COLUMNS, *id, columns)
        };

        builder
            .build_query_as::<E>()
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error::<E>(RepositoryOperation::Update))?
            .ok_or_else(|| RepositoryError::not_found(RepositoryOperation::Update, E::ENTITY, id))
    }

    async fn delete(&self, id: &i64) -> RepositoryResult<()> {
        let mut builder = delete_by_id(E::TABLE, *id);
        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(storage_error::<E>(RepositoryOperation::Delete))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found(
                RepositoryOperation::Delete,
                E::ENTITY,
                id,
            ));
        }
        Ok(())
    }
}

fn storage_error<E: Table>(
    operation: RepositoryOperation,
) -> impl FnOnce(sqlx::Error) -> RepositoryError {
    move |err| {
        RepositoryError::from(err)
            .with_operation(operation)
            .with_entity_type(E::ENTITY)
    }
}

fn select_by_id(table: &str, columns: &str, id: i64) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {columns} FROM {table} WHERE id = "));
    builder.push_bind(id);
    builder
}

fn select_page(
    table: &str,
    columns: &str,
    filter: &FilterPredicate,
    sort: Sort,
    pagination: Pagination,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {columns} FROM {table}"));
    push_where(&mut builder, filter);

    let direction = sort.direction.as_sql();
    builder.push(format!(
        " ORDER BY {} {direction}, id {direction}",
        sort.column
    ));
    builder.push(" LIMIT ");
    builder.push_bind(clamp_i64(pagination.limit));
    builder.push(" OFFSET ");
    builder.push_bind(clamp_i64(pagination.offset));
    builder
}

fn count_matching(table: &str, filter: &FilterPredicate) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table}"));
    push_where(&mut builder, filter);
    builder
}

fn insert_returning(
    table: &str,
    returning: &str,
    columns: Vec<(&'static str, Value)>,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("INSERT INTO {table}"));

    if columns.is_empty() {
        builder.push(" DEFAULT VALUES");
    } else {
        let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        builder.push(format!(" ({}) VALUES (", names.join(", ")));
        {
            let mut values = builder.separated(", ");
            for (_, value) in columns {
                match value {
                    Value::Integer(n) => values.push_bind(n),
                    Value::Float(n) => values.push_bind(n),
                    Value::Text(s) => values.push_bind(s),
                    Value::Timestamp(ts) => values.push_bind(ts),
                    Value::Null => values.push("NULL"),
                };
            }
        }
        builder.push(")");
    }

    builder.push(format!(" RETURNING {returning}"));
    builder
}

fn update_returning(
    table: &str,
    returning: &str,
    id: i64,
    columns: Vec<(&'static str, Value)>,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {table} SET "));
    for (name, value) in columns {
        builder.push(format!("{name} = "));
        push_value(&mut builder, value);
        builder.push(", ");
    }
    builder.push("updated_at = now() WHERE id = ");
    builder.push_bind(id);
    builder.push(format!(" RETURNING {returning}"));
    builder
}

fn delete_by_id(table: &str, id: i64) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("DELETE FROM {table} WHERE id = "));
    builder.push_bind(id);
    builder
}

/// Append ` WHERE a AND b ...` for every condition in `filter`
fn push_where(builder: &mut QueryBuilder<'static, Postgres>, filter: &FilterPredicate) {
    let mut first = true;
    let mut next_clause = |builder: &mut QueryBuilder<'static, Postgres>| {
        builder.push(if first { " WHERE " } else { " AND " });
        first = false;
    };

    for condition in filter.iter() {
        let column = condition.column;
        match &condition.constraint {
            Constraint::Equals(value) => {
                next_clause(builder);
                builder.push(format!("{column} = "));
                push_value(builder, value.clone());
            }
            Constraint::Contains(needle) => {
                // strpos is case-sensitive and treats % and _ literally
                next_clause(builder);
                builder.push(format!("strpos({column}, "));
                builder.push_bind(needle.clone());
                builder.push(") > 0");
            }
            Constraint::Range { gte, lte } => {
                if let Some(gte) = gte {
                    next_clause(builder);
                    builder.push(format!("{column} >= "));
                    builder.push_bind(*gte);
                }
                if let Some(lte) = lte {
                    next_clause(builder);
                    builder.push(format!("{column} <= "));
                    builder.push_bind(*lte);
                }
            }
            Constraint::DateRange { gte, lte } => {
                next_clause(builder);
                builder.push(format!("{column} >= "));
                builder.push_bind(*gte);
                builder.push(format!(" AND {column} <= "));
                builder.push_bind(*lte);
            }
        }
    }
}

fn push_value(builder: &mut QueryBuilder<'static, Postgres>, value: Value) {
    match value {
        Value::Integer(n) => builder.push_bind(n),
        Value::Float(n) => builder.push_bind(n),
        Value::Text(s) => builder.push_bind(s),
        Value::Timestamp(ts) => builder.push_bind(ts),
        Value::Null => builder.push("NULL"),
    };
}

fn clamp_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterKey, FilterSchema, QueryParams};
    use crate::repository::OrderDirection;

    const SCHEMA: FilterSchema = FilterSchema::new(&[
        FilterKey::text("name", "name"),
        FilterKey::id("articleId", "article_id"),
        FilterKey::number_range("minRating", "maxRating", "rating"),
        FilterKey::date_range("startDate", "endDate", "created_at"),
    ]);

    fn filter(pairs: &[(&str, &str)]) -> FilterPredicate {
        SCHEMA
            .build(&QueryParams::from_pairs(pairs.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_select_page_without_filter() {
        let builder = select_page(
            "comments",
            "id, content",
            &FilterPredicate::new(),
            Sort::newest_first(),
            Pagination::new(20, 10),
        );
        assert_eq!(
            builder.sql(),
            "SELECT id, content FROM comments ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_select_page_with_filters() {
        let builder = select_page(
            "game_saves",
            "*",
            &filter(&[("name", "hero"), ("articleId", "3"), ("minRating", "2")]),
            Sort::new("name", OrderDirection::Ascending),
            Pagination::new(0, 10),
        );
        assert_eq!(
            builder.sql(),
            "SELECT * FROM game_saves WHERE strpos(name, $1) > 0 AND article_id = $2 \
             AND rating >= $3 ORDER BY name ASC, id ASC LIMIT $4 OFFSET $5"
        );
    }

    #[test]
    fn test_count_with_two_sided_ranges() {
        let builder = count_matching(
            "game_saves",
            &filter(&[
                ("minRating", "1"),
                ("maxRating", "4.5"),
                ("startDate", "2024-01-01"),
                ("endDate", "2024-12-31"),
            ]),
        );
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM game_saves WHERE rating >= $1 AND rating <= $2 \
             AND created_at >= $3 AND created_at <= $4"
        );
    }

    #[test]
    fn test_insert_returning() {
        let builder = insert_returning(
            "comments",
            "id, content",
            vec![
                ("content", Value::from("hi")),
                ("article_id", Value::Integer(1)),
            ],
        );
        assert_eq!(
            builder.sql(),
            "INSERT INTO comments (content, article_id) VALUES ($1, $2) RETURNING id, content"
        );
    }

    #[test]
    fn test_insert_without_columns_uses_defaults() {
        let builder = insert_returning("comments", "id", Vec::new());
        assert_eq!(builder.sql(), "INSERT INTO comments DEFAULT VALUES RETURNING id");
    }

    #[test]
    fn test_update_touches_updated_at() {
        let builder = update_returning(
            "articles",
            "id, title",
            9,
            vec![("title", Value::from("New")), ("views", Value::Integer(3))],
        );
        assert_eq!(
            builder.sql(),
            "UPDATE articles SET title = $1, views = $2, updated_at = now() WHERE id = $3 \
             RETURNING id, title"
        );
    }

    #[test]
    fn test_update_writes_null_literal() {
        let builder = update_returning(
            "comments",
            "id",
            4,
            vec![("parent_id", Value::Null), ("status", Value::from("HIDDEN"))],
        );
        assert_eq!(
            builder.sql(),
            "UPDATE comments SET parent_id = NULL, status = $1, updated_at = now() \
             WHERE id = $2 RETURNING id"
        );
    }

    #[test]
    fn test_insert_writes_null_literal() {
        let builder = insert_returning(
            "game_saves",
            "id",
            vec![("name", Value::from("slot 1")), ("rating", Value::Null)],
        );
        assert_eq!(
            builder.sql(),
            "INSERT INTO game_saves (name, rating) VALUES ($1, NULL) RETURNING id"
        );
    }

    #[test]
    fn test_delete_and_select_by_id() {
        assert_eq!(
            delete_by_id("characters", 5).sql(),
            "DELETE FROM characters WHERE id = $1"
        );
        assert_eq!(
            select_by_id("characters", "id, name", 5).sql(),
            "SELECT id, name FROM characters WHERE id = $1"
        );
    }

    #[test]
    fn test_clamp_i64() {
        assert_eq!(clamp_i64(u64::MAX), i64::MAX);
        assert_eq!(clamp_i64(7), 7);
    }
}
