//! PostgreSQL pool creation and schema bootstrap

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::{
    config::DatabaseConfig,
    error::{sanitize_url, DatabaseError, DatabaseErrorKind, DatabaseOperation, Result},
};

/// Tables for the four catalogue entities
///
/// Every statement is `IF NOT EXISTS`, so running it against an existing
/// database is a no-op.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id           BIGSERIAL PRIMARY KEY,
    title        TEXT NOT NULL,
    summary      TEXT,
    content      TEXT,
    cover        TEXT,
    status       TEXT NOT NULL DEFAULT 'DRAFT',
    views        BIGINT NOT NULL DEFAULT 0,
    category_id  BIGINT,
    author_id    BIGINT,
    publisher_id BIGINT,
    developer_id BIGINT,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS comments (
    id         BIGSERIAL PRIMARY KEY,
    content    TEXT NOT NULL,
    article_id BIGINT NOT NULL REFERENCES articles (id) ON DELETE CASCADE,
    author_id  BIGINT NOT NULL,
    parent_id  BIGINT REFERENCES comments (id) ON DELETE CASCADE,
    status     TEXT NOT NULL DEFAULT 'PUBLISHED',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS game_saves (
    id           BIGSERIAL PRIMARY KEY,
    name         TEXT NOT NULL,
    description  TEXT,
    url          TEXT NOT NULL,
    game_version TEXT,
    rating       DOUBLE PRECISION,
    status       TEXT NOT NULL DEFAULT 'ACTIVE',
    article_id   BIGINT NOT NULL REFERENCES articles (id) ON DELETE CASCADE,
    author_id    BIGINT NOT NULL,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS characters (
    id          BIGSERIAL PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    avatar      TEXT,
    article_id  BIGINT NOT NULL REFERENCES articles (id) ON DELETE CASCADE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_comments_article_created ON comments (article_id, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_game_saves_article_created ON game_saves (article_id, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_characters_article ON characters (article_id);
CREATE INDEX IF NOT EXISTS idx_articles_created ON articles (created_at DESC);
"#;

/// Create the pool, retrying with exponential backoff
///
/// Runs the schema bootstrap afterwards when `bootstrap_schema` is set.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = connect_with_retries(config).await?;

    if config.bootstrap_schema {
        bootstrap_schema(&pool).await?;
    }

    Ok(pool)
}

async fn connect_with_retries(config: &DatabaseConfig) -> Result<PgPool> {
    let base_delay = Duration::from_secs(config.retry_delay_secs);
    let mut attempt = 0;

    loop {
        match try_create_pool(config).await {
            Ok(pool) => {
                tracing::info!(
                    url = %sanitize_url(&config.url),
                    max_connections = config.max_connections,
                    min_connections = config.min_connections,
                    attempts = attempt + 1,
                    "Database connection pool created"
                );
                return Ok(pool);
            }
            Err(e) => {
                attempt += 1;

                if attempt > config.max_retries {
                    tracing::error!(
                        "Failed to connect to database after {} attempts: {}",
                        attempt,
                        e
                    );
                    return Err(e.into());
                }

                let delay = retry_delay(base_delay, attempt);
                tracing::warn!(
                    "Database connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn try_create_pool(config: &DatabaseConfig) -> std::result::Result<PgPool, DatabaseError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| {
            let error = DatabaseError::from(e);
            DatabaseError::new(
                DatabaseOperation::Connect,
                error.kind,
                format!("{} ({})", error.message, sanitize_url(&config.url)),
            )
        })
}

/// `base * 2^(attempt - 1)`, attempt counted from 1
fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
}

/// Create any missing catalogue tables
pub async fn bootstrap_schema(pool: &PgPool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await.map_err(|e| {
        DatabaseError::new(
            DatabaseOperation::Migration,
            DatabaseErrorKind::QueryFailed,
            format!("Failed to create schema: {}", e),
        )
    })?;

    tracing::info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delay_doubles() {
        let base = Duration::from_secs(2);
        assert_eq!(retry_delay(base, 1), Duration::from_secs(2));
        assert_eq!(retry_delay(base, 2), Duration::from_secs(4));
        assert_eq!(retry_delay(base, 4), Duration::from_secs(16));
    }

    #[test]
    fn test_retry_delay_saturates() {
        assert_eq!(
            retry_delay(Duration::from_secs(u64::MAX), 10),
            Duration::MAX
        );
    }

    #[test]
    fn test_schema_is_idempotent() {
        for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "not idempotent: {statement}"
            );
        }
    }

    #[test]
    fn test_schema_covers_entity_tables() {
        use crate::models::{Article, Character, Comment, GameSave};
        use crate::repository::Table;

        for table in [Article::TABLE, Comment::TABLE, GameSave::TABLE, Character::TABLE] {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
                "missing table {table}"
            );
        }
    }
}
