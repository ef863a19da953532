//! # catalog-service
//!
//! REST backend for a game and article catalogue. Comments, game save files,
//! characters and articles are each served from a single path, dispatched
//! by HTTP method onto a PostgreSQL-backed repository.
//!
//! ## Features
//!
//! - **Uniform resource API**: `GET` lists or fetches by `?id=`, `POST` creates,
//!   `PUT ?id=` updates, `DELETE ?id=` removes
//! - **Typed filters**: per-resource allow-lists of equality, substring,
//!   numeric range and date range constraints, validated before storage
//! - **Pagination**: clamped `page` / `limit` with a `{data, pagination}` envelope
//! - **Middleware stack**: request ID tracking, panic recovery, body size limits,
//!   timeouts, compression and CORS
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown**: SIGTERM and SIGINT drain in-flight requests
//!
//! ## Example
//!
//! ```rust,no_run
//! use catalog_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let Some(database) = config.database.clone() else {
//!         return Err(Error::Internal("database.url is not configured".into()));
//!     };
//!     let pool = create_pool(&database).await?;
//!     let state = AppState::new(config.clone(), pool);
//!
//!     let app = health::routes()
//!         .with_state(state.clone())
//!         .merge(routes::api(&state));
//!
//!     Server::new(config).serve(app).await
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod query;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, DatabaseConfig, MiddlewareConfig, PaginationConfig};
    pub use crate::database::create_pool;
    pub use crate::error::{DatabaseError, DatabaseErrorKind, DatabaseOperation, Error, Result};
    pub use crate::handlers::{ApiError, ApiErrorKind, CollectionHandler, ListResponse};
    pub use crate::health;
    pub use crate::models::{Article, Character, Comment, GameSave, Resource};
    pub use crate::observability::init_tracing;
    pub use crate::query::{FilterPredicate, PageBounds, PageRequest, QueryParams};
    pub use crate::repository::{PgRepository, Repository, RepositoryError};
    pub use crate::routes;
    pub use crate::server::Server;
    pub use crate::state::AppState;

    pub use axum::Router;
}
