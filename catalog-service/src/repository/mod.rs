//! Resource repositories
//!
//! [`Repository`] is the CRUD contract every entity is served through.
//! [`PgRepository`] implements it once for every [`Table`], so adding an
//! entity means describing its columns rather than writing queries.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_service::models::{Comment, NewComment};
//! use catalog_service::query::FilterPredicate;
//! use catalog_service::repository::{Pagination, PgRepository, Repository, Sort};
//!
//! let repo = PgRepository::<Comment>::new(pool);
//! let page = repo
//!     .find_all(&FilterPredicate::new(), Sort::newest_first(), Pagination::page(1, 10))
//!     .await?;
//! ```

mod error;
mod pagination;
mod postgres;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use pagination::{OrderDirection, Pagination, Sort};
pub use postgres::{IntoColumns, PgRepository, Table};
pub use traits::{Repository, RepositoryResult};
