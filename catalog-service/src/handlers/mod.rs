//! Request Dispatcher
//!
//! Each resource endpoint is a single path routed by HTTP method onto a
//! [`CollectionHandler`]. [`Collection`] implements it once for every
//! [`Resource`](crate::models::Resource) over any
//! [`Repository`](crate::repository::Repository).
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_service::handlers::router;
//! use catalog_service::models::Comment;
//! use catalog_service::query::PageBounds;
//! use catalog_service::repository::PgRepository;
//!
//! let app = router::<Comment, _>(
//!     "/api/v1/content/comment",
//!     PgRepository::<Comment>::new(pool),
//!     PageBounds::default(),
//! );
//! ```

mod dispatch;
mod error;
mod response;
mod traits;

pub use dispatch::{router, Collection};
pub use error::{
    ApiError, ApiErrorKind, ApiOperation, ErrorBody, ALLOWED_METHODS, INTERNAL_ERROR_MESSAGE,
};
pub use response::{ListResponse, PaginationMeta};
pub use traits::CollectionHandler;
