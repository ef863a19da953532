//! Request query handling for list endpoints
//!
//! Turns the flat query string of a list request into the two things a
//! repository needs:
//!
//! - a [`FilterPredicate`] built from an entity's [`FilterSchema`] allow-list
//! - a [`PageRequest`] with `page >= 1` and `limit` clamped into `[1, max]`
//!
//! # Example
//!
//! ```rust
//! use catalog_service::query::{FilterKey, FilterSchema, PageRequest, QueryParams};
//!
//! const SCHEMA: FilterSchema = FilterSchema::new(&[
//!     FilterKey::text("content", "content"),
//!     FilterKey::id("articleId", "article_id"),
//! ]);
//!
//! let params = QueryParams::from_pairs([("articleId", "7"), ("page", "0"), ("limit", "1000")]);
//! let filter = SCHEMA.build(&params).unwrap();
//! assert_eq!(filter.len(), 1);
//!
//! let page = PageRequest::resolve(params.get("page"), params.get("limit"));
//! assert_eq!((page.page(), page.limit()), (1, 50));
//! ```

mod filter;
mod pagination;
mod params;
mod value;

pub use filter::{Condition, Constraint, FilterError, FilterKey, FilterPredicate, FilterSchema};
pub use pagination::{PageBounds, PageRequest, DEFAULT_LIMIT, MAX_LIMIT};
pub use params::QueryParams;
pub use value::Value;
