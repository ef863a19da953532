//! Repository trait definition
//!
//! Uses return-position `impl Trait` in traits, so implementations write
//! plain `async fn` and no boxing is involved.

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::{Pagination, Sort};
use crate::query::FilterPredicate;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// CRUD access to one entity kind
///
/// Each method is a single storage operation. None of them coordinate
/// transactions, so a `find_all` and a `count` issued together may observe
/// different snapshots.
///
/// # Type Parameters
///
/// - `Id`: identity of the entity
/// - `Entity`: the persisted record
/// - `Create`: validated payload for a new record
/// - `Update`: partial payload, `None` fields are left unchanged
pub trait Repository<Id, Entity, Create, Update>: Send + Sync {
    /// Find an entity by identity
    ///
    /// Absence is `Ok(None)`, never an error.
    fn find_by_id(&self, id: &Id) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;

    /// Entities matching `filter`, ordered by `sort`, windowed by `pagination`
    fn find_all(
        &self,
        filter: &FilterPredicate,
        sort: Sort,
        pagination: Pagination,
    ) -> impl Future<Output = RepositoryResult<Vec<Entity>>> + Send;

    /// Total number of entities matching `filter`, ignoring pagination
    fn count(&self, filter: &FilterPredicate)
        -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Insert a new entity and return it with generated fields
    fn create(&self, data: Create) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// `NotFound` kind if no entity has this identity.
    fn update(
        &self,
        id: &Id,
        data: Update,
    ) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Hard delete
    ///
    /// # Errors
    ///
    /// `NotFound` kind if no entity has this identity.
    fn delete(&self, id: &Id) -> impl Future<Output = RepositoryResult<()>> + Send;
}
