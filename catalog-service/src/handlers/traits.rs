//! Handler trait for the REST collection pattern
//!
//! Sits between method dispatch and the repository: it owns input
//! validation and turns repository results into HTTP-shaped ones.

use std::future::Future;

use super::error::ApiError;
use super::response::ListResponse;
use crate::query::QueryParams;

/// The five operations of a resource endpoint
pub trait CollectionHandler<Id, Entity, Input>: Send + Sync {
    /// Filtered, paginated list
    fn list(
        &self,
        params: &QueryParams,
    ) -> impl Future<Output = Result<ListResponse<Entity>, ApiError>> + Send;

    /// Single record, `NotFound` when absent
    fn get(&self, id: Id) -> impl Future<Output = Result<Entity, ApiError>> + Send;

    /// Validate required fields then insert
    fn create(&self, input: Input) -> impl Future<Output = Result<Entity, ApiError>> + Send;

    fn update(&self, id: Id, input: Input)
        -> impl Future<Output = Result<Entity, ApiError>> + Send;

    fn delete(&self, id: Id) -> impl Future<Output = Result<(), ApiError>> + Send;
}
