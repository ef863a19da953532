//! Method dispatch for resource endpoints
//!
//! Every resource is mounted on a single path and routed by method:
//!
//! | request                | outcome                                  |
//! |------------------------|------------------------------------------|
//! | `GET ?id=<n>`          | 200 record, 404                          |
//! | `GET ?page&limit&...`  | 200 [`ListResponse`]                     |
//! | `POST` body            | 201 record, 400 when required fields lack |
//! | `PUT ?id=<n>` body     | 200 record, 400 without id, 404          |
//! | `DELETE ?id=<n>`       | 204 empty, 400 without id, 404           |
//! | anything else          | 405 with `Allow`                         |

use std::marker::PhantomData;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiOperation};
use super::response::{ListResponse, PaginationMeta};
use super::traits::CollectionHandler;
use crate::models::Resource;
use crate::query::{PageBounds, PageRequest, QueryParams};
use crate::repository::{RepositoryError, Repository, Sort};

/// Serves resource `R` from repository `Repo`
pub struct Collection<R, Repo> {
    repository: Repo,
    bounds: PageBounds,
    _resource: PhantomData<fn() -> R>,
}

impl<R, Repo> Collection<R, Repo> {
    pub fn new(repository: Repo, bounds: PageBounds) -> Self {
        Self {
            repository,
            bounds,
            _resource: PhantomData,
        }
    }
}

impl<R, Repo> CollectionHandler<i64, R, R::Input> for Collection<R, Repo>
where
    R: Resource,
    Repo: Repository<i64, R, R::New, R::Input>,
{
    async fn list(&self, params: &QueryParams) -> Result<ListResponse<R>, ApiError> {
        let page = PageRequest::resolve_within(params.get("page"), params.get("limit"), self.bounds);
        let filter = R::FILTERS
            .build(params)
            .map_err(|e| ApiError::validation(ApiOperation::List, e.to_string()))?;

        // Two independent reads, not one snapshot
        let (data, total) = tokio::try_join!(
            self.repository
                .find_all(&filter, Sort::newest_first(), page.into()),
            self.repository.count(&filter)
        )?;

        Ok(ListResponse::new(data, PaginationMeta::new(page, total)))
    }

    async fn get(&self, id: i64) -> Result<R, ApiError> {
        self.repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ApiError::not_found(ApiOperation::Get, R::MESSAGES.not_found))
    }

    async fn create(&self, input: R::Input) -> Result<R, ApiError> {
        let new = R::prepare_create(input)?;
        Ok(self.repository.create(new).await?)
    }

    async fn update(&self, id: i64, input: R::Input) -> Result<R, ApiError> {
        self.repository
            .update(&id, input)
            .await
            .map_err(resource_error::<R>)
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.repository
            .delete(&id)
            .await
            .map_err(resource_error::<R>)
    }
}

/// Router serving `R` at `path`
pub fn router<R, Repo>(path: &str, repository: Repo, bounds: PageBounds) -> Router
where
    R: Resource + 'static,
    Repo: Repository<i64, R, R::New, R::Input> + 'static,
{
    Router::new()
        .route(path, any(dispatch::<R, Repo>))
        .with_state(Arc::new(Collection::new(repository, bounds)))
}

#[tracing::instrument(skip_all, fields(resource = R::ENTITY, method = %method))]
async fn dispatch<R, Repo>(
    State(collection): State<Arc<Collection<R, Repo>>>,
    method: Method,
    query: Result<Query<QueryParams>, QueryRejection>,
    body: Bytes,
) -> Response
where
    R: Resource + 'static,
    Repo: Repository<i64, R, R::New, R::Input> + 'static,
{
    match handle(collection.as_ref(), &method, query, &body).await {
        Ok(response) => response,
        Err(error) => error.with_entity_type(R::ENTITY).into_response(),
    }
}

async fn handle<R, Repo>(
    collection: &Collection<R, Repo>,
    method: &Method,
    query: Result<Query<QueryParams>, QueryRejection>,
    body: &Bytes,
) -> Result<Response, ApiError>
where
    R: Resource,
    Repo: Repository<i64, R, R::New, R::Input>,
{
    let Query(params) = query
        .map_err(|rejection| ApiError::validation(ApiOperation::Dispatch, rejection.body_text()))?;

    match *method {
        Method::GET => match parse_id::<R>(&params, ApiOperation::Get)? {
            Some(id) => Ok(Json(collection.get(id).await?).into_response()),
            None => Ok(collection.list(&params).await?.into_response()),
        },
        Method::POST => {
            let input = parse_body(body, ApiOperation::Create)?;
            let created = collection.create(input).await?;
            Ok((StatusCode::CREATED, Json(created)).into_response())
        }
        Method::PUT => {
            let id = require_id::<R>(&params, ApiOperation::Update)?;
            let input = parse_body(body, ApiOperation::Update)?;
            Ok(Json(collection.update(id, input).await?).into_response())
        }
        Method::DELETE => {
            let id = require_id::<R>(&params, ApiOperation::Delete)?;
            collection.delete(id).await?;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
        _ => Err(ApiError::method_not_allowed(method)),
    }
}

/// The `id` query parameter, if present
fn parse_id<R: Resource>(
    params: &QueryParams,
    operation: ApiOperation,
) -> Result<Option<i64>, ApiError> {
    params
        .get("id")
        .map(|raw| {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| ApiError::validation(operation, R::MESSAGES.id_invalid))
        })
        .transpose()
}

fn require_id<R: Resource>(params: &QueryParams, operation: ApiOperation) -> Result<i64, ApiError> {
    parse_id::<R>(params, operation)?
        .ok_or_else(|| ApiError::validation(operation, R::MESSAGES.id_required))
}

/// Decode a JSON body, an empty body reads as `{}`
fn parse_body<T: DeserializeOwned>(body: &Bytes, operation: ApiOperation) -> Result<T, ApiError> {
    let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &body[..]
    };
    serde_json::from_slice(raw)
        .map_err(|e| ApiError::validation(operation, format!("Invalid request body: {}", e)))
}

fn resource_error<R: Resource>(err: RepositoryError) -> ApiError {
    if err.is_not_found() {
        ApiError::not_found(err.operation.into(), R::MESSAGES.not_found)
    } else {
        err.into()
    }
}
