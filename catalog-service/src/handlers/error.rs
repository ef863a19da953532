//! API error types and the status code table
//!
//! Every request failure ends up as an [`ApiError`]. Its kind alone decides
//! the status code:
//!
//! | kind               | status |
//! |--------------------|--------|
//! | `Validation`       | 400    |
//! | `NotFound`         | 404    |
//! | `MethodNotAllowed` | 405    |
//! | `Internal`         | 500    |
//!
//! ```rust
//! use axum::http::StatusCode;
//! use catalog_service::handlers::{ApiError, ApiErrorKind, ApiOperation};
//!
//! let error = ApiError::not_found(ApiOperation::Get, "Comment not found");
//! assert_eq!(error.kind.status_code(), StatusCode::NOT_FOUND);
//! ```

use std::fmt;

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

/// Methods a resource endpoint accepts, as sent in the `Allow` header
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

/// Body sent for every 500, whatever the cause
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
    /// Method routing, before any operation is chosen
    Dispatch,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Dispatch => write!(f, "dispatch"),
        }
    }
}

impl From<RepositoryOperation> for ApiOperation {
    fn from(op: RepositoryOperation) -> Self {
        match op {
            RepositoryOperation::FindById => Self::Get,
            RepositoryOperation::FindAll | RepositoryOperation::Count => Self::List,
            RepositoryOperation::Create => Self::Create,
            RepositoryOperation::Update => Self::Update,
            RepositoryOperation::Delete => Self::Delete,
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Missing or malformed input
    Validation,
    /// No record matched an identity-scoped operation
    NotFound,
    /// Unsupported HTTP method
    MethodNotAllowed,
    /// Anything else, including every storage failure
    Internal,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::MethodNotAllowed => write!(f, "method_not_allowed"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

impl ApiErrorKind {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub operation: ApiOperation,
    pub kind: ApiErrorKind,
    /// Client-facing message
    pub message: String,
    /// Underlying failure, logged and never sent to the client
    pub cause: Option<String>,
    pub entity_type: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            cause: None,
            entity_type: None,
        }
    }

    pub fn validation(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::Validation, message)
    }

    pub fn not_found(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::NotFound, message)
    }

    pub fn method_not_allowed(method: &Method) -> Self {
        Self::new(
            ApiOperation::Dispatch,
            ApiErrorKind::MethodNotAllowed,
            format!("Method {} Not Allowed", method),
        )
    }

    /// A 500 whose `cause` is only logged
    pub fn internal(operation: ApiOperation, cause: impl Into<String>) -> Self {
        Self {
            cause: Some(cause.into()),
            ..Self::new(operation, ApiErrorKind::Internal, INTERNAL_ERROR_MESSAGE)
        }
    }

    #[must_use]
    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(cause) = &self.cause {
            write!(f, " ({})", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// `{ "error": "..." }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        match self.kind {
            ApiErrorKind::Internal => tracing::error!(
                operation = %self.operation,
                entity_type = ?self.entity_type,
                cause = ?self.cause,
                "Request failed"
            ),
            ApiErrorKind::MethodNotAllowed => tracing::warn!(
                operation = %self.operation,
                entity_type = ?self.entity_type,
                "{}", self.message
            ),
            ApiErrorKind::Validation | ApiErrorKind::NotFound => tracing::debug!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                status = status.as_u16(),
                "Request rejected"
            ),
        }

        if self.kind == ApiErrorKind::MethodNotAllowed {
            return (status, [(header::ALLOW, ALLOWED_METHODS)], self.message).into_response();
        }

        (status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = ApiOperation::from(err.operation);
        let entity_type = err.entity_type.clone();

        let error = match err.kind {
            RepositoryErrorKind::NotFound => Self::not_found(operation, err.message),
            RepositoryErrorKind::ValidationFailed => Self::validation(operation, err.message),
            RepositoryErrorKind::ConstraintViolation
            | RepositoryErrorKind::ConnectionFailed
            | RepositoryErrorKind::Timeout
            | RepositoryErrorKind::DatabaseError => Self::internal(operation, err.to_string()),
        };

        match entity_type {
            Some(entity_type) => error.with_entity_type(entity_type),
            None => error,
        }
    }
}
