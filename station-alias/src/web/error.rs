//! Application error type and its HTTP mapping.

use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

use crate::alias::ResolverError;
use crate::auth::AuthError;
use crate::domain::DomainError;

use super::dto::ErrorResponse;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Unauthorized(AuthError),
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized(e)
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        let message = e.body_text();
        if e.status().is_server_error() {
            AppError::Internal { message }
        } else {
            AppError::BadRequest { message }
        }
    }
}

impl From<ResolverError> for AppError {
    fn from(e: ResolverError) -> Self {
        match e {
            ResolverError::Conflict(_) => AppError::Conflict {
                message: e.to_string(),
            },
            ResolverError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            ResolverError::Invalid(inner) => inner.into(),
            ResolverError::Storage(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized(e) => (StatusCode::UNAUTHORIZED, e.to_string()),
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            debug!(%status, "{message}");
        }

        let mut response = (status, Json(ErrorResponse { detail: message })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Basic"));
        }
        response
    }
}
