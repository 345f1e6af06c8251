//! Request extractors.

use axum::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::auth::{AuthError, Principal, parse_basic};

use super::error::AppError;
use super::state::AppState;

/// Caller that passed the credential gate.
///
/// Rejects the request with 401 if the `Authorization` header is missing,
/// malformed, or carries credentials the gate does not accept.
#[derive(Debug)]
pub struct Authenticated(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?;
        let value = header.to_str().map_err(|_| AuthError::Malformed)?;
        let credentials = parse_basic(value)?;
        let principal = state.gate.verify(&credentials)?;
        Ok(Authenticated(principal))
    }
}

/// Path parameters, rejected through [`AppError`] so a malformed segment
/// gets the same JSON error body as every other failure.
#[derive(Debug)]
pub struct StationPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for StationPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(StationPath(value))
    }
}
