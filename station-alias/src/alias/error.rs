//! Alias resolver error types.

use crate::domain::{DomainError, StationKey};
use crate::store::StoreError;

/// Errors from alias resolver operations.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// The station already has an alias
    #[error("station {} already has an alias", .0.station_name())]
    Conflict(StationKey),

    /// The station has no alias to change
    #[error("station {} not found", .0.station_name())]
    NotFound(StationKey),

    /// The store rejected or failed the operation
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),

    /// The request named an unusable key or alias
    #[error(transparent)]
    Invalid(#[from] DomainError),
}
