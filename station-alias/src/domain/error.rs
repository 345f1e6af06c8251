//! Domain error types.
//!
//! These errors represent validation failures on station keys and aliases.
//! They are distinct from storage and authentication errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// The (pool code, station name) pair is not a usable key
    #[error("invalid station key: {0}")]
    InvalidStationKey(&'static str),

    /// The alias cannot replace a station name
    #[error("invalid alias: {0}")]
    InvalidAlias(&'static str),
}
