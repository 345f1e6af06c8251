//! Domain layer - station identity and alias records

pub mod error;
pub mod station;

pub use error::DomainError;
pub use station::{AliasRecord, PoolCode, StationKey, validate_alias};
