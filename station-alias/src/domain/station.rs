//! Station identity and alias records.

use std::fmt;

use super::error::DomainError;

/// Identifier of a charging network/pool.
pub type PoolCode = u32;

/// Composite identity of a charging station: (pool code, station name).
///
/// The station name is the identifier the station reports over OCPP. It is
/// kept exactly as given; `"StationA"` and `"stationa"` are different keys.
///
/// # Examples
///
/// ```
/// use station_alias::domain::StationKey;
///
/// let key = StationKey::new(1, "StationA").unwrap();
/// assert_eq!(key.pool_code(), 1);
/// assert_eq!(key.station_name(), "StationA");
///
/// // An empty name is rejected
/// assert!(StationKey::new(1, "").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationKey {
    pool_code: PoolCode,
    station_name: String,
}

impl StationKey {
    /// Create a key, rejecting an empty station name.
    pub fn new(
        pool_code: PoolCode,
        station_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let station_name = station_name.into();
        if station_name.is_empty() {
            return Err(DomainError::InvalidStationKey("station name must not be empty"));
        }
        Ok(Self {
            pool_code,
            station_name,
        })
    }

    pub fn pool_code(&self) -> PoolCode {
        self.pool_code
    }

    pub fn station_name(&self) -> &str {
        &self.station_name
    }
}

impl fmt::Debug for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationKey({}, {:?})", self.pool_code, self.station_name)
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pool_code, self.station_name)
    }
}

/// A persisted alias: the station it renames and the name to report instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRecord {
    pub key: StationKey,
    pub alias: String,
}

impl AliasRecord {
    /// Create a record, rejecting an empty alias.
    pub fn new(key: StationKey, alias: impl Into<String>) -> Result<Self, DomainError> {
        let alias = alias.into();
        validate_alias(&alias)?;
        Ok(Self { key, alias })
    }
}

/// Check that an alias is usable as a replacement name.
pub fn validate_alias(alias: &str) -> Result<(), DomainError> {
    if alias.is_empty() {
        return Err(DomainError::InvalidAlias("alias must not be empty"));
    }
    Ok(())
}
