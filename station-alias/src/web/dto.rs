//! Data transfer objects for web responses.

use serde::{Deserialize, Serialize};

use crate::domain::{AliasRecord, PoolCode, StationKey};

/// A station and the name reported for it.
///
/// `station-alias` is always populated: for a station without an alias it
/// repeats the station name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AliasDump {
    pub pool_code: PoolCode,
    pub station_name: String,
    pub station_alias: String,
}

impl AliasDump {
    /// Dump a station with the name resolved for it.
    pub fn resolved(key: &StationKey, effective_name: String) -> Self {
        Self {
            pool_code: key.pool_code(),
            station_name: key.station_name().to_string(),
            station_alias: effective_name,
        }
    }
}

impl From<AliasRecord> for AliasDump {
    fn from(record: AliasRecord) -> Self {
        Self::resolved(&record.key, record.alias)
    }
}

/// Plain message body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
