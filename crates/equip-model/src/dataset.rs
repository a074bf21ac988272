use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregates::Aggregates;
use crate::error::ModelError;
use crate::record::EquipmentRecord;
use crate::scope::HistoryScope;

/// Maximum number of datasets kept per history scope.
pub const RETENTION_LIMIT: usize = 5;

/// Opaque dataset identifier, rendered as a hyphenated lowercase UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(Uuid);

impl DatasetId {
    /// Fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for DatasetId {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| ModelError::InvalidDatasetId(value.to_string()))
    }
}

/// One ingested upload: validated records plus cached aggregates.
///
/// Datasets are immutable once created; the store hands them out behind
/// `Arc` so readers share a single copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub owner_scope: HistoryScope,
    pub records: Vec<EquipmentRecord>,
    pub aggregates: Aggregates,
}

impl Dataset {
    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            id: self.id,
            filename: self.filename.clone(),
            uploaded_at: self.uploaded_at,
            owner_scope: self.owner_scope.clone(),
            aggregates: self.aggregates.clone(),
            records_count: self.records.len(),
        }
    }
}

/// History entry: dataset metadata and aggregates without the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: DatasetId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub owner_scope: HistoryScope,
    pub aggregates: Aggregates,
    pub records_count: usize,
}
