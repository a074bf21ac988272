//! Data model for uploaded equipment datasets.
//!
//! - [`EquipmentRecord`]: one validated CSV row
//! - [`Aggregates`] / [`TypeDistribution`]: statistics cached per dataset
//! - [`Dataset`] / [`DatasetSummary`]: stored uploads and their history entries
//! - [`HistoryScope`]: the user-or-anonymous partition datasets live in

pub mod aggregates;
pub mod dataset;
pub mod error;
pub mod record;
pub mod scope;

pub use aggregates::{Aggregates, TypeCount, TypeDistribution};
pub use dataset::{Dataset, DatasetId, DatasetSummary, RETENTION_LIMIT};
pub use error::{ModelError, Result};
pub use record::EquipmentRecord;
pub use scope::{HistoryScope, UserId};
