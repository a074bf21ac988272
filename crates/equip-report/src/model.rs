//! Flat report model built from one stored dataset.

use chrono::{DateTime, Utc};
use serde::Serialize;

use equip_model::{Dataset, DatasetId, EquipmentRecord, HistoryScope, TypeDistribution};
use equip_store::DatasetStore;

use crate::error::{ReportError, Result};

/// Heading used by every rendered report.
pub const REPORT_TITLE: &str = "Chemical Equipment Analysis Report";

/// Display units of the three measured parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterUnits {
    pub flowrate: &'static str,
    pub pressure: &'static str,
    pub temperature: &'static str,
}

impl Default for ParameterUnits {
    fn default() -> Self {
        Self {
            flowrate: "L/min",
            pressure: "bar",
            temperature: "°C",
        }
    }
}

/// Everything a renderer needs, with no reference back to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportModel {
    pub title: &'static str,
    pub dataset_id: DatasetId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub total_count: usize,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    pub units: ParameterUnits,
    pub type_distribution: TypeDistribution,
    pub records: Vec<EquipmentRecord>,
}

impl ReportModel {
    pub fn from_dataset(dataset: &Dataset, generated_at: DateTime<Utc>) -> Self {
        let aggregates = &dataset.aggregates;
        Self {
            title: REPORT_TITLE,
            dataset_id: dataset.id,
            filename: dataset.filename.clone(),
            uploaded_at: dataset.uploaded_at,
            generated_at,
            total_count: aggregates.total_count,
            avg_flowrate: aggregates.avg_flowrate,
            avg_pressure: aggregates.avg_pressure,
            avg_temperature: aggregates.avg_temperature,
            units: ParameterUnits::default(),
            type_distribution: aggregates.type_distribution.clone(),
            records: dataset.records.clone(),
        }
    }
}

/// Build the report for dataset `id` as visible from `scope`.
///
/// A dataset evicted between listing and this call is an expected race and
/// only logged at debug level.
pub fn assemble_report(
    store: &DatasetStore,
    scope: &HistoryScope,
    id: DatasetId,
) -> Result<ReportModel> {
    let dataset = store.get(scope, id).map_err(|error| {
        let error = ReportError::from(error);
        if error.is_not_found() {
            tracing::debug!(scope = %scope, dataset_id = %id, "report requested for missing dataset");
        }
        error
    })?;
    let report = ReportModel::from_dataset(&dataset, Utc::now());
    tracing::debug!(
        scope = %scope,
        dataset_id = %id,
        records = report.records.len(),
        "report assembled"
    );
    Ok(report)
}
