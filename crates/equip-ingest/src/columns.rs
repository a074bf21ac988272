//! Required column definitions and header resolution.

use crate::error::{IngestError, Result};

/// Columns every equipment upload must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredColumn {
    EquipmentName,
    Type,
    Flowrate,
    Pressure,
    Temperature,
}

impl RequiredColumn {
    /// All required columns in canonical order.
    pub const ALL: [Self; 5] = [
        Self::EquipmentName,
        Self::Type,
        Self::Flowrate,
        Self::Pressure,
        Self::Temperature,
    ];

    /// Canonical header label.
    pub fn label(self) -> &'static str {
        match self {
            Self::EquipmentName => "Equipment Name",
            Self::Type => "Type",
            Self::Flowrate => "Flowrate",
            Self::Pressure => "Pressure",
            Self::Temperature => "Temperature",
        }
    }

    /// Normalized header spellings accepted for this column.
    fn accepted(self) -> &'static [&'static str] {
        match self {
            Self::EquipmentName => &["equipment name"],
            Self::Type => &["type", "equipment type"],
            Self::Flowrate => &["flowrate", "flow rate"],
            Self::Pressure => &["pressure"],
            Self::Temperature => &["temperature"],
        }
    }

    pub fn matches(self, header: &str) -> bool {
        let normalized = normalize_header(header);
        self.accepted().contains(&normalized.as_str())
    }
}

/// Normalize a header cell for comparison.
///
/// Strips a BOM and surrounding whitespace, lowercases, maps `_` and `-` to
/// spaces, and collapses runs of whitespace.
pub fn normalize_header(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .trim_matches('\u{feff}')
        .chars()
        .map(|ch| if ch == '_' || ch == '-' { ' ' } else { ch })
        .collect();
    cleaned
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Position of each required column within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub equipment_name: usize,
    pub equipment_type: usize,
    pub flowrate: usize,
    pub pressure: usize,
    pub temperature: usize,
}

impl ColumnMap {
    /// Resolve required columns; the first matching header wins.
    pub fn resolve<'a, I>(headers: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found: [Option<usize>; 5] = [None; 5];
        for (idx, header) in headers.into_iter().enumerate() {
            for (slot, column) in RequiredColumn::ALL.iter().enumerate() {
                if found[slot].is_none() && column.matches(header) {
                    found[slot] = Some(idx);
                }
            }
        }

        let missing: Vec<String> = RequiredColumn::ALL
            .iter()
            .zip(found.iter())
            .filter(|(_, position)| position.is_none())
            .map(|(column, _)| column.label().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns { columns: missing });
        }

        let [equipment_name, equipment_type, flowrate, pressure, temperature] =
            found.map(Option::unwrap_or_default);
        Ok(Self {
            equipment_name,
            equipment_type,
            flowrate,
            pressure,
            temperature,
        })
    }

    /// Smallest row width that holds every required column.
    pub fn min_width(&self) -> usize {
        [
            self.equipment_name,
            self.equipment_type,
            self.flowrate,
            self.pressure,
            self.temperature,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_space_and_separators() {
        assert_eq!(normalize_header("  Equipment   Name "), "equipment name");
        assert_eq!(normalize_header("\u{feff}EQUIPMENT_NAME"), "equipment name");
        assert_eq!(normalize_header("flow-rate"), "flow rate");
    }

    #[test]
    fn resolves_any_column_order() {
        let headers = ["temperature", "TYPE", "Pressure", "equipment name", "FlowRate"];
        let map = ColumnMap::resolve(headers).unwrap();
        assert_eq!(map.temperature, 0);
        assert_eq!(map.equipment_type, 1);
        assert_eq!(map.pressure, 2);
        assert_eq!(map.equipment_name, 3);
        assert_eq!(map.flowrate, 4);
        assert_eq!(map.min_width(), 5);
    }

    #[test]
    fn reports_every_missing_column_in_canonical_order() {
        let err = ColumnMap::resolve(["Equipment Name", "Type"]).unwrap_err();
        assert_eq!(
            err,
            IngestError::MissingColumns {
                columns: vec![
                    "Flowrate".to_string(),
                    "Pressure".to_string(),
                    "Temperature".to_string(),
                ],
            }
        );
    }
}
