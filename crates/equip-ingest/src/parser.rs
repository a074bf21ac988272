//! Equipment CSV parsing.
//!
//! The whole upload is read into memory: aggregates need every row, so there
//! is nothing to gain from streaming records out of the reader.

use std::fmt;

use csv::{ReaderBuilder, StringRecord};

use equip_model::{EquipmentRecord, ModelError};

use crate::columns::{ColumnMap, RequiredColumn};
use crate::error::{IngestError, Result};

/// Records parsed from an upload plus the rows that were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    pub records: Vec<EquipmentRecord>,
    pub rejected: Vec<RejectedRow>,
}

/// A data row that was dropped during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based line number in the upload.
    pub line: u64,
    pub reason: RowRejection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    /// Row ends before a required column.
    TooFewFields { found: usize, expected: usize },
    /// Numeric cell did not parse.
    InvalidNumber { column: &'static str, value: String },
    /// Values parsed but violate a record invariant.
    InvalidRecord(ModelError),
    /// The CSV reader could not split the row.
    Malformed(String),
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields { found, expected } => {
                write!(f, "row has {found} field(s), expected at least {expected}")
            }
            Self::InvalidNumber { column, value } => {
                write!(f, "{column} is not a number: {value:?}")
            }
            Self::InvalidRecord(error) => write!(f, "{error}"),
            Self::Malformed(message) => write!(f, "malformed row: {message}"),
        }
    }
}

/// Parse an upload into validated equipment records.
///
/// Rows with bad values are dropped; the call fails only when the file is
/// unreadable, lacks required columns, or no row survives.
pub fn parse_equipment_csv(bytes: &[u8]) -> Result<Vec<EquipmentRecord>> {
    parse_equipment_csv_detailed(bytes).map(|parsed| parsed.records)
}

/// Like [`parse_equipment_csv`], also returning the rejected rows.
pub fn parse_equipment_csv_detailed(bytes: &[u8]) -> Result<ParsedCsv> {
    let text = decode_text(bytes)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = reader.records();
    let columns = loop {
        match rows.next() {
            None => return Err(IngestError::unreadable("no header row")),
            Some(Err(error)) => {
                return Err(IngestError::unreadable(format!("cannot read header: {error}")));
            }
            Some(Ok(record)) if is_blank(&record) => continue,
            Some(Ok(record)) => break ColumnMap::resolve(record.iter())?,
        }
    };

    let mut records = Vec::new();
    let mut rejected = Vec::new();
    for row in rows {
        let row = match row {
            Ok(row) => row,
            Err(error) => {
                let line = error.position().map_or(0, csv::Position::line);
                rejected.push(RejectedRow {
                    line,
                    reason: RowRejection::Malformed(error.to_string()),
                });
                continue;
            }
        };
        if is_blank(&row) {
            continue;
        }
        let line = row.position().map_or(0, csv::Position::line);
        match parse_row(&row, &columns) {
            Ok(record) => records.push(record),
            Err(reason) => {
                tracing::debug!(line, %reason, "dropping equipment row");
                rejected.push(RejectedRow { line, reason });
            }
        }
    }

    if records.is_empty() {
        return Err(IngestError::EmptyOrInvalidFile {
            rejected: rejected.len(),
        });
    }
    Ok(ParsedCsv { records, rejected })
}

fn decode_text(bytes: &[u8]) -> Result<&str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::unreadable("file is empty"));
    }
    std::str::from_utf8(bytes).map_err(|error| {
        IngestError::unreadable(format!(
            "not valid UTF-8 text (invalid byte at offset {})",
            error.valid_up_to()
        ))
    })
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|value| value.trim().is_empty())
}

fn parse_row(
    row: &StringRecord,
    columns: &ColumnMap,
) -> std::result::Result<EquipmentRecord, RowRejection> {
    if row.len() < columns.min_width() {
        return Err(RowRejection::TooFewFields {
            found: row.len(),
            expected: columns.min_width(),
        });
    }
    let cell = |idx: usize| row.get(idx).map(str::trim).unwrap_or("");
    let number = |idx: usize, column: RequiredColumn| {
        let value = cell(idx);
        value
            .parse::<f64>()
            .map_err(|_| RowRejection::InvalidNumber {
                column: column.label(),
                value: value.to_string(),
            })
    };

    let flowrate = number(columns.flowrate, RequiredColumn::Flowrate)?;
    let pressure = number(columns.pressure, RequiredColumn::Pressure)?;
    let temperature = number(columns.temperature, RequiredColumn::Temperature)?;
    EquipmentRecord::new(
        cell(columns.equipment_name),
        cell(columns.equipment_type),
        flowrate,
        pressure,
        temperature,
    )
    .map_err(RowRejection::InvalidRecord)
}

/// Reject file names that do not carry a `.csv` extension.
pub fn validate_upload_name(filename: &str) -> Result<()> {
    let trimmed = filename.trim();
    let is_csv = trimmed.len() > 4
        && trimmed
            .get(trimmed.len() - 4..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".csv"));
    if is_csv {
        Ok(())
    } else {
        Err(IngestError::InvalidFileType {
            filename: filename.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_before_header() {
        let csv = "\u{feff}Equipment Name,Type,Flowrate,Pressure,Temperature\nP-1,Pump,1,2,3\n";
        let records = parse_equipment_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn skips_blank_lines_before_header_and_between_rows() {
        let csv = "\n,,,,\nEquipment Name,Type,Flowrate,Pressure,Temperature\nP-1,Pump,1,2,3\n,,,,\nP-2,Pump,4,5,6\n";
        let parsed = parse_equipment_csv_detailed(csv.as_bytes()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.rejected.is_empty());
    }

    #[test]
    fn records_line_numbers_of_rejected_rows() {
        let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\nP-1,Pump,1,2,3\nP-2,Pump,abc,2,3\nP-3,Pump\n";
        let parsed = parse_equipment_csv_detailed(csv.as_bytes()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.rejected.len(), 2);
        assert_eq!(parsed.rejected[0].line, 3);
        assert_eq!(
            parsed.rejected[0].reason,
            RowRejection::InvalidNumber {
                column: "Flowrate",
                value: "abc".to_string(),
            }
        );
        assert_eq!(parsed.rejected[1].line, 4);
        assert!(matches!(
            parsed.rejected[1].reason,
            RowRejection::TooFewFields {
                found: 2,
                expected: 5
            }
        ));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\nP-1,Pump,NaN,2,3\nP-2,Pump,1,inf,3\nP-3,Pump,1,2,3\n";
        let parsed = parse_equipment_csv_detailed(csv.as_bytes()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.rejected.len(), 2);
    }

    #[test]
    fn upload_name_must_be_csv() {
        assert!(validate_upload_name("plant.csv").is_ok());
        assert!(validate_upload_name("PLANT.CSV").is_ok());
        assert!(validate_upload_name("plant.xlsx").is_err());
        assert!(validate_upload_name(".csv").is_err());
        assert!(validate_upload_name("").is_err());
    }
}
