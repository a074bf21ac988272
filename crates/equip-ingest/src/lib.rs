//! Equipment CSV ingestion.
//!
//! Turns raw upload bytes into validated [`equip_model::EquipmentRecord`]s.
//!
//! # Rules
//!
//! - **Decoding**: input must be UTF-8 (a leading BOM is ignored)
//! - **Header**: the first non-blank row; required columns are matched
//!   case-insensitively in any order
//! - **Rows**: a row with a bad number or an empty name/type is dropped, not
//!   the whole file; the upload fails only when no row survives
//!
//! # Example
//!
//! ```ignore
//! use equip_ingest::parse_equipment_csv;
//!
//! let records = parse_equipment_csv(b"Equipment Name,Type,Flowrate,Pressure,Temperature\nP-1,Pump,1,2,3\n")?;
//! assert_eq!(records.len(), 1);
//! ```

mod columns;
mod error;
mod parser;

// === Error Types ===
pub use error::{IngestError, Result};

// === Columns ===
pub use columns::{ColumnMap, RequiredColumn, normalize_header};

// === Parsing ===
pub use parser::{
    ParsedCsv, RejectedRow, RowRejection, parse_equipment_csv, parse_equipment_csv_detailed,
    validate_upload_name,
};
