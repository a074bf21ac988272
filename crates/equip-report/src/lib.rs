//! Report assembly for stored equipment datasets.
//!
//! [`assemble_report`] reads a dataset through the caller's scope and flattens
//! it into a [`ReportModel`]. Renderers turn the model into a download:
//!
//! - [`TextReportRenderer`]: summary, distribution and record tables
//! - [`JsonReportRenderer`]: the model as pretty JSON
//!
//! Other formats (PDF) implement [`ReportRenderer`].

mod error;
mod model;
mod render;

pub use error::{ReportError, Result};
pub use model::{ParameterUnits, REPORT_TITLE, ReportModel, assemble_report};
pub use render::{
    JsonReportRenderer, ReportRenderer, TEXT_RECORD_LIMIT, TextReportRenderer, report_file_name,
};
