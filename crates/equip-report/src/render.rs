//! Report renderers.
//!
//! A renderer turns a [`ReportModel`] into bytes. PDF output lives outside this
//! crate; anything implementing [`ReportRenderer`] can be plugged in.

use std::io::Write;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{CellAlignment, Row, Table};

use crate::error::{ReportError, Result};
use crate::model::ReportModel;

/// Records shown in the text report's record table.
pub const TEXT_RECORD_LIMIT: usize = 50;

/// Output format for a [`ReportModel`].
pub trait ReportRenderer {
    /// MIME type of the rendered output.
    fn content_type(&self) -> &'static str;

    /// File extension without the leading dot.
    fn file_extension(&self) -> &'static str;

    fn render(&self, report: &ReportModel, out: &mut dyn Write) -> Result<()>;

    fn render_to_vec(&self, report: &ReportModel) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.render(report, &mut buffer)?;
        Ok(buffer)
    }
}

/// Download name for a rendered report, e.g. `equipment_report_<id>.txt`.
pub fn report_file_name(report: &ReportModel, renderer: &dyn ReportRenderer) -> String {
    format!(
        "equipment_report_{}.{}",
        report.dataset_id,
        renderer.file_extension()
    )
}

/// Plain-text report laid out as tables.
#[derive(Debug, Clone, Copy)]
pub struct TextReportRenderer {
    record_limit: usize,
}

impl Default for TextReportRenderer {
    fn default() -> Self {
        Self {
            record_limit: TEXT_RECORD_LIMIT,
        }
    }
}

impl TextReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show at most `limit` records in the record table.
    pub fn with_record_limit(mut self, limit: usize) -> Self {
        self.record_limit = limit;
        self
    }

    fn build(&self, report: &ReportModel) -> String {
        let units = report.units;
        let mut text = String::new();
        text.push_str(report.title);
        text.push_str("\n\n");
        text.push_str(&format!("File: {}\n", report.filename));
        text.push_str(&format!("Dataset: {}\n", report.dataset_id));
        text.push_str(&format!(
            "Upload Date: {}\n",
            report.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        text.push_str(&format!(
            "Generated: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        let mut summary = report_table(vec!["Metric", "Value"]);
        summary.add_row(vec![
            "Total Equipment Count".to_string(),
            report.total_count.to_string(),
        ]);
        summary.add_row(vec![
            "Average Flowrate".to_string(),
            format!("{:.2} {}", report.avg_flowrate, units.flowrate),
        ]);
        summary.add_row(vec![
            "Average Pressure".to_string(),
            format!("{:.2} {}", report.avg_pressure, units.pressure),
        ]);
        summary.add_row(vec![
            "Average Temperature".to_string(),
            format!("{:.2} {}", report.avg_temperature, units.temperature),
        ]);
        align_column(&mut summary, 1, CellAlignment::Right);
        text.push_str(&format!("\nSummary Statistics\n{summary}\n"));

        let mut distribution = report_table(vec!["Equipment Type", "Count"]);
        for entry in &report.type_distribution {
            distribution.add_row(vec![entry.equipment_type.clone(), entry.count.to_string()]);
        }
        align_column(&mut distribution, 1, CellAlignment::Right);
        text.push_str(&format!("\nEquipment Type Distribution\n{distribution}\n"));

        text.push_str("\nEquipment Records\n");
        if report.records.is_empty() {
            text.push_str("No records\n");
            return text;
        }
        if report.records.len() > self.record_limit {
            text.push_str(&format!(
                "Showing first {} of {} records\n",
                self.record_limit,
                report.records.len()
            ));
        }
        let mut records = report_table(vec![
            "Name".to_string(),
            "Type".to_string(),
            format!("Flowrate ({})", units.flowrate),
            format!("Pressure ({})", units.pressure),
            format!("Temperature ({})", units.temperature),
        ]);
        for record in report.records.iter().take(self.record_limit) {
            records.add_row(vec![
                record.equipment_name().to_string(),
                record.equipment_type().to_string(),
                format!("{:.1}", record.flowrate()),
                format!("{:.1}", record.pressure()),
                format!("{:.1}", record.temperature()),
            ]);
        }
        for column in 2..5 {
            align_column(&mut records, column, CellAlignment::Right);
        }
        text.push_str(&format!("{records}\n"));
        text
    }
}

impl ReportRenderer for TextReportRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, report: &ReportModel, out: &mut dyn Write) -> Result<()> {
        out.write_all(self.build(report).as_bytes())
            .map_err(|e| ReportError::write("text", e))
    }
}

/// Pretty-printed JSON of the full model; means are not rounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportRenderer;

impl ReportRenderer for JsonReportRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &ReportModel, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, report).map_err(|e| {
            if e.is_io() {
                ReportError::write("json", e.into())
            } else {
                ReportError::Json(e)
            }
        })?;
        writeln!(out).map_err(|e| ReportError::write("json", e))
    }
}

fn report_table(header: impl Into<Row>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(header);
    table
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
