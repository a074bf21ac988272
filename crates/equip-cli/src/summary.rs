use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use equip_model::{Aggregates, Dataset, DatasetSummary, EquipmentRecord};

pub fn print_dataset(dataset: &Dataset, with_records: bool) {
    print_header(&dataset.summary());
    print_aggregates(&dataset.aggregates);
    if with_records {
        print_records(&dataset.records);
    }
}

pub fn print_summary(summary: &DatasetSummary) {
    print_header(summary);
    print_aggregates(&summary.aggregates);
}

pub fn print_history(history: &[DatasetSummary]) {
    if history.is_empty() {
        println!("No uploads yet.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("File"),
        header_cell("Uploaded (UTC)"),
        header_cell("Records"),
        header_cell("Avg Flowrate"),
        header_cell("Avg Pressure"),
        header_cell("Avg Temperature"),
    ]);
    apply_table_style(&mut table);
    for column in 3..7 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for summary in history {
        let aggregates = &summary.aggregates;
        table.add_row(vec![
            dim_cell(summary.id),
            Cell::new(&summary.filename)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.uploaded_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(summary.records_count),
            Cell::new(format!("{:.2}", aggregates.avg_flowrate)),
            Cell::new(format!("{:.2}", aggregates.avg_pressure)),
            Cell::new(format!("{:.2}", aggregates.avg_temperature)),
        ]);
    }
    println!("{table}");
}

pub fn print_deleted(summary: &DatasetSummary) {
    println!("Deleted \"{}\" ({})", summary.filename, summary.id);
}

fn print_header(summary: &DatasetSummary) {
    println!("Dataset: {}", summary.id);
    println!("File: {}", summary.filename);
    println!(
        "Uploaded: {} UTC",
        summary.uploaded_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("Scope: {}", summary.owner_scope);
}

fn print_aggregates(aggregates: &Aggregates) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Total Equipment Count"),
        Cell::new(aggregates.total_count).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Average Flowrate"),
        Cell::new(format!("{:.2} L/min", aggregates.avg_flowrate)),
    ]);
    table.add_row(vec![
        Cell::new("Average Pressure"),
        Cell::new(format!("{:.2} bar", aggregates.avg_pressure)),
    ]);
    table.add_row(vec![
        Cell::new("Average Temperature"),
        Cell::new(format!("{:.2} °C", aggregates.avg_temperature)),
    ]);
    println!("{table}");

    if aggregates.type_distribution.is_empty() {
        return;
    }
    let mut types = Table::new();
    types.set_header(vec![header_cell("Equipment Type"), header_cell("Count")]);
    apply_table_style(&mut types);
    align_column(&mut types, 1, CellAlignment::Right);
    for entry in &aggregates.type_distribution {
        types.add_row(vec![
            Cell::new(&entry.equipment_type).fg(Color::Green),
            Cell::new(entry.count),
        ]);
    }
    println!("{types}");
}

fn print_records(records: &[EquipmentRecord]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Equipment Name"),
        header_cell("Type"),
        header_cell("Flowrate (L/min)"),
        header_cell("Pressure (bar)"),
        header_cell("Temperature (°C)"),
    ]);
    apply_records_style(&mut table);
    for column in 2..5 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for record in records {
        table.add_row(vec![
            Cell::new(record.equipment_name()),
            Cell::new(record.equipment_type()),
            Cell::new(format!("{:.1}", record.flowrate())),
            Cell::new(format!("{:.1}", record.pressure())),
            Cell::new(format!("{:.1}", record.temperature())),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_records_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
