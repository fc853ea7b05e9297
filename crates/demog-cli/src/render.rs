//! Terminal tables for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use demog_map::JoinReport;
use demog_model::{PeriodSeries, SourceRegistry};
use demog_store::{CatalogEntry, LoadSummary, any_to_string};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(headers.iter().map(|label| header_cell(label)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    table
}

pub fn sources_table(registry: &SourceRegistry) -> Table {
    let mut table = new_table(&["Source", "File", "Header row", "Sheet", "Table"]);
    for spec in registry.iter() {
        table.add_row(vec![
            Cell::new(spec.id),
            Cell::new(&spec.file_name),
            Cell::new(spec.header_row),
            spec.sheet
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&spec.table),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    table
}

pub fn catalog_table<'a, I>(tables: I) -> Table
where
    I: IntoIterator<Item = (&'a str, &'a CatalogEntry)>,
{
    let mut table = new_table(&["Table", "State", "Rows", "Columns", "From", "Updated"]);
    for (name, entry) in tables {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(entry.state),
            Cell::new(entry.rows),
            Cell::new(entry.columns.len()),
            Cell::new(&entry.provenance),
            dim_cell(entry.updated_at.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table
}

/// First `limit` rows of a frame; nulls render as `-`.
pub fn frame_table(df: &DataFrame, limit: usize) -> Table {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let headers: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut table = new_table(&headers);
    for idx in 0..df.height().min(limit) {
        let row: Vec<Cell> = df
            .get_columns()
            .iter()
            .map(|column| match column.get(idx).unwrap_or(AnyValue::Null) {
                AnyValue::Null => dim_cell("-"),
                value => Cell::new(any_to_string(value)),
            })
            .collect();
        table.add_row(row);
    }
    table
}

pub fn series_table(series: &PeriodSeries) -> Table {
    let mut table = new_table(&["Period", "Value"]);
    for (key, value) in series.iter() {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

/// Tab-separated `period<TAB>value` lines for piping into other tools.
pub fn series_plain(series: &PeriodSeries) -> String {
    series
        .iter()
        .map(|(key, value)| format!("{key}\t{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn load_summary_table(summary: &LoadSummary) -> Table {
    let mut table = new_table(&["Table", "Source", "Rows", "Columns", "File"]);
    for loaded in &summary.loaded {
        table.add_row(vec![
            Cell::new(&loaded.table),
            loaded.source.map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(loaded.rows),
            Cell::new(loaded.columns),
            dim_cell(loaded.path.display()),
        ]);
    }
    for skipped in &summary.skipped {
        table.add_row(vec![
            dim_cell("-"),
            Cell::new(skipped.source),
            Cell::new("missing").fg(Color::Yellow),
            dim_cell("-"),
            dim_cell(skipped.path.display()),
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table
}

pub fn join_table(reports: &[JoinReport]) -> Table {
    let mut table = new_table(&["Table", "Output", "Rows in", "Rows out", "Unmapped codes"]);
    for report in reports {
        let excluded = if report.unmapped_codes.is_empty() {
            dim_cell("-")
        } else {
            let codes: Vec<&str> = report.unmapped_codes.iter().map(String::as_str).collect();
            Cell::new(codes.join(", ")).fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&report.table),
            Cell::new(&report.output),
            Cell::new(report.input_rows),
            Cell::new(report.output_rows),
            excluded,
        ]);
    }
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table
}
