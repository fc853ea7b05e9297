//! Attaching ISO3 codes to UN-keyed tables.

use std::collections::BTreeSet;

use polars::prelude::*;

use demog_model::columns::{COUNTRY_CODE, INDEX, ISO3};
use demog_model::{CodeKind, Indicator, TableState, UnCode, mapped_table_name};
use demog_store::{Provenance, StoreError, TableStore, any_to_string};

use crate::crosswalk::Crosswalk;
use crate::error::Result;

/// Outcome of one crosswalk join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReport {
    pub table: String,
    pub output: String,
    pub input_rows: usize,
    pub output_rows: usize,
    /// Distinct native codes with no crosswalk entry, as they appear in the
    /// source (blank cells render as empty strings).
    pub unmapped_codes: BTreeSet<String>,
}

impl JoinReport {
    pub fn excluded_rows(&self) -> usize {
        self.input_rows - self.output_rows
    }
}

/// Tables keyed by UN location code, mapped by default.
pub fn un_keyed_tables() -> Vec<&'static str> {
    Indicator::ALL
        .into_iter()
        .filter(|indicator| indicator.native_code_kind() == CodeKind::Un)
        .map(Indicator::base_table)
        .collect()
}

/// Inner-joins `table` against the crosswalk on its `Country code` column
/// and stores the result as `<table>_mapped` with an added `iso3` column.
///
/// Rows whose code has no crosswalk entry are excluded. Any `Index` column
/// and any earlier `iso3` column are dropped so repeated joins produce the
/// same column set.
pub fn join_by_country_code(
    store: &mut TableStore,
    table: &str,
    crosswalk: &Crosswalk,
) -> Result<JoinReport> {
    store.require_state(table, TableState::Loaded)?;
    let df = store.table(table)?;
    let codes = df.column(COUNTRY_CODE).map_err(|_| StoreError::ColumnNotFound {
        table: table.to_string(),
        column: COUNTRY_CODE.to_string(),
    })?;

    let input_rows = df.height();
    let mut keep = Vec::with_capacity(input_rows);
    let mut iso_values = Vec::with_capacity(input_rows);
    let mut unmapped_codes = BTreeSet::new();
    for idx in 0..input_rows {
        let raw = any_to_string(codes.get(idx).unwrap_or(AnyValue::Null));
        let mapped = UnCode::parse(&raw)
            .ok()
            .and_then(|code| crosswalk.iso3(code));
        match mapped {
            Some(iso3) => {
                keep.push(true);
                iso_values.push(iso3.as_str().to_string());
            }
            None => {
                keep.push(false);
                unmapped_codes.insert(raw.trim().to_string());
            }
        }
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let mut mapped = df.filter(&mask)?;
    for column in [INDEX, ISO3] {
        if mapped.column(column).is_ok() {
            mapped.drop_in_place(column)?;
        }
    }
    mapped.with_column(Series::new(ISO3.into(), iso_values))?;

    let output = mapped_table_name(table);
    let output_rows = mapped.height();
    store.replace_table(
        &output,
        mapped,
        TableState::Mapped,
        Provenance::Derived {
            parent: table.to_string(),
        },
    )?;

    let report = JoinReport {
        table: table.to_string(),
        output,
        input_rows,
        output_rows,
        unmapped_codes,
    };
    if report.excluded_rows() > 0 {
        tracing::warn!(
            table,
            excluded = report.excluded_rows(),
            codes = report.unmapped_codes.len(),
            "rows without a crosswalk entry were excluded"
        );
    }
    tracing::info!(
        table,
        output = %report.output,
        rows = report.output_rows,
        "mapped table to ISO3"
    );
    Ok(report)
}
