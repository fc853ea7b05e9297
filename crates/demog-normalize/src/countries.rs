//! Countries present in an indicator table.

use std::collections::BTreeSet;

use polars::prelude::AnyValue;

use demog_model::{CodeKind, Iso3Code, IndicatorTable};
use demog_store::{TableQuery, TableStore, any_to_string_non_empty};

use crate::error::{NormalizeError, Result};

/// Distinct ISO3 codes in the table's country column, sorted.
///
/// The table must be keyed by ISO3 (a mapped table, or a source that is
/// ISO3-native). Blank and invalid cells are skipped.
pub fn available_countries(store: &TableStore, table: IndicatorTable) -> Result<Vec<Iso3Code>> {
    if table.code_kind() != CodeKind::Iso3 {
        return Err(NormalizeError::CodeKindMismatch {
            table: table.table_name(),
            expected: table.code_kind(),
            actual: CodeKind::Iso3,
        });
    }

    let column = table.country_column();
    let df = store.query(&TableQuery::new(table.table_name()).columns([column]))?;
    let values = df.column(column)?;

    let mut codes = BTreeSet::new();
    let mut invalid = 0usize;
    for idx in 0..df.height() {
        let Some(raw) = any_to_string_non_empty(values.get(idx).unwrap_or(AnyValue::Null)) else {
            continue;
        };
        match Iso3Code::new(&raw) {
            Ok(code) => {
                codes.insert(code);
            }
            Err(_) => invalid += 1,
        }
    }
    if invalid > 0 {
        tracing::debug!(table = %table.table_name(), invalid, "skipped non-ISO3 country cells");
    }
    Ok(codes.into_iter().collect())
}
