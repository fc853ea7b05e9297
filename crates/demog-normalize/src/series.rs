//! Per-country period series.

use polars::prelude::AnyValue;

use demog_model::{CountryCode, IndicatorTable, PeriodSeries};
use demog_store::{TableQuery, TableStore, any_to_f64};

use crate::error::{NormalizeError, Result};
use crate::header::parse_headers;

/// Fails when `country` is not in the code space `table` is keyed by.
pub(crate) fn check_code_kind(table: &IndicatorTable, country: &CountryCode) -> Result<()> {
    if country.kind() != table.code_kind() {
        return Err(NormalizeError::CodeKindMismatch {
            table: table.table_name(),
            expected: table.code_kind(),
            actual: country.kind(),
        });
    }
    Ok(())
}

/// Extracts one country's period → value series from an indicator table.
///
/// No matching row gives an empty series. More than one matching row is
/// [`NormalizeError::AmbiguousRow`]. Values are divided by the indicator's
/// unit divisor; null and non-numeric cells are left out.
pub fn extract_series(
    store: &TableStore,
    table: IndicatorTable,
    country: &CountryCode,
) -> Result<PeriodSeries> {
    check_code_kind(&table, country)?;
    let name = table.table_name();
    let rows = store.query(
        &TableQuery::new(name.as_str()).filter_eq(table.country_column(), country.to_string()),
    )?;

    match rows.height() {
        0 => {
            tracing::debug!(table = %name, %country, "no row for country");
            return Ok(PeriodSeries::new());
        }
        1 => {}
        n => {
            return Err(NormalizeError::AmbiguousRow {
                table: name,
                country: country.to_string(),
                rows: n,
            });
        }
    }

    let indicator = table.indicator;
    let headers = parse_headers(
        rows.get_column_names().iter().map(|label| label.as_str()),
        indicator.header_mode(),
    )?;
    let divisor = indicator.unit_divisor();

    let mut series = PeriodSeries::new();
    for period in headers.periods_for(indicator.period_columns()) {
        let cell = rows.column(&period.label)?.get(0).unwrap_or(AnyValue::Null);
        if let Some(value) = any_to_f64(cell) {
            series.insert(period.key, value / divisor);
        }
    }

    tracing::debug!(
        table = %name,
        %country,
        points = series.len(),
        "extracted series"
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use demog_model::{Indicator, TableState};

    #[test]
    fn code_kind_must_match_table() {
        let table = IndicatorTable::new(Indicator::CrudeBirthRate, TableState::Loaded);
        let iso: CountryCode = "MNG".parse().unwrap();
        let un: CountryCode = "496".parse().unwrap();
        assert!(matches!(
            check_code_kind(&table, &iso),
            Err(NormalizeError::CodeKindMismatch { .. })
        ));
        assert!(check_code_kind(&table, &un).is_ok());
        assert!(check_code_kind(&Indicator::CrudeBirthRate.default_table(), &iso).is_ok());
    }
}
