//! Period × age-band reshape for population and deaths tables.

use std::collections::BTreeSet;

use polars::prelude::*;

use demog_model::columns::{PERIOD, REFERENCE_DATE};
use demog_model::{CountryCode, IndicatorTable, PeriodColumns, PeriodKey};
use demog_store::{StoreError, TableQuery, TableStore, any_to_f64, any_to_string};

use crate::error::{NormalizeError, Result};
use crate::header::{parse_headers, reduce_reference_date};
use crate::series::check_code_kind;

/// One country's age-band table.
///
/// `data` has a `Period` string column followed by one float column per age
/// band, named by the band's lower bound and ordered by it. There is one row
/// per reporting period, in source order.
#[derive(Debug, Clone)]
pub struct DemographicFrame {
    pub data: DataFrame,
    pub bands: Vec<PeriodKey>,
}

impl DemographicFrame {
    pub fn periods(&self) -> Vec<String> {
        let Ok(column) = self.data.column(PERIOD) else {
            return Vec::new();
        };
        (0..self.data.height())
            .map(|idx| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }
}

/// Reshapes one country's rows of a population or deaths table.
///
/// The open top band is renamed, only age-band columns and the reporting
/// date are kept, band labels become integer lower bounds, and the date is
/// cut to the text before its first hyphen. A country with no rows gives an
/// empty frame with the same columns.
pub fn extract_demography(
    store: &TableStore,
    table: IndicatorTable,
    country: &CountryCode,
) -> Result<DemographicFrame> {
    let indicator = table.indicator;
    if !indicator.is_demographic() {
        return Err(NormalizeError::NotDemographic { indicator });
    }
    check_code_kind(&table, country)?;

    let name = table.table_name();
    let rows = store.query(
        &TableQuery::new(name.as_str()).filter_eq(table.country_column(), country.to_string()),
    )?;
    let headers = parse_headers(
        rows.get_column_names().iter().map(|label| label.as_str()),
        indicator.header_mode(),
    )?;
    let Some(date_label) = headers.reference_date.as_deref() else {
        return Err(StoreError::ColumnNotFound {
            table: name,
            column: REFERENCE_DATE.to_string(),
        }
        .into());
    };

    let dates = rows.column(date_label)?;
    let mut periods = Vec::with_capacity(rows.height());
    let mut seen = BTreeSet::new();
    for idx in 0..rows.height() {
        let period = reduce_reference_date(&any_to_string(dates.get(idx).unwrap_or(AnyValue::Null)));
        if !seen.insert(period.clone()) {
            return Err(NormalizeError::DuplicatePeriod {
                table: name,
                country: country.to_string(),
                period,
            });
        }
        periods.push(period);
    }

    let divisor = indicator.unit_divisor();
    let mut columns = vec![Column::new(PERIOD.into(), periods)];
    let mut bands = Vec::new();
    for band in headers.periods_for(PeriodColumns::Ranges) {
        let source = rows.column(&band.label)?;
        let values: Vec<Option<f64>> = (0..rows.height())
            .map(|idx| any_to_f64(source.get(idx).unwrap_or(AnyValue::Null)).map(|v| v / divisor))
            .collect();
        columns.push(Column::new(band.key.to_string().into(), values));
        bands.push(band.key);
    }

    let data = DataFrame::new(columns)?;
    tracing::debug!(
        table = %name,
        %country,
        periods = data.height(),
        bands = bands.len(),
        "reshaped age-band table"
    );
    Ok(DemographicFrame { data, bands })
}
