//! Equality-filtered projection queries.

use polars::prelude::*;

use crate::error::{Result, StoreError};
use crate::polars_utils::any_to_string;

/// Columns returned by a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    /// Every column, in table order.
    #[default]
    All,
    /// The named columns, in the given order.
    Columns(Vec<String>),
}

/// `SELECT <projection> FROM <table> [WHERE <column> = '<value>']`.
///
/// Filter values are compared against each cell's string rendering, so
/// `"496"` matches an integer cell holding 496 and a float cell holding
/// 496.0 alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: String,
    filter: Option<(String, String)>,
    projection: Projection,
}

impl TableQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
            projection: Projection::All,
        }
    }

    /// Keep only rows where `column` equals `value`.
    pub fn filter_eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter = Some((column.into(), value.into()));
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Projection::Columns(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn filter(&self) -> Option<(&str, &str)> {
        self.filter
            .as_ref()
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    fn require_column(&self, df: &DataFrame, column: &str) -> Result<()> {
        if df.column(column).is_err() {
            return Err(StoreError::ColumnNotFound {
                table: self.table.clone(),
                column: column.to_string(),
            });
        }
        Ok(())
    }

    /// Runs the query against the table's rows.
    pub(crate) fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        let filtered = match &self.filter {
            None => df,
            Some((column, value)) => {
                self.require_column(&df, column)?;
                let series = df.column(column)?;
                let keep: Vec<bool> = (0..df.height())
                    .map(|idx| any_to_string(series.get(idx).unwrap_or(AnyValue::Null)) == *value)
                    .collect();
                let mask = BooleanChunked::from_slice("keep".into(), &keep);
                df.filter(&mask)?
            }
        };

        match &self.projection {
            Projection::All => Ok(filtered),
            Projection::Columns(columns) => {
                for column in columns {
                    self.require_column(&filtered, column)?;
                }
                Ok(filtered.select(columns.iter().map(String::as_str))?)
            }
        }
    }
}
