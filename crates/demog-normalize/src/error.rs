//! Error types for header parsing and series extraction.

use thiserror::Error;

use demog_model::{CodeKind, Indicator, ModelError, PeriodKey};
use demog_store::StoreError;

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A single-country query matched more than one row.
    #[error("{rows} rows in {table} for country {country}, expected at most one")]
    AmbiguousRow {
        table: String,
        country: String,
        rows: usize,
    },

    /// Two distinct labels normalize to the same period key.
    #[error("columns '{first}' and '{second}' both map to period {key}")]
    DuplicatePeriodKey {
        key: PeriodKey,
        first: String,
        second: String,
    },

    /// A reporting period appears twice for one country.
    #[error("period '{period}' appears more than once in {table} for country {country}")]
    DuplicatePeriod {
        table: String,
        country: String,
        period: String,
    },

    /// Country code is in the wrong code space for the table.
    #[error("table {table} is keyed by {expected} codes, got a {actual} code")]
    CodeKindMismatch {
        table: String,
        expected: CodeKind,
        actual: CodeKind,
    },

    /// Indicator has no period × age-band layout.
    #[error("indicator {indicator} is not an age-band table")]
    NotDemographic { indicator: Indicator },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for NormalizeError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
