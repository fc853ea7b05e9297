//! Error types for the crosswalk and join.

use thiserror::Error;

use demog_model::{Iso3Code, ModelError, UnCode};
use demog_store::StoreError;

#[derive(Debug, Error)]
pub enum MapError {
    /// The locations table maps one UN code to two different ISO3 codes.
    #[error("UN code {code} maps to both {first} and {second}")]
    ConflictingEntry {
        code: UnCode,
        first: Iso3Code,
        second: Iso3Code,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for MapError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
