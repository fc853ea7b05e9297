//! Normalization of wide-format indicator tables.
//!
//! Column labels are parsed into numeric period keys, and one country's row
//! becomes a period → value series in the indicator's unit. Population and
//! deaths tables can also be reshaped into a period × age-band frame.

pub mod countries;
pub mod demography;
pub mod error;
pub mod header;
pub mod series;

pub use countries::available_countries;
pub use demography::{DemographicFrame, extract_demography};
pub use error::{NormalizeError, Result};
pub use header::{
    HeaderClass, HeaderMap, PeriodColumn, PeriodKind, classify_header, parse_headers,
    reduce_reference_date, rewrite_open_band,
};
pub use series::extract_series;
