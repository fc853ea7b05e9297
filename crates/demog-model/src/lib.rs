//! Data model shared by the store, crosswalk, and normalization crates.

pub mod columns;
pub mod country;
pub mod error;
pub mod indicator;
pub mod names;
pub mod period;
pub mod source;

pub use country::{CodeKind, CountryCode, Iso3Code, UnCode};
pub use error::{ModelError, Result};
pub use indicator::{HeaderMode, Indicator, IndicatorTable, PeriodColumns, TableState};
pub use names::{mapped_table_name, sanitize_table_name, validate_table_name};
pub use period::{PeriodKey, PeriodSeries, RANGE_MIDPOINT_OFFSET};
pub use source::{SourceId, SourceRegistry, SourceSpec};
