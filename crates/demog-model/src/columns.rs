//! Column labels the normalization layer depends on.
//!
//! These must stay in sync with the headers of the upstream UN and WHO
//! exports; everything else in a table is treated generically.

/// UN numeric location code in the locations table.
pub const LOCATION_CODE: &str = "Location code";
/// ISO3 code in the locations table.
pub const ISO3_ALPHA_CODE: &str = "ISO3 Alpha-code";

/// UN numeric location code in the WPP estimate tables.
pub const COUNTRY_CODE: &str = "Country code";
/// ISO3 code column attached by the crosswalk join.
pub const ISO3: &str = "iso3";
/// ISO3 code column of the WHO coverage series.
pub const ISO_CODE: &str = "ISO_code";

/// Reference date column of the WPP by-age tables.
pub const REFERENCE_DATE: &str = "Reference date (as of 1 July)";
/// Canonical name of the reporting period column.
pub const PERIOD: &str = "Period";

/// Row index artifact written by earlier exports.
pub const INDEX: &str = "Index";

/// Open top age band and its rewritten form.
pub const OPEN_TOP_BAND: &str = "95+";
pub const OPEN_TOP_BAND_REWRITTEN: &str = "95-";

/// Suffix of tables produced by the crosswalk join.
pub const MAPPED_SUFFIX: &str = "_mapped";
