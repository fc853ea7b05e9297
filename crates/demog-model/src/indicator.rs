//! Indicators and the conventions each one's source table follows.

use std::fmt;
use std::str::FromStr;

use crate::columns::{COUNTRY_CODE, ISO_CODE, ISO3};
use crate::country::CodeKind;
use crate::error::{ModelError, Result};
use crate::names::mapped_table_name;

/// Lifecycle state of a named table in the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TableState {
    #[default]
    Absent,
    /// Written by a source load.
    Loaded,
    /// Derived by the crosswalk join; carries an ISO3 column.
    Mapped,
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("absent"),
            Self::Loaded => f.write_str("loaded"),
            Self::Mapped => f.write_str("mapped"),
        }
    }
}

/// How `start-end` headers become period keys.
///
/// The two modes handle structurally identical labels differently and are
/// kept apart on purpose: rates indexed by interval midpoint versus
/// demographic tables indexed by age-band lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderMode {
    /// `start + 2.5`.
    Midpoint,
    /// `trunc(start)`.
    BandLowerBound,
}

/// Which parsed header classes an indicator reads values from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodColumns {
    /// Bare year labels only ("1980").
    Years,
    /// Range labels only ("1980-1985", "95+").
    Ranges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    BcgCoverage,
    CrudeBirthRate,
    TotalPopulation,
    AbsoluteDeaths,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::BcgCoverage,
        Indicator::CrudeBirthRate,
        Indicator::TotalPopulation,
        Indicator::AbsoluteDeaths,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::BcgCoverage => "bcg-coverage",
            Self::CrudeBirthRate => "crude-birth-rate",
            Self::TotalPopulation => "total-population",
            Self::AbsoluteDeaths => "absolute-deaths",
        }
    }

    /// Table written by the source load.
    pub fn base_table(self) -> &'static str {
        match self {
            Self::BcgCoverage => "bcg",
            Self::CrudeBirthRate => "crude_birth_rate",
            Self::TotalPopulation => "total_population",
            Self::AbsoluteDeaths => "absolute_deaths",
        }
    }

    /// Country column of the loaded (unmapped) table.
    pub fn native_country_column(self) -> &'static str {
        match self {
            Self::BcgCoverage => ISO_CODE,
            Self::CrudeBirthRate | Self::TotalPopulation | Self::AbsoluteDeaths => COUNTRY_CODE,
        }
    }

    pub fn native_code_kind(self) -> CodeKind {
        match self {
            Self::BcgCoverage => CodeKind::Iso3,
            Self::CrudeBirthRate | Self::TotalPopulation | Self::AbsoluteDeaths => CodeKind::Un,
        }
    }

    pub fn header_mode(self) -> HeaderMode {
        match self {
            Self::BcgCoverage | Self::CrudeBirthRate => HeaderMode::Midpoint,
            Self::TotalPopulation | Self::AbsoluteDeaths => HeaderMode::BandLowerBound,
        }
    }

    pub fn period_columns(self) -> PeriodColumns {
        match self {
            Self::BcgCoverage => PeriodColumns::Years,
            Self::CrudeBirthRate | Self::TotalPopulation | Self::AbsoluteDeaths => {
                PeriodColumns::Ranges
            }
        }
    }

    /// Raw values are divided by this to get the series unit.
    ///
    /// Coverage is a percentage, birth rate is per 1000; counts pass through.
    pub fn unit_divisor(self) -> f64 {
        match self {
            Self::BcgCoverage => 1e2,
            Self::CrudeBirthRate => 1e3,
            Self::TotalPopulation | Self::AbsoluteDeaths => 1.0,
        }
    }

    /// Whether the source carries one row per country and reporting period
    /// with one column per age band.
    pub fn is_demographic(self) -> bool {
        matches!(self, Self::TotalPopulation | Self::AbsoluteDeaths)
    }

    /// The table normally queried for this indicator.
    ///
    /// Sources keyed by ISO3 are read as loaded; UN-keyed sources are read
    /// through their crosswalk-mapped table.
    pub fn default_table(self) -> IndicatorTable {
        let state = match self.native_code_kind() {
            CodeKind::Iso3 => TableState::Loaded,
            CodeKind::Un => TableState::Mapped,
        };
        IndicatorTable::new(self, state)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Indicator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "bcg" | "bcg-coverage" => Ok(Self::BcgCoverage),
            "crude-birth-rate" | "birth-rate" => Ok(Self::CrudeBirthRate),
            "total-population" | "population" => Ok(Self::TotalPopulation),
            "absolute-deaths" | "deaths" => Ok(Self::AbsoluteDeaths),
            _ => Err(ModelError::UnknownIndicator(s.to_string())),
        }
    }
}

/// An indicator paired with the state of the table it is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorTable {
    pub indicator: Indicator,
    pub state: TableState,
}

impl IndicatorTable {
    pub fn new(indicator: Indicator, state: TableState) -> Self {
        Self { indicator, state }
    }

    pub fn table_name(&self) -> String {
        match self.state {
            TableState::Mapped => mapped_table_name(self.indicator.base_table()),
            TableState::Loaded | TableState::Absent => self.indicator.base_table().to_string(),
        }
    }

    pub fn country_column(&self) -> &'static str {
        match self.state {
            TableState::Mapped => ISO3,
            TableState::Loaded | TableState::Absent => self.indicator.native_country_column(),
        }
    }

    pub fn code_kind(&self) -> CodeKind {
        match self.state {
            TableState::Mapped => CodeKind::Iso3,
            TableState::Loaded | TableState::Absent => self.indicator.native_code_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_reads_native_iso_table() {
        let table = Indicator::BcgCoverage.default_table();
        assert_eq!(table.table_name(), "bcg");
        assert_eq!(table.country_column(), "ISO_code");
        assert_eq!(table.code_kind(), CodeKind::Iso3);
    }

    #[test]
    fn un_sources_read_mapped_tables() {
        let table = Indicator::CrudeBirthRate.default_table();
        assert_eq!(table.state, TableState::Mapped);
        assert_eq!(table.table_name(), "crude_birth_rate_mapped");
        assert_eq!(table.country_column(), "iso3");
    }

    #[test]
    fn loaded_un_table_filters_on_native_code() {
        let table = IndicatorTable::new(Indicator::AbsoluteDeaths, TableState::Loaded);
        assert_eq!(table.table_name(), "absolute_deaths");
        assert_eq!(table.country_column(), "Country code");
        assert_eq!(table.code_kind(), CodeKind::Un);
    }

    #[test]
    fn parses_indicator_aliases() {
        assert_eq!("bcg".parse::<Indicator>().unwrap(), Indicator::BcgCoverage);
        assert_eq!(
            "crude_birth_rate".parse::<Indicator>().unwrap(),
            Indicator::CrudeBirthRate
        );
        assert_eq!(
            "Population".parse::<Indicator>().unwrap(),
            Indicator::TotalPopulation
        );
        assert!("gdp".parse::<Indicator>().is_err());
    }

    #[test]
    fn unit_divisors_follow_source_units() {
        assert_eq!(87.0 / Indicator::BcgCoverage.unit_divisor(), 0.87);
        assert!((34.2 / Indicator::CrudeBirthRate.unit_divisor() - 0.0342).abs() < 1e-12);
        assert_eq!(Indicator::TotalPopulation.unit_divisor(), 1.0);
    }
}
