//! Source file registry.
//!
//! Each known source file has a fixed header row, sheet, and destination
//! table. The registry is an explicit table keyed by [`SourceId`] and is
//! validated once at startup instead of being looked up by path string.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};
use crate::names::validate_table_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceId {
    CrudeBirthRate,
    Locations,
    DeathsByAge,
    PopulationByAge,
    BcgCoverage,
    Gtb2015,
    Gtb2016,
    LifeExpectancy2015,
    BirthRate2015,
}

impl SourceId {
    pub const ALL: [SourceId; 9] = [
        SourceId::CrudeBirthRate,
        SourceId::Locations,
        SourceId::DeathsByAge,
        SourceId::PopulationByAge,
        SourceId::BcgCoverage,
        SourceId::Gtb2015,
        SourceId::Gtb2016,
        SourceId::LifeExpectancy2015,
        SourceId::BirthRate2015,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::CrudeBirthRate => "crude-birth-rate",
            Self::Locations => "locations",
            Self::DeathsByAge => "deaths-by-age",
            Self::PopulationByAge => "population-by-age",
            Self::BcgCoverage => "bcg-coverage",
            Self::Gtb2015 => "gtb-2015",
            Self::Gtb2016 => "gtb-2016",
            Self::LifeExpectancy2015 => "life-expectancy-2015",
            Self::BirthRate2015 => "birth-rate-2015",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|id| id.name() == normalized)
            .ok_or_else(|| ModelError::UnknownSource(s.to_string()))
    }
}

/// How to read one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub id: SourceId,
    /// File name relative to the input directory.
    pub file_name: String,
    /// Zero-based row holding the column labels.
    pub header_row: usize,
    /// Workbook tab to read, when the source is a workbook.
    pub sheet: Option<String>,
    /// Destination table in the store.
    pub table: String,
}

impl SourceSpec {
    pub fn new(
        id: SourceId,
        file_name: impl Into<String>,
        header_row: usize,
        sheet: Option<&str>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            header_row,
            sheet: sheet.map(str::to_string),
            table: table.into(),
        }
    }
}

/// Validated set of source specs.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    specs: Vec<SourceSpec>,
}

impl SourceRegistry {
    /// Builds a registry, rejecting duplicate ids, file names, or tables.
    pub fn new(specs: Vec<SourceSpec>) -> Result<Self> {
        let registry = Self { specs };
        registry.validate()?;
        Ok(registry)
    }

    /// The WPP 2019 / WHO source set.
    pub fn standard() -> Result<Self> {
        Self::new(vec![
            SourceSpec::new(
                SourceId::CrudeBirthRate,
                "WPP2019_FERT_F03_CRUDE_BIRTH_RATE.xlsx",
                16,
                Some("ESTIMATES"),
                "crude_birth_rate",
            ),
            SourceSpec::new(
                SourceId::Locations,
                "WPP2019_F01_LOCATIONS.xlsx",
                16,
                Some("Location"),
                "un_iso3_map",
            ),
            SourceSpec::new(
                SourceId::DeathsByAge,
                "WPP2019_MORT_F04_1_DEATHS_BY_AGE_BOTH_SEXES.xlsx",
                16,
                Some("ESTIMATES"),
                "absolute_deaths",
            ),
            SourceSpec::new(
                SourceId::PopulationByAge,
                "WPP2019_POP_F07_1_POPULATION_BY_AGE_BOTH_SEXES.xlsx",
                16,
                Some("ESTIMATES"),
                "total_population",
            ),
            SourceSpec::new(
                SourceId::BcgCoverage,
                "coverage_estimates_series.xlsx",
                0,
                Some("BCG"),
                "bcg",
            ),
            SourceSpec::new(
                SourceId::Gtb2015,
                "gtb_2015.xlsx",
                0,
                Some("gtb_2015"),
                "gtb_2015",
            ),
            SourceSpec::new(
                SourceId::Gtb2016,
                "gtb_2016.xlsx",
                0,
                Some("gtb_2016"),
                "gtb_2016",
            ),
            SourceSpec::new(
                SourceId::LifeExpectancy2015,
                "life_expectancy_2015.xlsx",
                3,
                Some("life_expectancy_2015"),
                "life_expectancy_2015",
            ),
            SourceSpec::new(
                SourceId::BirthRate2015,
                "rate_birth_2015.xlsx",
                3,
                Some("rate_birth_2015"),
                "rate_birth_2015",
            ),
        ])
    }

    pub fn validate(&self) -> Result<()> {
        let mut ids = BTreeSet::new();
        let mut files = BTreeSet::new();
        let mut tables = BTreeSet::new();
        for spec in &self.specs {
            if !ids.insert(spec.id) {
                return Err(ModelError::Registry(format!(
                    "source '{}' registered twice",
                    spec.id
                )));
            }
            if spec.file_name.trim().is_empty() {
                return Err(ModelError::Registry(format!(
                    "source '{}' has an empty file name",
                    spec.id
                )));
            }
            if !files.insert(spec.file_name.as_str()) {
                return Err(ModelError::Registry(format!(
                    "file '{}' registered twice",
                    spec.file_name
                )));
            }
            validate_table_name(&spec.table)?;
            if !tables.insert(spec.table.as_str()) {
                return Err(ModelError::Registry(format!(
                    "table '{}' is the destination of more than one source",
                    spec.table
                )));
            }
            if let Some(sheet) = &spec.sheet
                && sheet.trim().is_empty()
            {
                return Err(ModelError::Registry(format!(
                    "source '{}' has an empty sheet name",
                    spec.id
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: SourceId) -> Option<&SourceSpec> {
        self.specs.iter().find(|spec| spec.id == id)
    }

    pub fn by_table(&self, table: &str) -> Option<&SourceSpec> {
        self.specs.iter().find(|spec| spec.table == table)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
