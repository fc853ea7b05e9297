//! Country identifiers.
//!
//! Sources identify countries either by an ISO 3166 alpha-3 code or by the
//! UN numeric location code. The two spaces are kept apart here and only
//! related through a crosswalk built from the locations table.

use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// Three-letter alphabetic country code, stored uppercase.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Iso3Code(String);

impl Iso3Code {
    pub fn new(value: impl AsRef<str>) -> Result<Self> {
        let raw = value.as_ref();
        let trimmed = raw.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ModelError::InvalidIso3(raw.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iso3Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Iso3Code {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// UN numeric location code (e.g. 496 for Mongolia).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct UnCode(u32);

impl UnCode {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Parses a code as it appears in a source cell.
    ///
    /// Spreadsheet exports frequently render integer codes as floats
    /// ("496.0"), so an integral float is accepted.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidUnCode(raw.to_string()));
        }
        if let Ok(value) = trimmed.parse::<u32>() {
            return Ok(Self(value));
        }
        match trimmed.parse::<f64>() {
            Ok(value)
                if value.is_finite()
                    && value >= 0.0
                    && value.fract() == 0.0
                    && value <= f64::from(u32::MAX) =>
            {
                Ok(Self(value as u32))
            }
            _ => Err(ModelError::InvalidUnCode(raw.to_string())),
        }
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UnCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A country identifier in either code space.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CountryCode {
    Iso3(Iso3Code),
    Un(UnCode),
}

impl CountryCode {
    pub fn kind(&self) -> CodeKind {
        match self {
            Self::Iso3(_) => CodeKind::Iso3,
            Self::Un(_) => CodeKind::Un,
        }
    }

    pub fn as_iso3(&self) -> Option<&Iso3Code> {
        match self {
            Self::Iso3(code) => Some(code),
            Self::Un(_) => None,
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iso3(code) => code.fmt(f),
            Self::Un(code) => code.fmt(f),
        }
    }
}

impl FromStr for CountryCode {
    type Err = ModelError;

    /// Digits parse as a UN code, letters as ISO3.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            return UnCode::parse(trimmed).map(Self::Un);
        }
        Iso3Code::new(trimmed).map(Self::Iso3)
    }
}

impl From<Iso3Code> for CountryCode {
    fn from(code: Iso3Code) -> Self {
        Self::Iso3(code)
    }
}

impl From<UnCode> for CountryCode {
    fn from(code: UnCode) -> Self {
        Self::Un(code)
    }
}

/// Which code space a table column or a lookup value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    Iso3,
    Un,
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iso3 => f.write_str("ISO3"),
            Self::Un => f.write_str("UN numeric"),
        }
    }
}
