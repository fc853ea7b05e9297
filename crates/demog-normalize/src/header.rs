//! Column label parsing.
//!
//! Source tables label period columns as bare years (`1980`), ranges
//! (`1980-1985`, `0-4`) or open top bands (`95+`). Rules, first match wins:
//!
//! 1. An open band `N+` is rewritten to `N-` and parsed as a range.
//! 2. `Reference date (as of 1 July)` (or an already renamed `Period`) is the
//!    reporting-period column, not a period key.
//! 3. A label with a hyphen is a range; the text before the first hyphen is
//!    its start. [`HeaderMode`] decides what key a start becomes.
//! 4. An all-digit label is a year.
//! 5. Anything else that starts with a digit is malformed; remaining labels
//!    pass through.

use std::collections::BTreeMap;

use demog_model::columns::{OPEN_TOP_BAND, OPEN_TOP_BAND_REWRITTEN, PERIOD, REFERENCE_DATE};
use demog_model::{HeaderMode, PeriodColumns, PeriodKey};

use crate::error::{NormalizeError, Result};

/// Which rule produced a period key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    Year,
    Range,
}

impl PeriodKind {
    /// Whether an indicator reading `columns` uses this kind.
    pub fn accepted_by(self, columns: PeriodColumns) -> bool {
        matches!(
            (self, columns),
            (Self::Year, PeriodColumns::Years) | (Self::Range, PeriodColumns::Ranges)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaderClass {
    Period { key: PeriodKey, kind: PeriodKind },
    ReferenceDate,
    PassThrough,
    Malformed { reason: &'static str },
}

/// Rewrites an open top band (`95+`) to the hyphen form (`95-`).
pub fn rewrite_open_band(label: &str) -> Option<String> {
    if label == OPEN_TOP_BAND {
        return Some(OPEN_TOP_BAND_REWRITTEN.to_string());
    }
    let start = label.strip_suffix('+')?;
    if !start.is_empty() && start.chars().all(|ch| ch.is_ascii_digit()) {
        Some(format!("{start}-"))
    } else {
        None
    }
}

fn range_key(start: &str, mode: HeaderMode) -> Option<PeriodKey> {
    let start: f64 = start.trim().parse().ok()?;
    match mode {
        HeaderMode::Midpoint => PeriodKey::range_midpoint(start),
        HeaderMode::BandLowerBound => PeriodKey::band_lower_bound(start),
    }
}

/// Classifies one column label.
pub fn classify_header(label: &str, mode: HeaderMode) -> HeaderClass {
    let label = label.trim();
    let rewritten = rewrite_open_band(label);
    let label = rewritten.as_deref().unwrap_or(label);

    if label == REFERENCE_DATE || label == PERIOD {
        return HeaderClass::ReferenceDate;
    }

    if let Some((start, _)) = label.split_once('-') {
        return match range_key(start, mode) {
            Some(key) => HeaderClass::Period {
                key,
                kind: PeriodKind::Range,
            },
            None if start.trim().is_empty() => HeaderClass::Malformed {
                reason: "range has no start",
            },
            None if start.trim().starts_with(|ch: char| ch.is_ascii_digit()) => {
                HeaderClass::Malformed {
                    reason: "range start is not a number",
                }
            }
            // hyphenated names such as `ISO3 Alpha-code`
            None => HeaderClass::PassThrough,
        };
    }

    if !label.is_empty() && label.chars().all(|ch| ch.is_ascii_digit()) {
        return match label.parse::<i64>() {
            Ok(year) => HeaderClass::Period {
                key: PeriodKey::from_year(year),
                kind: PeriodKind::Year,
            },
            Err(_) => HeaderClass::Malformed {
                reason: "year out of range",
            },
        };
    }

    if label.starts_with(|ch: char| ch.is_ascii_digit()) {
        return HeaderClass::Malformed {
            reason: "numeric label matches no period form",
        };
    }

    HeaderClass::PassThrough
}

/// A column whose label parsed to a period key.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodColumn {
    pub label: String,
    pub key: PeriodKey,
    pub kind: PeriodKind,
}

/// Parsed labels of one table, split by role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMap {
    /// Period columns in key order.
    pub periods: Vec<PeriodColumn>,
    /// Raw label of the reporting-period column, if present.
    pub reference_date: Option<String>,
    pub pass_through: Vec<String>,
    pub malformed: Vec<String>,
}

impl HeaderMap {
    /// Period columns an indicator reading `columns` uses, in key order.
    pub fn periods_for(&self, columns: PeriodColumns) -> impl Iterator<Item = &PeriodColumn> {
        self.periods
            .iter()
            .filter(move |period| period.kind.accepted_by(columns))
    }

    pub fn key_for(&self, label: &str) -> Option<PeriodKey> {
        self.periods
            .iter()
            .find(|period| period.label == label)
            .map(|period| period.key)
    }
}

/// Parses every label of a table.
///
/// Malformed labels are logged and left out of the period set. Two labels
/// that normalize to the same key are an error.
pub fn parse_headers<I, S>(labels: I, mode: HeaderMode) -> Result<HeaderMap>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut map = HeaderMap::default();
    let mut seen: BTreeMap<PeriodKey, String> = BTreeMap::new();

    for label in labels {
        let label = label.as_ref();
        match classify_header(label, mode) {
            HeaderClass::Period { key, kind } => {
                if let Some(first) = seen.get(&key) {
                    return Err(NormalizeError::DuplicatePeriodKey {
                        key,
                        first: first.clone(),
                        second: label.to_string(),
                    });
                }
                seen.insert(key, label.to_string());
                map.periods.push(PeriodColumn {
                    label: label.to_string(),
                    key,
                    kind,
                });
            }
            HeaderClass::ReferenceDate => {
                if map.reference_date.is_none() {
                    map.reference_date = Some(label.to_string());
                } else {
                    map.pass_through.push(label.to_string());
                }
            }
            HeaderClass::PassThrough => map.pass_through.push(label.to_string()),
            HeaderClass::Malformed { reason } => {
                tracing::warn!(label, reason, "malformed column label excluded");
                map.malformed.push(label.to_string());
            }
        }
    }

    map.periods.sort_by_key(|period| period.key);
    Ok(map)
}

/// Reporting period as used for grouping: the text before the first hyphen.
pub fn reduce_reference_date(value: &str) -> String {
    let value = value.trim();
    value
        .split_once('-')
        .map_or(value, |(before, _)| before)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(label: &str, mode: HeaderMode) -> Option<f64> {
        match classify_header(label, mode) {
            HeaderClass::Period { key, .. } => Some(key.value()),
            _ => None,
        }
    }

    #[test]
    fn bare_year_is_the_year() {
        assert_eq!(key("1980", HeaderMode::Midpoint), Some(1980.0));
        assert_eq!(key("1980", HeaderMode::BandLowerBound), Some(1980.0));
    }

    #[test]
    fn range_in_midpoint_mode() {
        assert_eq!(key("1980-1984", HeaderMode::Midpoint), Some(1982.5));
        assert_eq!(key("1950-1955", HeaderMode::Midpoint), Some(1952.5));
    }

    #[test]
    fn range_in_lower_bound_mode() {
        assert_eq!(key("1980-1984", HeaderMode::BandLowerBound), Some(1980.0));
        assert_eq!(key("0-4", HeaderMode::BandLowerBound), Some(0.0));
    }

    #[test]
    fn open_top_band() {
        assert_eq!(key("95+", HeaderMode::Midpoint), Some(97.5));
        assert_eq!(key("95+", HeaderMode::BandLowerBound), Some(95.0));
        assert_eq!(key("100+", HeaderMode::BandLowerBound), Some(100.0));
        assert_eq!(rewrite_open_band("95+").as_deref(), Some("95-"));
        assert_eq!(rewrite_open_band("a+"), None);
    }

    #[test]
    fn reference_date_is_not_a_period() {
        assert_eq!(
            classify_header("Reference date (as of 1 July)", HeaderMode::BandLowerBound),
            HeaderClass::ReferenceDate
        );
        assert_eq!(
            classify_header("Period", HeaderMode::Midpoint),
            HeaderClass::ReferenceDate
        );
    }

    #[test]
    fn identifiers_pass_through() {
        for label in ["ISO_code", "Country code", "Cname", "ISO3 Alpha-code", "iso3"] {
            assert_eq!(
                classify_header(label, HeaderMode::Midpoint),
                HeaderClass::PassThrough,
                "{label}"
            );
        }
    }

    #[test]
    fn malformed_numeric_labels() {
        for label in ["1980a", "-1980", "19x0-1985", "2015 estimate"] {
            assert!(
                matches!(
                    classify_header(label, HeaderMode::Midpoint),
                    HeaderClass::Malformed { .. }
                ),
                "{label}"
            );
        }
    }

    #[test]
    fn parse_headers_splits_roles() {
        let map = parse_headers(
            [
                "Index",
                "Country code",
                "Reference date (as of 1 July)",
                "5-9",
                "0-4",
                "95+",
                "12abc",
            ],
            HeaderMode::BandLowerBound,
        )
        .unwrap();

        let keys: Vec<String> = map.periods.iter().map(|p| p.key.to_string()).collect();
        assert_eq!(keys, vec!["0", "5", "95"]);
        assert_eq!(
            map.reference_date.as_deref(),
            Some("Reference date (as of 1 July)")
        );
        assert_eq!(map.pass_through, vec!["Index", "Country code"]);
        assert_eq!(map.malformed, vec!["12abc"]);
        assert_eq!(map.key_for("95+").map(|k| k.value()), Some(95.0));
    }

    #[test]
    fn duplicate_keys_are_an_error() {
        let result = parse_headers(["1980-1984", "1980-1985"], HeaderMode::Midpoint);
        assert!(matches!(
            result,
            Err(NormalizeError::DuplicatePeriodKey { first, second, .. })
                if first == "1980-1984" && second == "1980-1985"
        ));
    }

    #[test]
    fn periods_for_filters_by_kind() {
        let map = parse_headers(["1980", "1980-1984", "ISO_code"], HeaderMode::Midpoint).unwrap();
        let years: Vec<&str> = map
            .periods_for(PeriodColumns::Years)
            .map(|p| p.label.as_str())
            .collect();
        let ranges: Vec<&str> = map
            .periods_for(PeriodColumns::Ranges)
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(years, vec!["1980"]);
        assert_eq!(ranges, vec!["1980-1984"]);
    }

    #[test]
    fn reference_date_reduction() {
        assert_eq!(reduce_reference_date("1950-1955"), "1950");
        assert_eq!(reduce_reference_date(" 2020 "), "2020");
        assert_eq!(reduce_reference_date(""), "");
    }
}
