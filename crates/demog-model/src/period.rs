//! Period keys and period-indexed series.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Offset added to the start of a five-year range to get its midpoint.
pub const RANGE_MIDPOINT_OFFSET: f64 = 2.5;

/// Numeric time point: a calendar year, a range midpoint, or an age-band
/// lower bound, depending on how the source header was parsed.
///
/// Always finite, so keys are totally ordered and usable as map keys.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct PeriodKey(f64);

impl PeriodKey {
    /// Returns `None` for NaN and infinities.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() {
            // fold -0.0 into 0.0 so Eq and Hash agree
            Some(Self(value + 0.0))
        } else {
            None
        }
    }

    pub fn from_year(year: i64) -> Self {
        Self(year as f64)
    }

    /// Midpoint of a five-year range starting at `start`.
    pub fn range_midpoint(start: f64) -> Option<Self> {
        Self::new(start + RANGE_MIDPOINT_OFFSET)
    }

    /// Integer lower bound of a band starting at `start`.
    pub fn band_lower_bound(start: f64) -> Option<Self> {
        Self::new(start.trunc())
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_integral(self) -> bool {
        self.0.fract() == 0.0
    }

    /// The key as an integer when it has no fractional part.
    pub fn as_integer(self) -> Option<i64> {
        if self.is_integral() {
            Some(self.0 as i64)
        } else {
            None
        }
    }
}

impl PartialEq for PeriodKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for PeriodKey {}

impl PartialOrd for PeriodKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PeriodKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for PeriodKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_integer() {
            Some(year) => write!(f, "{year}"),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Period → value mapping handed to curve-fitting consumers.
///
/// Keys are unique and sorted; values are never null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodSeries {
    entries: BTreeMap<PeriodKey, f64>,
}

impl PeriodSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: PeriodKey, value: f64) -> Option<f64> {
        self.entries.insert(key, value)
    }

    pub fn get(&self, key: PeriodKey) -> Option<f64> {
        self.entries.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PeriodKey, f64)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, *value))
    }

    pub fn keys(&self) -> impl Iterator<Item = PeriodKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.values().copied()
    }

    pub fn first(&self) -> Option<(PeriodKey, f64)> {
        self.entries
            .first_key_value()
            .map(|(key, value)| (*key, *value))
    }

    pub fn last(&self) -> Option<(PeriodKey, f64)> {
        self.entries
            .last_key_value()
            .map(|(key, value)| (*key, *value))
    }
}

impl FromIterator<(PeriodKey, f64)> for PeriodSeries {
    fn from_iter<I: IntoIterator<Item = (PeriodKey, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PeriodSeries {
    type Item = (PeriodKey, f64);
    type IntoIter = std::collections::btree_map::IntoIter<PeriodKey, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
