//! UN numeric location code ↔ ISO3 crosswalk.

use std::collections::BTreeMap;

use polars::prelude::AnyValue;

use demog_model::columns::{ISO3_ALPHA_CODE, LOCATION_CODE};
use demog_model::{Iso3Code, UnCode};
use demog_store::{TableQuery, TableStore, any_to_string_non_empty};

use crate::error::{MapError, Result};

/// Table the crosswalk is built from.
pub const LOCATIONS_TABLE: &str = "un_iso3_map";

/// Mapping between the two country code spaces.
///
/// Built explicitly from the locations table and passed by reference to
/// whatever needs it; rebuilding from unchanged rows yields an equal value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Crosswalk {
    forward: BTreeMap<UnCode, Iso3Code>,
    reverse: BTreeMap<Iso3Code, UnCode>,
    dropped_rows: usize,
}

impl Crosswalk {
    /// Builds the crosswalk from [`LOCATIONS_TABLE`].
    pub fn build(store: &TableStore) -> Result<Self> {
        Self::build_from(store, LOCATIONS_TABLE)
    }

    /// Builds the crosswalk from any table with `Location code` and
    /// `ISO3 Alpha-code` columns.
    ///
    /// Rows missing either field, or holding a value that is not a code,
    /// are dropped. Regions and aggregates have a location code but no
    /// alpha code, so dropped rows are expected and only counted.
    pub fn build_from(store: &TableStore, table: &str) -> Result<Self> {
        let df = store.query(&TableQuery::new(table).columns([LOCATION_CODE, ISO3_ALPHA_CODE]))?;
        let codes = df.column(LOCATION_CODE)?;
        let alphas = df.column(ISO3_ALPHA_CODE)?;

        let mut pairs = Vec::with_capacity(df.height());
        let mut dropped = 0usize;
        for idx in 0..df.height() {
            let code = any_to_string_non_empty(codes.get(idx).unwrap_or(AnyValue::Null))
                .and_then(|raw| UnCode::parse(&raw).ok());
            let alpha = any_to_string_non_empty(alphas.get(idx).unwrap_or(AnyValue::Null))
                .and_then(|raw| Iso3Code::new(raw).ok());
            match (code, alpha) {
                (Some(code), Some(alpha)) => pairs.push((code, alpha)),
                _ => dropped += 1,
            }
        }

        let mut crosswalk = Self::from_pairs(pairs)?;
        crosswalk.dropped_rows = dropped;
        tracing::info!(
            table,
            entries = crosswalk.len(),
            dropped,
            "built country crosswalk"
        );
        Ok(crosswalk)
    }

    /// Builds a crosswalk from explicit pairs.
    ///
    /// A repeated pair is harmless; a UN code paired with two different ISO3
    /// codes is an error. When two UN codes share an ISO3 code the reverse
    /// lookup keeps the lower code.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (UnCode, Iso3Code)>,
    {
        let mut forward: BTreeMap<UnCode, Iso3Code> = BTreeMap::new();
        for (code, alpha) in pairs {
            if let Some(existing) = forward.get(&code) {
                if *existing != alpha {
                    return Err(MapError::ConflictingEntry {
                        code,
                        first: existing.clone(),
                        second: alpha,
                    });
                }
                continue;
            }
            forward.insert(code, alpha);
        }

        let mut reverse = BTreeMap::new();
        for (code, alpha) in &forward {
            if reverse.contains_key(alpha) {
                tracing::debug!(iso3 = %alpha, code = %code, "ISO3 code shared by several UN codes");
                continue;
            }
            reverse.insert(alpha.clone(), *code);
        }

        Ok(Self {
            forward,
            reverse,
            dropped_rows: 0,
        })
    }

    /// ISO3 code for a UN location code.
    pub fn iso3(&self, code: UnCode) -> Option<&Iso3Code> {
        self.forward.get(&code)
    }

    /// UN location code for an ISO3 code.
    pub fn un_code(&self, iso3: &Iso3Code) -> Option<UnCode> {
        self.reverse.get(iso3).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Locations-table rows that contributed no entry.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnCode, &Iso3Code)> {
        self.forward.iter().map(|(code, alpha)| (*code, alpha))
    }
}
