use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use super::{BaseRecord, BaseTable};

/// Distinct city values in order of first appearance
pub fn distinct_cities(records: &[BaseRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.city.as_str()))
        .map(|r| r.city.clone())
        .collect()
}

/// The set of cities the user picked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CitySelection {
    cities: BTreeSet<String>,
}

impl CitySelection {
    /// Every available city (the default selection)
    pub fn all(available: &[String]) -> Self {
        Self::of(available.iter().cloned())
    }

    /// Nothing selected; filters to an empty view
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cities: cities.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact string match, no normalization
    pub fn contains(&self, city: &str) -> bool {
        self.cities.contains(city)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Selected cities, available ones first in their original order
    pub fn ordered(&self, available: &[String]) -> Vec<String> {
        let mut out: Vec<String> = available
            .iter()
            .filter(|c| self.contains(c))
            .cloned()
            .collect();
        out.extend(
            self.cities
                .iter()
                .filter(|c| !available.contains(*c))
                .cloned(),
        );
        out
    }
}

/// Base rows restricted to a selection; borrowed, recomputed per render
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    pub records: Vec<&'a BaseRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a BaseRecord> + '_ {
        self.records.iter().copied()
    }
}

/// Keep the rows whose city is in the selection
pub fn filter_by_cities<'a>(table: &'a BaseTable, selection: &CitySelection) -> FilteredView<'a> {
    if tracing::enabled!(tracing::Level::DEBUG) {
        let known: HashSet<&str> = table.records.iter().map(|r| r.city.as_str()).collect();
        for city in selection.cities.iter().filter(|c| !known.contains(c.as_str())) {
            debug!(city = %city, "selected city has no rows");
        }
    }

    FilteredView {
        records: table
            .records
            .iter()
            .filter(|r| selection.contains(&r.city))
            .collect(),
    }
}
