//! Derived, read-only views over store state.
//!
//! Pure functions recomputed on every call; nothing here is cached or stored.

use crate::models::{Country, DataPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Region filter value that matches every country.
pub const ALL_REGIONS: &str = "All";

/// One plottable (year, value) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub year: i32,
    pub value: f64,
}

/// Countries whose name contains `search` (case-insensitive) and whose region
/// contains `region`, or any region when `region` is [`ALL_REGIONS`].
///
/// Catalog order is preserved. The search is matched as typed, whitespace
/// included; an empty search matches every name.
pub fn filter_catalog<'a>(catalog: &'a [Country], search: &str, region: &str) -> Vec<&'a Country> {
    let needle = search.to_lowercase();
    catalog
        .iter()
        .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
        .filter(|c| region == ALL_REGIONS || c.region.value.contains(region))
        .collect()
}

/// Distinct region names in the catalog, sorted, preceded by [`ALL_REGIONS`].
pub fn regions(catalog: &[Country]) -> Vec<String> {
    let names: BTreeSet<&str> = catalog
        .iter()
        .map(|c| c.region.value.trim())
        .filter(|r| !r.is_empty())
        .collect();
    std::iter::once(ALL_REGIONS)
        .chain(names)
        .map(str::to_string)
        .collect()
}

/// Sort ascending by year and drop points without a value or numeric year.
pub fn chart_points(series: &[DataPoint]) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = series
        .iter()
        .filter_map(|p| {
            Some(ChartPoint {
                year: p.year()?,
                value: p.value?,
            })
        })
        .collect();
    points.sort_by_key(|p| p.year);
    points
}

/// Most recent plottable point.
pub fn latest_point(series: &[DataPoint]) -> Option<ChartPoint> {
    chart_points(series).last().copied()
}
