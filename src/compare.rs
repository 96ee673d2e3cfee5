//! Side-by-side comparison of up to three countries on one indicator.

use crate::api::StatsSource;
use crate::error::ApiError;
use crate::indicators::Indicator;
use crate::models::Country;
use futures::future::try_join_all;
use log::debug;
use serde::{Deserialize, Serialize};

/// Maximum number of countries in one comparison.
pub const MAX_COMPARED: usize = 3;

/// Ordered set of selected country ids, never longer than [`MAX_COMPARED`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSelection {
    ids: Vec<String>,
}

impl ComparisonSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deselect `id` if selected, else select it when there is room.
    ///
    /// Returns `false` when the selection was full and nothing changed.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
            return true;
        }
        if self.ids.len() >= MAX_COMPARED {
            debug!("comparison full, ignoring {}", id);
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_COMPARED
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// One bar of the comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonBar {
    pub id: String,
    pub name: String,
    /// Most recent non-null value; `None` if the country never reported one.
    pub value: Option<f64>,
}

/// Latest value of `indicator` for every selected country.
///
/// Requests run concurrently and join all-or-nothing: one failure fails the
/// whole comparison and no partial bars are returned. Bars follow selection order.
pub async fn compare<S: StatsSource + ?Sized>(
    source: &S,
    catalog: &[Country],
    selection: &ComparisonSelection,
    indicator: Indicator,
) -> Result<Vec<ComparisonBar>, ApiError> {
    let fetches = selection.ids().iter().map(|id| async move {
        let value = source.latest_value(id, indicator.code()).await?;
        let name = catalog
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.clone());
        Ok::<_, ApiError>(ComparisonBar {
            id: id.clone(),
            name,
            value,
        })
    });
    try_join_all(fetches).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_removes_then_readds_at_end() {
        let mut sel = ComparisonSelection::new();
        for id in ["A", "B", "C"] {
            assert!(sel.toggle(id));
        }
        assert!(sel.toggle("A"));
        assert!(sel.toggle("D"));
        assert_eq!(sel.ids(), ["B", "C", "D"]);
    }
}
