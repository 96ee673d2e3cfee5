use crate::api::{DEFAULT_SERIES_POINTS, StatsSource};
use crate::error::ApiError;
use crate::indicators::Indicator;
use crate::models::{Country, FetchStatus, IndicatorSeries};
use crate::store::sequence::RequestTracker;
use crate::store::state::StateCell;
use crate::store::LoadOutcome;
use futures::future::try_join_all;
use log::{debug, info, warn};
use std::collections::HashSet;
use tokio::sync::watch;

/// Everything the country list and detail screens render from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountriesState {
    /// Usable countries: aggregates removed, ids unique.
    pub catalog: Vec<Country>,
    /// Series of the selected country, keyed by indicator code.
    pub series_by_indicator: IndicatorSeries,
    /// Country whose series are in `series_by_indicator`.
    pub selected_country: Option<String>,
    /// Status of the catalog fetch.
    pub status: FetchStatus,
    /// Status of the detail-view series fetch.
    pub stats_status: FetchStatus,
}

/// State slots a response can overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    Catalog,
    CountryStats,
}

/// Country catalog and selected-country series, fed by a [`StatsSource`].
pub struct CountriesStore<S> {
    source: S,
    state: StateCell<CountriesState>,
    requests: RequestTracker<Slot>,
    series_points: u32,
}

impl<S: StatsSource> CountriesStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: StateCell::default(),
            requests: RequestTracker::new(),
            series_points: DEFAULT_SERIES_POINTS,
        }
    }

    /// Number of most-recent years requested per indicator.
    pub fn with_series_points(mut self, points: u32) -> Self {
        self.series_points = points.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn get_state(&self) -> CountriesState {
        self.state.get_state()
    }

    pub fn subscribe(&self) -> watch::Receiver<CountriesState> {
        self.state.subscribe()
    }

    pub fn catalog(&self) -> Vec<Country> {
        self.state.with_state(|s| s.catalog.clone())
    }

    pub fn series(&self) -> IndicatorSeries {
        self.state.with_state(|s| s.series_by_indicator.clone())
    }

    /// Catalog entry by id (case-insensitive).
    pub fn country(&self, id: &str) -> Option<Country> {
        self.state.with_state(|s| {
            s.catalog
                .iter()
                .find(|c| c.id.eq_ignore_ascii_case(id.trim()))
                .cloned()
        })
    }

    /// Fetch the country list and replace the catalog with its usable entries.
    ///
    /// On failure the previous catalog stays in place and `status` carries the
    /// error message. A response overtaken by a newer `load_catalog` call is
    /// dropped and reported as [`LoadOutcome::Superseded`].
    pub async fn load_catalog(&self) -> Result<LoadOutcome, ApiError> {
        let ticket = self.requests.issue(Slot::Catalog);
        self.state.update(|s| s.status = FetchStatus::Loading);

        match self.source.list_countries().await {
            Ok(countries) => {
                let catalog = usable_catalog(countries);
                let count = catalog.len();
                let applied = self.state.update_if(|s| {
                    if !self.requests.is_current(&ticket) {
                        return false;
                    }
                    s.catalog = catalog;
                    s.status = FetchStatus::Idle;
                    true
                });
                if applied {
                    info!("catalog loaded: {} countries", count);
                    Ok(LoadOutcome::Applied)
                } else {
                    debug!("catalog response #{} superseded, dropped", ticket.seq);
                    Ok(LoadOutcome::Superseded)
                }
            }
            Err(err) => {
                let message = err.to_string();
                let applied = self.state.update_if(|s| {
                    if !self.requests.is_current(&ticket) {
                        return false;
                    }
                    s.status = FetchStatus::Error(message);
                    true
                });
                if applied {
                    warn!("catalog load failed: {}", err);
                } else {
                    debug!("catalog failure #{} superseded: {}", ticket.seq, err);
                }
                Err(err)
            }
        }
    }

    /// Fetch every requested indicator for one country and replace the series
    /// wholesale once all of them resolved.
    ///
    /// Fetches run concurrently. If any of them fails, the previously loaded
    /// series stay untouched and the error is returned.
    pub async fn load_country_stats(
        &self,
        country_id: &str,
        indicator_ids: &[String],
    ) -> Result<LoadOutcome, ApiError> {
        let ticket = self.requests.issue(Slot::CountryStats);
        self.state.update(|s| s.stats_status = FetchStatus::Loading);

        let points = self.series_points;
        let fetches = indicator_ids.iter().map(|indicator| async move {
            let series = self
                .source
                .indicator_series(country_id, indicator, points)
                .await?;
            Ok::<_, ApiError>((indicator.clone(), series))
        });

        match try_join_all(fetches).await {
            Ok(results) => {
                let series: IndicatorSeries = results.into_iter().collect();
                let applied = self.state.update_if(|s| {
                    if !self.requests.is_current(&ticket) {
                        return false;
                    }
                    s.series_by_indicator = series;
                    s.selected_country = Some(country_id.to_string());
                    s.stats_status = FetchStatus::Idle;
                    true
                });
                if applied {
                    info!(
                        "series loaded for {} ({} indicators)",
                        country_id,
                        indicator_ids.len()
                    );
                    Ok(LoadOutcome::Applied)
                } else {
                    debug!("series response for {} superseded, dropped", country_id);
                    Ok(LoadOutcome::Superseded)
                }
            }
            Err(err) => {
                let message = err.to_string();
                let applied = self.state.update_if(|s| {
                    if !self.requests.is_current(&ticket) {
                        return false;
                    }
                    s.stats_status = FetchStatus::Error(message);
                    true
                });
                if applied {
                    warn!("series load for {} failed: {}", country_id, err);
                }
                Err(err)
            }
        }
    }

    /// [`load_country_stats`](Self::load_country_stats) for every tracked connectivity indicator.
    pub async fn load_connectivity_stats(&self, country_id: &str) -> Result<LoadOutcome, ApiError> {
        self.load_country_stats(country_id, &Indicator::all_codes())
            .await
    }
}

/// Drop aggregate rows and duplicate ids (first occurrence wins).
fn usable_catalog(countries: Vec<Country>) -> Vec<Country> {
    let total = countries.len();
    let mut seen = HashSet::new();
    let catalog: Vec<Country> = countries
        .into_iter()
        .filter(|c| !c.is_aggregate())
        .filter(|c| seen.insert(c.id.clone()))
        .collect();
    debug!("catalog: kept {} of {} records", catalog.len(), total);
    catalog
}
